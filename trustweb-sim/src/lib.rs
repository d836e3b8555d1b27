//! Random-world simulation around the trustweb propagation engine.
//!
//! Generates a seeded graph of participants and random ratings, derives
//! trust for a set of sources concurrently, and reports the results.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod error;
pub mod runner;
pub mod world;

pub use config::SimConfig;
pub use error::SimError;
pub use runner::{result_digest, ResultDigest, SimReport, SimRunner, SourceRun};
pub use world::{generate, World};
