//! Fuzz target: loading a graph from arbitrary JSON records.
//!
//! Parsing and loading may fail, but must never panic; a graph that loads
//! must serialize back to records that load to the same graph.

#![no_main]

use libfuzzer_sys::fuzz_target;
use trustweb_core::{ParticipantRecord, TrustGraph};

fuzz_target!(|data: &[u8]| {
    let Ok(records) = serde_json::from_slice::<Vec<ParticipantRecord>>(data) else {
        return;
    };
    let Ok(graph) = TrustGraph::from_records(&records) else {
        return;
    };

    let exported = graph.to_records();
    let reloaded = TrustGraph::from_records(&exported).expect("exported records must reload");
    assert_eq!(reloaded.to_records(), exported, "record round-trip must be stable");

    for source in graph.handles() {
        let _ = graph.propagate(source, 3).expect("known source must propagate");
    }
});
