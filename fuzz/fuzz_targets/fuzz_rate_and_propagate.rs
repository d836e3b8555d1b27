//! Fuzz target: arbitrary rating sequences followed by propagation.
//!
//! Each 4-byte chunk is one `rate` call (source, target, rating as i16).
//! Invalid calls must be rejected without panicking, and every propagation
//! result must respect the engine's invariants.

#![no_main]

use libfuzzer_sys::fuzz_target;
use trustweb_core::{Propagator, TrustGraph};

const PARTICIPANTS: usize = 12;

fuzz_target!(|data: &[u8]| {
    let Some((&depth, rest)) = data.split_first() else {
        return;
    };
    let depth = u32::from(depth % 5);

    let mut graph = TrustGraph::new();
    let handles: Vec<_> = (0..PARTICIPANTS).map(|_| graph.create_participant(None)).collect();

    for chunk in rest.chunks_exact(4) {
        let from = handles[usize::from(chunk[0]) % PARTICIPANTS];
        let to = handles[usize::from(chunk[1]) % PARTICIPANTS];
        let rating = f64::from(i16::from_be_bytes([chunk[2], chunk[3]]));
        let accepted = graph.rate(from, to, rating).is_ok();
        let valid = from != to && (-100.0..=100.0).contains(&rating);
        assert_eq!(accepted, valid, "rate({from}, {to}, {rating}) acceptance mismatch");
    }

    for &source in &handles {
        let plain = Propagator::new(&graph).max_depth(depth).run(source);
        let memo = Propagator::new(&graph).max_depth(depth).memoized(true).run(source);
        let (plain, memo) = match (plain, memo) {
            (Ok(p), Ok(m)) => (p, m),
            other => panic!("propagation of a known source failed: {other:?}"),
        };
        assert_eq!(plain.ratings, memo.ratings, "memoization changed the result");

        let source_id = graph.id_of(source).expect("source handle is valid");
        assert!(!plain.ratings.contains_key(source_id), "source rated itself");

        let direct = graph.direct_ratings(source).expect("source handle is valid");
        for (id, rating) in &direct {
            let trust = plain.ratings[id];
            assert!(trust.fixed, "direct entry must be fixed");
            assert_eq!(trust.rating, rating.value(), "direct entry must not change");
        }
        for trust in plain.ratings.values() {
            assert!(
                (-100.0..=100.0).contains(&trust.rating),
                "rating {} escaped range",
                trust.rating
            );
        }
    }
});
