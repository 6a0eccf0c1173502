use obsgrid::prelude::*;
use obsgrid::{SharedIndex, sanitize};
use std::thread;

fn records(n: usize, offset: f64) -> Vec<RawObservation> {
    (0..n)
        .map(|i| {
            RawObservation::new(
                i.to_string(),
                Some(offset + i as f64 * 0.01),
                Some(offset - i as f64 * 0.01),
                SourceDetails::primary("Cygnus olor", None),
            )
        })
        .collect()
}

#[test]
fn test_background_rebuild_swaps_into_view() {
    let shared = SharedIndex::default();
    let worker = shared.clone();
    let config = Config::default();

    let handle = thread::spawn(move || {
        worker
            .rebuild(sanitize(records(250, 40.0)), &config)
            .unwrap()
            .generation()
    });
    let generation = handle.join().unwrap();

    let mut engine = LodEngine::new();
    engine.replace_index(shared.snapshot());
    assert_eq!(engine.index().generation(), generation);
    assert_eq!(engine.index().point_count(), 250);

    engine.handle_event(MapEvent::ZoomEnd(12.5));
    let frame = engine.frame();
    assert_eq!(frame.path, RenderPath::Cells(Resolution::Small));
}

#[test]
fn test_selection_cleared_when_shared_index_swapped() {
    let shared = SharedIndex::default();
    shared
        .rebuild(sanitize(records(10, 0.0)), &Config::default())
        .unwrap();

    let mut engine = LodEngine::new();
    engine.replace_index(shared.snapshot());
    engine.handle_event(MapEvent::ZoomEnd(5.0));
    assert!(engine.click_at(0.0, 0.0));

    shared
        .rebuild(sanitize(records(10, 0.0)), &Config::default())
        .unwrap();
    engine.replace_index(shared.snapshot());
    assert!(engine.selection().is_empty());
}
