//! Tracker benchmarks using Criterion.
//!
//! Run with: cargo bench

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use centroid_track::{BoundingBox, CentroidTracker, Detection, RuleSet, TrackerConfig, deduplicate};

/// A row of `n` well-separated person-sized boxes, shifted by `offset` pixels.
fn create_test_detections(n: usize, offset: i32) -> Vec<Detection> {
    (0..n)
        .map(|i| {
            let x = i as i32 * 100 + offset;
            let y = (i as i32 % 5) * 120 + offset;
            let bbox = BoundingBox::new(x, y, 40, 80).expect("valid box");
            Detection::new(bbox, 0.9, 0)
        })
        .collect()
}

fn benchmark_tracker_update(c: &mut Criterion, n: usize) {
    let frames: Vec<_> = (0..10).map(|k| create_test_detections(n, k * 2)).collect();

    c.bench_function(&format!("tracker_update_{n}_objects"), |b| {
        let mut tracker = CentroidTracker::new(TrackerConfig::default());
        let mut frame = 0usize;
        b.iter(|| {
            let dets = &frames[frame % frames.len()];
            let now = frame as f64 / 30.0;
            frame += 1;
            black_box(tracker.update(black_box(dets), now));
        });
    });
}

fn benchmark_tracker_update_10_objects(c: &mut Criterion) {
    benchmark_tracker_update(c, 10);
}

fn benchmark_tracker_update_100_objects(c: &mut Criterion) {
    benchmark_tracker_update(c, 100);
}

fn benchmark_full_frame(c: &mut Criterion) {
    let mut tracker = CentroidTracker::new(TrackerConfig::default());
    let dets = create_test_detections(50, 0);
    tracker.update(&dets, 0.0);
    let snapshot = tracker.update(&dets, 0.1);
    let rules = RuleSet::loitering(10.0);

    c.bench_function("rules_and_dedup_50_tracks", |b| {
        b.iter(|| {
            let anomalies = rules.evaluate(black_box(&snapshot), 20.0);
            let rendered = deduplicate(black_box(&snapshot), 55.0);
            black_box((anomalies, rendered));
        });
    });
}

criterion_group!(
    benches,
    benchmark_tracker_update_10_objects,
    benchmark_tracker_update_100_objects,
    benchmark_full_frame,
);
criterion_main!(benches);
