use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tracksift::classifier::{Algorithm, TrackClassifier};
use tracksift::config::resolve_features;
use tracksift::models::{GbdtModel, ModelBackend, Stump};
use tracksift::track::{RawTrack, UNEVALUATED_SCORE};

const TRACK_COUNT: usize = 1_000;

fn synthetic_tracks() -> Vec<RawTrack> {
    (0..TRACK_COUNT)
        .map(|i| RawTrack {
            pt: 2.0 + (i % 50) as f32 * 0.2,
            eta: -2.3 + (i % 47) as f32 * 0.1,
            z0: -10.0 + (i % 21) as f32,
            rinv: 0.001 * (1 + i % 5) as f32,
            tanl: 0.1 * (i % 30) as f32,
            chi2: 0.5 + (i % 40) as f32,
            chi2rphi: 0.3 + (i % 25) as f32,
            chi2rz: 0.2 + (i % 18) as f32,
            bendchi2: 0.1 + (i % 10) as f32 * 0.3,
            nstubs: 4 + (i % 3) as u32,
            hitpattern: (i % 128) as u8,
            mva1: UNEVALUATED_SCORE,
            mva2: UNEVALUATED_SCORE,
            mva3: UNEVALUATED_SCORE,
        })
        .collect()
}

fn gbdt_backend(feature_len: usize) -> ModelBackend {
    let stumps = (0..60)
        .map(|round| Stump {
            feature_index: (round % feature_len) as u16,
            threshold: 0.5 + round as f32 * 0.1,
            left_value: -0.3,
            right_value: 0.3,
        })
        .collect();
    ModelBackend::Gbdt(GbdtModel {
        model_version: 1,
        feature_len,
        input_name: "feature_input".to_string(),
        output_name: "probability".to_string(),
        learning_rate: 0.1,
        init_raw: 0.0,
        stumps,
    })
}

fn default_order() -> Vec<tracksift::features::Feature> {
    let names = [
        "log_chi2",
        "log_chi2rphi",
        "log_chi2rz",
        "log_bendchi2",
        "nstubs",
        "lay1_hits",
        "lay2_hits",
        "lay3_hits",
        "lay4_hits",
        "lay5_hits",
        "lay6_hits",
        "disk1_hits",
        "disk2_hits",
        "disk3_hits",
        "disk4_hits",
        "disk5_hits",
        "rinv",
        "tanl",
        "z0",
        "dtot",
        "ltot",
    ]
    .iter()
    .map(|name| name.to_string())
    .collect::<Vec<_>>();
    resolve_features(&names).expect("reference feature names")
}

fn bench_gbdt_event(c: &mut Criterion) {
    let order = default_order();
    let mut classifier =
        TrackClassifier::new(Algorithm::ModelOnly(gbdt_backend(order.len())), order);
    let tracks = synthetic_tracks();
    c.bench_with_input(
        BenchmarkId::new("gbdt_event", TRACK_COUNT),
        &tracks,
        |b, tracks| {
            b.iter(|| {
                let mut event = tracks.clone();
                classifier.score_event(black_box(&mut event));
                event
            });
        },
    );
}

criterion_group!(benches, bench_gbdt_event);
criterion_main!(benches);
