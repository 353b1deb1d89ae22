//! Whole-preset rendering through the public API.

use isotone_engine::{
    isochronic_tone, render_looped, ChunkStrategy, ChunkedRenderer, RenderConfig,
};
use isotone_spec::{
    CarrierWaveform, ModulationShape, SegmentPreset, TimelineSegment, TonePreset, TransitionKind,
};
use pretty_assertions::assert_eq;

fn rising_preset() -> TonePreset {
    let mut preset = TonePreset::new("Rising");
    preset.modulation = ModulationShape::Sine;
    preset.base_freq.add_point(0.0, 100.0).unwrap();
    preset.base_freq.add_point(2.0, 300.0).unwrap();
    preset.entrainment.add_point(0.0, 5.0).unwrap();
    preset.entrainment.add_point(2.0, 20.0).unwrap();
    preset
}

fn config(strategy: ChunkStrategy) -> RenderConfig {
    RenderConfig {
        sample_rate: 8000,
        min_duration_seconds: 0.0,
        strategy,
        ..RenderConfig::default()
    }
}

fn largest_step(samples: &[f64]) -> f64 {
    samples
        .windows(2)
        .map(|w| (w[1] - w[0]).abs())
        .fold(0.0, f64::max)
}

#[test]
fn test_phase_continuous_render_has_no_chunk_clicks() {
    let preset = rising_preset();
    let audio = ChunkedRenderer::new(config(ChunkStrategy::PhaseContinuous))
        .unwrap()
        .render(&preset)
        .unwrap();
    assert_eq!(audio.samples.len(), 16000);

    // Gain is 0.8 * 0.5 * 0.8; a 300 Hz sine at 8 kHz moves at most
    // 0.24 rad per sample, so no step can approach 0.1.
    assert!(largest_step(&audio.samples) < 0.1);
}

#[test]
fn test_independent_chunks_restart_phase() {
    let preset = rising_preset();
    let audio = ChunkedRenderer::new(config(ChunkStrategy::Independent))
        .unwrap()
        .render(&preset)
        .unwrap();
    assert_eq!(audio.samples.len(), 16000);
    assert!(largest_step(&audio.samples) > 0.12);
}

fn flat_noise_preset() -> TonePreset {
    let mut preset = TonePreset::new("Surf");
    preset.carrier = CarrierWaveform::Noise;
    preset.modulation = ModulationShape::Sine;
    preset.set_duration(2.0).unwrap();
    preset
}

/// Mean absolute step across chunk boundaries and everywhere else.
fn boundary_and_interior_steps(samples: &[f64], chunk_len: usize) -> (f64, f64) {
    let (mut boundary, mut interior) = ((0.0, 0usize), (0.0, 0usize));
    for i in 1..samples.len() {
        let step = (samples[i] - samples[i - 1]).abs();
        let slot = if i % chunk_len == 0 {
            &mut boundary
        } else {
            &mut interior
        };
        slot.0 += step;
        slot.1 += 1;
    }
    (boundary.0 / boundary.1 as f64, interior.0 / interior.1 as f64)
}

#[test]
fn test_noise_carrier_is_continuous_across_chunks() {
    let unfaded = RenderConfig {
        fade_seconds: 0.0,
        ..config(ChunkStrategy::PhaseContinuous)
    };
    let chunk_len = unfaded.chunk_samples();
    assert_eq!(chunk_len, 80);

    let audio = ChunkedRenderer::new(unfaded)
        .unwrap()
        .render(&flat_noise_preset())
        .unwrap();
    assert_eq!(audio.samples.len(), 16000);

    let (boundary, interior) = boundary_and_interior_steps(&audio.samples, chunk_len);
    assert!(interior > 0.0);
    assert!(
        boundary < 2.0 * interior,
        "boundary step {boundary} vs interior {interior}"
    );
}

#[test]
fn test_noise_chunks_are_distinct() {
    for strategy in [ChunkStrategy::PhaseContinuous, ChunkStrategy::Independent] {
        let audio = ChunkedRenderer::new(config(strategy))
            .unwrap()
            .render(&flat_noise_preset())
            .unwrap();
        assert_ne!(
            audio.samples[80..160],
            audio.samples[880..960],
            "{strategy:?} repeated chunk noise"
        );
    }
}

#[test]
fn test_independent_noise_skips_segment_cache() {
    let preset = flat_noise_preset();
    let mut renderer = ChunkedRenderer::new(config(ChunkStrategy::Independent)).unwrap();
    let first = renderer.render(&preset).unwrap();
    assert!(renderer.generator().cache().is_empty());

    // Chunk noise depends only on the seed and chunk index.
    let second = renderer.render(&preset).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_saved_preset_renders_identically() {
    let preset = rising_preset();
    let restored = TonePreset::from_json(&preset.to_json_pretty().unwrap()).unwrap();
    assert_eq!(restored, preset);

    let render = |p: &TonePreset| {
        ChunkedRenderer::new(config(ChunkStrategy::PhaseContinuous))
            .unwrap()
            .render(p)
            .unwrap()
    };
    assert_eq!(render(&preset), render(&restored));
}

#[test]
fn test_segment_preset_render_length() {
    let mut preset = SegmentPreset::new("Descent");
    preset.add_segment(TimelineSegment::constant(12.0, 200.0, 1.5, 0.6));
    preset.add_segment(TimelineSegment::sweep(
        12.0,
        4.0,
        200.0,
        2.5,
        0.6,
        TransitionKind::Exponential,
    ));

    let mut renderer = ChunkedRenderer::new(config(ChunkStrategy::PhaseContinuous)).unwrap();
    let audio = renderer.render_segments(&preset).unwrap();
    assert_eq!(audio.sample_rate, 8000);
    assert_eq!(audio.samples.len(), 32000);
    assert!((audio.duration_seconds() - preset.total_duration()).abs() < 1e-9);
    assert!(audio.peak() <= 0.6);
}

#[test]
fn test_short_render_loops_to_target() {
    let (tone, sample_rate) = isochronic_tone(10.0, 0.5, 8000, 0.5, 100.0).unwrap();
    assert_eq!(sample_rate, 8000);
    assert_eq!(tone.len(), 4000);

    let looped = render_looped(&tone, sample_rate, 1.25);
    assert_eq!(looped.len(), 10000);
    assert_eq!(&looped[4000..8000], tone.as_slice());
    assert_eq!(&looped[8000..], &tone[..2000]);
}
