//! Whole-preset rendering.
//!
//! [`ChunkedRenderer`] walks a curve preset in fixed chunks, samples the
//! automation curves once per chunk, and renders each chunk with those
//! parameters held constant. The chunk size trades automation resolution
//! against per-chunk overhead; with [`ChunkStrategy::PhaseContinuous`] it does
//! not affect waveform continuity.

use std::time::Instant;

use isotone_spec::{CarrierWaveform, SegmentPreset, TonePreset};

use crate::cache::SegmentCache;
use crate::config::{ChunkStrategy, RenderConfig};
use crate::error::{check_frequency, AudioResult};
use crate::filter::StreamingBandpass;
use crate::generator::{PulseShape, ToneGenerator, ToneSegment, CARRIER_AMPLITUDE};
use crate::mixer::{apply_fades, fade_length, limit_peak, peak};
use crate::modulation::envelope_at_phase;
use crate::oscillator::TWO_PI;
use crate::phase::PhaseAccumulator;
use crate::rng::{create_rng, derive_chunk_seed};
use crate::waveform::{carrier_at_phase, normalize_to, sample_count, white_noise};

/// A rendered mono buffer and its sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedAudio {
    /// Mono samples.
    pub samples: Vec<f64>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl RenderedAudio {
    /// Length in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Largest absolute sample value.
    pub fn peak(&self) -> f64 {
        peak(&self.samples)
    }

    /// Returns true when no samples were rendered.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Curve values sampled at the start of one chunk.
#[derive(Debug, Clone, Copy)]
struct ChunkParams {
    entrainment: f64,
    volume: f64,
    base_freq: f64,
}

impl ChunkParams {
    fn sample(preset: &TonePreset, time: f64) -> AudioResult<Self> {
        Ok(Self {
            entrainment: check_frequency(preset.entrainment.value_at(time))?,
            volume: preset.volume.value_at(time),
            base_freq: check_frequency(preset.base_freq.value_at(time))?,
        })
    }
}

/// Renders curve presets chunk by chunk.
#[derive(Debug, Clone)]
pub struct ChunkedRenderer {
    config: RenderConfig,
    generator: ToneGenerator,
}

impl ChunkedRenderer {
    /// Creates a renderer; the generator's cache follows `config.cache_capacity`.
    pub fn new(config: RenderConfig) -> AudioResult<Self> {
        config.validate()?;
        let generator = ToneGenerator::new(
            config.sample_rate,
            create_rng(config.seed),
            SegmentCache::new(config.cache_capacity),
        )?;
        Ok(Self { config, generator })
    }

    /// The active configuration.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// The generator used for segment and sweep rendering.
    pub fn generator(&self) -> &ToneGenerator {
        &self.generator
    }

    /// Renders a curve preset.
    ///
    /// The session lasts `preset.duration_with_floor(min_duration_seconds)`.
    /// The optional subsonic sine is added after the chunks, then both ends
    /// are faded and the buffer is scaled down if it exceeds the peak ceiling.
    pub fn render(&mut self, preset: &TonePreset) -> AudioResult<RenderedAudio> {
        let started = Instant::now();
        let config = self.config.clone();
        let sr = config.sample_rate as f64;

        let shape = PulseShape {
            carrier: preset.carrier,
            modulation: preset.modulation,
            duty_cycle: preset.duty_cycle,
            ramp_percent: preset.ramp_percent,
        };
        shape.validate()?;

        let duration = preset.duration_with_floor(config.min_duration_seconds);
        let num_samples = sample_count(duration, sr);
        let chunk_len = config.chunk_samples();
        let num_chunks = num_samples.div_ceil(chunk_len);

        let span = tracing::info_span!(
            "render_preset",
            preset = %preset.name,
            strategy = ?config.strategy,
        );
        let _enter = span.enter();
        tracing::debug!(duration, num_samples, num_chunks, "rendering preset");

        let mut samples = match config.strategy {
            ChunkStrategy::PhaseContinuous => {
                self.render_phase_continuous(preset, &shape, num_samples, chunk_len)?
            }
            ChunkStrategy::Independent => {
                self.render_independent(preset, &shape, num_samples, chunk_len)?
            }
        };

        if preset.subsonic.enabled {
            let frequency = check_frequency(preset.subsonic.frequency)?;
            let step = TWO_PI * frequency / sr;
            for (i, sample) in samples.iter_mut().enumerate() {
                *sample += preset.subsonic.volume * (step * i as f64).sin();
            }
        }

        apply_fades(&mut samples, fade_length(num_samples, sr, config.fade_seconds));
        let gain = limit_peak(&mut samples, config.peak_ceiling);

        tracing::info!(
            duration,
            samples = samples.len(),
            chunks = num_chunks,
            gain,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "preset rendered"
        );

        Ok(RenderedAudio {
            samples,
            sample_rate: config.sample_rate,
        })
    }

    /// Carrier and modulation phases accumulate across chunk boundaries.
    fn render_phase_continuous(
        &self,
        preset: &TonePreset,
        shape: &PulseShape,
        num_samples: usize,
        chunk_len: usize,
    ) -> AudioResult<Vec<f64>> {
        let sr = self.config.sample_rate as f64;
        let mut out = Vec::with_capacity(num_samples);
        let mut carrier_phase = PhaseAccumulator::new(sr);
        let mut modulation_phase = PhaseAccumulator::new(sr);

        let noise = if shape.carrier == CarrierWaveform::Noise {
            Some(self.session_noise(preset, num_samples, chunk_len)?)
        } else {
            None
        };

        for start in (0..num_samples).step_by(chunk_len) {
            let len = chunk_len.min(num_samples - start);
            let params = ChunkParams::sample(preset, start as f64 / sr)?;
            let gain = CARRIER_AMPLITUDE * params.volume * preset.tone_volume;

            for j in start..start + len {
                let carrier_at = carrier_phase.advance(params.base_freq);
                let modulation_at = modulation_phase.advance(params.entrainment);
                let carrier = match &noise {
                    Some(buffer) => buffer[j],
                    None => carrier_at_phase(shape.carrier, carrier_at).unwrap_or(0.0),
                };
                let envelope = envelope_at_phase(
                    shape.modulation,
                    modulation_at,
                    shape.duty_cycle,
                    shape.ramp_percent,
                );
                out.push(carrier * envelope * gain);
            }
        }
        Ok(out)
    }

    /// Band-passed noise carrier for the whole session.
    ///
    /// White noise is drawn per chunk from `derive_chunk_seed`, so a chunk's
    /// input does not depend on earlier chunks. One band-pass runs across all
    /// chunks and is retuned only when the base frequency changes. The result
    /// is normalized to unit peak once.
    fn session_noise(
        &self,
        preset: &TonePreset,
        num_samples: usize,
        chunk_len: usize,
    ) -> AudioResult<Vec<f64>> {
        let sr = self.config.sample_rate as f64;
        let mut filter = StreamingBandpass::new(sr);
        let mut noise = Vec::with_capacity(num_samples);

        for (index, start) in (0..num_samples).step_by(chunk_len).enumerate() {
            let len = chunk_len.min(num_samples - start);
            filter.retune(check_frequency(preset.base_freq.value_at(start as f64 / sr))?);
            let mut rng = create_rng(derive_chunk_seed(self.config.seed, index as u64));
            noise.extend(
                white_noise(len, &mut rng)
                    .into_iter()
                    .map(|x| filter.process(x)),
            );
        }

        normalize_to(&mut noise, 1.0);
        Ok(noise)
    }

    /// Every chunk is an independent tone segment starting at phase 0.
    ///
    /// Tonal chunks go through the segment cache. Noise chunks are reseeded
    /// per chunk index and bypass it, so no two chunks share noise.
    fn render_independent(
        &mut self,
        preset: &TonePreset,
        shape: &PulseShape,
        num_samples: usize,
        chunk_len: usize,
    ) -> AudioResult<Vec<f64>> {
        let sr = self.config.sample_rate as f64;
        let mut out = Vec::with_capacity(num_samples);

        for (index, start) in (0..num_samples).step_by(chunk_len).enumerate() {
            let len = chunk_len.min(num_samples - start);
            let params = ChunkParams::sample(preset, start as f64 / sr)?;

            let segment = ToneSegment {
                duration: len as f64 / sr,
                carrier_freq: params.base_freq,
                entrainment_freq: params.entrainment,
                volume: params.volume,
                sample_rate: self.config.sample_rate,
                carrier: shape.carrier,
                modulation: shape.modulation,
                duty_cycle: shape.duty_cycle,
            };
            let mut chunk = if shape.carrier == CarrierWaveform::Noise {
                self.generator
                    .reseed(derive_chunk_seed(self.config.seed, index as u64));
                self.generator.generate_tone_segment_uncached(&segment)?
            } else {
                self.generator.generate_tone_segment(&segment)?
            };
            chunk.resize(len, 0.0);
            out.extend(chunk.into_iter().map(|s| s * preset.tone_volume));
        }

        tracing::debug!(
            entries = self.generator.cache().len(),
            hits = self.generator.cache().hits(),
            misses = self.generator.cache().misses(),
            "segment cache after render"
        );
        Ok(out)
    }

    /// Renders a segment-list preset with this renderer's generator.
    pub fn render_segments(&mut self, preset: &SegmentPreset) -> AudioResult<RenderedAudio> {
        let samples = render_segments(&mut self.generator, preset)?;
        Ok(RenderedAudio {
            samples,
            sample_rate: self.config.sample_rate,
        })
    }
}

/// Renders a curve preset with the default configuration at `sample_rate`.
pub fn render_preset(preset: &TonePreset, sample_rate: u32) -> AudioResult<RenderedAudio> {
    let config = RenderConfig {
        sample_rate,
        ..RenderConfig::default()
    };
    ChunkedRenderer::new(config)?.render(preset)
}

/// Concatenates the sweeps of a segment-list preset. An empty preset renders
/// to an empty buffer.
pub fn render_segments(
    generator: &mut ToneGenerator,
    preset: &SegmentPreset,
) -> AudioResult<Vec<f64>> {
    let shape = PulseShape {
        carrier: preset.carrier,
        modulation: preset.modulation,
        ..PulseShape::default()
    };

    let mut out = Vec::new();
    for (index, segment) in preset.segments.iter().enumerate() {
        tracing::debug!(
            index,
            start_freq = segment.start_freq,
            end_freq = segment.end_freq,
            transition = %segment.transition,
            "rendering segment"
        );
        out.extend(generator.generate_sweep(segment, &shape)?);
    }
    Ok(out)
}

/// Repeats `samples` until they last `target_duration` seconds.
///
/// Audio that is already at least that long is returned unchanged.
pub fn render_looped(samples: &[f64], sample_rate: u32, target_duration: f64) -> Vec<f64> {
    let target_len = sample_count(target_duration, sample_rate as f64);
    if samples.is_empty() || samples.len() >= target_len {
        return samples.to_vec();
    }
    samples.iter().cycle().take(target_len).copied().collect()
}
