//! Tone generator: carriers, envelopes, cached tone segments and sweeps.

use isotone_spec::{CarrierWaveform, ModulationShape, TimelineSegment};
use rand_pcg::Pcg32;

use crate::cache::{SegmentCache, SegmentKey};
use crate::error::{
    check_duration, check_frequency, check_sample_rate, check_unit, AudioError, AudioResult,
};
use crate::mixer::{apply_fades, fade_length};
use crate::modulation::{envelope_at_phase, envelope_samples};
use crate::phase::accumulate;
use crate::rng::create_rng;
use crate::transition::FrequencyTransition;
use crate::waveform::{carrier_samples, sample_count};

/// Carrier amplitude inside a tone segment.
pub const CARRIER_AMPLITUDE: f64 = 0.8;

/// Trapezoid ramp used when a caller does not choose one (percent of a period).
pub const DEFAULT_RAMP_PERCENT: f64 = 10.0;

/// Fade applied to each end of a sweep (seconds).
pub const SWEEP_FADE_SECONDS: f64 = 0.01;

/// Parameters of one constant tone segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneSegment {
    /// Length in seconds.
    pub duration: f64,
    /// Carrier frequency (Hz).
    pub carrier_freq: f64,
    /// Pulse rate (Hz).
    pub entrainment_freq: f64,
    /// Linear gain.
    pub volume: f64,
    /// Sample rate of the rendered buffer.
    pub sample_rate: u32,
    /// Carrier waveform.
    pub carrier: CarrierWaveform,
    /// Envelope shape.
    pub modulation: ModulationShape,
    /// "On" fraction of each pulse.
    pub duty_cycle: f64,
}

impl ToneSegment {
    /// Sine carrier, square pulses at 50% duty, 44.1 kHz.
    pub fn new(duration: f64, carrier_freq: f64, entrainment_freq: f64, volume: f64) -> Self {
        Self {
            duration,
            carrier_freq,
            entrainment_freq,
            volume,
            sample_rate: 44100,
            carrier: CarrierWaveform::Sine,
            modulation: ModulationShape::Square,
            duty_cycle: 0.5,
        }
    }

    /// Sets the sample rate.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Sets the carrier waveform.
    pub fn with_carrier(mut self, carrier: CarrierWaveform) -> Self {
        self.carrier = carrier;
        self
    }

    /// Sets the envelope shape.
    pub fn with_modulation(mut self, modulation: ModulationShape) -> Self {
        self.modulation = modulation;
        self
    }

    /// Sets the duty cycle.
    pub fn with_duty_cycle(mut self, duty_cycle: f64) -> Self {
        self.duty_cycle = duty_cycle;
        self
    }

    /// Cache key covering every parameter.
    pub fn key(&self) -> SegmentKey {
        SegmentKey::new(
            self.duration,
            self.carrier_freq,
            self.entrainment_freq,
            self.volume,
            self.sample_rate,
            self.carrier,
            self.modulation,
            self.duty_cycle,
        )
    }
}

/// Waveform and envelope settings shared by every segment of a timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseShape {
    /// Carrier waveform.
    pub carrier: CarrierWaveform,
    /// Envelope shape.
    pub modulation: ModulationShape,
    /// "On" fraction of each pulse.
    pub duty_cycle: f64,
    /// Trapezoid ramp in percent of a period.
    pub ramp_percent: f64,
}

impl Default for PulseShape {
    fn default() -> Self {
        Self {
            carrier: CarrierWaveform::default(),
            modulation: ModulationShape::default(),
            duty_cycle: 0.5,
            ramp_percent: DEFAULT_RAMP_PERCENT,
        }
    }
}

impl PulseShape {
    /// Checks duty cycle and ramp.
    pub fn validate(&self) -> AudioResult<()> {
        check_unit("duty_cycle", self.duty_cycle)?;
        if !(0.0..=100.0).contains(&self.ramp_percent) {
            return Err(AudioError::invalid_param(
                "ramp_percent",
                format!("must be between 0 and 100, got {}", self.ramp_percent),
            ));
        }
        Ok(())
    }
}

/// Stateful tone generator.
///
/// Owns the random source used by noise carriers and the cache consulted by
/// [`ToneGenerator::generate_tone_segment`]. Not thread-safe; use one
/// generator per worker.
#[derive(Debug, Clone)]
pub struct ToneGenerator {
    sample_rate: u32,
    rng: Pcg32,
    cache: SegmentCache,
}

impl ToneGenerator {
    /// Creates a generator from an explicit random source and cache.
    pub fn new(sample_rate: u32, rng: Pcg32, cache: SegmentCache) -> AudioResult<Self> {
        check_sample_rate(sample_rate)?;
        Ok(Self {
            sample_rate,
            rng,
            cache,
        })
    }

    /// Creates a generator with a seeded RNG and an unbounded cache.
    pub fn with_seed(sample_rate: u32, seed: u32) -> AudioResult<Self> {
        Self::new(sample_rate, create_rng(seed), SegmentCache::unbounded())
    }

    /// Default sample rate for carriers and envelopes.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Replaces the random source with a freshly seeded one.
    pub fn reseed(&mut self, seed: u32) {
        self.rng = create_rng(seed);
    }

    /// The segment cache.
    pub fn cache(&self) -> &SegmentCache {
        &self.cache
    }

    /// Empties the segment cache.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Renders a carrier of `duration` seconds at the generator's sample rate.
    pub fn generate_carrier(
        &mut self,
        kind: CarrierWaveform,
        frequency: f64,
        duration: f64,
        amplitude: f64,
    ) -> AudioResult<Vec<f64>> {
        let sr = self.sample_rate as f64;
        let num_samples = sample_count(check_duration(duration)?, sr);
        if num_samples == 0 {
            return Ok(Vec::new());
        }
        check_frequency(frequency)?;
        Ok(carrier_samples(
            kind,
            frequency,
            num_samples,
            sr,
            amplitude,
            &mut self.rng,
        ))
    }

    /// Renders a modulation envelope in `[0, 1]` at the generator's sample rate.
    pub fn generate_modulation(
        &self,
        kind: ModulationShape,
        frequency: f64,
        duration: f64,
        duty_cycle: f64,
        ramp_percent: f64,
    ) -> AudioResult<Vec<f64>> {
        let sr = self.sample_rate as f64;
        let num_samples = sample_count(check_duration(duration)?, sr);
        if num_samples == 0 {
            return Ok(Vec::new());
        }
        check_frequency(frequency)?;
        PulseShape {
            modulation: kind,
            duty_cycle,
            ramp_percent,
            ..PulseShape::default()
        }
        .validate()?;
        Ok(envelope_samples(
            kind,
            frequency,
            num_samples,
            sr,
            duty_cycle,
            ramp_percent,
        ))
    }

    /// Renders `carrier * envelope * volume` for one constant segment,
    /// returning the cached buffer when the same parameters were rendered
    /// before.
    ///
    /// Noise segments are cached like any other, so a hit replays the noise
    /// of the first render. Use [`ToneGenerator::generate_tone_segment_uncached`]
    /// when every call needs fresh noise.
    pub fn generate_tone_segment(&mut self, segment: &ToneSegment) -> AudioResult<Vec<f64>> {
        let num_samples = Self::checked_len(segment)?;
        if num_samples == 0 {
            return Ok(Vec::new());
        }

        let key = segment.key();
        if let Some(cached) = self.cache.get(&key) {
            tracing::debug!(key = %key.fingerprint(), "segment cache hit");
            return Ok(cached.to_vec());
        }
        tracing::debug!(key = %key.fingerprint(), samples = num_samples, "segment cache miss");

        let samples = self.synthesize(segment, num_samples);
        self.cache.insert(key, samples.clone());
        Ok(samples)
    }

    /// Same as [`ToneGenerator::generate_tone_segment`] but never reads or
    /// writes the cache. Noise is drawn from the generator's current RNG.
    pub fn generate_tone_segment_uncached(
        &mut self,
        segment: &ToneSegment,
    ) -> AudioResult<Vec<f64>> {
        let num_samples = Self::checked_len(segment)?;
        if num_samples == 0 {
            return Ok(Vec::new());
        }
        Ok(self.synthesize(segment, num_samples))
    }

    /// Validates a segment and returns its length in samples.
    fn checked_len(segment: &ToneSegment) -> AudioResult<usize> {
        let sr = check_sample_rate(segment.sample_rate)? as f64;
        let num_samples = sample_count(check_duration(segment.duration)?, sr);
        if num_samples == 0 {
            return Ok(0);
        }
        check_frequency(segment.carrier_freq)?;
        check_frequency(segment.entrainment_freq)?;
        check_unit("duty_cycle", segment.duty_cycle)?;
        Ok(num_samples)
    }

    fn synthesize(&mut self, segment: &ToneSegment, num_samples: usize) -> Vec<f64> {
        let sr = segment.sample_rate as f64;
        let carrier = carrier_samples(
            segment.carrier,
            segment.carrier_freq,
            num_samples,
            sr,
            CARRIER_AMPLITUDE,
            &mut self.rng,
        );
        let envelope = envelope_samples(
            segment.modulation,
            segment.entrainment_freq,
            num_samples,
            sr,
            segment.duty_cycle,
            DEFAULT_RAMP_PERCENT,
        );
        carrier
            .iter()
            .zip(&envelope)
            .map(|(c, e)| c * e * segment.volume)
            .collect()
    }

    /// Renders one timeline segment at the generator's sample rate.
    ///
    /// A constant segment uses the sample-domain envelope. A sweep integrates
    /// its frequency trajectory into a phase and evaluates the envelope from
    /// that phase, so the pulse train stays continuous. Both ends get a short
    /// linear fade.
    pub fn generate_sweep(
        &mut self,
        segment: &TimelineSegment,
        shape: &PulseShape,
    ) -> AudioResult<Vec<f64>> {
        let sr = self.sample_rate as f64;
        let num_samples = sample_count(check_duration(segment.duration)?, sr);
        if num_samples == 0 {
            return Ok(Vec::new());
        }
        check_frequency(segment.base_freq)?;
        check_frequency(segment.start_freq)?;
        check_frequency(segment.end_freq)?;
        shape.validate()?;

        let carrier = carrier_samples(
            shape.carrier,
            segment.base_freq,
            num_samples,
            sr,
            1.0,
            &mut self.rng,
        );

        let envelope = if segment.is_sweep() {
            let transition = FrequencyTransition::new(
                segment.start_freq,
                segment.end_freq,
                segment.duration,
                segment.transition,
            );
            let trajectory = transition.trajectory(num_samples);
            accumulate(&trajectory, sr)
                .into_iter()
                .map(|phase| {
                    envelope_at_phase(
                        shape.modulation,
                        phase,
                        shape.duty_cycle,
                        shape.ramp_percent,
                    )
                })
                .collect()
        } else {
            envelope_samples(
                shape.modulation,
                segment.start_freq,
                num_samples,
                sr,
                shape.duty_cycle,
                shape.ramp_percent,
            )
        };

        let mut samples: Vec<f64> = carrier
            .iter()
            .zip(&envelope)
            .map(|(c, e)| c * e * segment.volume)
            .collect();
        apply_fades(&mut samples, fade_length(num_samples, sr, SWEEP_FADE_SECONDS));
        Ok(samples)
    }
}

/// Renders a plain isochronic tone: sine carrier, square pulses at 50% duty.
///
/// Returns the samples together with their sample rate.
pub fn isochronic_tone(
    entrainment_freq: f64,
    duration: f64,
    sample_rate: u32,
    volume: f64,
    carrier_freq: f64,
) -> AudioResult<(Vec<f64>, u32)> {
    let mut generator = ToneGenerator::with_seed(sample_rate, 0)?;
    let segment = ToneSegment::new(duration, carrier_freq, entrainment_freq, volume)
        .with_sample_rate(sample_rate);
    let samples = generator.generate_tone_segment(&segment)?;
    Ok((samples, sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use isotone_spec::TransitionKind;
    use pretty_assertions::assert_eq;

    fn generator() -> ToneGenerator {
        ToneGenerator::with_seed(44100, 1).unwrap()
    }

    #[test]
    fn test_zero_sample_rate_rejected() {
        assert!(matches!(
            ToneGenerator::with_seed(0, 1),
            Err(AudioError::InvalidSampleRate { rate: 0 })
        ));
    }

    #[test]
    fn test_non_positive_duration_is_empty() {
        let mut gen = generator();
        assert!(gen
            .generate_carrier(CarrierWaveform::Sine, 100.0, 0.0, 1.0)
            .unwrap()
            .is_empty());
        assert!(gen
            .generate_modulation(ModulationShape::Square, 10.0, -1.0, 0.5, 10.0)
            .unwrap()
            .is_empty());
        let segment = ToneSegment::new(0.0, 100.0, 10.0, 0.5);
        assert!(gen.generate_tone_segment(&segment).unwrap().is_empty());
        assert!(gen.cache().is_empty());
    }

    #[test]
    fn test_bad_frequency_rejected() {
        let mut gen = generator();
        assert!(matches!(
            gen.generate_carrier(CarrierWaveform::Sine, 0.0, 1.0, 1.0),
            Err(AudioError::InvalidFrequency { .. })
        ));
        assert!(matches!(
            gen.generate_modulation(ModulationShape::Sine, -2.0, 1.0, 0.5, 10.0),
            Err(AudioError::InvalidFrequency { .. })
        ));
        let segment = ToneSegment::new(1.0, 100.0, f64::NAN, 0.5);
        assert!(gen.generate_tone_segment(&segment).is_err());
    }

    #[test]
    fn test_bad_duty_rejected() {
        let gen = generator();
        assert!(matches!(
            gen.generate_modulation(ModulationShape::Square, 10.0, 1.0, 1.5, 10.0),
            Err(AudioError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_segment_cache_counts_distinct_tuples() {
        let mut gen = generator();
        let segment = ToneSegment::new(0.5, 100.0, 10.0, 0.5);
        let first = gen.generate_tone_segment(&segment).unwrap();
        let second = gen.generate_tone_segment(&segment).unwrap();
        assert_eq!(first, second);
        assert_eq!(gen.cache().len(), 1);
        assert_eq!(gen.cache().hits(), 1);

        gen.generate_tone_segment(&segment.with_duty_cycle(0.3)).unwrap();
        assert_eq!(gen.cache().len(), 2);

        gen.clear_cache();
        assert!(gen.cache().is_empty());
    }

    #[test]
    fn test_uncached_noise_draws_fresh_samples() {
        let mut gen = generator();
        let segment = ToneSegment::new(0.1, 100.0, 10.0, 0.5).with_carrier(CarrierWaveform::Noise);
        let first = gen.generate_tone_segment_uncached(&segment).unwrap();
        let second = gen.generate_tone_segment_uncached(&segment).unwrap();
        assert_eq!(first.len(), 4410);
        assert_ne!(first, second);
        assert!(gen.cache().is_empty());

        gen.reseed(5);
        let reseeded = gen.generate_tone_segment_uncached(&segment).unwrap();
        gen.reseed(5);
        assert_eq!(gen.generate_tone_segment_uncached(&segment).unwrap(), reseeded);
    }

    #[test]
    fn test_segment_peak_bounded_by_carrier_amplitude() {
        let mut gen = generator();
        let segment =
            ToneSegment::new(1.0, 100.0, 10.0, 0.5).with_carrier(CarrierWaveform::Square);
        let samples = gen.generate_tone_segment(&segment).unwrap();
        let peak = samples.iter().fold(0.0f64, |m, s| m.max(s.abs()));
        assert!((peak - CARRIER_AMPLITUDE * 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_constant_sweep_matches_length_and_fades() {
        let mut gen = generator();
        let segment = TimelineSegment::constant(10.0, 100.0, 2.0, 0.5);
        let samples = gen.generate_sweep(&segment, &PulseShape::default()).unwrap();
        assert_eq!(samples.len(), 88200);
        assert_eq!(samples[0], 0.0);
        assert_eq!(samples[88199], 0.0);
    }

    #[test]
    fn test_sweep_envelope_stays_bounded() {
        let mut gen = generator();
        let segment =
            TimelineSegment::sweep(4.0, 14.0, 150.0, 3.0, 0.7, TransitionKind::Exponential);
        for modulation in ModulationShape::ALL {
            let shape = PulseShape {
                modulation: *modulation,
                ..PulseShape::default()
            };
            let samples = gen.generate_sweep(&segment, &shape).unwrap();
            assert_eq!(samples.len(), 132300);
            assert!(samples.iter().all(|s| s.abs() <= 0.7 + 1e-12));
        }
    }

    #[test]
    fn test_isochronic_tone_convenience() {
        let (samples, sr) = isochronic_tone(10.0, 5.0, 44100, 0.5, 100.0).unwrap();
        assert_eq!(sr, 44100);
        assert_eq!(samples.len(), 220500);
    }
}
