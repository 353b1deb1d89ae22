//! Memoization of rendered constant-parameter tone segments.
//!
//! The cache is explicit state: it is created by the caller with a chosen
//! [`CacheCapacity`] and handed to the generator that uses it.

use std::collections::{HashMap, VecDeque};

use isotone_spec::{CarrierWaveform, ModulationShape};
use serde::{Deserialize, Serialize};

/// Maximum number of entries a [`SegmentCache`] may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheCapacity {
    /// Grow without limit.
    #[default]
    Unbounded,
    /// Keep at most this many entries, evicting the oldest insertion first.
    /// `Bounded(0)` disables caching.
    Bounded(usize),
}

/// Every parameter that determines a rendered tone segment.
///
/// Float parameters are stored by bit pattern, so any input (NaN included)
/// produces a usable key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentKey {
    duration: u64,
    carrier_freq: u64,
    entrainment_freq: u64,
    volume: u64,
    sample_rate: u32,
    carrier: CarrierWaveform,
    modulation: ModulationShape,
    duty_cycle: u64,
}

impl SegmentKey {
    /// Builds a key from generation parameters.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        duration: f64,
        carrier_freq: f64,
        entrainment_freq: f64,
        volume: f64,
        sample_rate: u32,
        carrier: CarrierWaveform,
        modulation: ModulationShape,
        duty_cycle: f64,
    ) -> Self {
        Self {
            duration: duration.to_bits(),
            carrier_freq: carrier_freq.to_bits(),
            entrainment_freq: entrainment_freq.to_bits(),
            volume: volume.to_bits(),
            sample_rate,
            carrier,
            modulation,
            duty_cycle: duty_cycle.to_bits(),
        }
    }

    /// Segment length in seconds.
    pub fn duration(&self) -> f64 {
        f64::from_bits(self.duration)
    }

    /// BLAKE3 hex digest of the key, for log correlation.
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.duration.to_le_bytes());
        hasher.update(&self.carrier_freq.to_le_bytes());
        hasher.update(&self.entrainment_freq.to_le_bytes());
        hasher.update(&self.volume.to_le_bytes());
        hasher.update(&self.sample_rate.to_le_bytes());
        hasher.update(self.carrier.name().as_bytes());
        hasher.update(b"/");
        hasher.update(self.modulation.name().as_bytes());
        hasher.update(&self.duty_cycle.to_le_bytes());
        hasher.finalize().to_hex().to_string()
    }
}

/// Rendered segments keyed by their full parameter tuple.
#[derive(Debug, Clone, Default)]
pub struct SegmentCache {
    capacity: CacheCapacity,
    entries: HashMap<SegmentKey, Vec<f64>>,
    order: VecDeque<SegmentKey>,
    hits: u64,
    misses: u64,
}

impl SegmentCache {
    /// Creates an empty cache.
    pub fn new(capacity: CacheCapacity) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Creates an unbounded cache.
    pub fn unbounded() -> Self {
        Self::new(CacheCapacity::Unbounded)
    }

    /// Configured capacity.
    pub fn capacity(&self) -> CacheCapacity {
        self.capacity
    }

    /// Looks up a segment, counting the hit or miss.
    pub fn get(&mut self, key: &SegmentKey) -> Option<&[f64]> {
        if self.entries.contains_key(key) {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Stores a segment. Re-inserting an existing key replaces its samples
    /// without changing its eviction order.
    pub fn insert(&mut self, key: SegmentKey, samples: Vec<f64>) {
        if let Some(existing) = self.entries.get_mut(&key) {
            *existing = samples;
            return;
        }

        match self.capacity {
            CacheCapacity::Bounded(0) => return,
            CacheCapacity::Bounded(limit) => {
                while self.entries.len() >= limit {
                    match self.order.pop_front() {
                        Some(oldest) => {
                            self.entries.remove(&oldest);
                        }
                        None => break,
                    }
                }
            }
            CacheCapacity::Unbounded => {}
        }

        self.order.push_back(key);
        self.entries.insert(key, samples);
    }

    /// Number of cached segments.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry and resets the counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.hits = 0;
        self.misses = 0;
    }

    /// Lookups that found an entry.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Lookups that found nothing.
    pub fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key(carrier_freq: f64) -> SegmentKey {
        SegmentKey::new(
            1.0,
            carrier_freq,
            10.0,
            0.5,
            44100,
            CarrierWaveform::Sine,
            ModulationShape::Square,
            0.5,
        )
    }

    #[test]
    fn test_hit_and_miss_counting() {
        let mut cache = SegmentCache::unbounded();
        assert!(cache.get(&key(100.0)).is_none());
        cache.insert(key(100.0), vec![0.1, 0.2]);
        assert_eq!(cache.get(&key(100.0)), Some(&[0.1, 0.2][..]));
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn test_reinsert_does_not_grow() {
        let mut cache = SegmentCache::unbounded();
        cache.insert(key(100.0), vec![0.0]);
        cache.insert(key(100.0), vec![1.0]);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&key(100.0)), Some(&[1.0][..]));
    }

    #[test]
    fn test_bounded_evicts_oldest() {
        let mut cache = SegmentCache::new(CacheCapacity::Bounded(2));
        cache.insert(key(100.0), vec![1.0]);
        cache.insert(key(200.0), vec![2.0]);
        cache.insert(key(300.0), vec![3.0]);
        assert_eq!(cache.len(), 2);
        assert!(cache.get(&key(100.0)).is_none());
        assert!(cache.get(&key(200.0)).is_some());
        assert!(cache.get(&key(300.0)).is_some());
    }

    #[test]
    fn test_zero_capacity_stores_nothing() {
        let mut cache = SegmentCache::new(CacheCapacity::Bounded(0));
        cache.insert(key(100.0), vec![1.0]);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_nan_key_is_usable() {
        let mut cache = SegmentCache::unbounded();
        cache.insert(key(f64::NAN), vec![1.0]);
        assert!(cache.get(&key(f64::NAN)).is_some());
        assert_eq!(key(f64::NAN).fingerprint().len(), 64);
    }

    #[test]
    fn test_fingerprint_distinguishes_keys() {
        assert_eq!(key(100.0).fingerprint(), key(100.0).fingerprint());
        assert_ne!(key(100.0).fingerprint(), key(101.0).fingerprint());
    }

    #[test]
    fn test_capacity_serde() {
        let json = serde_json::to_string(&CacheCapacity::Bounded(64)).unwrap();
        assert_eq!(json, r#"{"bounded":64}"#);
        let parsed: CacheCapacity = serde_json::from_str("\"unbounded\"").unwrap();
        assert_eq!(parsed, CacheCapacity::Unbounded);
    }
}
