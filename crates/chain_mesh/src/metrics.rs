//! Engine-agnostic metrics for the chain model cache.
//!
//! Feature-gated and runtime-toggled so disabled builds pay nothing.
//!
//! # Usage
//!
//! ```ignore
//! use chain_mesh::metrics::COLLECT_METRICS;
//!
//! // Compile with --features metrics
//! // Runtime toggle:
//! COLLECT_METRICS.store(false, Ordering::Relaxed);
//!
//! let snapshot = renderer.cache().metrics();
//! println!("hit rate {:.1}%", snapshot.hit_rate() * 100.0);
//! ```

use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
#[cfg(feature = "metrics")]
use std::sync::atomic::Ordering;

/// Runtime toggle for metrics collection.
pub static COLLECT_METRICS: AtomicBool = AtomicBool::new(true);

/// Check if metrics collection is enabled (both compile-time and runtime).
#[inline]
pub fn is_enabled() -> bool {
  #[cfg(feature = "metrics")]
  {
    COLLECT_METRICS.load(Ordering::Relaxed)
  }
  #[cfg(not(feature = "metrics"))]
  {
    false
  }
}

/// Most recent build timings in microseconds, oldest evicted first.
#[derive(Debug, Clone)]
pub struct TimingWindow {
  samples: VecDeque<u64>,
  capacity: usize,
}

impl TimingWindow {
  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      samples: VecDeque::with_capacity(capacity),
      capacity: capacity.max(1),
    }
  }

  pub fn record(&mut self, timing_us: u64) {
    if self.samples.len() == self.capacity {
      self.samples.pop_front();
    }
    self.samples.push_back(timing_us);
  }

  pub fn len(&self) -> usize {
    self.samples.len()
  }

  pub fn is_empty(&self) -> bool {
    self.samples.is_empty()
  }

  pub fn latest(&self) -> Option<u64> {
    self.samples.back().copied()
  }

  /// Mean of the retained samples, 0 when empty.
  pub fn mean(&self) -> f64 {
    match self.samples.len() {
      0 => 0.0,
      n => self.samples.iter().sum::<u64>() as f64 / n as f64,
    }
  }

  /// Fastest and slowest retained sample.
  pub fn range(&self) -> Option<(u64, u64)> {
    let fastest = self.samples.iter().min()?;
    let slowest = self.samples.iter().max()?;
    Some((*fastest, *slowest))
  }
}

impl Default for TimingWindow {
  fn default() -> Self {
    Self::with_capacity(128)
  }
}

/// Cache statistics, cumulative since creation.
#[derive(Debug, Clone, Default)]
pub struct CacheMetrics {
  /// Lookups answered from the cache.
  pub hits: u64,
  /// Lookups that had to build.
  pub misses: u64,
  /// Models built through the cache (misses plus prewarm).
  pub models_built: u64,
  /// Quads produced by those builds.
  pub quads_built: u64,
  /// Number of purges (including reconfigure).
  pub purges: u64,
  /// Entries dropped by purges.
  pub entries_purged: u64,
  /// Recent build times.
  pub build_timings: TimingWindow,
}

impl CacheMetrics {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn record_hit(&mut self) {
    if is_enabled() {
      self.hits += 1;
    }
  }

  pub fn record_miss(&mut self) {
    if is_enabled() {
      self.misses += 1;
    }
  }

  /// Record one finished build.
  pub fn record_build(&mut self, quad_count: usize, timing_us: u64) {
    if !is_enabled() {
      return;
    }

    self.models_built += 1;
    self.quads_built += quad_count as u64;
    self.build_timings.record(timing_us);
  }

  pub fn record_purge(&mut self, entries: usize) {
    if is_enabled() {
      self.purges += 1;
      self.entries_purged += entries as u64;
    }
  }

  /// Fraction of lookups served from the cache.
  pub fn hit_rate(&self) -> f64 {
    let lookups = self.hits + self.misses;
    if lookups == 0 {
      0.0
    } else {
      self.hits as f64 / lookups as f64
    }
  }

  pub fn avg_build_timing_us(&self) -> f64 {
    self.build_timings.mean()
  }

  /// Reset counters and timings.
  pub fn reset(&mut self) {
    *self = Self::default();
  }
}

#[cfg(all(test, feature = "metrics"))]
mod tests {
  use super::*;

  #[test]
  fn test_timing_window_evicts_oldest() {
    let mut window = TimingWindow::with_capacity(3);
    assert!(window.is_empty());
    assert_eq!(window.range(), None);
    assert_eq!(window.mean(), 0.0);

    for timing in [10, 20, 30, 40] {
      window.record(timing);
    }

    assert_eq!(window.len(), 3);
    assert_eq!(window.mean(), 30.0);
    assert_eq!(window.range(), Some((20, 40)));
    assert_eq!(window.latest(), Some(40));
  }

  #[test]
  fn test_hit_rate() {
    let mut metrics = CacheMetrics::new();
    assert_eq!(metrics.hit_rate(), 0.0);

    metrics.record_miss();
    metrics.record_hit();
    metrics.record_hit();
    metrics.record_hit();

    assert_eq!(metrics.hit_rate(), 0.75);
  }

  #[test]
  fn test_build_recording() {
    let mut metrics = CacheMetrics::new();

    metrics.record_build(30, 1000);
    metrics.record_build(10, 3000);

    assert_eq!(metrics.models_built, 2);
    assert_eq!(metrics.quads_built, 40);
    assert_eq!(metrics.avg_build_timing_us(), 2000.0);
    assert_eq!(metrics.build_timings.latest(), Some(3000));

    metrics.record_purge(5);
    assert_eq!(metrics.purges, 1);
    assert_eq!(metrics.entries_purged, 5);

    metrics.reset();
    assert_eq!(metrics.models_built, 0);
    assert!(metrics.build_timings.is_empty());
  }
}
