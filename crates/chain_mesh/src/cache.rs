//! ModelCache - memoizes chain models by their geometric fingerprint.
//!
//! Chains with the same [`BakeKey`] share one model. The cache only grows;
//! entries leave it through [`ModelCache::purge`] (configuration change,
//! resource reload) and nothing else.
//!
//! # Locking
//!
//! One mutex guards the builder, the map and the diagnostic state. The
//! lookup, the build on a miss and the insert all happen inside one critical
//! section, so concurrent callers never build the same key twice and never
//! observe a half-inserted model. Rendering happens outside the lock on the
//! returned `Arc`.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use glam::Vec3;
use web_time::Instant;

use crate::bake_key::BakeKey;
use crate::builder::ChainMeshBuilder;
use crate::constants::{DEFAULT_LEAK_THRESHOLD, INITIAL_CACHE_CAPACITY};
use crate::error::ConfigError;
use crate::metrics::CacheMetrics;
use crate::model::ChainModel;
use crate::types::ChainConfig;

// =============================================================================
// Leak diagnostic
// =============================================================================

/// Receives the advisory warning when the cache grows suspiciously large.
///
/// Called while the cache lock is held; implementations must not call back
/// into the cache.
pub trait LeakObserver: Send + Sync {
  fn on_leak_suspected(&self, cached_models: usize, threshold: usize);
}

/// Default observer: logs through `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLeakObserver;

impl LeakObserver for TracingLeakObserver {
  fn on_leak_suspected(&self, cached_models: usize, threshold: usize) {
    tracing::error!(cached_models, threshold, "chain model leak found");
  }
}

/// Leak diagnostic settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheDiagnostics {
  /// Whether size checks run at all.
  pub enabled: bool,
  /// Size above which the observer is notified.
  pub leak_threshold: usize,
}

impl CacheDiagnostics {
  /// Checks on, default threshold.
  pub const DEVELOPMENT: Self = Self {
    enabled: true,
    leak_threshold: DEFAULT_LEAK_THRESHOLD,
  };

  /// No checks.
  pub const DISABLED: Self = Self {
    enabled: false,
    leak_threshold: DEFAULT_LEAK_THRESHOLD,
  };
}

impl Default for CacheDiagnostics {
  /// Enabled in debug builds only.
  fn default() -> Self {
    Self {
      enabled: cfg!(debug_assertions),
      leak_threshold: DEFAULT_LEAK_THRESHOLD,
    }
  }
}

// =============================================================================
// ModelCache
// =============================================================================

struct CacheState {
  builder: ChainMeshBuilder,
  models: HashMap<BakeKey, Arc<ChainModel>>,
  /// Set once the observer has been told; cleared by purge.
  leak_reported: bool,
  metrics: CacheMetrics,
}

/// Fingerprint → model cache owned by one renderer.
pub struct ModelCache {
  state: Mutex<CacheState>,
  builds: AtomicU64,
  diagnostics: CacheDiagnostics,
  observer: Box<dyn LeakObserver>,
}

impl ModelCache {
  /// Create a cache building with `config`.
  pub fn new(config: ChainConfig) -> Result<Self, ConfigError> {
    Ok(Self::with_builder(ChainMeshBuilder::new(config)?))
  }

  /// Create a cache around an existing builder.
  pub fn with_builder(builder: ChainMeshBuilder) -> Self {
    Self {
      state: Mutex::new(CacheState {
        builder,
        models: HashMap::with_capacity(INITIAL_CACHE_CAPACITY),
        leak_reported: false,
        metrics: CacheMetrics::new(),
      }),
      builds: AtomicU64::new(0),
      diagnostics: CacheDiagnostics::default(),
      observer: Box::new(TracingLeakObserver),
    }
  }

  pub fn with_diagnostics(mut self, diagnostics: CacheDiagnostics) -> Self {
    self.diagnostics = diagnostics;
    self
  }

  pub fn with_observer(mut self, observer: impl LeakObserver + 'static) -> Self {
    self.observer = Box::new(observer);
    self
  }

  /// State is consistent between statements, so a panic elsewhere while the
  /// lock was held leaves nothing half-written.
  fn lock(&self) -> MutexGuard<'_, CacheState> {
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Return the model for `key`, building it from `displacement` on a miss.
  ///
  /// `displacement` must produce `key` (see [`BakeKey::from_displacement`]);
  /// it is only read on a miss.
  pub fn get_or_build(&self, key: &BakeKey, displacement: Vec3) -> Arc<ChainModel> {
    let mut state = self.lock();

    if let Some(model) = state.models.get(key).cloned() {
      state.metrics.record_hit();
      return model;
    }

    state.metrics.record_miss();
    let model = Arc::new(self.build_locked(&mut state, displacement));
    state.models.insert(*key, Arc::clone(&model));
    self.check_leak(&mut state);
    model
  }

  /// Cached model for `key`, without building.
  pub fn get(&self, key: &BakeKey) -> Option<Arc<ChainModel>> {
    self.lock().models.get(key).cloned()
  }

  /// Build every missing key in parallel and insert the results.
  ///
  /// Duplicate keys are built once. Returns the number of models built.
  pub fn prewarm(&self, requests: &[(BakeKey, Vec3)]) -> usize {
    let mut state = self.lock();

    let mut seen = HashSet::new();
    let missing: Vec<(BakeKey, Vec3)> = requests
      .iter()
      .filter(|(key, _)| !state.models.contains_key(key) && seen.insert(*key))
      .copied()
      .collect();
    if missing.is_empty() {
      return 0;
    }

    let displacements: Vec<Vec3> = missing.iter().map(|&(_, d)| d).collect();
    let start = Instant::now();
    let models = state.builder.build_batch(&displacements);
    let per_model_us = start.elapsed().as_micros() as u64 / models.len() as u64;

    let count = models.len();
    for ((key, _), model) in missing.into_iter().zip(models) {
      state.metrics.record_build(model.quad_count(), per_model_us);
      state.models.insert(key, Arc::new(model));
    }
    self.builds.fetch_add(count as u64, Ordering::Relaxed);
    self.check_leak(&mut state);

    tracing::debug!(count, "prewarmed chain models");
    count
  }

  /// Drop every cached model. Later lookups rebuild lazily.
  pub fn purge(&self) {
    let mut state = self.lock();
    Self::purge_locked(&mut state);
  }

  /// Swap the builder configuration and purge, atomically.
  ///
  /// Invalid configuration is rejected and leaves the cache untouched.
  pub fn reconfigure(&self, config: ChainConfig) -> Result<(), ConfigError> {
    let builder = ChainMeshBuilder::new(config)?;
    let mut state = self.lock();
    state.builder = builder;
    Self::purge_locked(&mut state);
    Ok(())
  }

  /// Number of cached models.
  pub fn len(&self) -> usize {
    self.lock().models.len()
  }

  pub fn is_empty(&self) -> bool {
    self.lock().models.is_empty()
  }

  pub fn contains(&self, key: &BakeKey) -> bool {
    self.lock().models.contains_key(key)
  }

  /// Total models built by this cache. Never reset, not even by purge.
  pub fn builds(&self) -> u64 {
    self.builds.load(Ordering::Relaxed)
  }

  /// Snapshot of the cache metrics.
  pub fn metrics(&self) -> CacheMetrics {
    self.lock().metrics.clone()
  }

  /// Configuration the cache currently builds with.
  pub fn config(&self) -> ChainConfig {
    self.lock().builder.config().clone()
  }

  /// Copy of the current builder, for builds that bypass the cache.
  pub fn builder(&self) -> ChainMeshBuilder {
    self.lock().builder.clone()
  }

  pub fn diagnostics(&self) -> CacheDiagnostics {
    self.diagnostics
  }

  fn build_locked(&self, state: &mut CacheState, displacement: Vec3) -> ChainModel {
    let start = Instant::now();
    let model = state.builder.build(displacement);
    let timing_us = start.elapsed().as_micros() as u64;

    self.builds.fetch_add(1, Ordering::Relaxed);
    state.metrics.record_build(model.quad_count(), timing_us);
    model
  }

  fn purge_locked(state: &mut CacheState) {
    let entries = state.models.len();
    state.models.clear();
    state.leak_reported = false;
    state.metrics.record_purge(entries);
    tracing::debug!(entries, "purged chain model cache");
  }

  fn check_leak(&self, state: &mut CacheState) {
    let size = state.models.len();
    if self.diagnostics.enabled && !state.leak_reported && size > self.diagnostics.leak_threshold {
      state.leak_reported = true;
      self
        .observer
        .on_leak_suspected(size, self.diagnostics.leak_threshold);
    }
  }
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod cache_test;
