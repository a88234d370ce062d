//! ChainRenderer - the object a host holds to draw chains.
//!
//! Owns one [`ModelCache`]. Static chains go through [`ChainRenderer::render_baked`]
//! and share models by fingerprint; chains whose vector changes every frame
//! go through [`ChainRenderer::render`], which builds a throwaway model.

use std::sync::Arc;

use glam::{Affine3A, DVec3, Quat, Vec3};

use crate::bake_key::{displacement_between, horizontal_distance, BakeKey};
use crate::cache::ModelCache;
use crate::constants::VERTICAL_EPSILON;
use crate::error::ConfigError;
use crate::model::{ChainModel, LightLevel, Renderable, VertexSink};
use crate::types::ChainConfig;

pub struct ChainRenderer {
  cache: ModelCache,
}

impl ChainRenderer {
  pub fn new(config: ChainConfig) -> Result<Self, ConfigError> {
    Ok(Self::with_cache(ModelCache::new(config)?))
  }

  /// Render through an explicitly configured cache.
  pub fn with_cache(cache: ModelCache) -> Self {
    Self { cache }
  }

  pub fn cache(&self) -> &ModelCache {
    &self.cache
  }

  /// Render the cached model for `key`, building it on first use.
  ///
  /// Returns the model so callers can inspect what was drawn.
  pub fn render_baked(
    &self,
    sink: &mut dyn VertexSink,
    transform: &Affine3A,
    key: &BakeKey,
    displacement: Vec3,
    light0: LightLevel,
    light1: LightLevel,
  ) -> Arc<ChainModel> {
    let model = self.cache.get_or_build(key, displacement);
    model.render(sink, transform, light0, light1);
    model
  }

  /// Build and render a model without touching the cache.
  pub fn render(
    &self,
    sink: &mut dyn VertexSink,
    transform: &Affine3A,
    displacement: Vec3,
    light0: LightLevel,
    light1: LightLevel,
  ) {
    let model = self.cache.builder().build(displacement);
    model.render(sink, transform, light0, light1);
  }

  /// Render a chain between two world-space anchors through the cache.
  pub fn render_between(
    &self,
    sink: &mut dyn VertexSink,
    start: DVec3,
    end: DVec3,
    light0: LightLevel,
    light1: LightLevel,
  ) -> Arc<ChainModel> {
    let displacement = displacement_between(start, end);
    let key = BakeKey::from_displacement(displacement);
    let transform = placement(start.as_vec3(), displacement);
    self.render_baked(sink, &transform, &key, displacement, light0, light1)
  }

  /// Drop every cached model (resource reload).
  pub fn purge(&self) {
    self.cache.purge();
  }

  /// Apply new mesh settings. Purges on success.
  pub fn reconfigure(&self, config: ChainConfig) -> Result<(), ConfigError> {
    let (quality, hang_amount) = (config.quality, config.hang_amount);
    self.cache.reconfigure(config)?;
    tracing::debug!(quality, hang_amount, "chain renderer reconfigured");
    Ok(())
  }
}

/// Local chain frame → world: translate to `start`, turn local +X toward the
/// horizontal direction of `end - start`.
pub fn chain_transform(start: Vec3, end: Vec3) -> Affine3A {
  placement(start, end - start)
}

fn placement(start: Vec3, displacement: Vec3) -> Affine3A {
  let horizontal = horizontal_distance(displacement);

  // Vertical chains (and the NaN sentinel) have no heading.
  let rotation = if horizontal.is_nan() || horizontal < VERTICAL_EPSILON {
    Quat::IDENTITY
  } else {
    Quat::from_rotation_y((-displacement.z).atan2(displacement.x))
  };

  Affine3A::from_rotation_translation(rotation, start)
}

#[cfg(test)]
#[path = "renderer_test.rs"]
mod renderer_test;
