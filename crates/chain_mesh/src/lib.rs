//! chain_mesh - Engine independent hanging chain meshing
//!
//! Builds the mesh of a chain hanging between two anchors: two crossed,
//! textured ribbons following a catenary sag. Models are generated in a local
//! frame that depends only on the vertical drop and horizontal distance, so a
//! single [`ModelCache`] entry serves every chain with the same shape.
//!
//! # Features
//!
//! - **Catenary Sag**: f64 curve evaluation, arc-length segment stepping
//! - **Vertical Chains**: straight ribbons when the anchors are stacked
//! - **Model Cache**: fingerprint keyed, shared via `Arc`, purge on reload
//! - **Metrics**: optional hit/miss/build-time collection (`metrics` feature)
//!
//! # Example
//!
//! ```ignore
//! use chain_mesh::{ChainConfig, ChainRenderer, LightLevel, SinkVertex};
//! use glam::DVec3;
//!
//! let renderer = ChainRenderer::new(ChainConfig::default())?;
//! let mut sink: Vec<SinkVertex> = Vec::new();
//!
//! renderer.render_between(
//!     &mut sink,
//!     DVec3::new(0.5, 64.5, 0.5),
//!     DVec3::new(3.5, 62.5, 0.5),
//!     LightLevel::FULL,
//!     LightLevel::FULL,
//! );
//!
//! println!("Emitted {} vertices", sink.len());
//! ```

pub mod constants;
pub mod error;
pub mod types;

// Re-export commonly used items
pub use constants::{DEFAULT_SIDE_A, DEFAULT_SIDE_B, MAX_SEGMENTS};
pub use error::ConfigError;
pub use types::{ChainConfig, FaceSpan, Quad, QuadVertex, UvRect};

// Curve math
pub mod curve;
pub use curve::HangCurve;

// Mesh generation
pub mod builder;
pub use builder::{ChainMeshBuilder, ChainShape};

pub mod model;
pub use model::{ChainModel, LightLevel, Renderable, SinkVertex, VertexSink};

// Caching
pub mod bake_key;
pub use bake_key::BakeKey;

pub mod cache;
pub use cache::{CacheDiagnostics, LeakObserver, ModelCache, TracingLeakObserver};

pub mod renderer;
pub use renderer::{chain_transform, ChainRenderer};

// Metrics (feature-gated collection)
pub mod metrics;
pub use metrics::CacheMetrics;
