//! Mesh export: Wavefront OBJ and JSON.

use anyhow::{Context, Result};
use chain_mesh::SinkVertex;
use clap::ValueEnum;
use serde::Serialize;
use std::io::Write;

/// Output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
	/// Wavefront OBJ, one face per quad.
	Obj,
	/// JSON array of vertices.
	Json,
}

/// Vertex as written to JSON.
#[derive(Debug, Serialize)]
struct JsonVertex {
	position: [f32; 3],
	uv: [f32; 2],
	light: u32,
	color: [u8; 4],
}

impl From<&SinkVertex> for JsonVertex {
	fn from(v: &SinkVertex) -> Self {
		Self {
			position: v.position.to_array(),
			uv: v.uv.to_array(),
			light: v.light,
			color: v.color,
		}
	}
}

/// Write `vertices` (four per quad, v00 v01 v11 v10) in `format`.
pub fn write(format: Format, out: &mut dyn Write, vertices: &[SinkVertex]) -> Result<()> {
	match format {
		Format::Obj => write_obj(out, vertices),
		Format::Json => write_json(out, vertices),
	}
}

fn write_obj(out: &mut dyn Write, vertices: &[SinkVertex]) -> Result<()> {
	writeln!(out, "# chain_bake: {} quads", vertices.len() / 4)?;

	for v in vertices {
		writeln!(out, "v {} {} {}", v.position.x, v.position.y, v.position.z)?;
	}
	for v in vertices {
		writeln!(out, "vt {} {}", v.uv.x, v.uv.y)?;
	}
	// OBJ indices are 1-based; position and texture indices coincide.
	for quad in 0..vertices.len() / 4 {
		let i = quad * 4 + 1;
		writeln!(
			out,
			"f {}/{} {}/{} {}/{} {}/{}",
			i,
			i,
			i + 1,
			i + 1,
			i + 2,
			i + 2,
			i + 3,
			i + 3
		)?;
	}

	out.flush().context("Failed to flush OBJ output")
}

fn write_json(out: &mut dyn Write, vertices: &[SinkVertex]) -> Result<()> {
	let json: Vec<JsonVertex> = vertices.iter().map(JsonVertex::from).collect();
	serde_json::to_writer_pretty(&mut *out, &json).context("Failed to write JSON output")?;
	writeln!(out)?;
	out.flush().context("Failed to flush JSON output")
}

#[cfg(test)]
mod tests {
	use super::*;
	use chain_mesh::{ChainConfig, ChainRenderer, LightLevel};
	use glam::{Affine3A, Vec3};

	fn sample_vertices() -> Vec<SinkVertex> {
		let renderer = ChainRenderer::new(ChainConfig::default()).unwrap();
		let mut sink = Vec::new();
		renderer.render(
			&mut sink,
			&Affine3A::IDENTITY,
			Vec3::new(2.0, -1.0, 0.0),
			LightLevel::FULL,
			LightLevel::FULL,
		);
		sink
	}

	#[test]
	fn test_obj_layout() {
		let vertices = sample_vertices();
		let mut out = Vec::new();
		write(Format::Obj, &mut out, &vertices).unwrap();
		let text = String::from_utf8(out).unwrap();

		let count = |prefix: &str| text.lines().filter(|l| l.starts_with(prefix)).count();
		assert_eq!(count("v "), vertices.len());
		assert_eq!(count("vt "), vertices.len());
		assert_eq!(count("f "), vertices.len() / 4);
		assert!(text.lines().any(|l| l == "f 1/1 2/2 3/3 4/4"));
	}

	#[test]
	fn test_json_roundtrips_through_serde() {
		let vertices = sample_vertices();
		let mut out = Vec::new();
		write(Format::Json, &mut out, &vertices).unwrap();

		let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
		let array = parsed.as_array().unwrap();
		assert_eq!(array.len(), vertices.len());
		assert_eq!(array[0]["light"], LightLevel::FULL.pack());
		assert_eq!(array[0]["color"], serde_json::json!([255, 255, 255, 255]));
	}

	#[test]
	fn test_empty_mesh() {
		let mut out = Vec::new();
		write(Format::Obj, &mut out, &[]).unwrap();
		assert_eq!(String::from_utf8(out).unwrap(), "# chain_bake: 0 quads\n");

		let mut out = Vec::new();
		write(Format::Json, &mut out, &[]).unwrap();
		assert_eq!(String::from_utf8(out).unwrap().trim(), "[]");
	}
}
