//! The seam between render orchestration and whatever actually talks to a GPU.
//!
//! Handles are plain integers issued by the backend, in the manner of GL
//! object names, so drawables and programs can hold them without borrowing
//! the backend.

mod headless;

pub use headless::*;

use glam::{Mat4, Vec3, Vec4};
use thiserror::Error;

use crate::geometry::Mesh;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u32);

/// Backend-specific uniform address within one program (a GL location, or a
/// byte offset into a uniform block).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Vertex,
    Fragment,
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StageKind::Vertex => f.write_str("vertex"),
            StageKind::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ShaderStage<'a> {
    pub kind: StageKind,
    pub source: &'a str,
}

impl<'a> ShaderStage<'a> {
    pub fn vertex(source: &'a str) -> Self {
        Self {
            kind: StageKind::Vertex,
            source,
        }
    }

    pub fn fragment(source: &'a str) -> Self {
        Self {
            kind: StageKind::Fragment,
            source,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
}

impl UniformValue {
    /// Number of bytes the value occupies when packed (vec3 is not padded).
    pub fn byte_len(&self) -> usize {
        match self {
            UniformValue::Float(_) => 4,
            UniformValue::Vec3(_) => 12,
            UniformValue::Vec4(_) => 16,
            UniformValue::Mat4(_) => 64,
        }
    }

    /// Write the value as little-endian f32s (column-major for matrices).
    pub fn write_bytes(&self, out: &mut [u8]) {
        match self {
            UniformValue::Float(v) => out[..4].copy_from_slice(bytemuck::bytes_of(v)),
            UniformValue::Vec3(v) => out[..12].copy_from_slice(bytemuck::cast_slice(&v.to_array())),
            UniformValue::Vec4(v) => out[..16].copy_from_slice(bytemuck::cast_slice(&v.to_array())),
            UniformValue::Mat4(m) => {
                out[..64].copy_from_slice(bytemuck::cast_slice(&m.to_cols_array()))
            }
        }
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        UniformValue::Float(v)
    }
}

impl From<Vec3> for UniformValue {
    fn from(v: Vec3) -> Self {
        UniformValue::Vec3(v)
    }
}

impl From<Vec4> for UniformValue {
    fn from(v: Vec4) -> Self {
        UniformValue::Vec4(v)
    }
}

impl From<Mat4> for UniformValue {
    fn from(v: Mat4) -> Self {
        UniformValue::Mat4(v)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BackendError {
    #[error("{stage} shader failed to compile: {message}")]
    ShaderCompile { stage: StageKind, message: String },
    #[error("program link failed: {0}")]
    Link(String),
    #[error("unknown program {0:?}")]
    UnknownProgram(ProgramHandle),
    #[error("unknown mesh buffers {0:?}")]
    UnknownMesh(MeshHandle),
    #[error("no program is active")]
    NoActiveProgram,
    #[error("cannot create buffers for an empty mesh")]
    EmptyMesh,
    #[error("gpu error: {0}")]
    Gpu(String),
}

/// Operations the renderer needs from a graphics API.
///
/// Uniform writes apply to the program most recently passed to
/// [`ShaderBackend::use_program`], and are latched into each subsequent draw.
pub trait ShaderBackend {
    fn link_program(&mut self, stages: &[ShaderStage<'_>]) -> Result<ProgramHandle, BackendError>;

    /// `None` when the program has no uniform with that name.
    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation>;

    fn use_program(&mut self, program: ProgramHandle) -> Result<(), BackendError>;

    fn set_uniform(&mut self, location: UniformLocation, value: UniformValue);

    fn create_mesh_buffers(&mut self, mesh: &Mesh) -> Result<MeshHandle, BackendError>;

    fn release_mesh_buffers(&mut self, handle: MeshHandle);

    /// Indexed triangle-list draw with the active program.
    fn draw_indexed(&mut self, mesh: MeshHandle, index_count: u32) -> Result<(), BackendError>;

    fn set_clear_color(&mut self, color: [f32; 4]);

    /// Clear color and depth of the current target.
    fn clear(&mut self);
}
