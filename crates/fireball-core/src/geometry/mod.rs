//! Procedural meshes shared by every drawable kind.
//!
//! All generators emit an indexed triangle list with counter-clockwise,
//! outward-facing winding and one normal per vertex.

mod cube;
mod icosphere;
mod square;

pub use cube::*;
pub use icosphere::*;
pub use square::*;

use thiserror::Error;

/// Highest tessellation level the generators accept (20 * 4^10 triangles).
pub const MAX_TESSELLATION: u32 = 10;

/// A single mesh vertex as uploaded to the GPU.
///
/// Layout: position(vec3) + normal(vec3) = 24 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Indexed triangle mesh. Every three entries of `indices` form a triangle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterate triangles as index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("tessellation level {level} is outside the supported range 0..={max}")]
    TessellationOutOfRange { level: u32, max: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_size_is_24_bytes() {
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
        assert_eq!(std::mem::align_of::<Vertex>(), 4);
    }

    #[test]
    fn triangles_iterates_index_triples() {
        let mesh = Mesh {
            vertices: vec![
                Vertex {
                    position: [0.0; 3],
                    normal: [0.0, 0.0, 1.0],
                };
                4
            ],
            indices: vec![0, 1, 2, 0, 2, 3],
        };
        let tris: Vec<[u32; 3]> = mesh.triangles().collect();
        assert_eq!(tris, vec![[0, 1, 2], [0, 2, 3]]);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.index_count(), 6);
    }
}
