use glam::Vec3;

use super::{Mesh, Vertex};
use crate::drawable::{Drawable, Model};

// (normal, tangent u, tangent v) per face; u x v == normal keeps CCW outward.
const CUBE_FACES: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::X, Vec3::NEG_Z, Vec3::Y),
    (Vec3::NEG_X, Vec3::Z, Vec3::Y),
    (Vec3::Y, Vec3::X, Vec3::NEG_Z),
    (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    (Vec3::Z, Vec3::X, Vec3::Y),
    (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
];

/// Axis-aligned cube with half-extent 1 around `center`.
///
/// Faces do not share vertices so each corner carries its face normal:
/// 24 vertices, 12 triangles.
pub fn generate_cube(center: Vec3) -> Mesh {
    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, u, v) in CUBE_FACES {
        let base = vertices.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let p = normal + u * su + v * sv + center;
            vertices.push(Vertex {
                position: p.to_array(),
                normal: normal.to_array(),
            });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    Mesh { vertices, indices }
}

#[derive(Debug)]
pub struct Cube {
    center: Vec3,
    model: Model,
}

impl Cube {
    pub fn new(center: Vec3) -> Self {
        Self {
            center,
            model: Model::new(generate_cube(center)),
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }
}

impl Drawable for Cube {
    fn model(&self) -> &Model {
        &self.model
    }

    fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }
}
