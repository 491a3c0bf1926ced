use glam::Vec3;

use super::{Mesh, Vertex};
use crate::drawable::{Drawable, Model};

/// Unit quad in the XY plane (corners at ±1), facing +Z, offset by `center`.
pub fn generate_square(center: Vec3) -> Mesh {
    let corners = [
        Vec3::new(-1.0, -1.0, 0.0),
        Vec3::new(1.0, -1.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(-1.0, 1.0, 0.0),
    ];
    let vertices = corners
        .iter()
        .map(|c| Vertex {
            position: (*c + center).to_array(),
            normal: [0.0, 0.0, 1.0],
        })
        .collect();
    Mesh {
        vertices,
        indices: vec![0, 1, 2, 0, 2, 3],
    }
}

#[derive(Debug)]
pub struct Square {
    center: Vec3,
    model: Model,
}

impl Square {
    pub fn new(center: Vec3) -> Self {
        Self {
            center,
            model: Model::new(generate_square(center)),
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }
}

impl Drawable for Square {
    fn model(&self) -> &Model {
        &self.model
    }

    fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }
}
