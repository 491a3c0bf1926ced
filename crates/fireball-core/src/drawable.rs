use glam::{Mat4, Vec3};

use crate::backend::{MeshHandle, ShaderBackend};
use crate::geometry::Mesh;

/// A mesh plus the transform state used to place it in the world.
///
/// `rotation` is carried along but is not part of [`Model::transform`];
/// only translation and scale are composed.
#[derive(Debug)]
pub struct Model {
    pub position: Vec3,
    pub scale: Vec3,
    pub rotation: Vec3,
    mesh: Mesh,
    buffers: Option<MeshHandle>,
}

impl Model {
    pub fn new(mesh: Mesh) -> Self {
        Self {
            position: Vec3::ZERO,
            scale: Vec3::ONE,
            rotation: Vec3::ZERO,
            mesh,
            buffers: None,
        }
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// `translation * scale`, rebuilt on every call.
    pub fn transform(&self) -> Mat4 {
        Mat4::from_translation(self.position) * Mat4::from_scale(self.scale)
    }

    /// GPU buffers, once the first draw has created them.
    pub fn buffers(&self) -> Option<MeshHandle> {
        self.buffers
    }

    pub(crate) fn set_buffers(&mut self, handle: MeshHandle) {
        self.buffers = Some(handle);
    }

    /// Free the GPU buffers. The next draw recreates them.
    pub fn release_buffers<B: ShaderBackend + ?Sized>(&mut self, backend: &mut B) {
        if let Some(handle) = self.buffers.take() {
            backend.release_mesh_buffers(handle);
        }
    }
}

/// Anything the renderer can place and draw: exposes a transform and a mesh.
pub trait Drawable {
    fn model(&self) -> &Model;

    fn model_mut(&mut self) -> &mut Model;

    fn transform(&self) -> Mat4 {
        self.model().transform()
    }

    fn mesh(&self) -> &Mesh {
        self.model().mesh()
    }
}

impl Drawable for Model {
    fn model(&self) -> &Model {
        self
    }

    fn model_mut(&mut self) -> &mut Model {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn transform_scales_before_translating() {
        let mut model = Model::new(Mesh::default());
        model.position = Vec3::new(1.0, 0.0, 0.0);
        model.scale = Vec3::splat(2.0);
        let p = model.transform() * Vec4::new(1.0, 0.0, 0.0, 1.0);
        assert_eq!(p.truncate(), Vec3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn transform_tracks_position_changes() {
        let mut model = Model::new(Mesh::default());
        model.position = Vec3::new(-2.5, 0.0, 0.0);
        let a = model.transform();
        model.position = Vec3::new(2.5, 0.0, 0.0);
        let b = model.transform();
        assert_ne!(a, b);
        assert_eq!(b.w_axis.x, 2.5);
    }

    #[test]
    fn rotation_is_not_composed() {
        let mut model = Model::new(Mesh::default());
        let before = model.transform();
        model.rotation = Vec3::new(0.4, 0.4, 0.4);
        assert_eq!(model.transform(), before);
    }
}
