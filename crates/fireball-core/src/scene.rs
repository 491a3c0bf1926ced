use glam::Vec3;

use crate::backend::ShaderBackend;
use crate::constants::{FLOOR_POSITION, FLOOR_SCALE, ICOSPHERE_RADIUS};
use crate::controls::Controls;
use crate::drawable::Drawable;
use crate::geometry::{GeometryError, Icosphere, Square};

/// The drawables of one scene load: the shared fireball sphere and the floor.
#[derive(Debug)]
pub struct Scene {
    pub icosphere: Icosphere,
    pub floor: Square,
}

impl Scene {
    pub fn load(controls: &Controls) -> Result<Self, GeometryError> {
        let icosphere = Icosphere::new(Vec3::ZERO, ICOSPHERE_RADIUS, controls.tessellations)?;
        let mut floor = Square::new(Vec3::ZERO);
        floor.model_mut().position = FLOOR_POSITION;
        floor.model_mut().scale = Vec3::splat(FLOOR_SCALE);
        log::info!(
            "[scene] loaded icosphere level {} ({} vertices, {} triangles)",
            icosphere.tessellations(),
            icosphere.mesh().vertex_count(),
            icosphere.mesh().triangle_count()
        );
        Ok(Self { icosphere, floor })
    }

    pub fn tessellations(&self) -> u32 {
        self.icosphere.tessellations()
    }

    /// Regenerate everything from `controls`, releasing the old GPU buffers
    /// first. On error the current scene is left untouched.
    pub fn reload<B: ShaderBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        controls: &Controls,
    ) -> Result<(), GeometryError> {
        let next = Scene::load(controls)?;
        self.release(backend);
        *self = next;
        Ok(())
    }

    /// Reload only when the tessellation level differs from the loaded one.
    /// Returns whether a reload happened.
    pub fn reload_if_changed<B: ShaderBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        controls: &Controls,
    ) -> Result<bool, GeometryError> {
        if controls.tessellations == self.tessellations() {
            return Ok(false);
        }
        log::debug!(
            "[scene] tessellation {} -> {}",
            self.tessellations(),
            controls.tessellations
        );
        self.reload(backend, controls)?;
        Ok(true)
    }

    pub fn release<B: ShaderBackend + ?Sized>(&mut self, backend: &mut B) {
        self.icosphere.model_mut().release_buffers(backend);
        self.floor.model_mut().release_buffers(backend);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_sits_below_the_spheres() {
        let scene = Scene::load(&Controls::default()).unwrap();
        assert_eq!(scene.floor.model().position, FLOOR_POSITION);
        assert_eq!(scene.floor.model().scale, Vec3::splat(FLOOR_SCALE));
        assert_eq!(scene.tessellations(), 7);
    }
}
