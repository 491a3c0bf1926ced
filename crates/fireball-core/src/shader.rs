use fnv::FnvHashMap;
use thiserror::Error;

use crate::backend::{
    BackendError, ProgramHandle, ShaderBackend, ShaderStage, UniformLocation, UniformValue,
};
use crate::drawable::Drawable;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShaderError {
    #[error("failed to link shader program: {0}")]
    Link(#[from] BackendError),
}

/// A linked program plus its uniform location cache.
///
/// Each uniform name is looked up in the backend once; the answer, including
/// "not present", is remembered for the life of the program. Setting a
/// uniform the shader does not declare does nothing.
#[derive(Debug)]
pub struct ShaderProgram {
    handle: ProgramHandle,
    locations: FnvHashMap<String, Option<UniformLocation>>,
}

impl ShaderProgram {
    pub fn link<B: ShaderBackend + ?Sized>(
        backend: &mut B,
        stages: &[ShaderStage<'_>],
    ) -> Result<Self, ShaderError> {
        let handle = backend.link_program(stages)?;
        log::info!("[shader] linked program {:?} ({} stages)", handle, stages.len());
        Ok(Self {
            handle,
            locations: FnvHashMap::default(),
        })
    }

    pub fn handle(&self) -> ProgramHandle {
        self.handle
    }

    pub fn use_program<B: ShaderBackend + ?Sized>(&self, backend: &mut B) -> Result<(), BackendError> {
        backend.use_program(self.handle)
    }

    /// Cached location lookup.
    pub fn location<B: ShaderBackend + ?Sized>(
        &mut self,
        backend: &B,
        name: &str,
    ) -> Option<UniformLocation> {
        if let Some(cached) = self.locations.get(name) {
            return *cached;
        }
        let loc = backend.uniform_location(self.handle, name);
        if loc.is_none() {
            log::debug!("[shader] program {:?} has no uniform `{}`", self.handle, name);
        }
        self.locations.insert(name.to_owned(), loc);
        loc
    }

    /// Activate the program and write `value` to uniform `name`, if declared.
    pub fn set_uniform<B: ShaderBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        name: &str,
        value: impl Into<UniformValue>,
    ) -> Result<(), BackendError> {
        backend.use_program(self.handle)?;
        if let Some(loc) = self.location(backend, name) {
            backend.set_uniform(loc, value.into());
        }
        Ok(())
    }

    /// Draw `drawable` with this program, creating its GPU buffers on first use.
    pub fn draw<B: ShaderBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        drawable: &mut dyn Drawable,
    ) -> Result<(), BackendError> {
        let model = drawable.model_mut();
        let buffers = match model.buffers() {
            Some(handle) => handle,
            None => {
                let handle = backend.create_mesh_buffers(model.mesh())?;
                model.set_buffers(handle);
                handle
            }
        };
        backend.draw_indexed(buffers, model.mesh().index_count())
    }
}
