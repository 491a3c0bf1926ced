//! wgpu implementation of the fireball `ShaderBackend`.

mod backend;
pub mod helpers;
pub mod reflect;

pub use backend::{WgpuBackend, UNIFORM_SLOT_SIZE};
pub use reflect::{UniformBlock, UniformField};
