pub mod backend;
pub mod camera;
pub mod constants;
pub mod controls;
pub mod drawable;
pub mod frame;
pub mod geometry;
pub mod panel;
pub mod renderer;
pub mod scene;
pub mod shader;
pub mod timer;
pub mod uniforms;

pub static FIREBALL_WGSL: &str = include_str!("../shaders/fireball.wgsl");

pub use backend::*;
pub use camera::*;
pub use constants::*;
pub use controls::{Controls, ControlsError, ParamKind, ParamSpec, ParamValue, PARAMS};
pub use drawable::*;
pub use frame::*;
pub use geometry::*;
pub use panel::*;
pub use renderer::*;
pub use scene::*;
pub use shader::*;
pub use timer::*;
