//! WGSL front-end checks and uniform block reflection.
//!
//! Linking a program parses and validates every stage with naga so shader
//! errors surface as `BackendError` diagnostics instead of device-lost
//! panics, and reads the uniform struct bound at `@group(0) @binding(0)` to
//! learn each field's byte offset.

use fireball_core::{BackendError, StageKind};
use naga::valid::{Capabilities, ValidationFlags, Validator};

/// One named member of the uniform block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UniformField {
    pub name: String,
    pub offset: u32,
    pub size: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UniformBlock {
    pub fields: Vec<UniformField>,
    /// Struct size including trailing padding.
    pub size: u32,
}

impl UniformBlock {
    pub fn field(&self, name: &str) -> Option<(usize, &UniformField)> {
        self.fields.iter().enumerate().find(|(_, f)| f.name == name)
    }
}

/// A parsed and validated stage.
#[derive(Debug)]
pub struct CheckedStage {
    pub module: naga::Module,
    /// Name of the first entry point matching the stage kind.
    pub entry_point: String,
}

fn naga_stage(kind: StageKind) -> naga::ShaderStage {
    match kind {
        StageKind::Vertex => naga::ShaderStage::Vertex,
        StageKind::Fragment => naga::ShaderStage::Fragment,
    }
}

/// Parse and validate `source` as WGSL for the given stage.
pub fn check_stage(kind: StageKind, source: &str) -> Result<CheckedStage, BackendError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| {
        BackendError::ShaderCompile {
            stage: kind,
            message: e.emit_to_string(source),
        }
    })?;
    Validator::new(ValidationFlags::all(), Capabilities::all())
        .validate(&module)
        .map_err(|e| BackendError::ShaderCompile {
            stage: kind,
            message: e.emit_to_string(source),
        })?;
    let wanted = naga_stage(kind);
    let entry_point = module
        .entry_points
        .iter()
        .find(|ep| ep.stage == wanted)
        .map(|ep| ep.name.clone())
        .ok_or_else(|| BackendError::Link(format!("no {kind} entry point")))?;
    Ok(CheckedStage {
        module,
        entry_point,
    })
}

/// The uniform struct at group 0, binding 0, if the module declares one.
pub fn reflect_uniform_block(module: &naga::Module) -> Option<UniformBlock> {
    let (_, global) = module.global_variables.iter().find(|(_, g)| {
        g.space == naga::AddressSpace::Uniform
            && g.binding
                .as_ref()
                .is_some_and(|b| b.group == 0 && b.binding == 0)
    })?;
    let naga::TypeInner::Struct { members, span } = &module.types[global.ty].inner else {
        return None;
    };
    let ctx = module.to_ctx();
    let fields = members
        .iter()
        .filter_map(|m| {
            Some(UniformField {
                name: m.name.clone()?,
                offset: m.offset,
                size: module.types[m.ty].inner.size(ctx),
            })
        })
        .collect();
    Some(UniformBlock {
        fields,
        size: *span,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fireball_core::{uniforms, FIREBALL_WGSL};

    fn fireball_block() -> UniformBlock {
        let stage = check_stage(StageKind::Vertex, FIREBALL_WGSL).expect("fireball shader");
        reflect_uniform_block(&stage.module).expect("uniform block")
    }

    #[test]
    fn fireball_shader_validates_for_both_stages() {
        let vs = check_stage(StageKind::Vertex, FIREBALL_WGSL).unwrap();
        let fs = check_stage(StageKind::Fragment, FIREBALL_WGSL).unwrap();
        assert_eq!(vs.entry_point, "vs_main");
        assert_eq!(fs.entry_point, "fs_main");
    }

    #[test]
    fn fireball_block_declares_every_uniform() {
        let block = fireball_block();
        for name in uniforms::ALL {
            assert!(block.field(name).is_some(), "missing uniform {name}");
        }
    }

    #[test]
    fn fireball_block_offsets() {
        let block = fireball_block();
        let offset = |n: &str| block.field(n).map(|(_, f)| f.offset);
        assert_eq!(offset(uniforms::VIEW_PROJ), Some(0));
        assert_eq!(offset(uniforms::MODEL), Some(64));
        assert_eq!(offset(uniforms::MODEL_INV_TR), Some(128));
        assert_eq!(offset(uniforms::MODEL_VIEW), Some(192));
        assert_eq!(offset(uniforms::COLOR1), Some(256));
        assert_eq!(offset(uniforms::TIME), Some(268));
        assert_eq!(offset(uniforms::COLOR2), Some(272));
        assert_eq!(offset(uniforms::BLEND1), Some(284));
        assert_eq!(offset(uniforms::SINE_INTENSITY), Some(316));
        assert_eq!(block.size, 320);
        assert_eq!(block.field(uniforms::COLOR1).map(|(_, f)| f.size), Some(12));
    }

    #[test]
    fn syntax_errors_become_compile_diagnostics() {
        let err = check_stage(StageKind::Fragment, "fn broken( {").unwrap_err();
        match err {
            BackendError::ShaderCompile { stage, message } => {
                assert_eq!(stage, StageKind::Fragment);
                assert!(!message.is_empty());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_entry_point_is_a_link_error() {
        let src = "@fragment fn fs_main() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }";
        let err = check_stage(StageKind::Vertex, src).unwrap_err();
        assert!(matches!(err, BackendError::Link(_)));
    }
}
