//! Headless backend: does no GPU work and records everything it is asked to do.
//!
//! Useful for running the frame protocol without a device and as the test
//! double for renderer and scene behaviour. `clear` starts a new tick and
//! drops the commands and draws recorded before it, so the log holds at most
//! one tick.

use std::cell::Cell;

use fnv::FnvHashMap;

use super::{
    BackendError, MeshHandle, ProgramHandle, ShaderBackend, ShaderStage, StageKind,
    UniformLocation, UniformValue,
};
use crate::geometry::Mesh;
use crate::uniforms;

/// One issued draw together with the uniform values latched at draw time.
#[derive(Debug, Clone)]
pub struct DrawCall {
    pub program: ProgramHandle,
    pub mesh: MeshHandle,
    pub index_count: u32,
    pub uniforms: FnvHashMap<String, UniformValue>,
}

impl DrawCall {
    pub fn uniform(&self, name: &str) -> Option<UniformValue> {
        self.uniforms.get(name).copied()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    UseProgram(ProgramHandle),
    SetUniform {
        program: ProgramHandle,
        name: String,
        value: UniformValue,
    },
    CreateMesh {
        handle: MeshHandle,
        vertex_count: usize,
        index_count: u32,
    },
    ReleaseMesh(MeshHandle),
    Draw {
        program: ProgramHandle,
        mesh: MeshHandle,
        index_count: u32,
    },
    Clear([f32; 4]),
}

#[derive(Debug)]
struct HeadlessProgram {
    names: Vec<String>,
    values: Vec<Option<UniformValue>>,
}

#[derive(Debug)]
pub struct HeadlessBackend {
    declared: Vec<String>,
    programs: Vec<HeadlessProgram>,
    meshes: FnvHashMap<u32, u32>,
    next_mesh: u32,
    active: Option<ProgramHandle>,
    clear_color: [f32; 4],
    location_queries: Cell<usize>,
    commands: Vec<Command>,
    draws: Vec<DrawCall>,
}

impl HeadlessBackend {
    /// Programs linked by this backend declare the fireball shader's uniforms.
    pub fn new() -> Self {
        Self::with_uniforms(uniforms::ALL)
    }

    /// Programs linked by this backend declare exactly `names`.
    pub fn with_uniforms(names: &[&str]) -> Self {
        Self {
            declared: names.iter().map(|n| n.to_string()).collect(),
            programs: Vec::new(),
            meshes: FnvHashMap::default(),
            next_mesh: 1,
            active: None,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            location_queries: Cell::new(0),
            commands: Vec::new(),
            draws: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn draws(&self) -> &[DrawCall] {
        &self.draws
    }

    /// Number of `uniform_location` queries served so far.
    pub fn location_queries(&self) -> usize {
        self.location_queries.get()
    }

    /// Mesh buffers currently alive.
    pub fn live_meshes(&self) -> usize {
        self.meshes.len()
    }

    pub fn clear_color(&self) -> [f32; 4] {
        self.clear_color
    }

    /// Forget recorded commands and draws; live resources are kept.
    pub fn reset_log(&mut self) {
        self.commands.clear();
        self.draws.clear();
    }

    fn active_program(&self) -> Result<ProgramHandle, BackendError> {
        self.active.ok_or(BackendError::NoActiveProgram)
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ShaderBackend for HeadlessBackend {
    fn link_program(&mut self, stages: &[ShaderStage<'_>]) -> Result<ProgramHandle, BackendError> {
        for stage in stages {
            if stage.source.trim().is_empty() {
                return Err(BackendError::ShaderCompile {
                    stage: stage.kind,
                    message: "empty source".into(),
                });
            }
        }
        for kind in [StageKind::Vertex, StageKind::Fragment] {
            if !stages.iter().any(|s| s.kind == kind) {
                return Err(BackendError::Link(format!("missing {kind} stage")));
            }
        }
        self.programs.push(HeadlessProgram {
            names: self.declared.clone(),
            values: vec![None; self.declared.len()],
        });
        Ok(ProgramHandle(self.programs.len() as u32 - 1))
    }

    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation> {
        self.location_queries.set(self.location_queries.get() + 1);
        let prog = self.programs.get(program.0 as usize)?;
        prog.names
            .iter()
            .position(|n| n == name)
            .map(|i| UniformLocation(i as u32))
    }

    fn use_program(&mut self, program: ProgramHandle) -> Result<(), BackendError> {
        if self.programs.get(program.0 as usize).is_none() {
            return Err(BackendError::UnknownProgram(program));
        }
        self.active = Some(program);
        self.commands.push(Command::UseProgram(program));
        Ok(())
    }

    fn set_uniform(&mut self, location: UniformLocation, value: UniformValue) {
        let Some(program) = self.active else {
            log::warn!("[headless] set_uniform with no active program");
            return;
        };
        let prog = &mut self.programs[program.0 as usize];
        let Some(slot) = prog.values.get_mut(location.0 as usize) else {
            return;
        };
        *slot = Some(value);
        self.commands.push(Command::SetUniform {
            program,
            name: prog.names[location.0 as usize].clone(),
            value,
        });
    }

    fn create_mesh_buffers(&mut self, mesh: &Mesh) -> Result<MeshHandle, BackendError> {
        if mesh.is_empty() {
            return Err(BackendError::EmptyMesh);
        }
        let handle = MeshHandle(self.next_mesh);
        self.next_mesh += 1;
        self.meshes.insert(handle.0, mesh.index_count());
        self.commands.push(Command::CreateMesh {
            handle,
            vertex_count: mesh.vertex_count(),
            index_count: mesh.index_count(),
        });
        Ok(handle)
    }

    fn release_mesh_buffers(&mut self, handle: MeshHandle) {
        if self.meshes.remove(&handle.0).is_some() {
            self.commands.push(Command::ReleaseMesh(handle));
        }
    }

    fn draw_indexed(&mut self, mesh: MeshHandle, index_count: u32) -> Result<(), BackendError> {
        let program = self.active_program()?;
        if !self.meshes.contains_key(&mesh.0) {
            return Err(BackendError::UnknownMesh(mesh));
        }
        let prog = &self.programs[program.0 as usize];
        let uniforms = prog
            .names
            .iter()
            .zip(&prog.values)
            .filter_map(|(name, value)| value.map(|v| (name.clone(), v)))
            .collect();
        self.commands.push(Command::Draw {
            program,
            mesh,
            index_count,
        });
        self.draws.push(DrawCall {
            program,
            mesh,
            index_count,
            uniforms,
        });
        Ok(())
    }

    fn set_clear_color(&mut self, color: [f32; 4]) {
        self.clear_color = color;
    }

    fn clear(&mut self) {
        self.reset_log();
        self.commands.push(Command::Clear(self.clear_color));
    }
}
