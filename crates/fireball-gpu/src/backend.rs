use std::num::NonZeroU64;

use fireball_core::{
    BackendError, Mesh, MeshHandle, ProgramHandle, ShaderBackend, ShaderStage, StageKind,
    UniformLocation, UniformValue,
};
use fnv::FnvHashMap;
use smallvec::SmallVec;
use wgpu::util::DeviceExt;

use crate::helpers::{align_up, create_depth_texture, make_mesh_pipeline};
use crate::reflect::{check_stage, reflect_uniform_block, UniformBlock};

/// Minimum bytes reserved per draw in the shared uniform buffer.
pub const UNIFORM_SLOT_SIZE: u64 = 512;
const INITIAL_SLOTS: u32 = 16;

struct GpuProgram {
    pipeline: wgpu::RenderPipeline,
    block: UniformBlock,
    /// Current uniform values, latched into a slot at each draw.
    staging: Vec<u8>,
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct PendingDraw {
    program: ProgramHandle,
    mesh: MeshHandle,
    index_count: u32,
    slot: u32,
}

/// Draws recorded since the last present, each with its uniform snapshot.
///
/// Slots are numbered by the snapshots written so far, not by the surviving
/// draws: dropping a mesh's draws leaves its slots in place.
#[derive(Debug)]
struct DrawQueue {
    stride: u64,
    draws: SmallVec<[PendingDraw; 8]>,
    slot_bytes: Vec<u8>,
}

impl DrawQueue {
    fn new(stride: u64) -> Self {
        Self {
            stride,
            draws: SmallVec::new(),
            slot_bytes: Vec::new(),
        }
    }

    fn slot_count(&self) -> u32 {
        (self.slot_bytes.len() as u64 / self.stride) as u32
    }

    /// `snapshot` must be exactly one stride long.
    fn record(
        &mut self,
        program: ProgramHandle,
        mesh: MeshHandle,
        index_count: u32,
        snapshot: &[u8],
    ) {
        debug_assert_eq!(snapshot.len() as u64, self.stride);
        let slot = self.slot_count();
        self.slot_bytes.extend_from_slice(snapshot);
        self.draws.push(PendingDraw {
            program,
            mesh,
            index_count,
            slot,
        });
    }

    fn drop_mesh(&mut self, mesh: MeshHandle) {
        self.draws.retain(|d| d.mesh != mesh);
    }

    fn offset(&self, draw: &PendingDraw) -> u32 {
        (draw.slot as u64 * self.stride) as u32
    }

    fn clear(&mut self) {
        self.draws.clear();
        self.slot_bytes.clear();
    }
}

/// `ShaderBackend` over wgpu.
///
/// Draw calls are recorded, each with its own snapshot of the program's
/// uniforms in a dynamic-offset slot, and replayed in a single render pass
/// by [`WgpuBackend::present`].
pub struct WgpuBackend {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    #[allow(dead_code)]
    depth_tex: wgpu::Texture,
    depth_view: wgpu::TextureView,

    bind_group_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    slot_stride: u64,
    slot_capacity: u32,

    programs: Vec<GpuProgram>,
    meshes: FnvHashMap<u32, GpuMesh>,
    next_mesh: u32,
    active: Option<ProgramHandle>,
    pending: DrawQueue,
    clear_color: wgpu::Color,
    clear_requested: bool,
}

impl WgpuBackend {
    pub async fn new(
        instance: &wgpu::Instance,
        surface: wgpu::Surface<'static>,
        width: u32,
        height: u32,
    ) -> anyhow::Result<Self> {
        let width = width.max(1);
        let height = height.max(1);
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        log::info!("[gpu] adapter: {:?}", adapter.get_info().name);
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("Surface reports no texture formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        let (depth_tex, depth_view) = create_depth_texture(&device, width, height);

        let slot_stride = align_up(
            UNIFORM_SLOT_SIZE,
            device.limits().min_uniform_buffer_offset_alignment as u64,
        );
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mesh_pl"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });
        let (uniform_buffer, bind_group) =
            create_slot_storage(&device, &bind_group_layout, slot_stride, INITIAL_SLOTS);

        log::info!(
            "[gpu] surface {}x{} {:?}, uniform slot stride {}",
            width,
            height,
            format,
            slot_stride
        );
        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_tex,
            depth_view,
            bind_group_layout,
            pipeline_layout,
            uniform_buffer,
            bind_group,
            slot_stride,
            slot_capacity: INITIAL_SLOTS,
            programs: Vec::new(),
            meshes: FnvHashMap::default(),
            next_mesh: 1,
            active: None,
            pending: DrawQueue::new(slot_stride),
            clear_color: wgpu::Color::BLACK,
            clear_requested: false,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Reconfigure the surface and depth target. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width == self.config.width && height == self.config.height {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.reconfigure();
        log::debug!("[gpu] resized to {}x{}", width, height);
    }

    /// Reconfigure at the current size, e.g. after `SurfaceError::Lost`.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
        let (tex, view) = create_depth_texture(&self.device, self.config.width, self.config.height);
        self.depth_tex = tex;
        self.depth_view = view;
    }

    fn ensure_slots(&mut self, needed: u32) {
        if needed <= self.slot_capacity {
            return;
        }
        let capacity = needed.next_power_of_two();
        let (buffer, bind_group) =
            create_slot_storage(&self.device, &self.bind_group_layout, self.slot_stride, capacity);
        self.uniform_buffer = buffer;
        self.bind_group = bind_group;
        self.slot_capacity = capacity;
        log::debug!("[gpu] uniform slots grown to {}", capacity);
    }

    fn discard_pending(&mut self) {
        self.pending.clear();
        self.clear_requested = false;
    }

    /// Submit every draw recorded since the last present and show the frame.
    ///
    /// Pending draws are dropped whether or not the surface could be acquired.
    pub fn present(&mut self) -> Result<(), wgpu::SurfaceError> {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(e) => {
                self.discard_pending();
                return Err(e);
            }
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.ensure_slots(self.pending.slot_count());
        if !self.pending.slot_bytes.is_empty() {
            self.queue
                .write_buffer(&self.uniform_buffer, 0, &self.pending.slot_bytes);
        }

        let (color_load, depth_load) = if self.clear_requested {
            (wgpu::LoadOp::Clear(self.clear_color), wgpu::LoadOp::Clear(1.0))
        } else {
            (wgpu::LoadOp::Load, wgpu::LoadOp::Load)
        };
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("mesh_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: color_load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: depth_load,
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            for draw in &self.pending.draws {
                let (Some(program), Some(mesh)) = (
                    self.programs.get(draw.program.0 as usize),
                    self.meshes.get(&draw.mesh.0),
                ) else {
                    continue;
                };
                let offset = self.pending.offset(draw);
                rpass.set_pipeline(&program.pipeline);
                rpass.set_bind_group(0, &self.bind_group, &[offset]);
                rpass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                rpass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..draw.index_count, 0, 0..1);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        self.discard_pending();
        Ok(())
    }
}

fn create_slot_storage(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    stride: u64,
    slots: u32,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("uniform_slots"),
        size: stride * slots as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("uniform_bg"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: NonZeroU64::new(stride),
            }),
        }],
    });
    (buffer, bind_group)
}

impl ShaderBackend for WgpuBackend {
    fn link_program(&mut self, stages: &[ShaderStage<'_>]) -> Result<ProgramHandle, BackendError> {
        let find = |kind: StageKind| {
            stages
                .iter()
                .find(|s| s.kind == kind)
                .ok_or_else(|| BackendError::Link(format!("missing {kind} stage")))
        };
        let vs = find(StageKind::Vertex)?;
        let fs = find(StageKind::Fragment)?;
        let vs_checked = check_stage(StageKind::Vertex, vs.source)?;
        let fs_checked = check_stage(StageKind::Fragment, fs.source)?;

        let block = reflect_uniform_block(&vs_checked.module)
            .or_else(|| reflect_uniform_block(&fs_checked.module))
            .unwrap_or_default();
        if block.size as u64 > self.slot_stride {
            return Err(BackendError::Link(format!(
                "uniform block of {} bytes exceeds slot size {}",
                block.size, self.slot_stride
            )));
        }

        let vs_module = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("vs_module"),
            source: wgpu::ShaderSource::Wgsl(vs.source.into()),
        });
        let fs_module = if fs.source == vs.source {
            None
        } else {
            Some(self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("fs_module"),
                source: wgpu::ShaderSource::Wgsl(fs.source.into()),
            }))
        };
        let pipeline = make_mesh_pipeline(
            &self.device,
            &self.pipeline_layout,
            &vs_module,
            &vs_checked.entry_point,
            fs_module.as_ref().unwrap_or(&vs_module),
            &fs_checked.entry_point,
            self.config.format,
        );

        log::info!(
            "[gpu] pipeline {} / {}: {} uniforms in {} bytes",
            vs_checked.entry_point,
            fs_checked.entry_point,
            block.fields.len(),
            block.size
        );
        self.programs.push(GpuProgram {
            pipeline,
            staging: vec![0; self.slot_stride as usize],
            block,
        });
        Ok(ProgramHandle(self.programs.len() as u32 - 1))
    }

    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation> {
        let prog = self.programs.get(program.0 as usize)?;
        prog.block
            .field(name)
            .map(|(i, _)| UniformLocation(i as u32))
    }

    fn use_program(&mut self, program: ProgramHandle) -> Result<(), BackendError> {
        if self.programs.get(program.0 as usize).is_none() {
            return Err(BackendError::UnknownProgram(program));
        }
        self.active = Some(program);
        Ok(())
    }

    fn set_uniform(&mut self, location: UniformLocation, value: UniformValue) {
        let Some(program) = self.active else {
            log::warn!("[gpu] set_uniform with no active program");
            return;
        };
        let prog = &mut self.programs[program.0 as usize];
        let Some(field) = prog.block.fields.get(location.0 as usize) else {
            return;
        };
        if value.byte_len() > field.size as usize {
            log::warn!(
                "[gpu] value of {} bytes does not fit uniform `{}` ({} bytes)",
                value.byte_len(),
                field.name,
                field.size
            );
            return;
        }
        let start = field.offset as usize;
        value.write_bytes(&mut prog.staging[start..start + field.size as usize]);
    }

    fn create_mesh_buffers(&mut self, mesh: &Mesh) -> Result<MeshHandle, BackendError> {
        if mesh.is_empty() {
            return Err(BackendError::EmptyMesh);
        }
        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mesh_vb"),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mesh_ib"),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        let handle = MeshHandle(self.next_mesh);
        self.next_mesh += 1;
        self.meshes.insert(
            handle.0,
            GpuMesh {
                vertex_buffer,
                index_buffer,
            },
        );
        log::debug!(
            "[gpu] mesh {:?}: {} vertices, {} indices",
            handle,
            mesh.vertex_count(),
            mesh.index_count()
        );
        Ok(handle)
    }

    fn release_mesh_buffers(&mut self, handle: MeshHandle) {
        if let Some(mesh) = self.meshes.remove(&handle.0) {
            mesh.vertex_buffer.destroy();
            mesh.index_buffer.destroy();
            self.pending.drop_mesh(handle);
        }
    }

    fn draw_indexed(&mut self, mesh: MeshHandle, index_count: u32) -> Result<(), BackendError> {
        let program = self.active.ok_or(BackendError::NoActiveProgram)?;
        if !self.meshes.contains_key(&mesh.0) {
            return Err(BackendError::UnknownMesh(mesh));
        }
        let prog = &self.programs[program.0 as usize];
        self.pending
            .record(program, mesh, index_count, &prog.staging);
        Ok(())
    }

    fn set_clear_color(&mut self, color: [f32; 4]) {
        let [r, g, b, a] = color.map(f64::from);
        self.clear_color = wgpu::Color { r, g, b, a };
    }

    fn clear(&mut self) {
        self.pending.clear();
        self.clear_requested = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRIDE: u64 = 256;

    fn snapshot(tag: u8) -> Vec<u8> {
        vec![tag; STRIDE as usize]
    }

    #[test]
    fn released_mesh_keeps_later_draws_on_their_own_slots() {
        let mut q = DrawQueue::new(STRIDE);
        let program = ProgramHandle(0);
        q.record(program, MeshHandle(1), 6, &snapshot(0xa));
        q.record(program, MeshHandle(2), 6, &snapshot(0xb));
        q.drop_mesh(MeshHandle(1));
        q.record(program, MeshHandle(3), 6, &snapshot(0xc));

        assert_eq!(q.slot_count(), 3);
        let slots: Vec<u32> = q.draws.iter().map(|d| d.slot).collect();
        assert_eq!(slots, vec![1, 2]);
        for (draw, tag) in q.draws.iter().zip([0xb_u8, 0xc]) {
            let start = q.offset(draw) as usize;
            assert!(q.slot_bytes[start..start + STRIDE as usize]
                .iter()
                .all(|b| *b == tag));
        }
    }

    #[test]
    fn clear_resets_slot_numbering() {
        let mut q = DrawQueue::new(STRIDE);
        q.record(ProgramHandle(0), MeshHandle(1), 3, &snapshot(1));
        q.clear();
        q.record(ProgramHandle(0), MeshHandle(1), 3, &snapshot(2));
        assert_eq!(q.draws[0].slot, 0);
        assert_eq!(q.offset(&q.draws[0]), 0);
        assert_eq!(q.slot_count(), 1);
    }
}
