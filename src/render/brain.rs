use super::context::GpuContext;
use super::targets::{BaseTargets, DEPTH_FORMAT};
use super::{helpers, PostProcessing};
use crate::core::brain::BrainUniforms;
use crate::core::constants::MSAA_SAMPLES;
use crate::core::geometry::MeshGeometry;
use crate::core::model::BrainModel;
use wgpu::util::DeviceExt;

const POSITION_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
const NORMAL_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x3];
const REGION_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Float32];

// One tightly packed attribute per buffer.
fn vertex_layout(
    stride: wgpu::BufferAddress,
    attributes: &'static [wgpu::VertexAttribute],
) -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: stride,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes,
    }
}

struct GpuMesh {
    positions: wgpu::Buffer,
    normals: wgpu::Buffer,
    regions: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    fn upload(device: &wgpu::Device, name: &str, geometry: &MeshGeometry) -> Self {
        let vb = |suffix: &str, contents: &[u8]| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{}_{}", name, suffix)),
                contents,
                usage: wgpu::BufferUsages::VERTEX,
            })
        };
        let positions = vb("positions", bytemuck::cast_slice(&geometry.positions));
        let normals = vb("normals", bytemuck::cast_slice(&geometry.normals));
        let regions = vb("regions", bytemuck::cast_slice(&geometry.regions));
        let indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{}_indices", name)),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            positions,
            normals,
            regions,
            indices,
            index_count: geometry.indices.len() as u32,
        }
    }

    fn destroy(&self) {
        self.positions.destroy();
        self.normals.destroy();
        self.regions.destroy();
        self.indices.destroy();
    }
}

struct GpuLines {
    vertices: wgpu::Buffer,
    vertex_count: u32,
}

/// Draws the brain meshes and neural connection lines into a 4x MSAA base
/// pass, resolving either into the post chain or straight to the canvas.
pub struct BrainRenderer {
    ctx: GpuContext,
    targets: BaseTargets,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    mesh_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    meshes: Vec<GpuMesh>,
    lines: Option<GpuLines>,
}

impl BrainRenderer {
    pub fn new(ctx: GpuContext, shader_source: &str) -> Self {
        let device = &ctx.device;
        let format = ctx.format();
        let (width, height) = ctx.size();

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("brain_wgsl"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });
        let uniform_buffer = helpers::uniform_buffer(
            device,
            "brain_uniforms",
            std::mem::size_of::<BrainUniforms>() as u64,
        );
        let bgl = helpers::uniform_layout(
            device,
            "brain_bgl",
            wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        );
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("brain_bg"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_brain"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });

        let multisample = wgpu::MultisampleState {
            count: MSAA_SAMPLES,
            ..Default::default()
        };

        let mesh_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("brain_mesh_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[
                    vertex_layout(12, &POSITION_ATTRS),
                    vertex_layout(12, &NORMAL_ATTRS),
                    vertex_layout(4, &REGION_ATTRS),
                ],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample,
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        let line_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("brain_line_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_lines"),
                buffers: &[vertex_layout(12, &POSITION_ATTRS)],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample,
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_lines"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(helpers::ADDITIVE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        let targets = BaseTargets::new(device, format, width, height);
        Self {
            ctx,
            targets,
            uniform_buffer,
            uniform_bind_group,
            mesh_pipeline,
            line_pipeline,
            meshes: Vec::new(),
            lines: None,
        }
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.ctx.device
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.ctx.format()
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.ctx.queue
    }

    /// Replace any uploaded geometry with the parts of `model`.
    pub fn upload_model(&mut self, model: &BrainModel) {
        self.release_geometry();
        let device = &self.ctx.device;
        self.meshes = model
            .parts
            .iter()
            .filter(|part| !part.geometry.indices.is_empty())
            .map(|part| GpuMesh::upload(device, part.name, &part.geometry))
            .collect();
        if !model.connections.is_empty() {
            let vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("neural_connections"),
                contents: bytemuck::cast_slice(&model.connections),
                usage: wgpu::BufferUsages::VERTEX,
            });
            self.lines = Some(GpuLines {
                vertices,
                vertex_count: (model.connections.len() * 2) as u32,
            });
        }
        log::info!(
            "[brain] uploaded {} meshes, {} connections",
            self.meshes.len(),
            model.connections.len()
        );
    }

    pub fn write_uniforms(&self, uniforms: &BrainUniforms) {
        self.ctx
            .queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    /// Returns true when the backing size changed and dependants must follow.
    pub fn resize_if_needed(&mut self, width: u32, height: u32) -> bool {
        if !self.ctx.resize_if_needed(width, height) {
            return false;
        }
        self.targets.recreate(&self.ctx.device, width, height);
        true
    }

    pub fn render(&mut self, post: Option<&PostProcessing>) -> anyhow::Result<()> {
        let frame = match self.ctx.acquire() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Timeout) => return Ok(()),
            Err(e) => return Err(anyhow::anyhow!("surface: {:?}", e)),
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("brain_encoder"),
            });

        let resolve = post.and_then(PostProcessing::input_view).unwrap_or(&view);
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("brain_base"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.targets.msaa_view,
                    resolve_target: Some(resolve),
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Discard,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            pass.set_pipeline(&self.mesh_pipeline);
            for mesh in &self.meshes {
                pass.set_vertex_buffer(0, mesh.positions.slice(..));
                pass.set_vertex_buffer(1, mesh.normals.slice(..));
                pass.set_vertex_buffer(2, mesh.regions.slice(..));
                pass.set_index_buffer(mesh.indices.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
            if let Some(lines) = &self.lines {
                pass.set_pipeline(&self.line_pipeline);
                pass.set_vertex_buffer(0, lines.vertices.slice(..));
                pass.draw(0..lines.vertex_count, 0..1);
            }
        }
        if let Some(post) = post {
            post.encode(&mut encoder, &view);
        }

        self.ctx.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    /// Free GPU buffers and targets. The renderer draws nothing afterwards.
    pub fn destroy(&mut self) {
        self.release_geometry();
        self.uniform_buffer.destroy();
        self.targets.destroy();
    }

    fn release_geometry(&mut self) {
        for mesh in self.meshes.drain(..) {
            mesh.destroy();
        }
        if let Some(lines) = self.lines.take() {
            lines.vertices.destroy();
        }
    }
}
