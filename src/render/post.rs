use super::helpers;
use super::targets::PostTargets;
use crate::core::post::{PassChain, PassKind, Target};
use crate::core::POST_WGSL;
use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct PostUniforms {
    time: f32,
    _pad: [f32; 3],
}

// Uniform slots: the copy pass plus one per effect.
const SLOTS: usize = 4;
// Sources a pass may sample: scene, ping, pong.
const SOURCES: usize = 3;

fn slot(pass: Option<PassKind>) -> usize {
    match pass {
        None => 0,
        Some(PassKind::Bloom) => 1,
        Some(PassKind::Chromatic) => 2,
        Some(PassKind::Distortion) => 3,
    }
}

fn source_index(target: Target) -> Option<usize> {
    match target {
        Target::Scene => Some(0),
        Target::Ping => Some(1),
        Target::Pong => Some(2),
        Target::Screen => None,
    }
}

/// Ordered full-screen effect chain between the base render and the surface.
///
/// The base pass resolves into [`PostProcessing::input_view`]; [`encode`]
/// then walks the [`PassChain`] plan, ping-ponging between two intermediates
/// and writing the final step to the screen view.
///
/// [`encode`]: PostProcessing::encode
pub struct PostProcessing {
    chain: PassChain,
    targets: PostTargets,
    layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    uniforms: [wgpu::Buffer; SLOTS],
    copy_pipeline: wgpu::RenderPipeline,
    effect_pipelines: [wgpu::RenderPipeline; 3],
    // [source][slot]
    bind_groups: Vec<Vec<wgpu::BindGroup>>,
}

impl PostProcessing {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        chain: PassChain,
    ) -> Self {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("post_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_post"),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("post_wgsl"),
            source: wgpu::ShaderSource::Wgsl(POST_WGSL.into()),
        });
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("post_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let size = std::mem::size_of::<PostUniforms>() as u64;
        let uniforms = std::array::from_fn(|i| {
            helpers::uniform_buffer(device, &format!("post_uniforms_{}", i), size)
        });
        let copy_pipeline =
            helpers::make_post_pipeline(device, &pipeline_layout, &shader, "fs_copy", format);
        let effect_pipelines = PassKind::ORDER.map(|pass| {
            helpers::make_post_pipeline(
                device,
                &pipeline_layout,
                &shader,
                pass.fragment_entry(),
                format,
            )
        });

        let targets = PostTargets::new(device, format, width, height);
        let mut post = Self {
            chain,
            targets,
            layout,
            sampler,
            uniforms,
            copy_pipeline,
            effect_pipelines,
            bind_groups: Vec::new(),
        };
        post.rebuild_bind_groups(device);
        log::info!(
            "[post] chain ready: {:?}",
            post.chain.active().collect::<Vec<_>>()
        );
        post
    }

    /// Time only drives the distortion pass; the other uniforms stay zeroed.
    pub fn update(&self, queue: &wgpu::Queue, time: f32) {
        let u = PostUniforms {
            time,
            _pad: [0.0; 3],
        };
        queue.write_buffer(
            &self.uniforms[slot(Some(PassKind::Distortion))],
            0,
            bytemuck::bytes_of(&u),
        );
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.targets.recreate(device, width, height);
        self.rebuild_bind_groups(device);
    }

    /// Resolve target for the base scene pass.
    pub fn input_view(&self) -> Option<&wgpu::TextureView> {
        self.targets.view(Target::Scene)
    }

    pub fn encode(&self, encoder: &mut wgpu::CommandEncoder, screen: &wgpu::TextureView) {
        for step in self.chain.plan() {
            let Some(src) = source_index(step.source) else {
                continue;
            };
            let dest = match step.dest {
                Target::Screen => screen,
                other => match self.targets.view(other) {
                    Some(view) => view,
                    None => continue,
                },
            };
            let pipeline = match step.pass {
                Some(pass) => &self.effect_pipelines[pass as usize],
                None => &self.copy_pipeline,
            };
            let label = step.pass.map(PassKind::fragment_entry).unwrap_or("fs_copy");
            blit(
                encoder,
                label,
                dest,
                pipeline,
                &self.bind_groups[src][slot(step.pass)],
            );
        }
    }

    pub fn destroy(&self) {
        self.targets.destroy();
        for buf in &self.uniforms {
            buf.destroy();
        }
    }

    fn rebuild_bind_groups(&mut self, device: &wgpu::Device) {
        let sources = [Target::Scene, Target::Ping, Target::Pong];
        let mut groups = Vec::with_capacity(SOURCES);
        for source in sources {
            let Some(view) = self.targets.view(source) else {
                continue;
            };
            let row = self
                .uniforms
                .iter()
                .map(|buf| {
                    device.create_bind_group(&wgpu::BindGroupDescriptor {
                        label: Some("post_bg"),
                        layout: &self.layout,
                        entries: &[
                            wgpu::BindGroupEntry {
                                binding: 0,
                                resource: wgpu::BindingResource::TextureView(view),
                            },
                            wgpu::BindGroupEntry {
                                binding: 1,
                                resource: wgpu::BindingResource::Sampler(&self.sampler),
                            },
                            wgpu::BindGroupEntry {
                                binding: 2,
                                resource: buf.as_entire_binding(),
                            },
                        ],
                    })
                })
                .collect();
            groups.push(row);
        }
        self.bind_groups = groups;
    }
}

fn blit(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    target: &wgpu::TextureView,
    pipeline: &wgpu::RenderPipeline,
    bind_group: &wgpu::BindGroup,
) {
    let mut r = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });
    r.set_pipeline(pipeline);
    r.set_bind_group(0, bind_group, &[]);
    r.draw(0..3, 0..1);
}
