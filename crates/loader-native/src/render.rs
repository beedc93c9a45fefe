//! wgpu renderer: particle billboards, instanced ring blocks, and the logo
//! quad, drawn in that back-to-front order into a single render pass.

use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use loader_core::{
    block_mesh, logo_quad, Config, Frame, Simulation, BlockInstance, CAMERA_FAR,
    CAMERA_FOV_DEGREES, CAMERA_NEAR,
};

use crate::assets;
use crate::error::InitError;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct ParticleUniforms {
    view_proj: [[f32; 4]; 4],
    // xyz: camera right; w: base point size in pixels
    camera_right: [f32; 4],
    // xyz: camera up; w: world units per pixel at unit distance
    camera_up: [f32; 4],
    camera_pos: [f32; 4],
    // x: distance scaling enabled, y: size clamp enabled
    params: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct BlockUniforms {
    view_proj: [[f32; 4]; 4],
    // x: delay_time, y: length_loop, z: length_scene_fade, w: length_block_fade
    timing: [f32; 4],
    // x: appearance offset past wait, y: length_block_highlight,
    // z: fraction of the loop elapsed
    params: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct ParticleInstance {
    position: [f32; 3],
    alpha: f32,
    ambient: f32,
}

// The reference renderer blends every pass onto an opaque background with
// src-alpha additive blending.
const ADDITIVE_ALPHA: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
};

pub struct GpuState<'w> {
    pub window: &'w winit::window::Window,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_config: wgpu::SurfaceConfiguration,
    config: Config,

    particle_pipeline: wgpu::RenderPipeline,
    particle_uniforms: wgpu::Buffer,
    particle_bind_group: wgpu::BindGroup,
    quad_vb: wgpu::Buffer,
    particle_instance_vb: wgpu::Buffer,
    particle_count: u32,

    block_pipeline: wgpu::RenderPipeline,
    block_uniforms: wgpu::Buffer,
    block_bind_group: wgpu::BindGroup,
    block_vb: wgpu::Buffer,
    block_instance_vb: wgpu::Buffer,
    block_count: u32,

    logo_pipeline: wgpu::RenderPipeline,
    logo_bind_group: wgpu::BindGroup,
    logo_vb: wgpu::Buffer,

    width: u32,
    height: u32,
}

impl<'w> GpuState<'w> {
    pub async fn new(
        window: &'w winit::window::Window,
        config: &Config,
        sim: &Simulation,
    ) -> Result<Self, InitError> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window)
            .map_err(|e| InitError::ResourceInit(format!("surface: {e}")))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| InitError::ResourceInit("no compatible gpu adapter".into()))?;
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
            .map_err(|e| InitError::ResourceInit(format!("request_device: {e}")))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps.formats[0];
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            desired_maximum_frame_latency: 2,
            view_formats: vec![],
        };
        surface.configure(&device, &surface_config);

        let particle_shader = create_shader(
            &device,
            "particles",
            include_str!("shaders/particles.wgsl"),
        )
        .await?;
        let block_shader =
            create_shader(&device, "blocks", include_str!("shaders/blocks.wgsl")).await?;
        let logo_shader =
            create_shader(&device, "logo", include_str!("shaders/logo.wgsl")).await?;

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let highlight_view =
            assets::load_texture_or_blank(&device, &queue, "res/block_highlight.png", "highlight");
        let logo_view = assets::load_texture_or_blank(&device, &queue, "res/logo.png", "logo");

        // ---------------- particles ----------------

        let particle_uniforms = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("particle_uniforms"),
            size: std::mem::size_of::<ParticleUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let quad_vertices: [f32; 12] = [
            -0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, -0.5, 0.5, 0.5, -0.5, 0.5,
        ];
        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vb"),
            contents: bytemuck::cast_slice(&quad_vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let particle_count = sim.particle_count() as u32;
        let particle_instance_vb = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("particle_instances"),
            size: (std::mem::size_of::<ParticleInstance>() * sim.particle_count()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let particle_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("particle_bgl"),
            entries: &[uniform_entry(0)],
        });
        let particle_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("particle_bg"),
            layout: &particle_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: particle_uniforms.as_entire_binding(),
            }],
        });

        let particle_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("particle_pl"),
            bind_group_layouts: &[&particle_bgl],
            push_constant_ranges: &[],
        });
        let particle_buffers = [
            wgpu::VertexBufferLayout {
                array_stride: (std::mem::size_of::<f32>() * 2) as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 0,
                    shader_location: 0,
                }],
            },
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<ParticleInstance>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x3,
                        offset: 0,
                        shader_location: 1,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32,
                        offset: 12,
                        shader_location: 2,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32,
                        offset: 16,
                        shader_location: 3,
                    },
                ],
            },
        ];
        let particle_pipeline =
            build_pipeline(&device, "particles", &particle_shader, &particle_layout, &particle_buffers, format);

        // ---------------- blocks ----------------

        let block_uniforms = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("block_uniforms"),
            size: std::mem::size_of::<BlockUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let block_vertices = block_mesh();
        let block_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("block_vb"),
            contents: bytemuck::cast_slice(&block_vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let block_count = sim.blocks().len() as u32;
        let block_instance_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("block_instances"),
            contents: bytemuck::cast_slice(sim.blocks()),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let block_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("block_bgl"),
            entries: &[uniform_entry(0), texture_entry(1), sampler_entry(2)],
        });
        let block_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("block_bg"),
            layout: &block_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: block_uniforms.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&highlight_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let block_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("block_pl"),
            bind_group_layouts: &[&block_bgl],
            push_constant_ranges: &[],
        });
        let block_buffers = [
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<loader_core::BlockVertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x3,
                        offset: 0,
                        shader_location: 0,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x2,
                        offset: 12,
                        shader_location: 1,
                    },
                ],
            },
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<BlockInstance>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x3,
                        offset: 0,
                        shader_location: 2,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32,
                        offset: 12,
                        shader_location: 3,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32,
                        offset: 16,
                        shader_location: 4,
                    },
                ],
            },
        ];
        let block_pipeline =
            build_pipeline(&device, "blocks", &block_shader, &block_layout, &block_buffers, format);

        // ---------------- logo ----------------

        let logo_vertices = logo_quad(config.logo_scale, config.logo_padding);
        let logo_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("logo_vb"),
            contents: bytemuck::cast_slice(&logo_vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let logo_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("logo_bgl"),
            entries: &[texture_entry(0), sampler_entry(1)],
        });
        let logo_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("logo_bg"),
            layout: &logo_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&logo_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });
        let logo_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("logo_pl"),
            bind_group_layouts: &[&logo_bgl],
            push_constant_ranges: &[],
        });
        let logo_buffers = [wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<loader_core::LogoVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 0,
                    shader_location: 0,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 8,
                    shader_location: 1,
                },
            ],
        }];
        let logo_pipeline =
            build_pipeline(&device, "logo", &logo_shader, &logo_layout, &logo_buffers, format);

        Ok(Self {
            window,
            surface,
            device,
            queue,
            surface_config,
            config: config.clone(),
            particle_pipeline,
            particle_uniforms,
            particle_bind_group,
            quad_vb,
            particle_instance_vb,
            particle_count,
            block_pipeline,
            block_uniforms,
            block_bind_group,
            block_vb,
            block_instance_vb,
            block_count,
            logo_pipeline,
            logo_bind_group,
            logo_vb,
            width: size.width.max(1),
            height: size.height.max(1),
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.width = new_size.width;
        self.height = new_size.height;
        self.surface_config.width = new_size.width;
        self.surface_config.height = new_size.height;
        self.surface.configure(&self.device, &self.surface_config);
    }

    pub fn render(&mut self, sim: &Simulation, frame: &Frame) -> Result<(), wgpu::SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let aspect = self.width as f32 / self.height as f32;
        let proj = Mat4::perspective_rh(
            CAMERA_FOV_DEGREES.to_radians(),
            aspect,
            CAMERA_NEAR,
            CAMERA_FAR,
        );
        let view_mat = Mat4::look_at_rh(frame.camera_eye, frame.camera_focus, Vec3::Y);
        let view_proj = (proj * view_mat).to_cols_array_2d();
        // World-space camera basis for billboarding: rows of the view rotation.
        let right = Vec3::new(view_mat.x_axis.x, view_mat.y_axis.x, view_mat.z_axis.x);
        let up = Vec3::new(view_mat.x_axis.y, view_mat.y_axis.y, view_mat.z_axis.y);
        let px_to_world =
            2.0 * (CAMERA_FOV_DEGREES.to_radians() * 0.5).tan() / self.height as f32;

        let cfg = &self.config;
        self.queue.write_buffer(
            &self.particle_uniforms,
            0,
            bytemuck::bytes_of(&ParticleUniforms {
                view_proj,
                camera_right: [right.x, right.y, right.z, cfg.particle_size],
                camera_up: [up.x, up.y, up.z, px_to_world],
                camera_pos: [frame.camera_eye.x, frame.camera_eye.y, frame.camera_eye.z, 0.0],
                params: [
                    if cfg.enable_particle_scaling { 1.0 } else { 0.0 },
                    if cfg.particle_size_clamp { 1.0 } else { 0.0 },
                    0.0,
                    0.0,
                ],
            }),
        );
        self.queue.write_buffer(
            &self.block_uniforms,
            0,
            bytemuck::bytes_of(&BlockUniforms {
                view_proj,
                timing: [
                    frame.phase.delay_time,
                    cfg.length_loop,
                    cfg.length_scene_fade,
                    cfg.length_block_fade,
                ],
                params: [
                    cfg.length_scene_fade
                        + cfg.length_start_delay
                        + cfg.length_slice_assembly
                        + loader_core::BLOCK_APPEARANCE_LAG,
                    cfg.length_block_highlight,
                    (frame.phase.total % cfg.length_loop) / cfg.length_loop,
                    0.0,
                ],
            }),
        );

        // Re-upload live particle state from the simulation's read buffers.
        let positions = sim.positions();
        let dynamic = sim.dynamic_data();
        let data_static = sim.static_data();
        let mut instances: Vec<ParticleInstance> =
            Vec::with_capacity(self.particle_count as usize);
        for i in 0..self.particle_count as usize {
            instances.push(ParticleInstance {
                position: positions[i].truncate().to_array(),
                alpha: dynamic[i].x,
                ambient: data_static[i].z,
            });
        }
        self.queue
            .write_buffer(&self.particle_instance_vb, 0, bytemuck::cast_slice(&instances));

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let bg = cfg.background_color;
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: bg[0] as f64,
                            g: bg[1] as f64,
                            b: bg[2] as f64,
                            a: bg[3] as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if cfg.enable_block_rendering {
                rpass.set_pipeline(&self.block_pipeline);
                rpass.set_bind_group(0, &self.block_bind_group, &[]);
                rpass.set_vertex_buffer(0, self.block_vb.slice(..));
                rpass.set_vertex_buffer(1, self.block_instance_vb.slice(..));
                rpass.draw(0..36, 0..self.block_count);
            }
            if cfg.enable_logo {
                rpass.set_pipeline(&self.logo_pipeline);
                rpass.set_bind_group(0, &self.logo_bind_group, &[]);
                rpass.set_vertex_buffer(0, self.logo_vb.slice(..));
                rpass.draw(0..6, 0..1);
            }
            rpass.set_pipeline(&self.particle_pipeline);
            rpass.set_bind_group(0, &self.particle_bind_group, &[]);
            rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
            rpass.set_vertex_buffer(1, self.particle_instance_vb.slice(..));
            rpass.draw(0..6, 0..self.particle_count);
        }
        self.queue.submit(Some(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    pub fn inner_size(&self) -> winit::dpi::PhysicalSize<u32> {
        self.window.inner_size()
    }
}

/// Create a shader module, surfacing WGSL validation failures as a typed
/// startup error instead of a deferred device panic.
async fn create_shader(
    device: &wgpu::Device,
    label: &'static str,
    source: &str,
) -> Result<wgpu::ShaderModule, InitError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    if let Some(e) = device.pop_error_scope().await {
        return Err(InitError::ShaderCompile {
            label,
            detail: e.to_string(),
        });
    }
    Ok(module)
}

fn build_pipeline(
    device: &wgpu::Device,
    label: &str,
    shader: &wgpu::ShaderModule,
    layout: &wgpu::PipelineLayout,
    buffers: &[wgpu::VertexBufferLayout],
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(ADDITIVE_ALPHA),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    })
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}
