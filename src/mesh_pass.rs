//! Depth-tested rendering of a frame's [`DrawList`](crate::DrawList).
//!
//! # Architecture
//!
//! The mesh pass uses three bind groups:
//! - **Group 0**: Camera uniforms (projection, light position, time and lighting terms)
//! - **Group 1**: Model uniforms (model-view and normal matrices, tint), one slot per draw
//!   in a dynamically offset buffer
//! - **Group 2**: Diffuse texture and sampler of the draw's [`Material`]
//!
//! Each [`Program`] has its own pipeline over the same layout: `Default` is textured
//! Phong lighting, `Water` scrolls and ripples its texture over time.
//!
//! # Uniform upload
//!
//! All model uniforms for a frame are packed into one staging vector and written with a
//! single `write_buffer` before the pass is recorded. The buffer grows (doubling) when a
//! frame has more draws than slots.

use std::path::Path;

use glam::{Mat4, Vec4};

use crate::camera::Camera;
use crate::gpu::GpuContext;
use crate::material::{Color, Material, MaterialTable, Program};
use crate::mesh::{PrimitiveMeshes, Vertex3d};
use crate::painter::DrawCommand;
use crate::primitive::Primitive;
use crate::texture::MaterialTexture;

/// Light position in eye space.
pub const LIGHT_POSITION: Vec4 = Vec4::new(0.0, 0.0, 100.0, 1.0);
pub const AMBIENT: f32 = 0.2;
pub const SPECULAR: f32 = 0.4;
pub const SHININESS: f32 = 30.0;

/// Draw slots allocated up front.
const INITIAL_CAPACITY: usize = 2048;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Per-frame camera and lighting uniforms.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniforms {
    /// Eye to clip space.
    pub projection: [[f32; 4]; 4],
    /// Light position in eye space.
    pub light_position: [f32; 4],
    /// `[water time, ambient, specular, shininess]`.
    pub params: [f32; 4],
}

impl CameraUniforms {
    pub fn new(camera: &Camera, aspect: f32, time: f32) -> Self {
        Self {
            projection: camera.projection_matrix(aspect).to_cols_array_2d(),
            light_position: LIGHT_POSITION.to_array(),
            params: [time / 5.0, AMBIENT, SPECULAR, SHININESS],
        }
    }
}

/// Per-draw uniforms.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniforms {
    /// Object to eye space.
    pub model_view: [[f32; 4]; 4],
    /// Inverse transpose of `model_view`, for normals under non-uniform scale.
    pub normal: [[f32; 4]; 4],
    /// RGBA multiplier applied to the texture.
    pub tint: [f32; 4],
}

impl ModelUniforms {
    pub fn new(view: Mat4, model: Mat4, tint: Color) -> Self {
        let model_view = view * model;
        Self {
            model_view: model_view.to_cols_array_2d(),
            normal: model_view.inverse().transpose().to_cols_array_2d(),
            tint: tint.to_array(),
        }
    }
}

/// Size of one draw slot: [`ModelUniforms`] rounded up to the device's dynamic offset
/// alignment.
pub fn uniform_stride(alignment: u32) -> u64 {
    let size = std::mem::size_of::<ModelUniforms>() as u64;
    let alignment = u64::from(alignment.max(1));
    size.div_ceil(alignment) * alignment
}

/// Renders draw commands with depth testing, textures and the two shading programs.
pub struct MeshPass {
    default_pipeline: wgpu::RenderPipeline,
    water_pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    model_bind_group_layout: wgpu::BindGroupLayout,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
    model_stride: u64,
    model_capacity: usize,
    staging: Vec<u8>,
    textures: MaterialTable<MaterialTexture>,
    texture_bind_groups: MaterialTable<wgpu::BindGroup>,
    meshes: PrimitiveMeshes,
    /// View into the depth texture for render pass attachment.
    depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
}

impl MeshPass {
    /// Create pipelines, upload primitive meshes, and load material textures from
    /// `texture_dir` (generated stand-ins for anything missing).
    pub fn new(gpu: &GpuContext, texture_dir: Option<&Path>) -> Self {
        let device = &gpu.device;

        let mesh_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
        });
        let water_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Water Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/water.wgsl").into()),
        });

        // Camera uniform buffer (group 0)
        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Uniforms"),
            size: std::mem::size_of::<CameraUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        // Model uniform slots (group 1)
        let model_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Model Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<ModelUniforms>() as u64,
                        ),
                    },
                    count: None,
                }],
            });

        let model_stride = uniform_stride(device.limits().min_uniform_buffer_offset_alignment);
        let (model_buffer, model_bind_group) = Self::create_model_slots(
            device,
            &model_bind_group_layout,
            model_stride,
            INITIAL_CAPACITY,
        );

        // Material textures (group 2)
        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Texture Bind Group Layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let textures = MaterialTable::from_fn(|m| MaterialTexture::load(gpu, texture_dir, m));
        let loaded = textures.iter().filter(|(_, t)| t.from_file).count();
        log::info!(
            "material textures: {loaded} loaded, {} generated",
            Material::COUNT - loaded
        );

        let texture_bind_groups = MaterialTable::from_fn(|material| {
            let texture = &textures[material].texture;
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("{material:?} Texture Bind Group")),
                layout: &texture_bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&texture.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&texture.sampler),
                    },
                ],
            })
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[
                &camera_bind_group_layout,
                &model_bind_group_layout,
                &texture_bind_group_layout,
            ],
            push_constant_ranges: &[],
        });

        let default_pipeline =
            Self::create_pipeline(gpu, &pipeline_layout, &mesh_shader, "Mesh Pipeline");
        let water_pipeline =
            Self::create_pipeline(gpu, &pipeline_layout, &water_shader, "Water Pipeline");

        let depth_view = Self::create_depth_texture(gpu);

        Self {
            default_pipeline,
            water_pipeline,
            camera_buffer,
            camera_bind_group,
            model_bind_group_layout,
            model_buffer,
            model_bind_group,
            model_stride,
            model_capacity: INITIAL_CAPACITY,
            staging: Vec::new(),
            textures,
            texture_bind_groups,
            meshes: PrimitiveMeshes::new(gpu),
            depth_view,
            depth_size: (gpu.width(), gpu.height()),
        }
    }

    fn create_pipeline(
        gpu: &GpuContext,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        label: &str,
    ) -> wgpu::RenderPipeline {
        gpu.device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(layout),
                vertex: wgpu::VertexState {
                    module: shader,
                    entry_point: Some("vs"),
                    buffers: &[Vertex3d::LAYOUT],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: shader,
                    entry_point: Some("fs"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: gpu.config.format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                // Mirrored and flattened shapes flip winding, so draw both faces.
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: None,
                    front_face: wgpu::FrontFace::Ccw,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
    }

    fn create_model_slots(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        stride: u64,
        capacity: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Model Uniforms"),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Model Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<ModelUniforms>() as u64),
                }),
            }],
        });

        (buffer, bind_group)
    }

    fn create_depth_texture(gpu: &GpuContext) -> wgpu::TextureView {
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: gpu.width(),
                height: gpu.height(),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Recreate the depth buffer if the surface size changed.
    pub fn ensure_depth_size(&mut self, gpu: &GpuContext) {
        if self.depth_size != (gpu.width(), gpu.height()) {
            self.depth_view = Self::create_depth_texture(gpu);
            self.depth_size = (gpu.width(), gpu.height());
        }
    }

    fn ensure_capacity(&mut self, gpu: &GpuContext, draws: usize) {
        if draws <= self.model_capacity {
            return;
        }
        let capacity = draws.next_power_of_two();
        log::debug!("growing model uniforms to {capacity} slots");
        let (buffer, bind_group) = Self::create_model_slots(
            &gpu.device,
            &self.model_bind_group_layout,
            self.model_stride,
            capacity,
        );
        self.model_buffer = buffer;
        self.model_bind_group = bind_group;
        self.model_capacity = capacity;
    }

    fn pipeline(&self, program: Program) -> &wgpu::RenderPipeline {
        match program {
            Program::Default => &self.default_pipeline,
            Program::Water => &self.water_pipeline,
        }
    }

    /// Clear `target` to the sky color and draw `draws` as seen through `camera`.
    ///
    /// `time` is the unwrapped animation time; the water program scrolls with it.
    pub fn render(
        &mut self,
        gpu: &GpuContext,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        camera: &Camera,
        time: f32,
        draws: &[DrawCommand],
    ) {
        self.ensure_depth_size(gpu);
        self.ensure_capacity(gpu, draws.len());

        let camera_uniforms = CameraUniforms::new(camera, gpu.aspect(), time);
        gpu.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[camera_uniforms]),
        );

        let view = camera.view_matrix();
        let stride = self.model_stride as usize;
        self.staging.clear();
        self.staging.resize(draws.len() * stride, 0);
        for (slot, draw) in self.staging.chunks_exact_mut(stride).zip(draws) {
            let uniforms =
                ModelUniforms::new(view, draw.model, self.textures[draw.material].tint);
            let bytes = bytemuck::bytes_of(&uniforms);
            slot[..bytes.len()].copy_from_slice(bytes);
        }
        if !self.staging.is_empty() {
            gpu.queue.write_buffer(&self.model_buffer, 0, &self.staging);
        }

        let sky = Color::SKY;
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Beach Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: f64::from(sky.r),
                        g: f64::from(sky.g),
                        b: f64::from(sky.b),
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);

        let mut program = None;
        let mut material = None;
        let mut primitive: Option<Primitive> = None;
        for (index, draw) in draws.iter().enumerate() {
            if program != Some(draw.program) {
                render_pass.set_pipeline(self.pipeline(draw.program));
                program = Some(draw.program);
            }
            if material != Some(draw.material) {
                render_pass.set_bind_group(2, &self.texture_bind_groups[draw.material], &[]);
                material = Some(draw.material);
            }
            let mesh = self.meshes.get(draw.primitive);
            if primitive != Some(draw.primitive) {
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                primitive = Some(draw.primitive);
            }

            let offset = (index * stride) as u32;
            render_pass.set_bind_group(1, &self.model_bind_group, &[offset]);
            render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }
}
