//! GPU-resident meshes for the canonical primitives.
//!
//! - [`Vertex3d`]: the vertex format shared by every primitive
//! - [`Mesh`]: vertex and index buffers uploaded once at startup
//! - [`PrimitiveMeshes`]: one mesh per [`Primitive`], looked up by enum
//!
//! # Vertex Layout
//!
//! | Attribute | Format    | Offset | Shader Location |
//! |-----------|-----------|--------|-----------------|
//! | position  | Float32x3 | 0      | 0               |
//! | normal    | Float32x3 | 12     | 1               |
//! | uv        | Float32x2 | 24     | 2               |

use crate::gpu::GpuContext;
use crate::primitive::{Geometry, Primitive};

/// A vertex with position, normal, and texture coordinates (32 bytes).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3d {
    /// Object-space position.
    pub position: [f32; 3],
    /// Unit surface normal.
    pub normal: [f32; 3],
    /// Texture coordinates.
    pub uv: [f32; 2],
}

impl Vertex3d {
    /// Vertex buffer layout matching the table in the module docs.
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex3d>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            // normal
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
            // uv
            wgpu::VertexAttribute {
                offset: 24,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x2,
            },
        ],
    };

    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// Vertex and index buffers for one shape.
#[derive(Debug)]
pub struct Mesh {
    pub(crate) vertex_buffer: wgpu::Buffer,
    pub(crate) index_buffer: wgpu::Buffer,
    pub(crate) index_count: u32,
}

impl Mesh {
    /// Upload raw vertex and index data.
    pub fn new(gpu: &GpuContext, vertices: &[Vertex3d], indices: &[u32], label: &str) -> Self {
        use wgpu::util::DeviceExt;

        let vertex_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Vertex Buffer")),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let index_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Index Buffer")),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        }
    }

    pub fn from_geometry(gpu: &GpuContext, geometry: &Geometry, label: &str) -> Self {
        Self::new(gpu, &geometry.vertices, &geometry.indices, label)
    }
}

/// The uploaded mesh for every [`Primitive`].
#[derive(Debug)]
pub struct PrimitiveMeshes {
    meshes: Vec<Mesh>,
}

impl PrimitiveMeshes {
    pub fn new(gpu: &GpuContext) -> Self {
        let meshes = Primitive::ALL
            .iter()
            .map(|&primitive| {
                let geometry = primitive.geometry();
                log::debug!(
                    "uploading {primitive:?}: {} vertices, {} triangles",
                    geometry.vertices.len(),
                    geometry.triangle_count()
                );
                Mesh::from_geometry(gpu, &geometry, &format!("{primitive:?}"))
            })
            .collect();
        Self { meshes }
    }

    pub fn get(&self, primitive: Primitive) -> &Mesh {
        &self.meshes[primitive.index()]
    }
}
