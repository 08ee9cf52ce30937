//! The one mesh in the system: a unit quad, drawn as a 4-vertex triangle
//! strip. The model matrix carries it into world space.

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 3],
}

/// Strip order: top-right, top-left, bottom-right, bottom-left.
pub const UNIT_QUAD: [QuadVertex; 4] = [
    QuadVertex {
        position: [0.5, 0.5, 0.0],
    },
    QuadVertex {
        position: [-0.5, 0.5, 0.0],
    },
    QuadVertex {
        position: [0.5, -0.5, 0.0],
    },
    QuadVertex {
        position: [-0.5, -0.5, 0.0],
    },
];

impl QuadVertex {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                offset: std::mem::offset_of!(QuadVertex, position) as wgpu::BufferAddress,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            }],
        }
    }
}
