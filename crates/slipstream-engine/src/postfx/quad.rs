use bytemuck::{Pod, Zeroable};

/// Vertex of the full-screen composite quad.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub pos: [f32; 3], // NDC
    pub uv: [f32; 2],
}

/// Corners at the NDC extremes; UV v grows downward so the captured
/// texture lands upright.
pub const FULLSCREEN_VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [-1.0, -1.0, 0.0], uv: [0.0, 1.0] },
    QuadVertex { pos: [-1.0,  1.0, 0.0], uv: [0.0, 0.0] },
    QuadVertex { pos: [ 1.0,  1.0, 0.0], uv: [1.0, 0.0] },
    QuadVertex { pos: [ 1.0, -1.0, 0.0], uv: [1.0, 1.0] },
];

pub const FULLSCREEN_INDICES: [u16; 6] = [0, 1, 2, 3, 0, 2];

pub const FULLSCREEN_TRIANGLES: u32 = 2;
