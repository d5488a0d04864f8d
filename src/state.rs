use wgpu::{BindGroup, Buffer, Device, Queue, RenderPipeline, Surface, SurfaceConfiguration};

pub struct GpuContext {
    pub surface: Surface<'static>,
    pub device: Device,
    pub queue: Queue,
    pub config: SurfaceConfiguration,
    pub frame_pipeline: RenderPipeline,
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniforms {
    pub screen_size: [f32; 2],
    pub frame_size: [f32; 2],
}

pub struct FrameBuffers {
    pub uniform: Buffer,
    pub bind_group: BindGroup,
}

pub struct InputState {
    pub mouse_pos: [f32; 2],
    /// Set when the pixmaps changed since the last upload.
    pub frame_dirty: bool,
}
