/// The swapchain image being drawn this frame.
///
/// Hold it only for the duration of one frame: the surface cannot hand out
/// the next image until this one is presented or dropped.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
}
