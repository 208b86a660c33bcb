/// One acquired swapchain image plus the encoder recording into it.
///
/// Short-lived: the next image cannot be acquired while this is held.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
