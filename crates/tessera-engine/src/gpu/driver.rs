use crate::math::IVec2;

use super::{
    BufferHandle, BufferKind, BufferLayout, CompiledShader, Filtering, GpuError, IndexFormat,
    ShaderHandle, ShaderSource, TextureHandle, UniformLocation, VertexArrayHandle, Wrapping,
};

/// Logical command interface a renderer issues GPU work through.
///
/// The vocabulary is deliberately small and state-machine shaped: bind a
/// program, set its uniforms, bind a texture and a vertex array, draw.
/// Every call runs synchronously on the calling thread.
///
/// Resource creation returns a non-zero handle or an error. Destroying the
/// zero handle (or an unknown one) is a no-op, so owners can release
/// unconditionally.
pub trait GpuDriver {
    fn create_buffer(&mut self, kind: BufferKind, data: &[u8]) -> Result<BufferHandle, GpuError>;
    fn destroy_buffer(&mut self, buffer: BufferHandle);

    fn create_vertex_array(
        &mut self,
        vertices: BufferHandle,
        layout: &BufferLayout,
        indices: BufferHandle,
        index_format: IndexFormat,
    ) -> Result<VertexArrayHandle, GpuError>;
    fn destroy_vertex_array(&mut self, vertex_array: VertexArrayHandle);

    fn create_shader(&mut self, source: &ShaderSource<'_>) -> Result<CompiledShader, GpuError>;
    fn destroy_shader(&mut self, shader: ShaderHandle);

    /// Creates an RGBA8 texture. `pixels` holds `size.x * size.y * 4` bytes,
    /// bottom row first; `None` leaves the contents undefined.
    fn create_texture(
        &mut self,
        size: IVec2,
        pixels: Option<&[u8]>,
        filtering: Filtering,
        wrapping: Wrapping,
    ) -> Result<TextureHandle, GpuError>;
    fn destroy_texture(&mut self, texture: TextureHandle);

    /// Makes `shader` current. [`ShaderHandle::NONE`] unbinds.
    fn use_program(&mut self, shader: ShaderHandle);

    /// Uploads a column-major 3×3 matrix.
    fn set_uniform_mat3(&mut self, location: UniformLocation, value: &[f32; 9]);
    fn set_uniform_vec2(&mut self, location: UniformLocation, value: [f32; 2]);
    fn set_uniform_vec4(&mut self, location: UniformLocation, value: [f32; 4]);
    fn set_uniform_f32(&mut self, location: UniformLocation, value: f32);
    fn set_uniform_i32(&mut self, location: UniformLocation, value: i32);

    /// Binds `texture` to sampler unit `unit`. [`TextureHandle::NONE`] unbinds.
    fn bind_texture(&mut self, unit: u32, texture: TextureHandle);

    fn bind_vertex_array(&mut self, vertex_array: VertexArrayHandle);

    /// Draws `index_count` indices of the bound vertex array as a triangle list.
    fn draw_indexed(&mut self, index_count: u32);
}
