//! In-memory driver that records every command, for tests.

use std::collections::HashMap;

use crate::math::IVec2;

use super::{
    BufferHandle, BufferKind, BufferLayout, CompiledShader, Filtering, GpuDriver, GpuError,
    IndexFormat, ShaderHandle, ShaderSource, TextureHandle, UniformLocation, VertexArrayHandle,
    Wrapping,
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum UniformValue {
    Mat3([f32; 9]),
    Vec2([f32; 2]),
    Vec4([f32; 4]),
    Float(f32),
    Int(i32),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum GpuCommand {
    CreateBuffer { kind: BufferKind, bytes: usize, handle: BufferHandle },
    DestroyBuffer(BufferHandle),
    CreateVertexArray { layout: BufferLayout, handle: VertexArrayHandle },
    DestroyVertexArray(VertexArrayHandle),
    CreateShader { label: String, handle: ShaderHandle },
    DestroyShader(ShaderHandle),
    CreateTexture { size: IVec2, filtering: Filtering, wrapping: Wrapping, handle: TextureHandle },
    DestroyTexture(TextureHandle),
    UseProgram(ShaderHandle),
    SetUniform { name: String, value: UniformValue },
    BindTexture { unit: u32, texture: TextureHandle },
    BindVertexArray(VertexArrayHandle),
    DrawIndexed { index_count: u32 },
}

#[derive(Debug, Default)]
pub(crate) struct RecordingDriver {
    pub commands: Vec<GpuCommand>,
    /// Makes every `create_shader` fail with a compile error.
    pub fail_shaders: bool,
    /// Last texel payload handed to `create_texture`.
    pub last_texture_pixels: Option<Vec<u8>>,
    next_id: u32,
    location_names: HashMap<u32, String>,
    live: HashMap<u32, &'static str>,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self::default()
    }

    fn mint(&mut self, kind: &'static str) -> u32 {
        self.next_id += 1;
        self.live.insert(self.next_id, kind);
        self.next_id
    }

    fn release(&mut self, id: u32) {
        self.live.remove(&id);
    }

    /// Number of resources created and not yet destroyed.
    pub fn live_resources(&self) -> usize {
        self.live.len()
    }

    pub fn draw_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, GpuCommand::DrawIndexed { .. }))
            .count()
    }

    /// Most recent value uploaded to the uniform called `name`.
    pub fn last_uniform(&self, name: &str) -> Option<&UniformValue> {
        self.commands.iter().rev().find_map(|c| match c {
            GpuCommand::SetUniform { name: n, value } if n == name => Some(value),
            _ => None,
        })
    }

    pub fn last_mat3(&self, name: &str) -> Option<[f32; 9]> {
        match self.last_uniform(name) {
            Some(UniformValue::Mat3(m)) => Some(*m),
            _ => None,
        }
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    fn set_uniform(&mut self, location: UniformLocation, value: UniformValue) {
        let name = self
            .location_names
            .get(&location.0)
            .cloned()
            .unwrap_or_else(|| format!("#{}", location.0));
        self.commands.push(GpuCommand::SetUniform { name, value });
    }
}

impl GpuDriver for RecordingDriver {
    fn create_buffer(&mut self, kind: BufferKind, data: &[u8]) -> Result<BufferHandle, GpuError> {
        let handle = BufferHandle(self.mint("buffer"));
        self.commands.push(GpuCommand::CreateBuffer { kind, bytes: data.len(), handle });
        Ok(handle)
    }

    fn destroy_buffer(&mut self, buffer: BufferHandle) {
        if buffer.is_valid() {
            self.release(buffer.0);
            self.commands.push(GpuCommand::DestroyBuffer(buffer));
        }
    }

    fn create_vertex_array(
        &mut self,
        vertices: BufferHandle,
        layout: &BufferLayout,
        indices: BufferHandle,
        _index_format: IndexFormat,
    ) -> Result<VertexArrayHandle, GpuError> {
        if !vertices.is_valid() || !indices.is_valid() {
            return Err(GpuError::InvalidHandle { kind: "buffer", id: 0 });
        }
        let handle = VertexArrayHandle(self.mint("vertex array"));
        self.commands.push(GpuCommand::CreateVertexArray { layout: layout.clone(), handle });
        Ok(handle)
    }

    fn destroy_vertex_array(&mut self, vertex_array: VertexArrayHandle) {
        if vertex_array.is_valid() {
            self.release(vertex_array.0);
            self.commands.push(GpuCommand::DestroyVertexArray(vertex_array));
        }
    }

    fn create_shader(&mut self, source: &ShaderSource<'_>) -> Result<CompiledShader, GpuError> {
        if self.fail_shaders {
            return Err(GpuError::ShaderCompile {
                label: source.label.to_string(),
                details: "rejected by test driver".to_string(),
            });
        }

        let handle = ShaderHandle(self.mint("shader"));
        let mut uniform_locations = HashMap::new();
        for decl in source.uniforms {
            // Locations are unique across programs so names resolve unambiguously.
            self.next_id += 1;
            self.location_names.insert(self.next_id, decl.name.to_string());
            uniform_locations.insert(decl.name.to_string(), UniformLocation(self.next_id));
        }

        self.commands.push(GpuCommand::CreateShader { label: source.label.to_string(), handle });
        Ok(CompiledShader {
            label: source.label.to_string(),
            handle,
            uniform_locations,
        })
    }

    fn destroy_shader(&mut self, shader: ShaderHandle) {
        if shader.is_valid() {
            self.release(shader.0);
            self.commands.push(GpuCommand::DestroyShader(shader));
        }
    }

    fn create_texture(
        &mut self,
        size: IVec2,
        pixels: Option<&[u8]>,
        filtering: Filtering,
        wrapping: Wrapping,
    ) -> Result<TextureHandle, GpuError> {
        if size.x <= 0 || size.y <= 0 {
            return Err(GpuError::TextureSize { width: size.x, height: size.y });
        }
        if let Some(p) = pixels {
            let expected = size.area() * 4;
            if p.len() != expected {
                return Err(GpuError::TextureData { expected, actual: p.len() });
            }
        }
        self.last_texture_pixels = pixels.map(<[u8]>::to_vec);
        let handle = TextureHandle(self.mint("texture"));
        self.commands.push(GpuCommand::CreateTexture { size, filtering, wrapping, handle });
        Ok(handle)
    }

    fn destroy_texture(&mut self, texture: TextureHandle) {
        if texture.is_valid() {
            self.release(texture.0);
            self.commands.push(GpuCommand::DestroyTexture(texture));
        }
    }

    fn use_program(&mut self, shader: ShaderHandle) {
        self.commands.push(GpuCommand::UseProgram(shader));
    }

    fn set_uniform_mat3(&mut self, location: UniformLocation, value: &[f32; 9]) {
        self.set_uniform(location, UniformValue::Mat3(*value));
    }

    fn set_uniform_vec2(&mut self, location: UniformLocation, value: [f32; 2]) {
        self.set_uniform(location, UniformValue::Vec2(value));
    }

    fn set_uniform_vec4(&mut self, location: UniformLocation, value: [f32; 4]) {
        self.set_uniform(location, UniformValue::Vec4(value));
    }

    fn set_uniform_f32(&mut self, location: UniformLocation, value: f32) {
        self.set_uniform(location, UniformValue::Float(value));
    }

    fn set_uniform_i32(&mut self, location: UniformLocation, value: i32) {
        self.set_uniform(location, UniformValue::Int(value));
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureHandle) {
        self.commands.push(GpuCommand::BindTexture { unit, texture });
    }

    fn bind_vertex_array(&mut self, vertex_array: VertexArrayHandle) {
        self.commands.push(GpuCommand::BindVertexArray(vertex_array));
    }

    fn draw_indexed(&mut self, index_count: u32) {
        self.commands.push(GpuCommand::DrawIndexed { index_count });
    }
}
