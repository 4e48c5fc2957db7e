//! CPU-side staging for a program's uniform block.
//!
//! Offsets follow WGSL uniform address-space layout: a `mat3x3<f32>` is three
//! `vec4`-aligned columns, `vec4` aligns to 16, `vec2` to 8, scalars to 4,
//! and the block size rounds up to 16.

use std::collections::HashMap;

use super::{UniformDecl, UniformKind, UniformLocation};

const fn align_and_size(kind: UniformKind) -> (u32, u32) {
    match kind {
        UniformKind::Mat3 => (16, 48),
        UniformKind::Vec4 => (16, 16),
        UniformKind::Vec2 => (8, 8),
        UniformKind::Float | UniformKind::Int => (4, 4),
    }
}

const fn align_up(value: u32, align: u32) -> u32 {
    value.div_ceil(align) * align
}

#[derive(Debug, Clone)]
pub(crate) struct UniformBlock {
    locations: HashMap<String, UniformLocation>,
    bytes: Vec<u8>,
}

impl UniformBlock {
    pub(crate) fn new(decls: &[UniformDecl]) -> Self {
        let mut locations = HashMap::with_capacity(decls.len());
        let mut cursor = 0u32;
        for decl in decls {
            let (align, size) = align_and_size(decl.kind);
            let offset = align_up(cursor, align);
            locations.insert(decl.name.to_string(), UniformLocation(offset));
            cursor = offset + size;
        }
        let size = align_up(cursor.max(16), 16);

        Self {
            locations,
            bytes: vec![0; size as usize],
        }
    }

    pub(crate) fn locations(&self) -> &HashMap<String, UniformLocation> {
        &self.locations
    }

    pub(crate) fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn write(&mut self, offset: u32, data: &[u8]) {
        let start = offset as usize;
        let Some(dst) = self.bytes.get_mut(start..start + data.len()) else {
            log::warn!("uniform write at offset {offset} is outside the block");
            return;
        };
        dst.copy_from_slice(data);
    }

    pub(crate) fn write_mat3(&mut self, location: UniformLocation, m: &[f32; 9]) {
        for col in 0..3 {
            let column = [m[3 * col], m[3 * col + 1], m[3 * col + 2], 0.0];
            self.write(location.0 + 16 * col as u32, bytemuck::cast_slice(&column));
        }
    }

    pub(crate) fn write_vec2(&mut self, location: UniformLocation, v: [f32; 2]) {
        self.write(location.0, bytemuck::cast_slice(&v));
    }

    pub(crate) fn write_vec4(&mut self, location: UniformLocation, v: [f32; 4]) {
        self.write(location.0, bytemuck::cast_slice(&v));
    }

    pub(crate) fn write_f32(&mut self, location: UniformLocation, v: f32) {
        self.write(location.0, bytemuck::bytes_of(&v));
    }

    pub(crate) fn write_i32(&mut self, location: UniformLocation, v: i32) {
        self.write(location.0, bytemuck::bytes_of(&v));
    }
}
