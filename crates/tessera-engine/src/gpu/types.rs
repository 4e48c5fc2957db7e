use std::collections::HashMap;
use std::path::PathBuf;

use super::GpuError;

macro_rules! gpu_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u32);

        impl $name {
            /// The zero handle; never refers to a live resource.
            pub const NONE: Self = Self(0);

            #[inline]
            pub const fn is_valid(self) -> bool {
                self.0 != 0
            }
        }
    };
}

gpu_handle!(
    /// GPU buffer (vertex or index data).
    BufferHandle
);
gpu_handle!(
    /// Vertex buffer + layout + index buffer binding.
    VertexArrayHandle
);
gpu_handle!(
    /// Linked shader program.
    ShaderHandle
);
gpu_handle!(
    /// 2D RGBA8 texture.
    TextureHandle
);

/// Location of a uniform inside a shader program.
///
/// Backends decide what the value means (a byte offset, a slot index).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub u32);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BufferKind {
    Vertices,
    Indices,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum IndexFormat {
    U16,
    U32,
}

impl IndexFormat {
    pub const fn byte_size(self) -> u32 {
        match self {
            IndexFormat::U16 => 2,
            IndexFormat::U32 => 4,
        }
    }
}

/// One interleaved vertex attribute.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Attribute {
    Float,
    Float2,
    Float3,
    Float4,
}

impl Attribute {
    pub const fn byte_size(self) -> u32 {
        4 * match self {
            Attribute::Float => 1,
            Attribute::Float2 => 2,
            Attribute::Float3 => 3,
            Attribute::Float4 => 4,
        }
    }
}

/// Ordered, tightly packed attribute list of one vertex buffer.
///
/// Shader locations follow declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BufferLayout {
    attributes: Vec<Attribute>,
}

impl BufferLayout {
    pub fn new(attributes: impl Into<Vec<Attribute>>) -> Self {
        Self {
            attributes: attributes.into(),
        }
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Bytes between consecutive vertices.
    pub fn stride(&self) -> u32 {
        self.attributes.iter().map(|a| a.byte_size()).sum()
    }

    /// `(attribute, byte offset)` pairs in declaration order.
    pub fn offsets(&self) -> impl Iterator<Item = (Attribute, u32)> + '_ {
        self.attributes.iter().scan(0u32, |offset, &attr| {
            let at = *offset;
            *offset += attr.byte_size();
            Some((attr, at))
        })
    }
}

/// Type of a value in a shader's uniform block.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum UniformKind {
    Mat3,
    Vec2,
    Vec4,
    Float,
    Int,
}

/// Uniform name + type, in block declaration order.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct UniformDecl {
    pub name: &'static str,
    pub kind: UniformKind,
}

impl UniformDecl {
    pub const fn new(name: &'static str, kind: UniformKind) -> Self {
        Self { name, kind }
    }
}

/// Everything a driver needs to build a program from two source files.
#[derive(Debug, Clone)]
pub struct ShaderSource<'a> {
    pub label: &'a str,
    pub vertex_path: PathBuf,
    pub fragment_path: PathBuf,
    pub uniforms: &'a [UniformDecl],
}

/// A linked program plus its uniform-name → location map.
#[derive(Debug, Clone, Default)]
pub struct CompiledShader {
    pub label: String,
    pub handle: ShaderHandle,
    pub uniform_locations: HashMap<String, UniformLocation>,
}

impl CompiledShader {
    pub fn location(&self, name: &str) -> Result<UniformLocation, GpuError> {
        self.uniform_locations
            .get(name)
            .copied()
            .ok_or_else(|| GpuError::UnknownUniform {
                label: self.label.clone(),
                name: name.to_string(),
            })
    }
}

/// Texture sampling filter, used for both minification and magnification.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum Filtering {
    #[default]
    NearestPixel,
    Linear,
}

/// Texture coordinate wrapping outside `[0, 1]`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum Wrapping {
    #[default]
    Repeat,
    ClampToEdge,
    MirroredRepeat,
}
