//! Checks a WGSL stage against the uniform block its program declares.
//!
//! Drivers compute byte offsets from [`UniformDecl`]s alone; the shader's
//! `@group(0) @binding(0)` struct must lay its members out the same way.

use wgpu::naga::{self, AddressSpace, ScalarKind, ShaderStage, TypeInner, VectorSize};

use super::uniform_block::UniformBlock;
use super::{GpuError, UniformDecl, UniformKind};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Stage {
    Vertex,
    Fragment,
}

impl Stage {
    pub(crate) const fn entry_point(self) -> &'static str {
        match self {
            Stage::Vertex => "vs_main",
            Stage::Fragment => "fs_main",
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Stage::Vertex => "vertex",
            Stage::Fragment => "fragment",
        }
    }

    fn naga_stage(self) -> ShaderStage {
        match self {
            Stage::Vertex => ShaderStage::Vertex,
            Stage::Fragment => ShaderStage::Fragment,
        }
    }
}

fn uniform_kind(inner: &TypeInner) -> Option<UniformKind> {
    const F32: naga::Scalar = naga::Scalar {
        kind: ScalarKind::Float,
        width: 4,
    };
    const I32: naga::Scalar = naga::Scalar {
        kind: ScalarKind::Sint,
        width: 4,
    };

    match *inner {
        TypeInner::Scalar(s) if s == F32 => Some(UniformKind::Float),
        TypeInner::Scalar(s) if s == I32 => Some(UniformKind::Int),
        TypeInner::Vector {
            size: VectorSize::Bi,
            scalar,
        } if scalar == F32 => Some(UniformKind::Vec2),
        TypeInner::Vector {
            size: VectorSize::Quad,
            scalar,
        } if scalar == F32 => Some(UniformKind::Vec4),
        TypeInner::Matrix {
            columns: VectorSize::Tri,
            rows: VectorSize::Tri,
            scalar,
        } if scalar == F32 => Some(UniformKind::Mat3),
        _ => None,
    }
}

/// Parses `source` and verifies its entry point and uniform struct.
///
/// A stage without a binding-0 uniform is accepted; one that has it must
/// match `decls` member for member, at the offsets `block` assigned.
pub(crate) fn check_stage(
    label: &str,
    stage: Stage,
    source: &str,
    decls: &[UniformDecl],
    block: &UniformBlock,
) -> Result<(), GpuError> {
    let compile_error = |details: String| GpuError::ShaderCompile {
        label: label.to_string(),
        details: format!("{} stage: {details}", stage.name()),
    };

    let module = naga::front::wgsl::parse_str(source)
        .map_err(|err| compile_error(err.emit_to_string(source)))?;

    let entry = stage.entry_point();
    if !module
        .entry_points
        .iter()
        .any(|ep| ep.name == entry && ep.stage == stage.naga_stage())
    {
        return Err(compile_error(format!("no `{entry}` entry point")));
    }

    let Some((_, global)) = module.global_variables.iter().find(|(_, g)| {
        g.space == AddressSpace::Uniform
            && matches!(g.binding, Some(naga::ResourceBinding { group: 0, binding: 0 }))
    }) else {
        return Ok(());
    };

    let TypeInner::Struct { members, .. } = &module.types[global.ty].inner else {
        return Err(compile_error("uniform at binding 0 is not a struct".to_string()));
    };

    for decl in decls {
        let Some(member) = members.iter().find(|m| m.name.as_deref() == Some(decl.name)) else {
            return Err(GpuError::UnknownUniform {
                label: label.to_string(),
                name: decl.name.to_string(),
            });
        };

        let found = uniform_kind(&module.types[member.ty].inner);
        if found != Some(decl.kind) {
            return Err(compile_error(format!(
                "uniform `{}` is {:?} but the shader declares {}",
                decl.name,
                decl.kind,
                found.map_or_else(|| "an unsupported type".to_string(), |k| format!("{k:?}")),
            )));
        }

        let expected = block.locations().get(decl.name).map(|l| l.0);
        if expected != Some(member.offset) {
            return Err(compile_error(format!(
                "uniform `{}` sits at byte {} in the shader, expected {}",
                decl.name,
                member.offset,
                expected.unwrap_or_default(),
            )));
        }
    }

    if let Some(extra) = members
        .iter()
        .filter_map(|m| m.name.as_deref())
        .find(|name| decls.iter().all(|d| d.name != *name))
    {
        return Err(compile_error(format!("uniform `{extra}` is not declared by the program")));
    }

    Ok(())
}
