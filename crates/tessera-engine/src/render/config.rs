use std::path::PathBuf;

use crate::assets::{AssetError, AssetLocator};

/// Shader sources used by [`ImmediateRenderer2D`](super::ImmediateRenderer2D).
///
/// Paths are asset-relative until [`RendererConfig::resolve`] is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererConfig {
    pub quad_vertex: PathBuf,
    pub quad_fragment: PathBuf,
    pub sdf_vertex: PathBuf,
    pub sdf_fragment: PathBuf,
}

impl Default for RendererConfig {
    fn default() -> Self {
        let dir = PathBuf::from("shaders/immediate_renderer_2d");
        Self {
            quad_vertex: dir.join("quad.vert.wgsl"),
            quad_fragment: dir.join("quad.frag.wgsl"),
            sdf_vertex: dir.join("sdf.vert.wgsl"),
            sdf_fragment: dir.join("sdf.frag.wgsl"),
        }
    }
}

impl RendererConfig {
    /// Returns a copy with every shader path resolved through `assets`.
    pub fn resolve(&self, assets: &AssetLocator) -> Result<Self, AssetError> {
        Ok(Self {
            quad_vertex: assets.locate(&self.quad_vertex)?,
            quad_fragment: assets.locate(&self.quad_fragment)?,
            sdf_vertex: assets.locate(&self.sdf_vertex)?,
            sdf_fragment: assets.locate(&self.sdf_fragment)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_shaders_resolve_from_workspace_assets() {
        let resolved = RendererConfig::default()
            .resolve(&AssetLocator::default())
            .unwrap();
        assert!(resolved.quad_vertex.is_file());
        assert!(resolved.sdf_fragment.is_file());
    }

    #[test]
    fn unresolvable_shader_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = RendererConfig::default()
            .resolve(&AssetLocator::new([dir.path()]))
            .unwrap_err();
        assert!(err.to_string().contains("quad.vert.wgsl"));
    }
}
