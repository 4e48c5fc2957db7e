//! Asset path resolution.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("asset '{}' not found (searched: {})", path.display(), searched_list(searched))]
    NotFound { path: PathBuf, searched: Vec<PathBuf> },
}

fn searched_list(roots: &[PathBuf]) -> String {
    roots
        .iter()
        .map(|r| r.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Resolves asset-relative paths against an ordered list of roots.
#[derive(Debug, Clone)]
pub struct AssetLocator {
    roots: Vec<PathBuf>,
}

impl Default for AssetLocator {
    /// `./assets`, then `assets/` next to the executable, then the
    /// workspace `assets/` directory when built from source.
    fn default() -> Self {
        let mut roots = vec![PathBuf::from("assets")];
        if let Some(exe_dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            roots.push(exe_dir.join("assets"));
        }
        roots.push(Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets"));
        Self { roots }
    }
}

impl AssetLocator {
    pub fn new(roots: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Adds a root searched before all existing ones.
    pub fn push_front(&mut self, root: impl Into<PathBuf>) {
        self.roots.insert(0, root.into());
    }

    /// First existing `root/relative`. Existing absolute paths pass through.
    pub fn locate(&self, relative: impl AsRef<Path>) -> Result<PathBuf, AssetError> {
        let relative = relative.as_ref();
        if relative.is_absolute() && relative.exists() {
            return Ok(relative.to_path_buf());
        }

        self.roots
            .iter()
            .map(|root| root.join(relative))
            .find(|candidate| candidate.exists())
            .ok_or_else(|| AssetError::NotFound {
                path: relative.to_path_buf(),
                searched: self.roots.clone(),
            })
    }
}
