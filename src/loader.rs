//! The file loader that reads specifications from disk and resolves
//! `include` directives is an external collaborator (§1) — THE CORE only
//! defines the interface it is consulted through. `FsLoader` is this
//! crate's default, concrete realisation of that interface.

use std::path::{Path, PathBuf};

use crate::error::LoaderError;

/// Resolves the text of a sibling specification named in an `include`
/// directive, relative to the file currently being read.
pub trait SpecLoader {
    fn load_sibling(&self, base: &str, include_name: &str) -> Result<(String, String), LoaderError>;
}

/// Reads sibling specification files off the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsLoader;

impl SpecLoader for FsLoader {
    fn load_sibling(&self, base: &str, include_name: &str) -> Result<(String, String), LoaderError> {
        let base_dir: PathBuf = Path::new(base)
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let path = base_dir.join(include_name);
        let text = std::fs::read_to_string(&path)
            .map_err(|e| LoaderError::NotFound(path.display().to_string(), e))?;
        Ok((path.display().to_string(), text))
    }
}
