use std::collections::BTreeMap;
use std::error::Error;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File extension of the native serialization, matched case-insensitively.
pub const INPUT_EXTENSION: &str = "nt";

/// Name of the native serialization format.
pub const NATIVE_FORMAT: &str = "N-Triples";

/// A discovered input file, identified by its filename stem.
#[derive(Debug)]
pub struct InputFile {
    pub name: String,
    pub path: PathBuf,
}

/// Recursively discovers input files under `input_dir`.
///
/// Keeps regular files with the expected extension, skips hidden files, and
/// keys inputs by filename stem so an input and any alternate-format
/// counterpart share one identity. Results are sorted by name so repeated
/// runs produce the same row order.
pub fn discover_inputs(input_dir: &Path) -> Result<Vec<InputFile>, Box<dyn Error>> {
    if !input_dir.is_dir() {
        return Err(format!("input directory {} does not exist", input_dir.display()).into());
    }

    let mut inputs_by_name: BTreeMap<String, PathBuf> = BTreeMap::new();
    for entry in WalkDir::new(input_dir) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        let extension_matches = path
            .extension()
            .and_then(|extension| extension.to_str())
            .map(|extension| extension.eq_ignore_ascii_case(INPUT_EXTENSION))
            .unwrap_or(false);
        if !extension_matches {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        inputs_by_name.insert(stem.to_string(), path.to_path_buf());
    }

    Ok(inputs_by_name
        .into_iter()
        .map(|(name, path)| InputFile { name, path })
        .collect())
}
