//! Output path helpers

use std::fs;
use std::path::{Path, PathBuf};

use crate::coordinate::CoordinateSystem;
use crate::io::GeometryFormat;

/// Derive an output path next to the input file
///
/// The file is named `<stem>_<FROM>_to_<TO>.<ext>`, e.g. `roads.wkt`
/// converted from WGS84 to GCJ02 becomes `roads_WGS84_to_GCJ02.wkt`.
///
/// # Arguments
/// * `input` - Input file path
/// * `source` - Source coordinate system
/// * `destination` - Destination coordinate system
/// * `format` - Output format, which decides the extension
pub fn derive_output_path(
    input: &str,
    source: &CoordinateSystem,
    destination: &CoordinateSystem,
    format: GeometryFormat,
) -> String {
    let path = Path::new(input);
    let stem = path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());

    let file_name = format!("{}_{}_to_{}.{}", stem, source.name(), destination.name(), format.extension());

    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(file_name).to_string_lossy().to_string(),
        _ => file_name,
    }
}

/// Check whether two paths name the same file
///
/// Paths are compared after resolving `.`/`..` components and symlinks. The
/// second path may name a file that does not exist yet, in which case its
/// parent directory is resolved instead.
pub fn is_same_file(first: &str, second: &str) -> bool {
    match (resolve(first), resolve(second)) {
        (Some(a), Some(b)) => a == b,
        _ => Path::new(first) == Path::new(second),
    }
}

fn resolve(path: &str) -> Option<PathBuf> {
    let path = Path::new(path);
    if let Ok(full) = fs::canonicalize(path) {
        return Some(full);
    }

    let name = path.file_name()?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::canonicalize(parent).ok().map(|dir| dir.join(name))
}
