//! Remote path rules.
//!
//! Remote paths are `/`-separated. Two spellings of the top level exist and
//! are not interchangeable:
//! - `/` is the picker that represents the root itself (one synthetic row)
//! - `""` is the listing of the root's children
//!
//! Mapping remote paths onto a local directory must keep the result under
//! the caller-provided base, so `..` and `.` segments are rejected.

use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

pub const ROOT: &str = "/";

/// Path of the picker shown after drilling into `name` from `current`.
pub fn child_path(current: &str, name: &str) -> String {
    if current == ROOT {
        String::new()
    } else if current.is_empty() {
        format!("/{}", name)
    } else {
        format!("{}/{}", current, name)
    }
}

/// Upload destination for `file_name` inside `selected_dir`, as seen from `current`.
///
/// At `/` the only selectable row is the root itself, so the file lands at the top level.
pub fn export_path(current: &str, selected_dir: &str, file_name: &str) -> String {
    if current == ROOT {
        format!("/{}", file_name)
    } else if current.is_empty() {
        format!("/{}/{}", selected_dir, file_name)
    } else {
        format!("{}/{}/{}", current, selected_dir, file_name)
    }
}

/// Remote path for a new entry `name` created inside `dir`.
pub fn create_path(dir: &str, name: &str) -> String {
    let dir = if dir == ROOT { "" } else { dir };
    format!("{}/{}", dir, name)
}

/// Canonical form used by storage backends: `""` for the root, `/a/b` otherwise.
pub fn normalize(path: &str) -> Result<String> {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    if !trimmed.starts_with('/') {
        return Err(AppError::InvalidPath(format!("{} is not /-rooted", path)));
    }
    for segment in trimmed[1..].split('/') {
        if segment.is_empty() || segment == "." || segment == ".." {
            return Err(AppError::InvalidPath(path.to_string()));
        }
    }
    Ok(trimmed.to_string())
}

/// Parent of a normalized path; the root has none.
pub fn parent(normalized: &str) -> Option<&str> {
    if normalized.is_empty() {
        return None;
    }
    normalized.rfind('/').map(|idx| &normalized[..idx])
}

/// Last segment of a normalized path.
pub fn file_name(normalized: &str) -> &str {
    normalized.rsplit('/').next().unwrap_or("")
}

/// Checks a single entry name typed by the user or reported by a listing.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains('/') || name.contains('\0')
    {
        return Err(AppError::InvalidPath(format!("invalid entry name {:?}", name)));
    }
    Ok(())
}

/// Maps a remote path onto `base`, guaranteeing the result stays under it.
pub fn local_path(base: &Path, remote: &str) -> Result<PathBuf> {
    let normalized = normalize(remote)?;
    let mut out = base.to_path_buf();
    for segment in normalized.split('/').filter(|s| !s.is_empty()) {
        out.push(segment);
    }
    Ok(out)
}
