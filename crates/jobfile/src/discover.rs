// SPDX-License-Identifier: MIT

//! Recursive directory walk for `.job` files.

use std::path::{Path, PathBuf};

/// Recursively walk `dir`, returning every file whose name ends in
/// `.job`. Unreadable subdirectories are skipped rather than failing the
/// whole scan, matching the Reconciler's "full rescan is simpler" stance.
pub fn discover_job_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    walk(dir, &mut out)?;
    out.sort();
    Ok(out)
}

fn walk(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(_) => return Ok(()),
    };
    for entry in entries {
        let Ok(entry) = entry else { continue };
        let path = entry.path();
        if path.is_dir() {
            walk(&path, out)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some("job") {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "discover_tests.rs"]
mod tests;
