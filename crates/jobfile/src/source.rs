// SPDX-License-Identifier: MIT

//! Read a job file and compute its content hash.

use std::path::Path;

use sha2::{Digest, Sha256};

/// 16-byte content digest, used to detect whether a job file changed on
/// disk. Truncates a SHA-256 digest rather than using a 16-byte hash
/// function directly — collision resistance at this size only needs to
/// distinguish "changed vs unchanged", not resist adversarial tampering.
pub fn content_hash(bytes: &[u8]) -> [u8; 16] {
    let full = Sha256::digest(bytes);
    let mut out = [0u8; 16];
    out.copy_from_slice(&full[..16]);
    out
}

pub struct Source {
    pub bytes: Vec<u8>,
    pub hash: [u8; 16],
}

pub fn read(path: &Path) -> std::io::Result<Source> {
    let bytes = std::fs::read(path)?;
    let hash = content_hash(&bytes);
    Ok(Source { bytes, hash })
}

/// Hash a file without holding its content in memory longer than needed
/// — used by the Reconciler's scan pass, which only needs the digest to
/// detect change.
pub fn hash_file(path: &Path) -> std::io::Result<[u8; 16]> {
    let bytes = std::fs::read(path)?;
    Ok(content_hash(&bytes))
}

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;
