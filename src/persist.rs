//! Disk I/O helpers: path normalization, load from file, atomic write.
//!
//! The rename-over approach is close to atomic on most platforms. On NTFS
//! (Windows) it's reliable; on FAT32 or network shares there are no hard
//! guarantees. If that matters to you, keep backups or use a real database.

use crate::error::{Error, Result};
use crate::value::coerce;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Enforce the `.json` suffix and resolve relative paths against the current
/// working directory. If the cwd can't be read the path stays relative.
pub fn normalize_path(path: &Path) -> PathBuf {
    let has_suffix = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(".json"));
    let mut path = if has_suffix {
        path.to_path_buf()
    } else {
        let mut os = path.as_os_str().to_os_string();
        os.push(".json");
        PathBuf::from(os)
    };
    if path.is_relative() {
        if let Ok(cwd) = std::env::current_dir() {
            path = cwd.join(path);
        }
    }
    path
}

/// Create the parent directory chain and an empty backing file if absent.
/// An existing file is left untouched.
pub fn ensure_backing_file(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::Io(e.to_string()))?;
    }
    if !path.exists() {
        std::fs::File::create(path).map_err(|e| Error::Io(e.to_string()))?;
    }
    Ok(())
}

/// Read and parse the file at `path` into string entries.
///
/// A missing or empty file yields an empty map (not an error). Values of any
/// JSON type are accepted and coerced to strings; a top-level non-object or
/// malformed JSON is a `Deserialize` error the caller is expected to absorb.
pub fn load(path: &Path) -> Result<HashMap<String, String>> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
        Err(e) => return Err(Error::Io(e.to_string())),
    };
    if bytes.is_empty() {
        return Ok(HashMap::new());
    }
    let raw: HashMap<String, Value> = serde_json::from_slice(&bytes)?;
    Ok(raw.into_iter().map(|(k, v)| (k, coerce(&v))).collect())
}

/// Serialize entries to JSON bytes, optionally pretty-printed.
pub fn encode(entries: &HashMap<String, String>, pretty: bool) -> Result<Vec<u8>> {
    let bytes = if pretty {
        serde_json::to_vec_pretty(entries)
    } else {
        serde_json::to_vec(entries)
    };
    bytes.map_err(Error::from)
}

/// Write `bytes` to `<path>.tmp` and then rename over `path`. This avoids
/// leaving a half-written file if the process crashes mid-write.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
    let tmp = path.with_extension(format!("{ext}.tmp"));
    std::fs::write(&tmp, bytes).map_err(|e| Error::Io(e.to_string()))?;
    std::fs::rename(&tmp, path).map_err(|e| Error::Io(e.to_string()))?;
    Ok(())
}
