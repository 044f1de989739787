//! Writing PNG output

use std::io::Write;
use std::path::Path;

use log::debug;
use tempfile::NamedTempFile;

use crate::{Error, Result, Viewport};

const PNG_SIGNATURE: &[u8; 8] = b"\x89PNG\r\n\x1a\n";

/// Write `bytes` to `path` atomically, replacing any existing file.
///
/// The data goes to a temporary file in the destination directory first and
/// is then renamed over `path`, so readers never observe a half-written PNG.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| Error::io(path, e))?;
    tmp.write_all(bytes).map_err(|e| Error::io(path, e))?;
    tmp.as_file().sync_all().map_err(|e| Error::io(path, e))?;
    tmp.persist(path).map_err(|e| Error::io(path, e.error))?;

    debug!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Read the pixel size out of a PNG's IHDR chunk
pub fn png_dimensions(bytes: &[u8]) -> Option<Viewport> {
    if bytes.len() < 24 || &bytes[0..8] != PNG_SIGNATURE || &bytes[12..16] != b"IHDR" {
        return None;
    }
    let width = u32::from_be_bytes(bytes[16..20].try_into().ok()?);
    let height = u32::from_be_bytes(bytes[20..24].try_into().ok()?);
    Some(Viewport::new(width, height))
}
