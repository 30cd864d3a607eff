//! Persistent hit counter.
//!
//! The counter file holds exactly one little-endian `i64` and nothing else:
//! no header, no checksum. A missing file means "no prior count".

use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::CounterError;

/// Width of the on-disk encoding.
pub const ENCODED_LEN: usize = 8;

pub fn encode_i64_le(value: i64) -> [u8; ENCODED_LEN] {
    value.to_le_bytes()
}

/// Decode a counter value; `bytes` must be exactly [`ENCODED_LEN`] long.
pub fn decode_i64_le(bytes: &[u8]) -> Option<i64> {
    let raw: [u8; ENCODED_LEN] = bytes.try_into().ok()?;
    Some(i64::from_le_bytes(raw))
}

/// A configured counter file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterStore {
    path: PathBuf,
}

impl CounterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `None` for an empty path, which disables accumulation.
    pub fn configured(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            None
        } else {
            Some(Self::new(path))
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted count. `Ok(None)` when the file does not exist.
    pub fn load(&self) -> Result<Option<i64>, CounterError> {
        let content = match fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(CounterError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        decode_i64_le(&content)
            .map(Some)
            .ok_or_else(|| CounterError::Length {
                path: self.path.clone(),
                len: content.len(),
            })
    }

    /// Overwrite the file with `value`.
    ///
    /// The new bytes go to a temp file in the same directory which is then
    /// renamed over the counter, so a failed write leaves the old total in place.
    pub fn save(&self, value: i64) -> Result<(), CounterError> {
        self.replace_with(|file| file.write_all(&encode_i64_le(value)))
    }

    fn replace_with<F>(&self, write: F) -> Result<(), CounterError>
    where
        F: FnOnce(&mut fs::File) -> io::Result<()>,
    {
        let write_err = |source| CounterError::Write {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        write(tmp.as_file_mut()).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file()
                .set_permissions(fs::Permissions::from_mode(0o644))
                .map_err(write_err)?;
        }

        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;
        Ok(())
    }

    /// Remove the file. Removing a file that is already gone succeeds.
    pub fn delete(&self) -> Result<(), CounterError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(CounterError::Delete {
                path: self.path.clone(),
                source,
            }),
        }
    }
}
