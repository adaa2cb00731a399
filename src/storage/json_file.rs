//! Stores the expense list as a JSON file on disk.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use super::{ExpenseStorage, LoadError, StorageError};

/// A slot backed by a single JSON file.
///
/// Writes go to a temporary file next to the slot which then replaces it, so
/// a failed write leaves the previous list intact.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
    capacity: Option<usize>,
}

impl JsonFileStorage {
    /// Create a slot stored at `path`. The file is created on the first save.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            capacity: None,
        }
    }

    /// Limit the file to `capacity` bytes.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// The path of the slot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temporary_path(&self) -> PathBuf {
        let mut path = self.path.clone().into_os_string();
        path.push(".tmp");
        PathBuf::from(path)
    }
}

impl ExpenseStorage for JsonFileStorage {
    fn read_slot(&self) -> Result<Option<String>, LoadError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(LoadError::Unreadable(format!(
                "{}: {error}",
                self.path.display()
            ))),
        }
    }

    fn write_slot(&mut self, contents: &str) -> Result<(), StorageError> {
        if let Some(capacity) = self.capacity {
            if contents.len() > capacity {
                return Err(StorageError::CapacityExceeded {
                    needed: contents.len(),
                    capacity,
                });
            }
        }

        let temporary_path = self.temporary_path();
        let written = fs::write(&temporary_path, contents)
            .and_then(|()| fs::rename(&temporary_path, &self.path));

        if let Err(error) = written {
            if let Err(remove_error) = fs::remove_file(&temporary_path) {
                if remove_error.kind() != ErrorKind::NotFound {
                    tracing::debug!(
                        "Could not remove {}: {remove_error}",
                        temporary_path.display()
                    );
                }
            }

            return Err(error.into());
        }

        tracing::debug!(
            "Wrote {} bytes to {}",
            contents.len(),
            self.path.display()
        );

        Ok(())
    }
}
