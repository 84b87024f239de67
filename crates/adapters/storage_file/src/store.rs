//! Directory-backed [`StateStore`] implementation.
//!
//! Every key lives in its own file named after the hex SHA-256 digest of the
//! key, holding `{"key": "<key>", "value": <json>}`. The stored key guards
//! against digest collisions. Values are read back with loose
//! truthiness: `false`, `null`, `0` and `""` are off, anything else is on.

use std::fmt::Write as _;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use dummysensor_app::ports::StateStore;
use dummysensor_domain::error::DummySensorError;

use crate::error::FileStoreError;

/// Configuration for the file storage adapter.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding one file per key. Created if missing.
    pub dir: PathBuf,
    /// Treat records that fail to parse as absent instead of failing.
    pub forgive_parse_errors: bool,
}

impl Config {
    /// Build a [`FileStateStore`] from this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FileStoreError::Io`] if the directory cannot be created.
    pub fn build(self) -> Result<FileStateStore, FileStoreError> {
        FileStateStore::initialize(self)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Record {
    key: String,
    value: serde_json::Value,
}

/// Durable key-value store backed by a directory.
#[derive(Debug)]
pub struct FileStateStore {
    dir: PathBuf,
    forgive_parse_errors: bool,
    write_lock: Mutex<()>,
}

impl FileStateStore {
    fn initialize(config: Config) -> Result<Self, FileStoreError> {
        std::fs::create_dir_all(&config.dir).map_err(|source| FileStoreError::Io {
            path: config.dir.clone(),
            source,
        })?;
        tracing::debug!(dir = %config.dir.display(), "file store ready");
        Ok(Self {
            dir: config.dir,
            forgive_parse_errors: config.forgive_parse_errors,
            write_lock: Mutex::new(()),
        })
    }

    /// Directory the records live in.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        let mut name = String::with_capacity(64);
        for byte in digest {
            let _ = write!(name, "{byte:02x}");
        }
        self.dir.join(name)
    }

    fn read_record(&self, key: &str) -> Result<Option<serde_json::Value>, FileStoreError> {
        let path = self.path_for(key);
        let content = match std::fs::read(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(FileStoreError::Io { path, source }),
        };

        match serde_json::from_slice::<Record>(&content) {
            Ok(record) if record.key == key => Ok(Some(record.value)),
            Ok(record) => {
                tracing::warn!(
                    path = %path.display(),
                    stored_key = %record.key,
                    key,
                    "record key mismatch, ignoring"
                );
                Ok(None)
            }
            Err(err) if self.forgive_parse_errors => {
                tracing::warn!(path = %path.display(), error = %err, "ignoring corrupted record");
                Ok(None)
            }
            Err(source) => Err(FileStoreError::Corrupted { path, source }),
        }
    }

    fn write_record(&self, key: &str, value: serde_json::Value) -> Result<(), FileStoreError> {
        let record = Record {
            key: key.to_string(),
            value,
        };
        let bytes = serde_json::to_vec(&record).map_err(FileStoreError::Encode)?;

        let path = self.path_for(key);
        let tmp = path.with_extension("tmp");

        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut file = std::fs::File::create(&tmp).map_err(io_err(&tmp))?;
        file.write_all(&bytes).map_err(io_err(&tmp))?;
        file.sync_all().map_err(io_err(&tmp))?;
        drop(file);
        std::fs::rename(&tmp, &path).map_err(io_err(&path))?;
        Ok(())
    }
}

impl StateStore for FileStateStore {
    fn get_bool(&self, key: &str) -> Result<Option<bool>, DummySensorError> {
        Ok(self.read_record(key)?.map(|value| truthy(&value)))
    }

    fn set_bool(&self, key: &str, value: bool) -> Result<(), DummySensorError> {
        self.write_record(key, serde_json::Value::Bool(value))?;
        tracing::trace!(key, value, "record written");
        Ok(())
    }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> FileStoreError {
    let path = path.to_path_buf();
    move |source| FileStoreError::Io { path, source }
}

fn truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}
