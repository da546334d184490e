use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use log::info;
use thiserror::Error;

use super::models::Snapshot;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Snapshot I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Snapshot JSON error at {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Persistence for snapshot records.
pub trait SnapshotStore {
    type Location;

    fn persist(&self, snapshot: &Snapshot) -> Result<Self::Location, StoreError>;

    fn retrieve(&self, location: &Self::Location) -> Result<Snapshot, StoreError>;
}

/// Stores each snapshot as a pretty-printed JSON file named
/// `holders_<chain>_<contract prefix>_<YYYYmmdd_HHMMSS>.json` under `dir`.
///
/// Existing files are never overwritten: a name already taken within the
/// same second gets a `_1`, `_2`, ... suffix.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_stem(snapshot: &Snapshot) -> String {
        let contract: String = snapshot
            .contract
            .trim_start_matches("0x")
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .take(CONTRACT_PREFIX_LEN)
            .collect::<String>()
            .to_lowercase();

        format!(
            "holders_{}_{}_{}",
            snapshot.blockchain,
            contract,
            Local::now().format("%Y%m%d_%H%M%S")
        )
    }

    /// Create a fresh file for `stem`, stepping the suffix on collisions.
    fn create_unique(&self, stem: &str) -> Result<(PathBuf, File), StoreError> {
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let name = match attempt {
                0 => format!("{}.json", stem),
                n => format!("{}_{}.json", stem, n),
            };
            let path = self.dir.join(name);

            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(io_error(&path)(e)),
            }
        }

        let path = self.dir.join(format!("{}.json", stem));
        Err(io_error(&path)(std::io::Error::new(
            ErrorKind::AlreadyExists,
            "no free snapshot file name",
        )))
    }
}

const CONTRACT_PREFIX_LEN: usize = 8;
const MAX_NAME_ATTEMPTS: usize = 1000;

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError {
    let path = path.to_path_buf();
    move |source| StoreError::Io { path, source }
}

impl SnapshotStore for JsonFileStore {
    type Location = PathBuf;

    fn persist(&self, snapshot: &Snapshot) -> Result<PathBuf, StoreError> {
        fs::create_dir_all(&self.dir).map_err(io_error(&self.dir))?;

        let (path, file) = self.create_unique(&Self::file_stem(snapshot))?;
        let mut writer = BufWriter::new(file);

        serde_json::to_writer_pretty(&mut writer, snapshot).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        writer.flush().map_err(io_error(&path))?;

        info!("Snapshot saved: {}", path.display());
        Ok(path)
    }

    fn retrieve(&self, location: &PathBuf) -> Result<Snapshot, StoreError> {
        let file = File::open(location).map_err(|source| StoreError::Io {
            path: location.clone(),
            source,
        })?;

        serde_json::from_reader(BufReader::new(file)).map_err(|source| StoreError::Json {
            path: location.clone(),
            source,
        })
    }
}
