use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("I/O error on `{path}`: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON in `{path}`: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to encode `{path}`: {source}")]
    Encode {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to convert entry `{key}`: {source}")]
    Conversion {
        key: String,
        source: serde_json::Error,
    },

    #[error("entry `{0}` is not a list")]
    NotAList(String),
}

/// A key-value store kept in memory and persisted as a single JSON object.
///
/// Every write rewrites the whole file while holding the lock, so writers are
/// serialized and readers never observe a half-applied update.
pub struct JsonDatabase {
    path: PathBuf,
    entries: Mutex<Map<String, Value>>,
}

impl JsonDatabase {
    /// Loads `path` if it exists, otherwise starts empty. Parent directories are created.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| DatabaseError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        let entries = match fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Map::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| DatabaseError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => Map::new(),
            Err(source) => return Err(DatabaseError::Io { path, source }),
        };

        log::debug!("Opened database {} with {} entries", path.display(), entries.len());

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, DatabaseError> {
        let entries = self.entries.lock().await;
        entries
            .get(key)
            .map(|value| {
                <T as Deserialize>::deserialize(value).map_err(|source| DatabaseError::Conversion {
                    key: key.to_string(),
                    source,
                })
            })
            .transpose()
    }

    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), DatabaseError> {
        let value = serde_json::to_value(value).map_err(|source| DatabaseError::Conversion {
            key: key.to_string(),
            source,
        })?;

        let mut entries = self.entries.lock().await;
        let mut updated = entries.clone();
        updated.insert(key.to_string(), value);
        self.persist(&updated).await?;
        *entries = updated;
        Ok(())
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.entries.lock().await.contains_key(key)
    }

    /// Appends `item` to the list stored under `key`, creating the list if needed.
    pub async fn push<T: Serialize>(&self, key: &str, item: &T) -> Result<(), DatabaseError> {
        self.push_with(key, || item).await.map(|_| ())
    }

    /// Like [`push`](Self::push), but builds the item while the lock is held so
    /// values derived from the clock or other shared state follow commit order.
    ///
    /// Nothing becomes visible unless the file was written successfully.
    pub async fn push_with<T, F>(&self, key: &str, make: F) -> Result<T, DatabaseError>
    where
        T: Serialize,
        F: FnOnce() -> T,
    {
        let mut entries = self.entries.lock().await;
        let item = make();
        let value = serde_json::to_value(&item).map_err(|source| DatabaseError::Conversion {
            key: key.to_string(),
            source,
        })?;

        let mut updated = entries.clone();
        match updated
            .entry(key.to_string())
            .or_insert_with(|| Value::Array(Vec::new()))
        {
            Value::Array(items) => items.push(value),
            _ => return Err(DatabaseError::NotAList(key.to_string())),
        }
        self.persist(&updated).await?;
        *entries = updated;
        Ok(item)
    }

    /// Flushes the current state to disk.
    pub async fn close(&self) -> Result<(), DatabaseError> {
        let entries = self.entries.lock().await;
        self.persist(&entries).await?;
        log::debug!("Closed database {}", self.path.display());
        Ok(())
    }

    async fn persist(&self, entries: &Map<String, Value>) -> Result<(), DatabaseError> {
        let bytes = serde_json::to_vec_pretty(entries).map_err(|source| DatabaseError::Encode {
            path: self.path.clone(),
            source,
        })?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, bytes)
            .await
            .map_err(|source| DatabaseError::Io {
                path: tmp.clone(),
                source,
            })?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|source| DatabaseError::Io {
                path: self.path.clone(),
                source,
            })
    }
}
