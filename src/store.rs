//! Flat-file persistence of cloned voice records.
//!
//! Deliberately primitive: the whole store is one JSON array in a single
//! file, reloaded at startup and rewritten on every append. Good enough
//! for a demo service; there is no database here.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::Result;

/// One registered clone: the upstream voice id plus the user-facing name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClonedVoiceRecord {
    pub voice_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

pub struct VoiceStore {
    path: PathBuf,
    records: Mutex<Vec<ClonedVoiceRecord>>,
}

impl VoiceStore {
    /// Open the store at `path`, loading any existing records. A missing
    /// file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let records = match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    /// Append a record and rewrite the backing file.
    pub async fn append(&self, record: ClonedVoiceRecord) -> Result<()> {
        let mut records = self.records.lock().await;
        records.push(record);
        let bytes = serde_json::to_vec_pretty(&*records)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }

    pub async fn list(&self) -> Vec<ClonedVoiceRecord> {
        self.records.lock().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(voice_id: &str, name: &str) -> ClonedVoiceRecord {
        ClonedVoiceRecord {
            voice_id: voice_id.to_string(),
            name: name.to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn missing_file_is_an_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = VoiceStore::open(dir.path().join("voices.json")).unwrap();
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn appended_records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("voices.json");

        let store = VoiceStore::open(&path).unwrap();
        store.append(record("vc_001", "alice")).await.unwrap();
        store.append(record("vc_002", "bob")).await.unwrap();
        assert_eq!(store.list().await.len(), 2);
        drop(store);

        let reopened = VoiceStore::open(&path).unwrap();
        let records = reopened.list().await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].voice_id, "vc_001");
        assert_eq!(records[1].name, "bob");
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error_not_a_panic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("voices.json");
        std::fs::write(&path, b"not json").unwrap();
        assert!(VoiceStore::open(&path).is_err());
    }
}
