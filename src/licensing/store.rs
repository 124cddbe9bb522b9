use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::domain::{
    ApplicationId, ApplicationRecord, ApplicationSnapshot, ApplicationStatus, license_fee,
};

const ID_PREFIX: &str = "DL";
const ID_SUFFIX_LEN: usize = 9;
const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Failure of the underlying persistence area. Every variant is retryable
/// from the applicant's point of view; callers keep their in-memory state.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record store unavailable: {0}")]
    Unavailable(String),
}

/// Injected persistence capability for application records. Single-writer:
/// the only concurrency discipline is uniqueness on create and
/// overwrite-in-place on upsert.
pub trait RecordStore: Send + Sync {
    /// Assign a fresh identifier, stamp `Pending` status and the submission
    /// time, write the record, and append its id to the index.
    fn create(&self, snapshot: ApplicationSnapshot) -> Result<ApplicationRecord, StoreError>;

    /// Replace the stored record in place when the id exists; insert under
    /// the supplied id otherwise. The index never gains a duplicate id.
    fn upsert(&self, record: ApplicationRecord) -> Result<(), StoreError>;

    fn get(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, StoreError>;

    /// The all-records index in append order.
    fn list_ids(&self) -> Result<Vec<ApplicationId>, StoreError>;
}

/// Issue a fresh identifier: prefix, millisecond timestamp, and a nine
/// character uppercase base36 suffix drawn from UUID randomness.
pub fn new_application_id() -> ApplicationId {
    let millis = Utc::now().timestamp_millis();
    let mut entropy = Uuid::new_v4().as_u128();
    let mut suffix = String::with_capacity(ID_SUFFIX_LEN);
    for _ in 0..ID_SUFFIX_LEN {
        suffix.push(BASE36[(entropy % 36) as usize] as char);
        entropy /= 36;
    }
    ApplicationId(format!("{ID_PREFIX}-{millis}-{suffix}"))
}

fn build_record(snapshot: ApplicationSnapshot) -> ApplicationRecord {
    let fee = license_fee(snapshot.dog.as_ref().map(|dog| dog.spayed_neutered));
    ApplicationRecord {
        id: new_application_id(),
        owner: snapshot.owner,
        dog: snapshot.dog,
        vaccination: snapshot.vaccination,
        status: ApplicationStatus::Pending,
        submitted_at: Utc::now(),
        fee,
    }
}

// The fee is derived state; recompute it on every write so a stored record
// can never disagree with its dog's spay/neuter status.
fn normalize_fee(record: &mut ApplicationRecord) {
    record.fee = license_fee(record.dog.as_ref().map(|dog| dog.spayed_neutered));
}

/// Mutex-guarded in-memory store used by tests and the demo command.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    records: BTreeMap<String, ApplicationRecord>,
    index: Vec<ApplicationId>,
}

impl MemoryStore {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryInner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Unavailable("store mutex poisoned".to_string()))
    }
}

impl RecordStore for MemoryStore {
    fn create(&self, snapshot: ApplicationSnapshot) -> Result<ApplicationRecord, StoreError> {
        let record = build_record(snapshot);
        let mut inner = self.lock()?;
        inner
            .records
            .insert(record.id.0.clone(), record.clone());
        inner.index.push(record.id.clone());
        info!(id = %record.id.0, "application record created");
        Ok(record)
    }

    fn upsert(&self, mut record: ApplicationRecord) -> Result<(), StoreError> {
        normalize_fee(&mut record);
        let mut inner = self.lock()?;
        if !inner.records.contains_key(&record.id.0) {
            inner.index.push(record.id.clone());
        }
        inner.records.insert(record.id.0.clone(), record);
        Ok(())
    }

    fn get(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, StoreError> {
        Ok(self.lock()?.records.get(&id.0).cloned())
    }

    fn list_ids(&self) -> Result<Vec<ApplicationId>, StoreError> {
        Ok(self.lock()?.index.clone())
    }
}

/// On-disk layout of the durable store: the records map plus the append-only
/// index, together in one JSON document.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    records: BTreeMap<String, ApplicationRecord>,
    index: Vec<String>,
}

/// Durable store backed by a single JSON document, the process-local
/// equivalent of the browser's keyed storage area. Reads load the whole
/// document; writes replace it atomically via a temp file and rename, so a
/// write observably completes before any later read.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Result<StoreDocument, StoreError> {
        match fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|err| StoreError::Unavailable(format!("store file unreadable: {err}"))),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(StoreDocument::default()),
            Err(err) => Err(StoreError::Unavailable(err.to_string())),
        }
    }

    fn persist(&self, document: &StoreDocument) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| StoreError::Unavailable(err.to_string()))?;
            }
        }

        let bytes = serde_json::to_vec_pretty(document)
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, bytes).map_err(|err| StoreError::Unavailable(err.to_string()))?;
        fs::rename(&staging, &self.path).map_err(|err| StoreError::Unavailable(err.to_string()))
    }
}

impl RecordStore for JsonFileStore {
    fn create(&self, snapshot: ApplicationSnapshot) -> Result<ApplicationRecord, StoreError> {
        let record = build_record(snapshot);
        let mut document = self.load()?;
        document
            .records
            .insert(record.id.0.clone(), record.clone());
        document.index.push(record.id.0.clone());
        self.persist(&document)?;
        info!(id = %record.id.0, path = %self.path.display(), "application record created");
        Ok(record)
    }

    fn upsert(&self, mut record: ApplicationRecord) -> Result<(), StoreError> {
        normalize_fee(&mut record);
        let mut document = self.load()?;
        if !document.records.contains_key(&record.id.0) {
            document.index.push(record.id.0.clone());
        }
        document.records.insert(record.id.0.clone(), record);
        self.persist(&document)
    }

    fn get(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, StoreError> {
        Ok(self.load()?.records.get(&id.0).cloned())
    }

    fn list_ids(&self) -> Result<Vec<ApplicationId>, StoreError> {
        Ok(self
            .load()?
            .index
            .into_iter()
            .map(ApplicationId)
            .collect())
    }
}
