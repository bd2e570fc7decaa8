use crate::domain::model::{AuditNote, CarrierRow, ProjectField, ProjectRecord};
use crate::domain::ports::RecordStore;
use crate::utils::error::{Result, ShipsGoError};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default)]
    projects: BTreeMap<String, ProjectRecord>,
    #[serde(default)]
    notes: Vec<AuditNote>,
    #[serde(default)]
    carriers: Vec<CarrierRow>,
}

/// JSON-file backed record store used by the CLI.
///
/// Every operation reads the file, applies one change and writes it back.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn notes_for(&self, record_id: &str) -> Result<Vec<AuditNote>> {
        let snapshot = self.load().await?;
        Ok(snapshot
            .notes
            .into_iter()
            .filter(|n| n.record_id == record_id)
            .collect())
    }

    async fn load(&self) -> Result<Snapshot> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(Snapshot::default()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Snapshot::default()),
            Err(e) => Err(ShipsGoError::IoError(e)),
        }
    }

    async fn persist(&self, snapshot: &Snapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let data = serde_json::to_vec_pretty(snapshot)?;
        tokio::fs::write(&self.path, data).await?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for FileStore {
    async fn get_project(&self, record_id: &str) -> Result<Option<ProjectRecord>> {
        Ok(self.load().await?.projects.remove(record_id))
    }

    async fn save_project(&self, record: ProjectRecord) -> Result<()> {
        let mut snapshot = self.load().await?;
        snapshot.projects.insert(record.name.clone(), record);
        self.persist(&snapshot).await
    }

    async fn set_project_field(&self, record_id: &str, field: ProjectField) -> Result<()> {
        let mut snapshot = self.load().await?;
        let record = snapshot
            .projects
            .get_mut(record_id)
            .ok_or_else(|| ShipsGoError::RecordNotFoundError {
                record_id: record_id.to_string(),
            })?;
        field.apply(record);
        self.persist(&snapshot).await
    }

    async fn add_note(&self, record_id: &str, text: &str) -> Result<()> {
        let mut snapshot = self.load().await?;
        snapshot.notes.push(AuditNote {
            record_id: record_id.to_string(),
            text: text.to_string(),
            created_at: Utc::now(),
        });
        self.persist(&snapshot).await
    }

    async fn carrier_exists(&self, scac_code: &str) -> Result<bool> {
        let snapshot = self.load().await?;
        Ok(snapshot.carriers.iter().any(|c| c.scac_code == scac_code))
    }

    async fn insert_carrier(&self, row: CarrierRow) -> Result<()> {
        let mut snapshot = self.load().await?;
        if snapshot.carriers.iter().any(|c| c.scac_code == row.scac_code) {
            return Err(ShipsGoError::StoreError {
                message: format!("carrier {} already exists", row.scac_code),
            });
        }
        snapshot.carriers.push(row);
        self.persist(&snapshot).await
    }

    async fn list_carriers(&self) -> Result<Vec<CarrierRow>> {
        Ok(self.load().await?.carriers)
    }
}
