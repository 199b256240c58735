//! Model artifact persistence.
//!
//! A fitted model serializes to a single JSON artifact carrying a schema
//! version and a blake3 content hash. Load verifies both before
//! reconstructing the model, so a truncated or edited artifact fails
//! loudly instead of producing a silently different model.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use cascade_core::config::defaults::ARTIFACT_SCHEMA_VERSION;
use cascade_core::errors::{CascadeResult, PersistError};
use cascade_core::graph::CausalDag;

use crate::function::NodeModel;
use crate::model::ScmModel;
use crate::stats::NodeStats;

/// Everything a model needs to answer queries after a reload.
#[derive(Debug, Serialize, Deserialize)]
struct ModelPayload {
    dag: CausalDag,
    stats: BTreeMap<String, NodeStats>,
    node_models: BTreeMap<String, NodeModel>,
    fitted: bool,
    model_id: Uuid,
    trained_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Artifact {
    schema_version: u32,
    /// blake3 of the canonical JSON serialization of `model`.
    content_hash: String,
    model: ModelPayload,
}

fn payload_hash(payload: &ModelPayload) -> Result<String, PersistError> {
    let canonical = serde_json::to_vec(payload)?;
    Ok(blake3::hash(&canonical).to_hex().to_string())
}

impl ScmModel {
    /// Write the model to `path` as a JSON artifact, creating parent
    /// directories as needed.
    pub fn save(&self, path: &Path) -> CascadeResult<()> {
        let payload = ModelPayload {
            dag: self.dag.clone(),
            stats: self.stats.clone(),
            node_models: self.node_models.clone(),
            fitted: self.fitted,
            model_id: self.model_id,
            trained_at: self.trained_at,
        };
        let artifact = Artifact {
            schema_version: ARTIFACT_SCHEMA_VERSION,
            content_hash: payload_hash(&payload)?,
            model: payload,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(PersistError::Io)?;
        }
        let json = serde_json::to_vec_pretty(&artifact).map_err(PersistError::Serialization)?;
        fs::write(path, json).map_err(PersistError::Io)?;

        info!(path = %path.display(), model_id = %self.model_id, "model saved");
        Ok(())
    }

    /// Load a model artifact, verifying schema version and content hash.
    pub fn load(path: &Path) -> CascadeResult<ScmModel> {
        let raw = fs::read_to_string(path).map_err(PersistError::Io)?;
        let artifact: Artifact =
            serde_json::from_str(&raw).map_err(PersistError::Serialization)?;

        if artifact.schema_version != ARTIFACT_SCHEMA_VERSION {
            return Err(PersistError::UnsupportedSchema {
                found: artifact.schema_version,
                supported: ARTIFACT_SCHEMA_VERSION,
            }
            .into());
        }

        let actual = payload_hash(&artifact.model)?;
        if actual != artifact.content_hash {
            return Err(PersistError::IntegrityMismatch {
                expected: artifact.content_hash,
                actual,
            }
            .into());
        }

        let ModelPayload {
            dag,
            stats,
            node_models,
            fitted,
            model_id,
            trained_at,
        } = artifact.model;

        info!(path = %path.display(), model_id = %model_id, "model loaded");
        Ok(ScmModel {
            dag,
            stats,
            node_models,
            fitted,
            model_id,
            trained_at,
        })
    }
}
