//! Bulk load of the bundled monster files into a read-only [MonsterStore].
//!
//! Every source file is read concurrently and joined all-or-nothing: one unreadable or
//! malformed file aborts the whole load, so no partial dataset is ever served.
//! Files are concatenated in manifest order, which is the tie-break order for stable sorts.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::future::try_join_all;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::monster::MonsterRecord;
use crate::normalize::experience_value;

pub const DEFAULT_DATA_DIR: &str = "data/monsters";
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// Load order used when the data directory has no manifest.
pub const DEFAULT_SOURCE_FILES: [&str; 8] = [
    "両生種、鳥竜種、獣竜種.json",
    "牙獣種、牙竜種.json",
    "甲殻種.json",
    "飛竜種、海竜種.json",
    "甲虫種、魚竜種、蛇竜種.json",
    "鋏角種、鳥竜種、不明.json",
    "古龍種.json",
    "小型モンスター.json",
];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid source file name '{0}'")]
    InvalidSource(String),
    #[error("manifest lists no source files")]
    NoSources,
}

/// Ordered list of source files plus provenance, read from `manifest.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceManifest {
    #[serde(default)]
    pub data_version: Option<String>,
    #[serde(default)]
    pub source_note: Option<String>,
    pub files: Vec<String>,
}

impl Default for SourceManifest {
    fn default() -> Self {
        SourceManifest {
            data_version: None,
            source_note: None,
            files: DEFAULT_SOURCE_FILES.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Combined record set, written once at load and shared read-only afterwards.
#[derive(Debug)]
pub struct MonsterStore {
    monsters: Vec<MonsterRecord>,
    manifest: SourceManifest,
    loaded_at: DateTime<Utc>,
}

impl MonsterStore {
    /// Build a store from records already in load order, attaching each record's `xp`.
    pub fn from_records(records: Vec<MonsterRecord>) -> Self {
        Self::with_manifest(records, SourceManifest::default())
    }

    pub fn with_manifest(mut records: Vec<MonsterRecord>, manifest: SourceManifest) -> Self {
        let mut seen = HashSet::new();
        for record in &mut records {
            record.xp = experience_value(record.challenge_rating.as_deref());
            if !seen.insert(record.name_jp.clone()) {
                tracing::warn!(
                    name_jp = %record.name_jp,
                    "duplicate monster key; lookups resolve to the first record"
                );
            }
        }
        MonsterStore {
            monsters: records,
            manifest,
            loaded_at: Utc::now(),
        }
    }

    pub fn monsters(&self) -> &[MonsterRecord] {
        &self.monsters
    }

    /// Exact `name_jp` lookup; the first record in load order wins.
    pub fn find(&self, name_jp: &str) -> Option<&MonsterRecord> {
        self.monsters.iter().find(|m| m.name_jp == name_jp)
    }

    pub fn len(&self) -> usize {
        self.monsters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monsters.is_empty()
    }

    pub fn manifest(&self) -> &SourceManifest {
        &self.manifest
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

/// Read `manifest.json` from the data directory, falling back to [DEFAULT_SOURCE_FILES].
pub async fn load_manifest(data_dir: &Path) -> Result<SourceManifest, LoadError> {
    let path = data_dir.join(MANIFEST_FILE_NAME);
    let raw = match tokio::fs::read_to_string(&path).await {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no manifest, using default source list");
            return Ok(SourceManifest::default());
        }
        Err(source) => return Err(LoadError::Read { path, source }),
    };
    serde_json::from_str(&raw).map_err(|source| LoadError::Parse { path, source })
}

async fn load_source_file(path: PathBuf) -> Result<Vec<MonsterRecord>, LoadError> {
    let raw = tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| LoadError::Read {
            path: path.clone(),
            source,
        })?;
    let records: Vec<MonsterRecord> =
        serde_json::from_str(&raw).map_err(|source| LoadError::Parse {
            path: path.clone(),
            source,
        })?;
    tracing::debug!(path = %path.display(), records = records.len(), "loaded source file");
    Ok(records)
}

fn source_path(data_dir: &Path, file: &str) -> Result<PathBuf, LoadError> {
    let name = Path::new(file);
    let plain = name.components().count() == 1
        && name.file_name().is_some()
        && !file.contains("..");
    if plain {
        Ok(data_dir.join(name))
    } else {
        Err(LoadError::InvalidSource(file.to_string()))
    }
}

/// Load the manifest's files concurrently and combine them in manifest order.
pub async fn load_store(data_dir: &Path) -> Result<Arc<MonsterStore>, LoadError> {
    let manifest = load_manifest(data_dir).await?;
    if manifest.files.is_empty() {
        return Err(LoadError::NoSources);
    }

    let paths = manifest
        .files
        .iter()
        .map(|file| source_path(data_dir, file))
        .collect::<Result<Vec<_>, _>>()?;

    let batches = try_join_all(paths.into_iter().map(load_source_file)).await?;
    let records: Vec<MonsterRecord> = batches.into_iter().flatten().collect();

    let store = MonsterStore::with_manifest(records, manifest);
    tracing::info!(
        monsters = store.len(),
        files = store.manifest().files.len(),
        data_dir = %data_dir.display(),
        "monster data loaded"
    );
    Ok(Arc::new(store))
}
