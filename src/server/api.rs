use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::monster::MonsterRecord;
use crate::encounter::{Encounter, Party, MAX_PARTY_LEVEL, MAX_PARTY_SIZE, MIN_PARTY_LEVEL};
use crate::export::{to_external_document, ExportError};
use crate::filter::{apply, facets, FilterState};
use crate::normalize::{armor_class, extract_species};
use crate::render::{render, RenderError, RenderOptions};
use crate::server::AppState;
use crate::session::{filter_from_query, monster_query};

#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    pub field: &'static str,
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationErrorResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub errors: Vec<ValidationIssue>,
}

pub fn health_payload(state: &AppState) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "service": "compendium",
        "version": env!("CARGO_PKG_VERSION"),
        "monsters": state.store.len(),
    }))
}

#[derive(Debug, Clone, Serialize)]
pub struct DataVersionResponse {
    pub data_version: Option<String>,
    pub source_note: Option<String>,
    pub files: Vec<String>,
    pub monsters: usize,
    pub loaded_at: String,
}

pub fn data_version_payload(state: &AppState) -> Result<String, serde_json::Error> {
    let manifest = state.store.manifest();
    serde_json::to_string_pretty(&DataVersionResponse {
        data_version: manifest.data_version.clone(),
        source_note: manifest.source_note.clone(),
        files: manifest.files.clone(),
        monsters: state.store.len(),
        loaded_at: state.store.loaded_at().to_rfc3339(),
    })
}

pub fn facets_payload(state: &AppState) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&facets(state.store.monsters()))
}

#[derive(Debug, Clone, Serialize)]
pub struct MonsterListItem {
    pub name_jp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub challenge_rating: Option<String>,
    pub xp: u32,
    pub armor_class: i32,
    pub link: String,
}

pub fn list_items<'a, I>(monsters: I) -> Vec<MonsterListItem>
where
    I: IntoIterator<Item = &'a MonsterRecord>,
{
    monsters
        .into_iter()
        .map(|m| MonsterListItem {
            name_jp: m.name_jp.clone(),
            name_en: m.name_en.clone(),
            species: extract_species(m.size_type_alignment.as_deref()),
            challenge_rating: m.challenge_rating.clone(),
            xp: m.xp,
            armor_class: armor_class(m.armor_class.as_ref()).value,
            link: monster_query(&m.name_jp),
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct MonsterListResponse {
    pub filter: FilterState,
    pub count: usize,
    pub monsters: Vec<MonsterListItem>,
}

/// Filtered list for `?q=&species=&cr=&sort=`.
pub fn monsters_payload(state: &AppState, query: &str) -> Result<String, serde_json::Error> {
    let filter = filter_from_query(query);
    let monsters = list_items(apply(state.store.monsters(), &filter));
    serde_json::to_string_pretty(&MonsterListResponse {
        count: monsters.len(),
        filter,
        monsters,
    })
}

#[derive(Debug, Error)]
pub enum MonsterPayloadError {
    #[error("monster not found: {0}")]
    NotFound(String),
    #[error("stat block could not be rendered: {0}")]
    Render(#[from] RenderError),
    #[error("export could not be generated: {0}")]
    Export(#[from] ExportError),
    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}

pub fn stat_block_payload(state: &AppState, name_jp: &str) -> Result<String, MonsterPayloadError> {
    let monster = state
        .store
        .find(name_jp)
        .ok_or_else(|| MonsterPayloadError::NotFound(name_jp.to_string()))?;
    let block = render(monster, RenderOptions { single_view: true })?;
    Ok(serde_json::to_string_pretty(&block)?)
}

/// Clipboard document for the virtual tabletop.
pub fn export_payload(state: &AppState, name_jp: &str) -> Result<String, MonsterPayloadError> {
    let monster = state
        .store
        .find(name_jp)
        .ok_or_else(|| MonsterPayloadError::NotFound(name_jp.to_string()))?;
    let document = to_external_document(monster, &state.export).map_err(|err| {
        tracing::warn!(error = %err, "export failed");
        err
    })?;
    Ok(serde_json::to_string_pretty(&document)?)
}

#[derive(Debug, Clone, Deserialize)]
pub struct EncounterRequest {
    #[serde(default)]
    pub entries: Vec<String>,
    pub party_size: Option<u32>,
    pub party_level: Option<u32>,
}

#[derive(Debug)]
pub enum EncounterPayloadError {
    Parse(serde_json::Error),
    Validation(ValidationErrorResponse),
}

pub fn encounter_payload(state: &AppState, body: &str) -> Result<String, EncounterPayloadError> {
    let request: EncounterRequest =
        serde_json::from_str(body).map_err(EncounterPayloadError::Parse)?;
    let defaults = Party::default();
    let party = Party {
        size: request.party_size.unwrap_or(defaults.size),
        level: request.party_level.unwrap_or(defaults.level),
    };
    validate_encounter(state, &request, party)?;

    let encounter = Encounter::from_entries(request.entries);
    let summary = encounter.summary(&state.store, party);
    serde_json::to_string_pretty(&summary).map_err(EncounterPayloadError::Parse)
}

fn validate_encounter(
    state: &AppState,
    request: &EncounterRequest,
    party: Party,
) -> Result<(), EncounterPayloadError> {
    let mut errors: Vec<ValidationIssue> = Vec::new();

    if !(1..=MAX_PARTY_SIZE).contains(&party.size) {
        errors.push(ValidationIssue {
            field: "party_size",
            messages: vec![format!("must be between 1 and {MAX_PARTY_SIZE}")],
        });
    }

    if !(MIN_PARTY_LEVEL..=MAX_PARTY_LEVEL).contains(&party.level) {
        errors.push(ValidationIssue {
            field: "party_level",
            messages: vec![format!(
                "must be between {MIN_PARTY_LEVEL} and {MAX_PARTY_LEVEL}"
            )],
        });
    }

    let unknown: Vec<String> = request
        .entries
        .iter()
        .filter(|name| state.store.find(name).is_none())
        .map(|name| format!("unknown monster '{name}'"))
        .collect();
    if !unknown.is_empty() {
        errors.push(ValidationIssue {
            field: "entries",
            messages: unknown,
        });
    }

    if errors.is_empty() {
        return Ok(());
    }

    Err(EncounterPayloadError::Validation(ValidationErrorResponse {
        status: "error",
        message: "Validation failed",
        errors,
    }))
}
