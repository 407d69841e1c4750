//! List filtering, sorting and facet population.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::data::monster::MonsterRecord;
use crate::normalize::{challenge_rating_to_number, challenge_rating_token, extract_species};

/// Facet wildcard.
pub const ALL: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SortKey {
    /// Input (load) order.
    #[default]
    Default,
    NameAsc,
    CrAsc,
    CrDesc,
}

impl SortKey {
    /// Unrecognized keys mean "keep input order".
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "name_asc" => SortKey::NameAsc,
            "cr_asc" => SortKey::CrAsc,
            "cr_desc" => SortKey::CrDesc,
            _ => SortKey::Default,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Default => "default",
            SortKey::NameAsc => "name_asc",
            SortKey::CrAsc => "cr_asc",
            SortKey::CrDesc => "cr_desc",
        }
    }
}

impl From<String> for SortKey {
    fn from(raw: String) -> Self {
        SortKey::parse(&raw)
    }
}

impl From<SortKey> for String {
    fn from(key: SortKey) -> Self {
        key.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    pub search_text: String,
    /// A species facet value or [ALL].
    pub species: String,
    /// A challenge-rating token or [ALL]; matched as a prefix.
    pub challenge_rating: String,
    pub sort_key: SortKey,
}

impl Default for FilterState {
    fn default() -> Self {
        FilterState {
            search_text: String::new(),
            species: ALL.to_string(),
            challenge_rating: ALL.to_string(),
            sort_key: SortKey::Default,
        }
    }
}

fn matches_search(monster: &MonsterRecord, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    monster.name_jp.to_lowercase().contains(needle)
        || monster
            .name_en
            .as_deref()
            .is_some_and(|en| en.to_lowercase().contains(needle))
}

fn matches_species(monster: &MonsterRecord, species: &str) -> bool {
    species == ALL
        || extract_species(monster.size_type_alignment.as_deref()).as_deref() == Some(species)
}

fn matches_challenge_rating(monster: &MonsterRecord, token: &str) -> bool {
    token == ALL
        || monster
            .challenge_rating
            .as_deref()
            .is_some_and(|cr| cr.starts_with(token))
}

/// Filtered and ordered view over `records`. All sorts are stable.
pub fn apply<'a>(records: &'a [MonsterRecord], state: &FilterState) -> Vec<&'a MonsterRecord> {
    let needle = state.search_text.to_lowercase();
    let mut selected: Vec<&MonsterRecord> = records
        .iter()
        .filter(|m| matches_search(m, &needle))
        .filter(|m| matches_species(m, &state.species))
        .filter(|m| matches_challenge_rating(m, &state.challenge_rating))
        .collect();
    sort_records(&mut selected, state.sort_key);
    selected
}

pub fn sort_records(records: &mut [&MonsterRecord], key: SortKey) {
    let cr = |m: &MonsterRecord| challenge_rating_to_number(m.challenge_rating.as_deref());
    match key {
        SortKey::Default => {}
        SortKey::NameAsc => records.sort_by_cached_key(|m| collation_key(&m.name_jp)),
        SortKey::CrAsc => records.sort_by(|a, b| cr(a).total_cmp(&cr(b))),
        SortKey::CrDesc => records.sort_by(|a, b| cr(b).total_cmp(&cr(a))),
    }
}

/// Japanese-aware ordering key: katakana folds onto hiragana and letters compare
/// case-insensitively; the raw name breaks remaining ties.
pub fn collation_key(name: &str) -> (String, String) {
    let folded = name
        .chars()
        .map(|c| match c {
            'ァ'..='ヶ' => char::from_u32(c as u32 - 0x60).unwrap_or(c),
            _ => c,
        })
        .flat_map(char::to_lowercase)
        .collect();
    (folded, name.to_string())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Facets {
    pub species: Vec<String>,
    pub challenge_ratings: Vec<String>,
}

/// Distinct species, lexicographically sorted.
pub fn species_options(records: &[MonsterRecord]) -> Vec<String> {
    records
        .iter()
        .filter_map(|m| extract_species(m.size_type_alignment.as_deref()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct challenge-rating tokens, sorted numerically (first-seen order on ties).
pub fn challenge_rating_options(records: &[MonsterRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tokens: Vec<String> = records
        .iter()
        .filter_map(|m| challenge_rating_token(m.challenge_rating.as_deref()))
        .filter(|token| seen.insert(*token))
        .map(str::to_string)
        .collect();
    tokens.sort_by(|a, b| {
        challenge_rating_to_number(Some(a)).total_cmp(&challenge_rating_to_number(Some(b)))
    });
    tokens
}

pub fn facets(records: &[MonsterRecord]) -> Facets {
    Facets {
        species: species_options(records),
        challenge_ratings: challenge_rating_options(records),
    }
}
