//! Browsing-session state at the edges: filter selections, the last filtered ordering,
//! and the deep-link contract.
//!
//! Nothing in here is read by the core transforms; the service serializes a
//! [SessionState] into link query strings and rebuilds it from the next request.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::data::monster::MonsterRecord;
use crate::filter::{apply, FilterState, SortKey, ALL};

/// Query parameter that addresses a single monster by exact `name_jp`.
pub const MONSTER_PARAM: &str = "monster";

/// `?monster=<percent-encoded name_jp>`.
pub fn monster_query(name_jp: &str) -> String {
    format!("?{MONSTER_PARAM}={}", urlencoding::encode(name_jp))
}

/// Canonical deep link to one record under `base_url`.
pub fn deep_link(base_url: &str, name_jp: &str) -> String {
    let query = monster_query(name_jp);
    if base_url.contains('?') {
        format!("{base_url}&{}", &query[1..])
    } else {
        format!("{base_url}{query}")
    }
}

/// Decoded value of the first `key` parameter in a raw query string (leading `?` allowed).
pub fn query_param(query: &str, key: &str) -> Option<String> {
    form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// Monster named by the deep-link parameter, if any.
pub fn monster_from_query(query: &str) -> Option<String> {
    query_param(query, MONSTER_PARAM).filter(|name| !name.is_empty())
}

/// Filter selections carried in `q`, `species`, `cr` and `sort` parameters.
pub fn filter_from_query(query: &str) -> FilterState {
    let mut filter = FilterState::default();
    for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
        match &*key {
            "q" => filter.search_text = value.into_owned(),
            "species" if !value.is_empty() => filter.species = value.into_owned(),
            "cr" if !value.is_empty() => filter.challenge_rating = value.into_owned(),
            "sort" => filter.sort_key = SortKey::parse(&value),
            _ => {}
        }
    }
    filter
}

/// Inverse of [filter_from_query]; default selections are left out. No leading `?`.
pub fn filter_to_query(filter: &FilterState) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    if !filter.search_text.is_empty() {
        query.append_pair("q", &filter.search_text);
    }
    if filter.species != ALL {
        query.append_pair("species", &filter.species);
    }
    if filter.challenge_rating != ALL {
        query.append_pair("cr", &filter.challenge_rating);
    }
    if filter.sort_key != SortKey::Default {
        query.append_pair("sort", filter.sort_key.as_str());
    }
    query.finish()
}

/// Filter selections plus the post-filter ordering the user last saw.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub filter: FilterState,
    pub order: Vec<String>,
}

impl SessionState {
    /// Apply `filter` to `records` and remember the resulting `name_jp` order.
    pub fn capture(records: &[MonsterRecord], filter: FilterState) -> Self {
        let order = apply(records, &filter)
            .into_iter()
            .map(|m| m.name_jp.clone())
            .collect();
        SessionState { filter, order }
    }

    /// Previous and next names around `name_jp` in the remembered order.
    pub fn neighbors(&self, name_jp: &str) -> (Option<&str>, Option<&str>) {
        let Some(position) = self.order.iter().position(|n| n == name_jp) else {
            return (None, None);
        };
        let prev = position
            .checked_sub(1)
            .and_then(|i| self.order.get(i))
            .map(String::as_str);
        let next = self.order.get(position + 1).map(String::as_str);
        (prev, next)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Stored state from a previous page; unreadable state starts a fresh session.
    pub fn from_json(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "discarding unreadable session state");
            SessionState::default()
        })
    }
}
