//! Stat block documents: a monster record laid out as ordered, labeled sections.
//! Independent of any output format; see [html] for the service's markup.

pub mod html;

use serde::Serialize;
use thiserror::Error;

use crate::data::monster::{non_empty, Ability, ActionKind, MonsterRecord};
use crate::normalize::armor_class;
use crate::session::monster_query;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("{name_jp}: hit points are missing")]
    MissingHitPoints { name_jp: String },
    #[error("{name_jp}: ability scores are missing")]
    MissingAbilityScores { name_jp: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Detail page: the title is not a link.
    pub single_view: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Section {
    SizeType { text: String },
    Field(Field),
    AbilityScores { scores: Vec<Field> },
    Items { title: &'static str, items: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatBlock {
    pub name_jp: String,
    pub title: String,
    /// Deep-link query for list cards; `None` in the single view.
    pub link: Option<String>,
    pub sections: Vec<Section>,
}

/// Labels of the optional one-line fields, in display order.
const DETAIL_FIELDS: [&str; 9] = [
    "セーヴィングスロー",
    "技能",
    "ダメージ脆弱性",
    "ダメージ抵抗",
    "ダメージ完全耐性",
    "状態異常完全耐性",
    "感覚",
    "言語",
    "脅威度",
];

fn field(label: &'static str, value: impl Into<String>) -> Section {
    Section::Field(Field {
        label,
        value: value.into(),
    })
}

pub fn render(monster: &MonsterRecord, options: RenderOptions) -> Result<StatBlock, RenderError> {
    let hit_points = monster
        .hit_points
        .as_ref()
        .ok_or_else(|| RenderError::MissingHitPoints {
            name_jp: monster.name_jp.clone(),
        })?;
    let abilities = monster
        .ability_scores
        .as_ref()
        .ok_or_else(|| RenderError::MissingAbilityScores {
            name_jp: monster.name_jp.clone(),
        })?;

    let mut sections = Vec::new();
    if let Some(text) = non_empty(&monster.size_type_alignment) {
        sections.push(Section::SizeType {
            text: text.to_string(),
        });
    }
    sections.push(field(
        "アーマークラス",
        armor_class(monster.armor_class.as_ref()).display,
    ));
    let dice = hit_points.dice.trim();
    sections.push(field(
        "ヒットポイント",
        if dice.is_empty() {
            hit_points.average.to_string()
        } else {
            format!("{} ({dice})", hit_points.average)
        },
    ));
    if let Some(speed) = non_empty(&monster.speed) {
        sections.push(field("移動速度", speed));
    }
    sections.push(Section::AbilityScores {
        scores: Ability::ALL
            .iter()
            .map(|ability| Field {
                label: ability.label_jp(),
                value: abilities.display(*ability).to_string(),
            })
            .collect(),
    });

    let details = [
        &monster.saving_throws,
        &monster.skills,
        &monster.damage_vulnerabilities,
        &monster.damage_resistances,
        &monster.damage_immunities,
        &monster.condition_immunities,
        &monster.senses,
        &monster.languages,
        &monster.challenge_rating,
    ];
    for (label, value) in DETAIL_FIELDS.into_iter().zip(details) {
        if let Some(value) = non_empty(value) {
            sections.push(field(label, value));
        }
    }

    for kind in ActionKind::ALL {
        let items = monster.sequence(kind);
        if items.is_empty() {
            continue;
        }
        sections.push(Section::Items {
            title: kind.label_jp(),
            items: items
                .iter()
                .map(|item| format!("{}. {}", item.name, item.description))
                .collect(),
        });
    }

    Ok(StatBlock {
        name_jp: monster.name_jp.clone(),
        title: monster.title(),
        link: (!options.single_view).then(|| monster_query(&monster.name_jp)),
        sections,
    })
}

/// Result for one monster of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RenderOutcome {
    Rendered(StatBlock),
    Failed { name_jp: String, error: String },
}

/// Render every monster; a malformed record becomes a `Failed` entry in place.
pub fn render_batch<'a, I>(monsters: I, options: RenderOptions) -> Vec<RenderOutcome>
where
    I: IntoIterator<Item = &'a MonsterRecord>,
{
    monsters
        .into_iter()
        .map(|monster| match render(monster, options) {
            Ok(block) => RenderOutcome::Rendered(block),
            Err(err) => {
                tracing::warn!(error = %err, "skipping stat block");
                RenderOutcome::Failed {
                    name_jp: monster.name_jp.clone(),
                    error: err.to_string(),
                }
            }
        })
        .collect()
}
