//! Cocofolia character export ("paste to create" clipboard JSON).
//!
//! Field order of the serialized document is part of the contract, so the structs below
//! declare their fields in exactly the order the external tool expects.

pub mod palette;

use serde::Serialize;
use thiserror::Error;

use crate::data::monster::{non_empty, Ability, AbilityScores, ActionKind, MonsterRecord};
use crate::normalize::{ability_modifier, armor_class, hit_point_average};
use crate::session::deep_link;

pub use palette::{generate_palette, palette_for, parse_action, ActionMacro, MacroRule};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExportError {
    #[error("{name_jp}: ability scores are missing")]
    MissingAbilityScores { name_jp: String },
    #[error("{name_jp}: hit points are missing")]
    MissingHitPoints { name_jp: String },
}

/// Where exported documents link back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportContext {
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportDoc {
    pub kind: &'static str,
    pub data: CharacterData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterData {
    pub name: String,
    pub memo: String,
    pub initiative: i32,
    pub external_url: String,
    pub status: Vec<StatusEntry>,
    pub params: Vec<ParamEntry>,
    pub palette: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusEntry {
    pub label: &'static str,
    pub value: i64,
    pub max: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamEntry {
    pub label: &'static str,
    pub value: String,
}

/// Build the external character document for one monster.
pub fn to_external_document(
    monster: &MonsterRecord,
    context: &ExportContext,
) -> Result<ExportDoc, ExportError> {
    let abilities = monster
        .ability_scores
        .as_ref()
        .ok_or_else(|| ExportError::MissingAbilityScores {
            name_jp: monster.name_jp.clone(),
        })?;
    let hit_points = monster
        .hit_points
        .as_ref()
        .ok_or_else(|| ExportError::MissingHitPoints {
            name_jp: monster.name_jp.clone(),
        })?;

    let hp = hit_point_average(hit_points);
    let ac = armor_class(monster.armor_class.as_ref()).value as i64;

    Ok(ExportDoc {
        kind: "character",
        data: CharacterData {
            name: monster.name_jp.clone(),
            memo: build_memo(monster, abilities),
            initiative: ability_modifier(abilities.get(Ability::Dexterity)),
            external_url: deep_link(&context.base_url, &monster.name_jp),
            status: vec![
                StatusEntry {
                    label: "HP",
                    value: hp,
                    max: hp,
                },
                StatusEntry {
                    label: "AC",
                    value: ac,
                    max: ac,
                },
            ],
            params: Ability::ALL
                .iter()
                .map(|ability| ParamEntry {
                    label: ability.key(),
                    value: abilities.display(*ability).to_string(),
                })
                .collect(),
            palette: palette_for(monster),
        },
    })
}

/// Summary block shown in the character's memo field.
pub fn build_memo(monster: &MonsterRecord, abilities: &AbilityScores) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push(
        non_empty(&monster.size_type_alignment)
            .unwrap_or("情報なし")
            .to_string(),
    );
    if let Some(speed) = non_empty(&monster.speed) {
        lines.push(format!("【移動速度】{speed}"));
    }
    lines.push(String::new());

    let score_line = |group: &[Ability]| {
        group
            .iter()
            .map(|a| format!("{}: {}", a.label_jp(), abilities.display(*a)))
            .collect::<Vec<_>>()
            .join("　")
    };
    lines.push(score_line(&Ability::ALL[..3]));
    lines.push(score_line(&Ability::ALL[3..]));
    lines.push(String::new());

    let saves = non_empty(&monster.saving_throws);
    let skills = non_empty(&monster.skills);
    if saves.is_some() || skills.is_some() {
        lines.push("【セーヴィングスロー/技能】".to_string());
        lines.extend(saves.map(str::to_string));
        lines.extend(skills.map(str::to_string));
        lines.push(String::new());
    }

    let titled = [
        ("ダメージ抵抗", &monster.damage_resistances),
        ("ダメージ完全耐性", &monster.damage_immunities),
        ("状態異常完全耐性", &monster.condition_immunities),
    ];
    for (title, content) in titled {
        if let Some(content) = non_empty(content) {
            lines.push(format!("【{title}】"));
            lines.push(content.to_string());
            lines.push(String::new());
        }
    }

    if let Some(senses) = non_empty(&monster.senses) {
        lines.push(senses.to_string());
        lines.push(String::new());
    }

    let traits = monster.sequence(ActionKind::SpecialTraits);
    if !traits.is_empty() {
        lines.push("【特殊能力】".to_string());
        for item in traits {
            lines.push(format!("・{}: {}", item.name, item.description));
        }
    }

    lines.join("\n").trim().to_string()
}
