//! Monster record as shipped in the bundled JSON files.
//! Field shapes vary between source files, so loosely-typed fields are modelled as
//! tolerant enums and every optional member defaults instead of failing the load.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A JSON scalar that may arrive either as a number or as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(serde_json::Number),
    Text(String),
}

impl Scalar {
    pub fn is_blank(&self) -> bool {
        match self {
            Scalar::Number(_) => false,
            Scalar::Text(text) => text.trim().is_empty(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Number(n) => write!(f, "{n}"),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

/// Armor class: `17`, `"17 (天然の鎧)"` or `{ "value": "17", "type": "天然の鎧" }`.
/// Any other shape is kept as `Other` and normalizes like an absent value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArmorClass {
    Plain(Scalar),
    Structured {
        #[serde(default)]
        value: Option<Scalar>,
        #[serde(default, rename = "type")]
        kind: Option<String>,
    },
    Other(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitPoints {
    pub average: Scalar,
    #[serde(default)]
    pub dice: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    /// Display order used by stat blocks and exports.
    pub const ALL: [Ability; 6] = [
        Ability::Strength,
        Ability::Dexterity,
        Ability::Constitution,
        Ability::Intelligence,
        Ability::Wisdom,
        Ability::Charisma,
    ];

    /// Source JSON key.
    pub fn key(self) -> &'static str {
        match self {
            Ability::Strength => "strength",
            Ability::Dexterity => "dexterity",
            Ability::Constitution => "constitution",
            Ability::Intelligence => "intelligence",
            Ability::Wisdom => "wisdom",
            Ability::Charisma => "charisma",
        }
    }

    pub fn label_jp(self) -> &'static str {
        match self {
            Ability::Strength => "筋力",
            Ability::Dexterity => "敏捷力",
            Ability::Constitution => "耐久力",
            Ability::Intelligence => "知力",
            Ability::Wisdom => "判断力",
            Ability::Charisma => "魅力",
        }
    }
}

/// Raw ability score text, e.g. `"21 (+5)"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AbilityScores {
    #[serde(default)]
    pub strength: Option<String>,
    #[serde(default)]
    pub dexterity: Option<String>,
    #[serde(default)]
    pub constitution: Option<String>,
    #[serde(default)]
    pub intelligence: Option<String>,
    #[serde(default)]
    pub wisdom: Option<String>,
    #[serde(default)]
    pub charisma: Option<String>,
}

impl AbilityScores {
    pub fn get(&self, ability: Ability) -> Option<&str> {
        let raw = match ability {
            Ability::Strength => &self.strength,
            Ability::Dexterity => &self.dexterity,
            Ability::Constitution => &self.constitution,
            Ability::Intelligence => &self.intelligence,
            Ability::Wisdom => &self.wisdom,
            Ability::Charisma => &self.charisma,
        };
        raw.as_deref()
    }

    /// Score text for display; missing scores render as an empty string.
    pub fn display(&self, ability: Ability) -> &str {
        self.get(ability).unwrap_or("")
    }
}

/// One trait/action entry: a short name and unstructured rules text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionItem {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// The six ordered name/description sequences of a stat block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    SpecialTraits,
    Actions,
    BonusActions,
    Reactions,
    LegendaryActions,
    LairActions,
}

impl ActionKind {
    pub const ALL: [ActionKind; 6] = [
        ActionKind::SpecialTraits,
        ActionKind::Actions,
        ActionKind::BonusActions,
        ActionKind::Reactions,
        ActionKind::LegendaryActions,
        ActionKind::LairActions,
    ];

    pub fn label_jp(self) -> &'static str {
        match self {
            ActionKind::SpecialTraits => "特殊能力",
            ActionKind::Actions => "アクション",
            ActionKind::BonusActions => "ボーナスアクション",
            ActionKind::Reactions => "リアクション",
            ActionKind::LegendaryActions => "伝説的アクション",
            ActionKind::LairActions => "巣穴のアクション",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonsterRecord {
    pub name_jp: String,
    #[serde(default)]
    pub name_en: Option<String>,
    #[serde(default)]
    pub size_type_alignment: Option<String>,
    #[serde(default)]
    pub armor_class: Option<ArmorClass>,
    #[serde(default)]
    pub hit_points: Option<HitPoints>,
    #[serde(default)]
    pub speed: Option<String>,
    #[serde(default)]
    pub ability_scores: Option<AbilityScores>,
    #[serde(default)]
    pub saving_throws: Option<String>,
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default)]
    pub damage_vulnerabilities: Option<String>,
    #[serde(default)]
    pub damage_resistances: Option<String>,
    #[serde(default)]
    pub damage_immunities: Option<String>,
    #[serde(default)]
    pub condition_immunities: Option<String>,
    #[serde(default)]
    pub senses: Option<String>,
    #[serde(default)]
    pub languages: Option<String>,
    #[serde(default)]
    pub challenge_rating: Option<String>,
    #[serde(default)]
    pub special_traits: Option<Vec<ActionItem>>,
    #[serde(default)]
    pub actions: Option<Vec<ActionItem>>,
    #[serde(default)]
    pub bonus_actions: Option<Vec<ActionItem>>,
    #[serde(default)]
    pub reactions: Option<Vec<ActionItem>>,
    #[serde(default)]
    pub legendary_actions: Option<Vec<ActionItem>>,
    #[serde(default)]
    pub lair_actions: Option<Vec<ActionItem>>,
    /// Hand-authored chat palette; overrides text-mined commands when non-empty.
    #[serde(default)]
    pub commands: Option<String>,
    /// Experience value derived from `challenge_rating` once at load time.
    #[serde(skip)]
    pub xp: u32,
}

impl MonsterRecord {
    pub fn sequence(&self, kind: ActionKind) -> &[ActionItem] {
        let items = match kind {
            ActionKind::SpecialTraits => &self.special_traits,
            ActionKind::Actions => &self.actions,
            ActionKind::BonusActions => &self.bonus_actions,
            ActionKind::Reactions => &self.reactions,
            ActionKind::LegendaryActions => &self.legendary_actions,
            ActionKind::LairActions => &self.lair_actions,
        };
        items.as_deref().unwrap_or(&[])
    }

    /// `"<name_jp> (<name_en>)"`, or just `name_jp` when there is no English name.
    pub fn title(&self) -> String {
        match non_empty(&self.name_en) {
            Some(en) => format!("{} ({en})", self.name_jp),
            None => self.name_jp.clone(),
        }
    }

    /// Pre-authored palette, if the record carries a non-blank one.
    pub fn authored_commands(&self) -> Option<&str> {
        self.commands
            .as_deref()
            .filter(|commands| !commands.trim().is_empty())
    }
}

/// Trimmed-empty strings count as absent.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}
