//! Chat-palette mining: turns free-text action descriptions into dice macros.
//!
//! Parsing is an ordered list of rules over the description text. Each rule either
//! recognizes its idiom and emits macro lines, or declines; the first rule that accepts
//! wins and the verbatim fallback always accepts. Nothing here returns an error.
//!
//! Recognized idioms (Japanese 5e stat block text):
//!   `近接武器攻撃: ヒット+5、…。ヒット: 10（2d6 + 3）の斬撃ダメージ。`
//!   `…DC15の敏捷力セーヴィング・スローを行う。…22（4d10）の火炎ダメージを受ける…`
//!   `炎のブレス（再チャージ5～6）`

use std::sync::OnceLock;

use regex::Regex;

use crate::data::monster::{ActionItem, ActionKind, MonsterRecord};

/// Appended to damage lines of saving-throw actions.
pub const HALF_ON_SAVE: &str = "（セーヴ成功で半減）";

/// Sequences mined for palette lines, in output order. Special traits are passive and skipped.
pub const PALETTE_SOURCES: [ActionKind; 5] = [
    ActionKind::Actions,
    ActionKind::BonusActions,
    ActionKind::Reactions,
    ActionKind::LegendaryActions,
    ActionKind::LairActions,
];

static RECHARGE: OnceLock<Regex> = OnceLock::new();
static WEAPON_ATTACK: OnceLock<Regex> = OnceLock::new();
static ON_HIT: OnceLock<Regex> = OnceLock::new();
static DAMAGE: OnceLock<Regex> = OnceLock::new();
static SAVING_THROW: OnceLock<Regex> = OnceLock::new();

fn recharge_re() -> &'static Regex {
    RECHARGE.get_or_init(|| {
        Regex::new(r"[(（]\s*(?i:再チャージ|recharge)\s*(\d+)(?:\s*[-–~～〜ー]\s*(\d+))?\s*[)）]")
            .expect("valid recharge regex")
    })
}

fn weapon_attack_re() -> &'static Regex {
    WEAPON_ATTACK.get_or_init(|| {
        Regex::new(r"(?:近接|遠隔)(?:または遠隔)?(?:武器|呪文)攻撃\s*[:：]\s*ヒット\s*([+＋\-－−])\s*(\d+)")
            .expect("valid weapon attack regex")
    })
}

fn on_hit_re() -> &'static Regex {
    ON_HIT.get_or_init(|| Regex::new(r"ヒット\s*[:：]").expect("valid on-hit regex"))
}

fn damage_re() -> &'static Regex {
    DAMAGE.get_or_init(|| {
        Regex::new(r"(\d+\s*[dD]\s*\d+(?:\s*[+\-＋－]\s*\d+)?)\s*[)）]?\s*の?\s*([^\s、。,.()（）\d]+?)ダメージ")
            .expect("valid damage regex")
    })
}

fn saving_throw_re() -> &'static Regex {
    SAVING_THROW.get_or_init(|| {
        Regex::new(r"(?:DC|ＤＣ)\s*(\d+)\s*の?\s*(筋力|敏捷力|耐久力|知力|判断力|魅力)\s*セーヴィング・?スロー")
            .expect("valid saving throw regex")
    })
}

/// Which rule produced an action's lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroRule {
    WeaponAttack,
    SavingThrow,
    Verbatim,
}

/// One action prepared for matching: recharge annotation lifted out of the name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionText<'a> {
    pub name: String,
    pub description: &'a str,
    /// `"5-6"` for `（再チャージ5～6）`, `"6"` for `（再チャージ6）`.
    pub recharge: Option<String>,
}

impl<'a> ActionText<'a> {
    pub fn new(item: &'a ActionItem) -> Self {
        let (name, from_name) = strip_recharge(&item.name);
        let recharge = from_name.or_else(|| find_recharge(&item.description));
        ActionText {
            name,
            description: &item.description,
            recharge,
        }
    }

    fn prefix(&self) -> String {
        self.recharge
            .as_deref()
            .map(|range| format!("[{range}] "))
            .unwrap_or_default()
    }
}

fn find_recharge(text: &str) -> Option<String> {
    let caps = recharge_re().captures(text)?;
    Some(match caps.get(2) {
        Some(high) => format!("{}-{}", &caps[1], high.as_str()),
        None => caps[1].to_string(),
    })
}

fn strip_recharge(name: &str) -> (String, Option<String>) {
    match recharge_re().find(name) {
        Some(found) => {
            let stripped = format!("{}{}", &name[..found.start()], &name[found.end()..]);
            (stripped.trim().to_string(), find_recharge(name))
        }
        None => (name.trim().to_string(), None),
    }
}

/// A damage clause: dice with whitespace removed (`2d6+3`) and the damage type (`斬撃`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DamageClause {
    pub dice: String,
    pub damage_type: String,
    end: usize,
}

/// Damage clauses in order of appearance.
pub fn damage_clauses(text: &str) -> Vec<DamageClause> {
    damage_re()
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let dice: String = caps[1]
                .chars()
                .filter(|c| !c.is_whitespace())
                .map(|c| match c {
                    '＋' => '+',
                    '－' => '-',
                    'D' => 'd',
                    other => other,
                })
                .collect();
            Some(DamageClause {
                dice,
                damage_type: caps[2].trim().to_string(),
                end: whole.end(),
            })
        })
        .collect()
}

/// Verb stems that tie a damage clause to the effect after it, longest first.
const CONNECTIVES: [&str; 6] = ["を与える", "を受ける", "を与え", "を受け", "に加えて", "を"];

/// Text after the sentence that holds the last damage clause.
fn trailing_after_sentence(rest: &str) -> Option<String> {
    let (_, after) = rest.split_once('。')?;
    non_blank(after)
}

/// Effect following the last damage clause: the rest of its sentence with the connective
/// dropped, else the sentences after it. `redundant` rejects a candidate.
fn trailing_effect(rest: &str, redundant: fn(&str) -> bool) -> Option<String> {
    let sentence_end = rest.find('。').map_or(rest.len(), |i| i + '。'.len_utf8());
    let sentence = rest[..sentence_end].trim_start();
    let clause = CONNECTIVES
        .iter()
        .find_map(|stem| sentence.strip_prefix(*stem))
        .unwrap_or(sentence);
    non_blank(clause)
        .filter(|effect| !redundant(effect))
        .or_else(|| trailing_after_sentence(rest).filter(|effect| !redundant(effect)))
}

fn never_redundant(_: &str) -> bool {
    false
}

/// The half-on-save rider is already carried by the damage lines.
fn restates_half_damage(effect: &str) -> bool {
    effect.contains("半分")
}

fn non_blank(text: &str) -> Option<String> {
    let trimmed = text
        .trim_start_matches(|c: char| c.is_whitespace() || "。、，,.)）".contains(c))
        .trim_end();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn with_prefix(action: &ActionText<'_>, mut lines: Vec<String>) -> Vec<String> {
    if let Some(first) = lines.first_mut() {
        first.insert_str(0, &action.prefix());
    }
    lines
}

/// Attack roll plus damage lines for `近接武器攻撃: ヒット+N` style actions.
pub fn match_weapon_attack(action: &ActionText<'_>) -> Option<Vec<String>> {
    let text = action.description;
    let caps = weapon_attack_re().captures(text)?;
    let bonus: i64 = caps[2].parse().ok()?;
    let sign = if matches!(&caps[1], "+" | "＋") { '+' } else { '-' };
    let after_to_hit = &text[caps.get(0)?.end()..];

    let on_hit = match on_hit_re().find(after_to_hit) {
        Some(marker) => &after_to_hit[marker.end()..],
        None => after_to_hit,
    };

    let mut lines = vec![format!("1d20{sign}{bonus} {}", action.name)];
    let clauses = damage_clauses(on_hit);
    for clause in &clauses {
        lines.push(format!("{} {}", clause.dice, clause.damage_type));
    }
    if let Some(last) = clauses.last() {
        lines.extend(trailing_effect(&on_hit[last.end..], never_redundant));
    }
    Some(with_prefix(action, lines))
}

/// `<name> DC<N> <ability>セーヴ` plus half-on-save damage lines.
pub fn match_saving_throw(action: &ActionText<'_>) -> Option<Vec<String>> {
    let text = action.description;
    let caps = saving_throw_re().captures(text)?;
    let after_dc = &text[caps.get(0)?.end()..];

    let mut lines = vec![format!("{} DC{} {}セーヴ", action.name, &caps[1], &caps[2])];
    let clauses = damage_clauses(after_dc);
    for clause in &clauses {
        lines.push(format!("{} {}{HALF_ON_SAVE}", clause.dice, clause.damage_type));
    }
    let effect = match clauses.last() {
        Some(last) => trailing_effect(&after_dc[last.end..], restates_half_damage),
        None => trailing_after_sentence(after_dc),
    };
    lines.extend(effect);
    Some(with_prefix(action, lines))
}

/// Name and description as-is. Always accepts.
pub fn verbatim(action: &ActionText<'_>) -> Vec<String> {
    let description = action.description.trim();
    let line = if description.is_empty() {
        action.name.clone()
    } else {
        format!("{} {description}", action.name)
    };
    with_prefix(action, vec![line])
}

type Rule = fn(&ActionText<'_>) -> Option<Vec<String>>;

/// Tried in order; the verbatim fallback runs when none accepts.
const RULES: [(MacroRule, Rule); 2] = [
    (MacroRule::WeaponAttack, match_weapon_attack),
    (MacroRule::SavingThrow, match_saving_throw),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionMacro {
    pub rule: MacroRule,
    pub lines: Vec<String>,
}

/// Parse one action into palette lines.
pub fn parse_action(item: &ActionItem) -> ActionMacro {
    let action = ActionText::new(item);
    for (rule, matcher) in RULES {
        if let Some(lines) = matcher(&action) {
            return ActionMacro { rule, lines };
        }
    }
    tracing::trace!(action = %action.name, "no dice idiom recognized; emitting verbatim");
    ActionMacro {
        rule: MacroRule::Verbatim,
        lines: verbatim(&action),
    }
}

/// Text-mined palette over every action-like sequence.
pub fn generate_palette(monster: &MonsterRecord) -> String {
    PALETTE_SOURCES
        .iter()
        .flat_map(|kind| monster.sequence(*kind))
        .flat_map(|item| parse_action(item).lines)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Authored `commands` when present, otherwise the mined palette.
pub fn palette_for(monster: &MonsterRecord) -> String {
    match monster.authored_commands() {
        Some(commands) => commands.to_string(),
        None => generate_palette(monster),
    }
}
