//! Typed values from loosely-typed record fields.
//!
//! Every function here is total: malformed or absent input yields a fixed default
//! (armor class 10, ability score 10, challenge rating -1, experience 0) instead of an error.
//! Anomalies are reported by `data::validate`, not here, so these stay cheap enough to call
//! inside sort comparators.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::data::monster::{ArmorClass, HitPoints, Scalar};

pub const DEFAULT_ARMOR_CLASS: i32 = 10;
pub const DEFAULT_ABILITY_SCORE: i32 = 10;
/// Sort sentinel for a missing or unreadable challenge rating; orders before every real rating.
pub const UNRATED_CHALLENGE: f64 = -1.0;

static UNSIGNED_INT: OnceLock<Regex> = OnceLock::new();
static SIGNED_INT: OnceLock<Regex> = OnceLock::new();
static PAREN_GROUP: OnceLock<Regex> = OnceLock::new();

fn unsigned_int() -> &'static Regex {
    UNSIGNED_INT.get_or_init(|| Regex::new(r"\d+").expect("valid integer regex"))
}

fn signed_int() -> &'static Regex {
    SIGNED_INT.get_or_init(|| Regex::new(r"-?\d+").expect("valid signed integer regex"))
}

fn paren_group() -> &'static Regex {
    PAREN_GROUP.get_or_init(|| Regex::new(r"[(（]([^)）]*)[)）]").expect("valid parenthesis regex"))
}

fn first_integer(text: &str) -> Option<i32> {
    unsigned_int().find(text)?.as_str().parse().ok()
}

fn first_signed_integer(text: &str) -> Option<i32> {
    signed_int().find(text)?.as_str().parse().ok()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArmorClassValue {
    pub display: String,
    pub value: i32,
}

impl ArmorClassValue {
    fn unknown() -> Self {
        ArmorClassValue {
            display: "N/A".to_string(),
            value: DEFAULT_ARMOR_CLASS,
        }
    }
}

/// Display string and numeric armor class.
pub fn armor_class(ac: Option<&ArmorClass>) -> ArmorClassValue {
    match ac {
        Some(ArmorClass::Structured {
            value: Some(value),
            kind,
        }) if !value.is_blank() => {
            let text = value.to_string();
            let display = match kind.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
                Some(kind) => format!("{text} ({kind})"),
                None => text.clone(),
            };
            ArmorClassValue {
                display,
                value: first_integer(&text).unwrap_or(DEFAULT_ARMOR_CLASS),
            }
        }
        Some(ArmorClass::Plain(scalar)) if !scalar.is_blank() => {
            let display = scalar.to_string();
            let value = first_integer(&display).unwrap_or(DEFAULT_ARMOR_CLASS);
            ArmorClassValue { display, value }
        }
        _ => ArmorClassValue::unknown(),
    }
}

/// Ability modifier from raw score text such as `"21 (+5)"`: `floor((score - 10) / 2)`.
pub fn ability_modifier(score: Option<&str>) -> i32 {
    let score = score
        .and_then(first_signed_integer)
        .unwrap_or(DEFAULT_ABILITY_SCORE);
    score.saturating_sub(10).div_euclid(2)
}


/// Token before the first whitespace, e.g. `"1/2"` for `"1/2 (100 XP)"`.
pub fn challenge_rating_token(cr: Option<&str>) -> Option<&str> {
    cr?.split(char::is_whitespace).find(|token| !token.is_empty())
}

/// Numeric challenge rating. Fractions must be exactly `<int>/<int>`; anything else
/// unreadable maps to [`UNRATED_CHALLENGE`].
pub fn challenge_rating_to_number(cr: Option<&str>) -> f64 {
    let Some(token) = challenge_rating_token(cr) else {
        return UNRATED_CHALLENGE;
    };
    if let Some((numerator, denominator)) = token.split_once('/') {
        return match (numerator.parse::<i64>(), denominator.parse::<i64>()) {
            (Ok(n), Ok(d)) if d != 0 => n as f64 / d as f64,
            _ => UNRATED_CHALLENGE,
        };
    }
    leading_integer(token)
        .map(|n| n as f64)
        .unwrap_or(UNRATED_CHALLENGE)
}

/// Optional sign followed by leading ASCII digits, like `parseInt`.
fn leading_integer(token: &str) -> Option<i64> {
    let (sign, digits) = match token.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, token),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

/// Species from the `"<size>の<species>、<alignment>"` template.
///
/// This is the only place that knows the Japanese template; a data source in another
/// language replaces this function.
pub fn extract_species(size_type_alignment: Option<&str>) -> Option<String> {
    let species = size_type_alignment?
        .split('の')
        .nth(1)?
        .split('、')
        .next()?
        .trim();
    if species.is_empty() {
        None
    } else {
        Some(species.to_string())
    }
}

/// Experience points from the first parenthesis group of a challenge rating,
/// e.g. 1800 for `"5 (1,800 XP)"`. Thousands separators are ignored.
pub fn experience_value(cr: Option<&str>) -> u32 {
    let Some(group) = cr.and_then(|cr| paren_group().captures(cr)) else {
        return 0;
    };
    let digits: String = group[1]
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '，')
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().unwrap_or(0)
}

/// Average hit points as a number; unreadable averages count as 0.
pub fn hit_point_average(hp: &HitPoints) -> i64 {
    match &hp.average {
        Scalar::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.floor() as i64))
            .unwrap_or(0),
        Scalar::Text(text) => first_integer(text).map(i64::from).unwrap_or(0),
    }
}
