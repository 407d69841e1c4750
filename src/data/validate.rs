//! Dataset checks: everything the normalizers would silently default, reported per record.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::data::monster::{non_empty, Ability, ArmorClass, MonsterRecord};
use crate::export::palette::{parse_action, MacroRule, PALETTE_SOURCES};
use crate::normalize::{challenge_rating_to_number, extract_species, UNRATED_CHALLENGE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn count(&self, severity: ValidationSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == severity)
            .count()
    }
}

fn has_integer(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
}

fn check_armor_class(report: &mut ValidationReport, context: &str, ac: Option<&ArmorClass>) {
    let readable = match ac {
        Some(ArmorClass::Plain(value)) => has_integer(&value.to_string()),
        Some(ArmorClass::Structured {
            value: Some(value), ..
        }) => has_integer(&value.to_string()),
        _ => false,
    };
    if !readable {
        report.push(
            ValidationSeverity::Warning,
            context,
            "armor_class unreadable; defaults to 10",
        );
    }
}

fn check_record(report: &mut ValidationReport, index: usize, monster: &MonsterRecord) {
    let context = if monster.name_jp.trim().is_empty() {
        format!("record[{index}]")
    } else {
        monster.name_jp.clone()
    };

    if monster.name_jp.trim().is_empty() {
        report.push(ValidationSeverity::Error, &context, "name_jp is empty");
    }
    if monster.hit_points.is_none() {
        report.push(
            ValidationSeverity::Error,
            &context,
            "hit_points missing; stat block and export will fail",
        );
    }
    match &monster.ability_scores {
        None => report.push(
            ValidationSeverity::Error,
            &context,
            "ability_scores missing; stat block and export will fail",
        ),
        Some(scores) => {
            for ability in Ability::ALL {
                if !scores.get(ability).is_some_and(has_integer) {
                    report.push(
                        ValidationSeverity::Warning,
                        &context,
                        format!("ability_scores.{} unreadable; defaults to 10", ability.key()),
                    );
                }
            }
        }
    }

    check_armor_class(report, &context, monster.armor_class.as_ref());

    match non_empty(&monster.challenge_rating) {
        None => report.push(
            ValidationSeverity::Warning,
            &context,
            "challenge_rating missing; sorts first and adds 0 XP",
        ),
        Some(cr) => {
            if challenge_rating_to_number(Some(cr)) == UNRATED_CHALLENGE {
                report.push(
                    ValidationSeverity::Warning,
                    &context,
                    format!("challenge_rating '{cr}' unreadable; sorts first"),
                );
            }
            if !cr.contains('(') && !cr.contains('（') {
                report.push(
                    ValidationSeverity::Warning,
                    &context,
                    format!("challenge_rating '{cr}' has no XP value"),
                );
            }
        }
    }

    if extract_species(monster.size_type_alignment.as_deref()).is_none() {
        report.push(
            ValidationSeverity::Info,
            &context,
            "species not extractable; excluded from species facet",
        );
    }

    if monster.authored_commands().is_none() {
        let verbatim: Vec<&str> = PALETTE_SOURCES
            .iter()
            .flat_map(|kind| monster.sequence(*kind))
            .filter(|item| parse_action(item).rule == MacroRule::Verbatim)
            .map(|item| item.name.as_str())
            .collect();
        if !verbatim.is_empty() {
            report.push(
                ValidationSeverity::Info,
                &context,
                format!("no dice idiom recognized in: {}", verbatim.join(", ")),
            );
        }
    }
}

/// Validate the combined record set in load order.
pub fn validate_records(records: &[MonsterRecord]) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut first_index: HashMap<&str, usize> = HashMap::new();

    for (index, monster) in records.iter().enumerate() {
        if let Some(first) = first_index.get(monster.name_jp.as_str()) {
            report.push(
                ValidationSeverity::Error,
                &monster.name_jp,
                format!("duplicate name_jp (records {first} and {index})"),
            );
        } else {
            first_index.insert(&monster.name_jp, index);
        }
        check_record(&mut report, index, monster);
    }

    report
}
