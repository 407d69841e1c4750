//! Encounter budget: selected monsters' experience against party thresholds.

use serde::{Deserialize, Serialize};

use crate::data::loader::MonsterStore;

pub const MIN_PARTY_LEVEL: u32 = 1;
pub const MAX_PARTY_LEVEL: u32 = 20;
/// Largest party the service and CLI accept.
pub const MAX_PARTY_SIZE: u32 = 100;

/// Per-player XP thresholds by character level 1..=20: easy, medium, hard, deadly.
const XP_THRESHOLDS: [[u32; 4]; 20] = [
    [25, 50, 75, 100],
    [50, 100, 150, 200],
    [75, 150, 225, 400],
    [125, 250, 375, 500],
    [250, 500, 750, 1100],
    [300, 600, 900, 1400],
    [350, 750, 1100, 1700],
    [450, 900, 1400, 2100],
    [550, 1100, 1600, 2400],
    [600, 1200, 1900, 2800],
    [800, 1600, 2400, 3600],
    [1000, 2000, 3000, 4500],
    [1100, 2200, 3400, 5100],
    [1250, 2500, 3800, 5700],
    [1400, 2800, 4300, 6400],
    [1600, 3200, 4800, 7200],
    [2000, 3900, 5900, 8800],
    [2100, 4200, 6300, 9500],
    [2400, 4900, 7300, 10900],
    [2800, 5700, 8500, 12700],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Deadly,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Deadly,
    ];

    pub fn label_jp(self) -> &'static str {
        match self {
            Difficulty::Easy => "簡単",
            Difficulty::Medium => "普通",
            Difficulty::Hard => "困難",
            Difficulty::Deadly => "致命的",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub size: u32,
    pub level: u32,
}

impl Default for Party {
    fn default() -> Self {
        Party { size: 4, level: 1 }
    }
}

impl Party {
    /// Level clamped to the table, size to at least one player.
    pub fn clamped(self) -> Self {
        Party {
            size: self.size.max(1),
            level: self.level.clamp(MIN_PARTY_LEVEL, MAX_PARTY_LEVEL),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Thresholds {
    pub easy: u64,
    pub medium: u64,
    pub hard: u64,
    pub deadly: u64,
}

impl Thresholds {
    pub fn get(&self, difficulty: Difficulty) -> u64 {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
            Difficulty::Deadly => self.deadly,
        }
    }
}

/// Party-wide thresholds: the per-player row for `level`, scaled by `size`.
pub fn party_thresholds(party: Party) -> Thresholds {
    let party = party.clamped();
    let [easy, medium, hard, deadly] = XP_THRESHOLDS[(party.level - MIN_PARTY_LEVEL) as usize];
    let size = u64::from(party.size);
    Thresholds {
        easy: u64::from(easy) * size,
        medium: u64::from(medium) * size,
        hard: u64::from(hard) * size,
        deadly: u64::from(deadly) * size,
    }
}

/// XP multiplier by number of monsters.
pub fn encounter_multiplier(count: usize) -> f64 {
    match count {
        0 => 0.0,
        1 => 1.0,
        2 => 1.5,
        3..=6 => 2.0,
        7..=10 => 2.5,
        11..=14 => 3.0,
        _ => 4.0,
    }
}

/// Lowest tier whose threshold exceeds `adjusted_xp`; the top tier otherwise.
pub fn classify(adjusted_xp: f64, thresholds: &Thresholds) -> Difficulty {
    Difficulty::ALL
        .into_iter()
        .find(|tier| thresholds.get(*tier) as f64 > adjusted_xp)
        .unwrap_or(Difficulty::Deadly)
}

/// Ordered multiset of selected monster keys (`name_jp`); repeats allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encounter {
    entries: Vec<String>,
}

impl Encounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<String>) -> Self {
        Encounter { entries }
    }

    pub fn add(&mut self, key: impl Into<String>) {
        self.entries.push(key.into());
    }

    /// Remove the most recently added entry for `key`. Returns whether one was removed.
    pub fn remove(&mut self, key: &str) -> bool {
        match self.entries.iter().rposition(|entry| entry == key) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn summary(&self, store: &MonsterStore, party: Party) -> EncounterSummary {
        let mut total_xp: u64 = 0;
        let mut unknown = Vec::new();
        for key in &self.entries {
            match store.find(key) {
                Some(monster) => total_xp += u64::from(monster.xp),
                None => unknown.push(key.clone()),
            }
        }
        if !unknown.is_empty() {
            tracing::debug!(?unknown, "encounter references unknown monsters");
        }

        let multiplier = encounter_multiplier(self.entries.len());
        let adjusted_xp = total_xp as f64 * multiplier;
        let party = party.clamped();
        let thresholds = party_thresholds(party);
        EncounterSummary {
            count: self.entries.len(),
            total_xp,
            multiplier,
            adjusted_xp,
            party,
            thresholds,
            difficulty: classify(adjusted_xp, &thresholds),
            unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncounterSummary {
    pub count: usize,
    pub total_xp: u64,
    pub multiplier: f64,
    pub adjusted_xp: f64,
    pub party: Party,
    pub thresholds: Thresholds,
    pub difficulty: Difficulty,
    /// Keys with no matching record; they count toward `count` but add no XP.
    pub unknown: Vec<String>,
}
