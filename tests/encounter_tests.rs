use compendium::data::{MonsterRecord, MonsterStore};
use compendium::encounter::{
    classify, encounter_multiplier, party_thresholds, Difficulty, Encounter, Party, Thresholds,
};
use serde_json::json;

fn monster(name_jp: &str, cr: &str) -> MonsterRecord {
    serde_json::from_value(json!({"name_jp": name_jp, "challenge_rating": cr}))
        .expect("monster fixture should deserialize")
}

fn store() -> MonsterStore {
    MonsterStore::from_records(vec![
        monster("ランポス", "1/4 (50 XP)"),
        monster("ドスジャギィ", "2 (450 XP)"),
        monster("ゲリョス", "5 (1,800 XP)"),
        monster("リオレウス", "17 (18,000 XP)"),
        monster("謎の影", "不明"),
    ])
}

#[test]
fn multiplier_follows_group_size_table() {
    let expected = [
        (0, 0.0),
        (1, 1.0),
        (2, 1.5),
        (3, 2.0),
        (6, 2.0),
        (7, 2.5),
        (10, 2.5),
        (11, 3.0),
        (14, 3.0),
        (15, 4.0),
        (40, 4.0),
    ];
    for (count, multiplier) in expected {
        assert_eq!(encounter_multiplier(count), multiplier, "count {count}");
    }
}

#[test]
fn thresholds_scale_with_party_size() {
    let thresholds = party_thresholds(Party { size: 4, level: 5 });
    assert_eq!(
        thresholds,
        Thresholds {
            easy: 1000,
            medium: 2000,
            hard: 3000,
            deadly: 4400
        }
    );
}

#[test]
fn thresholds_clamp_out_of_range_parties() {
    assert_eq!(
        party_thresholds(Party { size: 0, level: 0 }),
        party_thresholds(Party { size: 1, level: 1 })
    );
    assert_eq!(
        party_thresholds(Party { size: 1, level: 99 }).deadly,
        12700
    );
}

#[test]
fn thresholds_do_not_overflow_for_huge_parties() {
    let thresholds = party_thresholds(Party {
        size: 400_000,
        level: 20,
    });
    assert_eq!(thresholds.easy, 1_120_000_000);
    assert_eq!(thresholds.deadly, 5_080_000_000);

    let widest = party_thresholds(Party {
        size: u32::MAX,
        level: 20,
    });
    assert_eq!(widest.deadly, 12_700 * u64::from(u32::MAX));
}

#[test]
fn classify_uses_thresholds_as_ceilings() {
    let thresholds = party_thresholds(Party { size: 4, level: 1 });
    assert_eq!(classify(0.0, &thresholds), Difficulty::Easy);
    assert_eq!(classify(99.0, &thresholds), Difficulty::Easy);
    assert_eq!(classify(100.0, &thresholds), Difficulty::Medium);
    assert_eq!(classify(250.0, &thresholds), Difficulty::Hard);
    assert_eq!(classify(300.0, &thresholds), Difficulty::Deadly);
    assert_eq!(classify(400.0, &thresholds), Difficulty::Deadly);
    assert_eq!(classify(1_000_000.0, &thresholds), Difficulty::Deadly);
}

#[test]
fn empty_encounter_is_zero() {
    let summary = Encounter::new().summary(&store(), Party::default());
    assert_eq!(summary.count, 0);
    assert_eq!(summary.total_xp, 0);
    assert_eq!(summary.multiplier, 0.0);
    assert_eq!(summary.adjusted_xp, 0.0);
    assert_eq!(summary.difficulty, Difficulty::Easy);
}

#[test]
fn repeated_entries_count_each_time() {
    let mut encounter = Encounter::new();
    encounter.add("ランポス");
    encounter.add("ランポス");
    encounter.add("ドスジャギィ");

    let summary = encounter.summary(&store(), Party { size: 4, level: 2 });
    assert_eq!(summary.count, 3);
    assert_eq!(summary.total_xp, 550);
    assert_eq!(summary.multiplier, 2.0);
    assert_eq!(summary.adjusted_xp, 1100.0);
    // level 2 party of four: 200 / 400 / 600 / 800
    assert_eq!(summary.difficulty, Difficulty::Deadly);
}

#[test]
fn single_monster_against_mid_level_party() {
    let encounter = Encounter::from_entries(vec!["ゲリョス".to_string()]);
    let summary = encounter.summary(&store(), Party { size: 4, level: 5 });
    assert_eq!(summary.adjusted_xp, 1800.0);
    assert_eq!(summary.difficulty, Difficulty::Medium);
    assert_eq!(summary.difficulty.label_jp(), "普通");
}

#[test]
fn unknown_and_unrated_entries_add_no_experience() {
    let encounter = Encounter::from_entries(vec![
        "謎の影".to_string(),
        "存在しない".to_string(),
        "ゲリョス".to_string(),
    ]);
    let summary = encounter.summary(&store(), Party::default());
    assert_eq!(summary.count, 3);
    assert_eq!(summary.total_xp, 1800);
    assert_eq!(summary.unknown, vec!["存在しない".to_string()]);
}

#[test]
fn remove_drops_most_recent_matching_entry() {
    let mut encounter = Encounter::new();
    encounter.add("ランポス");
    encounter.add("ゲリョス");
    encounter.add("ランポス");

    assert!(encounter.remove("ランポス"));
    assert_eq!(encounter.entries(), ["ランポス", "ゲリョス"]);
    assert!(!encounter.remove("リオレウス"));
    assert_eq!(encounter.len(), 2);

    encounter.clear();
    assert!(encounter.is_empty());
}

#[test]
fn summary_serializes_for_api_consumers() {
    let encounter = Encounter::from_entries(vec!["リオレウス".to_string()]);
    let summary = encounter.summary(&store(), Party { size: 5, level: 20 });
    let value = serde_json::to_value(&summary).expect("summary should serialize");
    assert_eq!(value["total_xp"], 18000);
    assert_eq!(value["difficulty"], "medium");
    assert_eq!(value["party"]["level"], 20);
    assert_eq!(value["thresholds"]["deadly"], 63500);
}
