use compendium::data::MonsterRecord;
use compendium::filter::{
    apply, challenge_rating_options, collation_key, facets, species_options, FilterState,
    SortKey, ALL,
};
use serde_json::json;

fn monster(
    name_jp: &str,
    name_en: Option<&str>,
    size_type: &str,
    cr: Option<&str>,
) -> MonsterRecord {
    serde_json::from_value(json!({
        "name_jp": name_jp,
        "name_en": name_en,
        "size_type_alignment": size_type,
        "challenge_rating": cr,
    }))
    .expect("monster fixture should deserialize")
}

fn roster() -> Vec<MonsterRecord> {
    vec![
        monster("リオレウス", Some("Rathalos"), "超大型の飛竜種、無属性", Some("17 (18,000 XP)")),
        monster("ランポス", Some("Velociprey"), "小型の鳥竜種、無属性", Some("1/4 (50 XP)")),
        monster("ドスジャギィ", Some("Great Jaggi"), "中型の鳥竜種、無属性", Some("2 (450 XP)")),
        monster("謎の影", None, "不定形、無属性", None),
        monster("リオレイア", Some("Rathian"), "大型の飛竜種、無属性", Some("13 (10,000 XP)")),
        monster("ジャギィ", Some("Jaggi"), "小型の鳥竜種、無属性", Some("1/8 (25 XP)")),
        monster("ケルビ", Some("Kelbi"), "小型の草食種、無属性", Some("0 (10 XP)")),
        monster("アプトノス", None, "大型の草食種、無属性", Some("1/2 (100 XP)")),
    ]
}

fn names(records: &[&MonsterRecord]) -> Vec<String> {
    records.iter().map(|m| m.name_jp.clone()).collect()
}

fn filter(search: &str, species: &str, cr: &str, sort: SortKey) -> FilterState {
    FilterState {
        search_text: search.to_string(),
        species: species.to_string(),
        challenge_rating: cr.to_string(),
        sort_key: sort,
    }
}

#[test]
fn default_filter_keeps_every_record_in_input_order() {
    let records = roster();
    let all = apply(&records, &FilterState::default());
    assert_eq!(all.len(), records.len());
    let expected: Vec<String> = records.iter().map(|m| m.name_jp.clone()).collect();
    assert_eq!(names(&all), expected);
}

#[test]
fn search_matches_either_name_case_insensitively() {
    let records = roster();
    let by_japanese = apply(&records, &filter("ジャギィ", ALL, ALL, SortKey::Default));
    assert_eq!(names(&by_japanese), vec!["ドスジャギィ", "ジャギィ"]);

    let by_english = apply(&records, &filter("RATH", ALL, ALL, SortKey::Default));
    assert_eq!(names(&by_english), vec!["リオレウス", "リオレイア"]);
}

#[test]
fn search_without_matches_yields_empty_view() {
    let records = roster();
    let none = apply(&records, &filter("存在しない", ALL, ALL, SortKey::Default));
    assert!(none.is_empty());
}

#[test]
fn species_filter_uses_extracted_species() {
    let records = roster();
    let birds = apply(&records, &filter("", "鳥竜種", ALL, SortKey::Default));
    assert_eq!(names(&birds), vec!["ランポス", "ドスジャギィ", "ジャギィ"]);
}

#[test]
fn challenge_rating_filter_is_a_prefix_match() {
    let records = roster();
    let one_over = apply(&records, &filter("", ALL, "1/", SortKey::Default));
    assert_eq!(names(&one_over), vec!["ランポス", "ジャギィ", "アプトノス"]);

    // "1" also matches 13 and 17.
    let ones = apply(&records, &filter("", ALL, "1", SortKey::Default));
    assert_eq!(
        names(&ones),
        vec!["リオレウス", "ランポス", "リオレイア", "ジャギィ", "アプトノス"]
    );
}

#[test]
fn filters_compose() {
    let records = roster();
    let view = apply(&records, &filter("jaggi", "鳥竜種", "2", SortKey::Default));
    assert_eq!(names(&view), vec!["ドスジャギィ"]);
}

#[test]
fn challenge_rating_sorts_put_unrated_first_and_are_stable() {
    let records = roster();
    let ascending = apply(&records, &filter("", ALL, ALL, SortKey::CrAsc));
    assert_eq!(
        names(&ascending),
        vec![
            "謎の影",
            "ケルビ",
            "ジャギィ",
            "ランポス",
            "アプトノス",
            "ドスジャギィ",
            "リオレイア",
            "リオレウス"
        ]
    );

    let descending = apply(&records, &filter("", ALL, ALL, SortKey::CrDesc));
    assert_eq!(names(&descending).first().map(String::as_str), Some("リオレウス"));
    assert_eq!(names(&descending).last().map(String::as_str), Some("謎の影"));
}

#[test]
fn equal_challenge_ratings_keep_load_order() {
    let records = vec![
        monster("甲", None, "中型の甲殻種、無属性", Some("3 (700 XP)")),
        monster("乙", None, "中型の甲殻種、無属性", Some("1 (200 XP)")),
        monster("丙", None, "中型の甲殻種、無属性", Some("3 (700 XP)")),
        monster("丁", None, "中型の甲殻種、無属性", Some("3 (700 XP)")),
    ];
    let ascending = apply(&records, &filter("", ALL, ALL, SortKey::CrAsc));
    assert_eq!(names(&ascending), vec!["乙", "甲", "丙", "丁"]);
    let descending = apply(&records, &filter("", ALL, ALL, SortKey::CrDesc));
    assert_eq!(names(&descending), vec!["甲", "丙", "丁", "乙"]);
}

#[test]
fn name_sort_folds_katakana_onto_hiragana() {
    let records = vec![
        monster("リオレウス", None, "大型の飛竜種、無属性", None),
        monster("あぷとのす", None, "大型の草食種、無属性", None),
        monster("ケルビ", None, "小型の草食種、無属性", None),
        monster("アオアシラ", None, "大型の牙獣種、無属性", None),
    ];
    let sorted = apply(&records, &filter("", ALL, ALL, SortKey::NameAsc));
    assert_eq!(
        names(&sorted),
        vec!["アオアシラ", "あぷとのす", "ケルビ", "リオレウス"]
    );
}

#[test]
fn collation_key_is_case_and_script_insensitive() {
    assert_eq!(collation_key("リオ").0, collation_key("りお").0);
    assert_eq!(collation_key("Rathalos").0, collation_key("rathalos").0);
    assert_ne!(collation_key("リオ").1, collation_key("りお").1);
}

#[test]
fn unknown_sort_key_keeps_input_order() {
    assert_eq!(SortKey::parse("weight_desc"), SortKey::Default);
    assert_eq!(SortKey::parse("cr_desc"), SortKey::CrDesc);
    assert_eq!(SortKey::NameAsc.as_str(), "name_asc");
}

#[test]
fn species_options_are_distinct_and_sorted() {
    let options = species_options(&roster());
    assert_eq!(options, vec!["草食種", "飛竜種", "鳥竜種"]);
}

#[test]
fn challenge_rating_options_sort_numerically() {
    let options = challenge_rating_options(&roster());
    assert_eq!(options, vec!["0", "1/8", "1/4", "1/2", "2", "13", "17"]);
}

#[test]
fn facets_combine_both_option_lists() {
    let records = roster();
    let facets = facets(&records);
    assert_eq!(facets.species, species_options(&records));
    assert_eq!(facets.challenge_ratings, challenge_rating_options(&records));
}

#[test]
fn filter_state_deserializes_with_defaults() {
    let state: FilterState =
        serde_json::from_value(json!({"search_text": "リオ", "sort_key": "cr_asc"}))
            .expect("filter state should deserialize");
    assert_eq!(state.species, ALL);
    assert_eq!(state.challenge_rating, ALL);
    assert_eq!(state.sort_key, SortKey::CrAsc);
}
