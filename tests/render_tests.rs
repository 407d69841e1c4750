use compendium::data::MonsterRecord;
use compendium::render::html::{escape, outcome_html, stat_block_html};
use compendium::render::{render, render_batch, RenderError, RenderOptions, RenderOutcome, Section};
use serde_json::json;

fn barroth() -> MonsterRecord {
    serde_json::from_value(json!({
        "name_jp": "ボルボロス",
        "name_en": "Barroth",
        "size_type_alignment": "大型の獣竜種、無属性",
        "armor_class": {"value": 16, "type": "外皮"},
        "hit_points": {"average": 119, "dice": "14d10 + 42"},
        "speed": "40フィート、穴掘り20フィート",
        "ability_scores": {
            "strength": "21 (+5)",
            "dexterity": "9 (-1)",
            "constitution": "17 (+3)",
            "intelligence": "3 (-4)",
            "wisdom": "12 (+1)",
            "charisma": "7 (-2)"
        },
        "saving_throws": "耐久力+6",
        "damage_resistances": "殴打",
        "languages": "  ",
        "challenge_rating": "6 (2,300 XP)",
        "actions": [
            {"name": "頭突き", "description": "近接武器攻撃: ヒット+8、間合い10フィート、目標1体。"}
        ],
        "reactions": []
    }))
    .expect("monster fixture should deserialize")
}

fn bare(name_jp: &str) -> MonsterRecord {
    serde_json::from_value(json!({"name_jp": name_jp})).expect("bare fixture should deserialize")
}

fn field_labels(sections: &[Section]) -> Vec<&str> {
    sections
        .iter()
        .filter_map(|section| match section {
            Section::Field(field) => Some(field.label),
            _ => None,
        })
        .collect()
}

#[test]
fn render_lays_out_sections_in_display_order() {
    let block = render(&barroth(), RenderOptions::default()).expect("record should render");

    assert_eq!(block.title, "ボルボロス (Barroth)");
    assert!(matches!(
        &block.sections[0],
        Section::SizeType { text } if text == "大型の獣竜種、無属性"
    ));
    assert_eq!(
        field_labels(&block.sections),
        vec![
            "アーマークラス",
            "ヒットポイント",
            "移動速度",
            "セーヴィングスロー",
            "ダメージ抵抗",
            "脅威度"
        ]
    );

    let Section::Field(ac) = &block.sections[1] else {
        panic!("armor class should follow the size line");
    };
    assert_eq!(ac.value, "16 (外皮)");
    let Section::Field(hp) = &block.sections[2] else {
        panic!("hit points should follow armor class");
    };
    assert_eq!(hp.value, "119 (14d10 + 42)");
}

#[test]
fn render_lists_six_ability_scores() {
    let block = render(&barroth(), RenderOptions::default()).expect("record should render");
    let scores = block
        .sections
        .iter()
        .find_map(|section| match section {
            Section::AbilityScores { scores } => Some(scores),
            _ => None,
        })
        .expect("ability scores section should be present");
    let labels: Vec<&str> = scores.iter().map(|s| s.label).collect();
    assert_eq!(labels, vec!["筋力", "敏捷力", "耐久力", "知力", "判断力", "魅力"]);
    assert_eq!(scores[0].value, "21 (+5)");
}

#[test]
fn empty_sequences_are_omitted() {
    let block = render(&barroth(), RenderOptions::default()).expect("record should render");
    let titles: Vec<&str> = block
        .sections
        .iter()
        .filter_map(|section| match section {
            Section::Items { title, .. } => Some(*title),
            _ => None,
        })
        .collect();
    assert_eq!(titles, vec!["アクション"]);
}

#[test]
fn list_view_links_and_single_view_does_not() {
    let list = render(&barroth(), RenderOptions::default()).expect("record should render");
    assert_eq!(
        list.link.as_deref(),
        Some("?monster=%E3%83%9C%E3%83%AB%E3%83%9C%E3%83%AD%E3%82%B9")
    );

    let single =
        render(&barroth(), RenderOptions { single_view: true }).expect("record should render");
    assert_eq!(single.link, None);
}

#[test]
fn missing_required_fields_fail_rendering() {
    let err = render(&bare("謎の影"), RenderOptions::default()).expect_err("should fail");
    assert_eq!(
        err,
        RenderError::MissingHitPoints {
            name_jp: "謎の影".to_string()
        }
    );

    let mut no_scores = barroth();
    no_scores.ability_scores = None;
    let err = render(&no_scores, RenderOptions::default()).expect_err("should fail");
    assert!(matches!(err, RenderError::MissingAbilityScores { .. }));
}

#[test]
fn batch_isolates_failures_in_place() {
    let records = vec![barroth(), bare("謎の影"), barroth()];
    let outcomes = render_batch(&records, RenderOptions::default());

    assert_eq!(outcomes.len(), 3);
    assert!(matches!(outcomes[0], RenderOutcome::Rendered(_)));
    assert!(matches!(
        &outcomes[1],
        RenderOutcome::Failed { name_jp, .. } if name_jp == "謎の影"
    ));
    assert!(matches!(outcomes[2], RenderOutcome::Rendered(_)));
}

#[test]
fn html_card_escapes_text_and_appends_session_suffix() {
    let mut monster = barroth();
    monster.name_en = Some("<Barroth>".to_string());
    let block = render(&monster, RenderOptions::default()).expect("record should render");
    let html = stat_block_html(&block, "&sort=cr_asc");

    assert!(html.starts_with("<div class=\"stat-block\">"));
    assert!(html.contains("ボルボロス (&lt;Barroth&gt;)"));
    assert!(html.contains("&amp;sort=cr_asc\">"));
    assert!(html.contains("<strong><em>頭突き.</em></strong>"));
    assert!(html.contains("<li><h4>筋力</h4><p>21 (+5)</p></li>"));
}

#[test]
fn failed_outcome_renders_inline_notice() {
    let outcomes = render_batch([&bare("謎の影")], RenderOptions::default());
    let html = outcome_html(&outcomes[0], "");
    assert!(html.contains("render-error"));
    assert!(html.contains("謎の影"));
}

#[test]
fn escape_covers_markup_characters() {
    assert_eq!(escape("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
}

#[test]
fn stat_block_serializes_with_tagged_sections() {
    let block = render(&barroth(), RenderOptions::default()).expect("record should render");
    let value = serde_json::to_value(&block).expect("stat block should serialize");
    assert_eq!(value["sections"][0]["kind"], "size_type");
    assert_eq!(value["sections"][1]["kind"], "field");
    assert_eq!(value["sections"][1]["label"], "アーマークラス");
}
