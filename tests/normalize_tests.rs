use compendium::data::{ArmorClass, HitPoints};
use compendium::normalize::{
    ability_modifier, armor_class, challenge_rating_to_number, challenge_rating_token,
    experience_value, extract_species, hit_point_average, DEFAULT_ARMOR_CLASS,
    UNRATED_CHALLENGE,
};
use serde_json::json;

fn ac(value: serde_json::Value) -> ArmorClass {
    serde_json::from_value(value).expect("armor class fixture should deserialize")
}

fn hp(value: serde_json::Value) -> HitPoints {
    serde_json::from_value(value).expect("hit points fixture should deserialize")
}

#[test]
fn armor_class_reads_plain_numbers_and_text() {
    let number = armor_class(Some(&ac(json!(13))));
    assert_eq!(number.display, "13");
    assert_eq!(number.value, 13);

    let text = armor_class(Some(&ac(json!("14 (外皮)"))));
    assert_eq!(text.display, "14 (外皮)");
    assert_eq!(text.value, 14);
}

#[test]
fn armor_class_appends_structured_type() {
    let typed = armor_class(Some(&ac(json!({"value": 16, "type": "外皮"}))));
    assert_eq!(typed.display, "16 (外皮)");
    assert_eq!(typed.value, 16);

    let untyped = armor_class(Some(&ac(json!({"value": "18"}))));
    assert_eq!(untyped.display, "18");
    assert_eq!(untyped.value, 18);
}

#[test]
fn armor_class_defaults_for_missing_or_unusable_values() {
    for value in [
        None,
        Some(ac(json!({"type": "外皮"}))),
        Some(ac(json!(true))),
        Some(ac(json!("   "))),
    ] {
        let normalized = armor_class(value.as_ref());
        assert_eq!(normalized.display, "N/A");
        assert_eq!(normalized.value, DEFAULT_ARMOR_CLASS);
    }

    let unreadable = armor_class(Some(&ac(json!("不明"))));
    assert_eq!(unreadable.display, "不明");
    assert_eq!(unreadable.value, DEFAULT_ARMOR_CLASS);
}

#[test]
fn ability_modifier_floors_toward_negative_infinity() {
    assert_eq!(ability_modifier(Some("21 (+5)")), 5);
    assert_eq!(ability_modifier(Some("10 (+0)")), 0);
    assert_eq!(ability_modifier(Some("11")), 0);
    assert_eq!(ability_modifier(Some("9 (-1)")), -1);
    assert_eq!(ability_modifier(Some("8")), -1);
    assert_eq!(ability_modifier(Some("7")), -2);
    assert_eq!(ability_modifier(Some("1 (-5)")), -5);
}

#[test]
fn ability_modifier_treats_unreadable_scores_as_ten() {
    assert_eq!(ability_modifier(None), 0);
    assert_eq!(ability_modifier(Some("")), 0);
    assert_eq!(ability_modifier(Some("—")), 0);
}

#[test]
fn ability_modifier_saturates_at_integer_extremes() {
    assert_eq!(ability_modifier(Some("-2147483648")), -1_073_741_824);
    assert_eq!(ability_modifier(Some("2147483647 (+0)")), 1_073_741_818);
    assert_eq!(ability_modifier(Some("99999999999")), 0);
}

#[test]
fn challenge_rating_token_is_the_first_word() {
    assert_eq!(challenge_rating_token(Some("1/4 (50 XP)")), Some("1/4"));
    assert_eq!(challenge_rating_token(Some("  17 (18,000 XP)")), Some("17"));
    assert_eq!(challenge_rating_token(Some("")), None);
    assert_eq!(challenge_rating_token(None), None);
}

#[test]
fn challenge_rating_to_number_handles_fractions_and_integers() {
    assert_eq!(challenge_rating_to_number(Some("1/2 (100 XP)")), 0.5);
    assert_eq!(challenge_rating_to_number(Some("1/8 (25 XP)")), 0.125);
    assert_eq!(challenge_rating_to_number(Some("0 (10 XP)")), 0.0);
    assert_eq!(challenge_rating_to_number(Some("5 (1,800 XP)")), 5.0);
    assert_eq!(challenge_rating_to_number(Some("20")), 20.0);
}

#[test]
fn challenge_rating_to_number_maps_unreadable_values_to_sentinel() {
    for raw in [None, Some(""), Some("不明"), Some("1/0"), Some("1/2/3"), Some("a/2")] {
        assert_eq!(challenge_rating_to_number(raw), UNRATED_CHALLENGE, "input {raw:?}");
    }
}

#[test]
fn extract_species_reads_the_size_template() {
    assert_eq!(
        extract_species(Some("大型の飛竜種、無属性")).as_deref(),
        Some("飛竜種")
    );
    assert_eq!(
        extract_species(Some("小型の鳥竜種")).as_deref(),
        Some("鳥竜種")
    );
    assert_eq!(extract_species(Some("不定形、無属性")), None);
    assert_eq!(extract_species(Some("大型の、無属性")), None);
    assert_eq!(extract_species(None), None);
}

#[test]
fn experience_value_reads_first_parenthesis_group() {
    assert_eq!(experience_value(Some("5 (1,800 XP)")), 1800);
    assert_eq!(experience_value(Some("20（25,000 XP）")), 25000);
    assert_eq!(experience_value(Some("1/4 (50 XP)")), 50);
    assert_eq!(experience_value(Some("5")), 0);
    assert_eq!(experience_value(Some("5 (XP不明)")), 0);
    assert_eq!(experience_value(None), 0);
}

#[test]
fn hit_point_average_accepts_numbers_and_text() {
    assert_eq!(hit_point_average(&hp(json!({"average": 52, "dice": "8d8 + 16"}))), 52);
    assert_eq!(hit_point_average(&hp(json!({"average": "76", "dice": "9d10 + 27"}))), 76);
    assert_eq!(hit_point_average(&hp(json!({"average": 12.7}))), 12);
    assert_eq!(hit_point_average(&hp(json!({"average": "約"}))), 0);
}
