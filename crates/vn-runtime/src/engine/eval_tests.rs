use super::eval::compare;
use super::runtime_test_support::*;
use super::*;
use serde_json::json;

fn dialogue_engine(
    content: &str,
    globals: serde_json::Value,
    variables: serde_json::Value,
) -> (Engine, EventRecorder) {
    engine_with(
        json!([{"id": 1, "type": "dialogue", "label": "N", "content": content}]),
        Some(values(globals)),
        Some(values(variables)),
    )
}

#[test]
fn globals_win_over_locals_when_interpolating() {
    let (engine, _) = dialogue_engine("", json!({"name": "Global"}), json!({"name": "Local"}));
    assert_eq!(engine.render_text(Some("Hi <name>!")), "Hi Global!");
}

#[test]
fn unknown_placeholders_stay_verbatim() {
    let (engine, _) = dialogue_engine("", json!({}), json!({"known": 1}));
    assert_eq!(
        engine.render_text(Some("<known> and <unknown>")),
        "1 and <unknown>"
    );
}

#[test]
fn rendering_is_idempotent_without_placeholders() {
    let (engine, _) = dialogue_engine("", json!({"a": 1}), json!({}));
    let plain = "No brackets here, just text.";
    let once = engine.render_text(Some(plain));
    assert_eq!(once, plain);
    assert_eq!(engine.render_text(Some(&once)), once);
}

#[test]
fn empty_and_missing_templates_render_empty() {
    let (engine, _) = engine_from(json!([]));
    assert_eq!(engine.render_text(None), "");
    assert_eq!(engine.render_text(Some("")), "");
}

#[test]
fn values_render_as_text() {
    let (engine, _) = dialogue_engine(
        "",
        json!({"ratio": 2.5, "count": 3, "flag": false, "tags": ["x", 1]}),
        json!({}),
    );
    assert_eq!(
        engine.render_text(Some("<ratio>|<count>|<flag>|<tags>")),
        "2.5|3|false|x,1"
    );
}

#[test]
fn environment_shadows_both_scopes() {
    let (engine, _) = dialogue_engine("", json!({"isDay": false}), json!({"isDay": false}));
    assert_eq!(engine.resolve_condition_value("isDay", true), VnValue::Bool(true));
    assert_eq!(engine.resolve_condition_value("isDay", false), VnValue::Bool(true));
}

#[test]
fn missing_condition_variables_resolve_to_zero() {
    let (engine, _) = dialogue_engine("", json!({"only_global": 4}), json!({}));
    assert_eq!(engine.resolve_condition_value("only_global", false), VnValue::zero());
    assert_eq!(engine.resolve_condition_value("only_global", true), VnValue::from(4));
}

#[test]
fn environment_flags_are_not_interpolated() {
    let (engine, _) = dialogue_engine("", json!({}), json!({}));
    assert_eq!(engine.render_text(Some("<isDay>")), "<isDay>");
}

#[test]
fn equality_is_strict_on_type() {
    let one = VnValue::from(1);
    assert!(compare(&one, Comparison::Equal, Some(&VnValue::from(1.0))));
    assert!(!compare(&one, Comparison::Equal, Some(&VnValue::from("1"))));
    assert!(compare(&one, Comparison::NotEqual, Some(&VnValue::from(true))));
}

#[test]
fn ordering_needs_matching_types() {
    let five = VnValue::from(5);
    assert!(compare(&five, Comparison::GreaterThan, Some(&VnValue::from(3))));
    assert!(compare(&five, Comparison::LessThan, Some(&VnValue::from(8))));
    assert!(!compare(&five, Comparison::GreaterThan, Some(&VnValue::from("3"))));
    assert!(!compare(&five, Comparison::LessThan, Some(&VnValue::from("8"))));

    let apple = VnValue::from("apple");
    assert!(compare(&apple, Comparison::LessThan, Some(&VnValue::from("banana"))));
}

#[test]
fn missing_target_only_satisfies_not_equal() {
    let zero = VnValue::zero();
    assert!(compare(&zero, Comparison::NotEqual, None));
    assert!(!compare(&zero, Comparison::Equal, None));
    assert!(!compare(&zero, Comparison::GreaterThan, None));
    assert!(!compare(&zero, Comparison::LessThan, None));
}

#[test]
fn unknown_operator_never_passes() {
    let zero = VnValue::zero();
    assert!(!compare(&zero, Comparison::Unknown, Some(&zero)));
}

#[test]
fn unknown_operator_in_script_takes_the_failure_branch() {
    let (mut engine, recorder) = engine_from(json!([
        {"id": 1, "type": "conditional", "var": "x", "condition": "roughly", "value": 0, "end": 3},
        {"id": 2, "type": "dialogue", "label": "N", "content": "pass"},
        {"id": 3, "type": "dialogue", "label": "N", "content": "fail"}
    ]));
    engine.start(None).expect("start");
    assert_eq!(recorder.story_events(), vec![say("N", "fail")]);
}
