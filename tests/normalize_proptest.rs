//! Property tests for the model-output normalizer. The normalizer runs on
//! whatever the model felt like returning, so the bar is: never panic,
//! always respect the direction and service caps.

use brandgen_server::engine::normalize::{
    clean_model_json, parse_directions, parse_services, safe_str,
};
use proptest::prelude::*;
use serde_json::Value;

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9#áéíñ, ]{0,24}".prop_map(Value::from),
    ];
    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-z_]{1,12}", inner, 0..6)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn directions_never_panic_on_arbitrary_text(raw in "\\PC{0,400}") {
        let _ = parse_directions(&raw);
    }

    #[test]
    fn direction_count_stays_within_bounds(value in arb_json()) {
        if let Ok(directions) = parse_directions(&value.to_string()) {
            prop_assert!(!directions.is_empty());
            prop_assert!(directions.len() <= 5);
        }
    }

    #[test]
    fn wrapped_proposals_always_parse(items in prop::collection::vec(arb_json(), 1..8)) {
        let expected = items.len().min(5);
        let doc = serde_json::json!({ "proposals": items });
        let directions = parse_directions(&doc.to_string()).unwrap();
        prop_assert_eq!(directions.len(), expected);
    }

    #[test]
    fn services_never_panic_and_stay_capped(value in arb_json()) {
        prop_assert!(parse_services(&value.to_string()).len() <= 6);
    }

    #[test]
    fn wrapped_services_parse_up_to_the_cap(items in prop::collection::vec(arb_json(), 0..10)) {
        let expected = items.len().min(6);
        let doc = serde_json::json!({ "services": items });
        prop_assert_eq!(parse_services(&doc.to_string()).len(), expected);
    }

    #[test]
    fn fence_stripping_keeps_the_payload(body in "[a-z{}:, \"]{0,60}") {
        let fenced = format!("```json\n{body}\n```");
        prop_assert_eq!(clean_model_json(&fenced), body.trim());
    }

    #[test]
    fn safe_str_never_panics(value in arb_json()) {
        let _ = safe_str(Some(&value), "fallback");
    }

    #[test]
    fn safe_str_falls_back_on_null_and_blank(fallback in "[a-z]{1,8}") {
        prop_assert_eq!(safe_str(Some(&Value::Null), &fallback), fallback.clone());
        prop_assert_eq!(safe_str(Some(&Value::String("  ".into())), &fallback), fallback.clone());
        prop_assert_eq!(safe_str(None, &fallback), fallback);
    }
}
