#![cfg(target_arch = "wasm32")]

use card_combat::CombatSession;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn session_reports_snapshot_and_events() {
    let mut session = CombatSession::new(None, None, None).expect("default session");

    let response = session
        .submit_intent(r#"{"type":"Draw"}"#)
        .expect("intent json parses");
    let value: serde_json::Value = serde_json::from_str(&response).expect("response is json");
    assert_eq!(value["snapshot"]["phase"], "PlayerTurn");
    assert_eq!(value["events"][0]["type"], "CardDrawn");
    assert_eq!(value["snapshot"]["player"]["hand"].as_array().map(Vec::len), Some(1));
}

#[wasm_bindgen_test]
fn refused_intents_are_silent() {
    let mut session = CombatSession::new(None, None, None).expect("default session");
    let response = session
        .submit_intent(r#"{"type":"ResolveStaged"}"#)
        .expect("intent json parses");
    let value: serde_json::Value = serde_json::from_str(&response).expect("response is json");
    assert_eq!(value["events"].as_array().map(Vec::len), Some(0));

    assert!(session.submit_intent("not json").is_err());
}

#[wasm_bindgen_test]
fn debug_win_is_recorded_in_progress() {
    let mut session = CombatSession::new(None, Some(r#"{"debug_mode":true}"#.into()), None)
        .expect("debug session");
    session
        .submit_intent(r#"{"type":"DebugForceWin"}"#)
        .expect("intent json parses");

    let progress: serde_json::Value =
        serde_json::from_str(&session.progress().expect("progress json")).expect("json");
    assert_eq!(progress["battle_attempts"]["debug"], 1);
    assert_eq!(progress["completed_battles"][0], "debug");
}
