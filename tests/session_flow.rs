// tests/session_flow.rs
//
// Phase transitions and field caching through `FormSession`.

use coeff_form_analyzer::{
    CalcConfig, FieldCache, FieldId, FormSession, InputErrorKind, JsonFileCache, Key, Phase,
    Player, SessionError,
};
use std::fs;
use std::path::PathBuf;

/// Create a unique temporary directory in std::env::temp_dir().
fn unique_tmp_dir(tag: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    dir.push(format!("coeff_{tag}_{}_{nanos}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn f(round: usize, player: Player) -> FieldId {
    FieldId::new(round, player)
}

#[test]
fn first_round_moves_to_review() {
    let mut s = FormSession::in_memory(CalcConfig::default());
    assert_eq!(s.phase(), Phase::Editing);
    assert_eq!(s.set_field(f(0, Player::One), "1.85").unwrap(), Phase::Editing);
    assert_eq!(
        s.set_field(f(0, Player::Two), "1.95").unwrap(),
        Phase::ReviewingResults
    );
    assert!(s.outcome().is_ok());
}

#[test]
fn invalid_field_returns_to_editing() {
    let mut s = FormSession::in_memory(CalcConfig::default());
    s.set_field(f(0, Player::One), "1.85").unwrap();
    s.set_field(f(0, Player::Two), "1.95").unwrap();
    assert_eq!(s.set_field(f(1, Player::One), "abc").unwrap(), Phase::Editing);
    let err = s.outcome().as_ref().unwrap_err();
    assert_eq!(err.kind(), InputErrorKind::FormatOrRange);
}

#[test]
fn filling_last_field_shows_prediction() {
    let mut s = FormSession::in_memory(CalcConfig::default());
    let values = [
        ("1.85", "1.95"),
        ("1.80", "1.99"),
        ("1.75", "2.05"),
        ("1.70", "2.10"),
        ("1.65", "2.20"),
    ];
    for (i, (a, b)) in values.iter().enumerate() {
        s.set_field(f(i, Player::One), a).unwrap();
        s.set_field(f(i, Player::Two), b).unwrap();
        assert_eq!(s.phase(), Phase::ReviewingResults);
    }
    s.set_field(f(5, Player::One), "1.60").unwrap();
    assert_eq!(s.phase(), Phase::ReviewingResults);
    assert_eq!(
        s.set_field(f(5, Player::Two), "2.25").unwrap(),
        Phase::ShowingPrediction
    );
}

#[test]
fn finalize_needs_a_computable_form() {
    let mut s = FormSession::in_memory(CalcConfig::default());
    match s.finalize() {
        Err(SessionError::NotReady(e)) => assert_eq!(e.kind(), InputErrorKind::InsufficientInput),
        other => panic!("expected NotReady, got {other:?}"),
    }
    assert_eq!(s.phase(), Phase::Editing);

    s.set_field(f(0, Player::One), "1.85").unwrap();
    s.set_field(f(0, Player::Two), "1.95").unwrap();
    assert_eq!(s.finalize().unwrap(), Phase::ShowingPrediction);
}

#[test]
fn paste_and_keypad_normalize_input() {
    let mut s = FormSession::in_memory(CalcConfig::default());
    s.paste(f(0, Player::One), " 1,857 x").unwrap();
    assert_eq!(s.raw(f(0, Player::One)), "1.85");

    for k in ["2", ".", ".", "1", "0", "9"] {
        s.press_key(f(0, Player::Two), Key::parse(k).unwrap()).unwrap();
    }
    assert_eq!(s.raw(f(0, Player::Two)), "2.10");
    s.press_key(f(0, Player::Two), Key::Delete).unwrap();
    assert_eq!(s.raw(f(0, Player::Two)), "2.1");
    assert_eq!(s.phase(), Phase::ReviewingResults);
}

#[test]
fn clear_wipes_values_and_cache() {
    let mut s = FormSession::in_memory(CalcConfig::default());
    s.set_field(f(0, Player::One), "1.85").unwrap();
    s.set_field(f(0, Player::Two), "1.95").unwrap();
    s.finalize().unwrap();

    assert_eq!(s.clear(), Phase::Editing);
    assert!(s.rounds().iter().all(|r| r.p1.is_none() && r.p2.is_none()));
    assert!(s.cache().is_empty());
}

#[test]
fn file_cache_restores_form_between_sessions() {
    let path = unique_tmp_dir("session").join("fields.json");

    {
        let cache = JsonFileCache::open(&path).unwrap();
        let mut s = FormSession::new(CalcConfig::default(), cache);
        s.set_field(f(0, Player::One), "1.85").unwrap();
        s.set_field(f(0, Player::Two), "1.95").unwrap();
        s.set_field(f(1, Player::One), "1.50").unwrap();
    }

    let cache = JsonFileCache::open(&path).unwrap();
    assert_eq!(cache.get("g6P1").as_deref(), Some("1.50"));
    let s = FormSession::restore(CalcConfig::default(), cache);
    assert_eq!(s.raw(f(0, Player::Two)), "1.95");
    assert_eq!(s.phase(), Phase::ReviewingResults);

    let mut s = s;
    s.clear();
    let reopened = JsonFileCache::open(&path).unwrap();
    assert!(reopened.get("g5P1").is_none());
}
