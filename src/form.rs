// src/form.rs
//! Reading a whole form from the outside world: `P1/P2` pairs from the
//! command line, or a TOML/JSON file.
//!
//! TOML shape:
//! ```toml
//! [[rounds]]
//! p1 = "1.85"
//! p2 = "1.95"
//! ```
//! JSON shape: `[{"p1": "1.85", "p2": "1.95"}, ...]` or `{"rounds": [...]}`.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::coefficient::RoundInput;

#[derive(Debug, Deserialize)]
struct FormFile {
    #[serde(default)]
    rounds: Vec<RoundInput>,
}

/// `"1.85/1.95"` → both sides; `"1.85/"` or `"/1.95"` leave one side empty.
pub fn parse_pair(s: &str) -> Result<RoundInput> {
    let (p1, p2) = s
        .split_once('/')
        .ok_or_else(|| anyhow!("expected P1/P2, got {s:?}"))?;
    let side = |v: &str| {
        let t = v.trim();
        (!t.is_empty()).then(|| t.to_string())
    };
    Ok(RoundInput {
        p1: side(p1),
        p2: side(p2),
    })
}

pub fn parse_pairs<S: AsRef<str>>(items: &[S]) -> Result<Vec<RoundInput>> {
    items.iter().map(|s| parse_pair(s.as_ref())).collect()
}

/// Load a form file; the extension picks the format, content sniffing is the fallback.
pub fn load_form_file(path: &Path) -> Result<Vec<RoundInput>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading form from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_form(&content, ext.as_str())
}

fn parse_form(s: &str, hint_ext: &str) -> Result<Vec<RoundInput>> {
    let try_toml = hint_ext == "toml" || s.contains("[[rounds]]");
    if try_toml {
        if let Ok(v) = toml::from_str::<FormFile>(s) {
            return Ok(v.rounds);
        }
    }
    if let Ok(v) = serde_json::from_str::<Vec<RoundInput>>(s) {
        return Ok(v);
    }
    if let Ok(v) = serde_json::from_str::<FormFile>(s) {
        return Ok(v.rounds);
    }
    if !try_toml {
        if let Ok(v) = toml::from_str::<FormFile>(s) {
            return Ok(v.rounds);
        }
    }
    Err(anyhow!("unsupported form format"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_allow_empty_sides() {
        let v = parse_pairs(&["1.85/1.95", "1.70/", " / 2,10 "]).unwrap();
        assert_eq!(v[0], RoundInput::new("1.85", "1.95"));
        assert_eq!(v[1].p2, None);
        assert_eq!(v[2].p1, None);
        assert_eq!(v[2].p2.as_deref(), Some("2,10"));
        assert!(parse_pair("1.85").is_err());
    }

    #[test]
    fn toml_and_json_forms() {
        let toml = "[[rounds]]\np1 = \"1.85\"\np2 = \"1.95\"\n\n[[rounds]]\np1 = \"1.50\"\n";
        let t = parse_form(toml, "toml").unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t[1].p2, None);

        let json = r#"[{"p1":"1.85","p2":"1.95"},{"p2":"1.99"}]"#;
        let j = parse_form(json, "json").unwrap();
        assert_eq!(j[1].p1, None);

        let wrapped = r#"{"rounds":[{"p1":"2.00","p2":"2.10"}]}"#;
        assert_eq!(parse_form(wrapped, "").unwrap().len(), 1);

        assert!(parse_form("hello", "txt").is_err());
    }
}
