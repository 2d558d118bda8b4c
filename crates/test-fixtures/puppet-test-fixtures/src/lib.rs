use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    rigs: HashMap<String, String>,
    streams: HashMap<String, String>,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

/// Rig hierarchies in the JSON node-description format.
pub mod rigs {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.rigs.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.rigs, "rig", name)?;
        read_to_string(rel)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let rel = lookup(&MANIFEST.rigs, "rig", name)?;
        super::load_json(rel)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let rel = lookup(&MANIFEST.rigs, "rig", name)?;
        Ok(resolve_path(rel))
    }
}

/// Recorded wire sessions.
///
/// A stream file is a JSON array; object entries are messages and are
/// re-serialized, string entries are sent verbatim (so a session can carry
/// text that is not valid JSON).
pub mod streams {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.streams.keys().cloned().collect()
    }

    /// Raw text messages in arrival order.
    pub fn messages(name: &str) -> Result<Vec<String>> {
        let rel = lookup(&MANIFEST.streams, "stream", name)?;
        let entries: Vec<serde_json::Value> = super::load_json(rel)?;
        entries
            .into_iter()
            .map(|entry| match entry {
                serde_json::Value::String(raw) => Ok(raw),
                other => serde_json::to_string(&other)
                    .with_context(|| format!("failed to serialize message in {rel}")),
            })
            .collect()
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let rel = lookup(&MANIFEST.streams, "stream", name)?;
        Ok(resolve_path(rel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_manifest_entry_exists() {
        for name in rigs::keys() {
            assert!(rigs::path(&name).unwrap().exists(), "rig {name}");
        }
        for name in streams::keys() {
            assert!(streams::path(&name).unwrap().exists(), "stream {name}");
        }
    }

    #[test]
    fn string_entries_are_kept_verbatim() {
        let msgs = streams::messages("noisy-session").unwrap();
        assert_eq!(msgs[0], "not json at all");
        assert!(msgs[1].starts_with('{'));
    }

    #[test]
    fn unknown_fixture_is_an_error() {
        assert!(rigs::json("nope").is_err());
    }
}
