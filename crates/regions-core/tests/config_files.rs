//! File-backed configuration stores

#![allow(missing_docs)]

use assert_matches::assert_matches;
use regions_core::config::{load_json_file, load_toml_file, save_json_file, save_toml_file};
use regions_core::{codec, indexed_enum, CapabilitySet, ConfigSection, RegionsError};

indexed_enum! {
    /// Hazards stored in the sample documents.
    pub enum Hazard {
        Damage => "damage",
        Fire => "fire",
        Explosion => "explosion",
    }
}

#[test]
fn json_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("area.json");

    let mut config = load_json_file(&path).unwrap();
    assert!(config.child_keys("roles").is_empty());

    let set: CapabilitySet<Hazard> = [Hazard::Fire, Hazard::Damage].into_iter().collect();
    codec::save(&set, &mut config, "protections").unwrap();
    save_json_file(&path, &config).unwrap();

    let reread = load_json_file(&path).unwrap();
    let mut restored = CapabilitySet::new();
    codec::load(&mut restored, &reread, "protections", |_| {});
    assert_eq!(restored, set);
}

#[test]
fn toml_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("area.toml");

    let mut table = load_toml_file(&path).unwrap();
    let set: CapabilitySet<Hazard> = [Hazard::Explosion].into_iter().collect();
    codec::save(&set, &mut table, "protections").unwrap();
    save_toml_file(&path, &table).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("explosion"));

    let reread = load_toml_file(&path).unwrap();
    assert_eq!(reread.get_string_list("protections"), vec!["explosion".to_string()]);
}

#[test]
fn corrupt_json_file_is_a_serialization_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("area.json");
    std::fs::write(&path, "{ \"protections\": [").unwrap();

    assert_matches!(load_json_file(&path), Err(RegionsError::Serialization { .. }));
}
