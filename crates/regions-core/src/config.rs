//! Hierarchical configuration stores
//!
//! Persistence only needs a small view of a configuration document: read and
//! write an ordered list of strings at a dot-separated path, and enumerate
//! the sub-sections under a path. [`ConfigSection`] captures that view and
//! is implemented for JSON documents ([`serde_json::Value`]) and TOML tables
//! ([`toml::Table`]).

use std::fs;
use std::path::Path;

use crate::{RegionsError, Result};

/// Minimal hierarchical key-value store used by the persistence codec.
pub trait ConfigSection {
    /// String list stored at `path`.
    ///
    /// Missing paths and non-list values read as an empty list. Scalar list
    /// entries are converted to strings; nested containers are skipped.
    fn get_string_list(&self, path: &str) -> Vec<String>;

    /// Store `values` at `path`, creating intermediate sections as needed.
    fn set_string_list(&mut self, path: &str, values: Vec<String>) -> Result<()>;

    /// Names of the sub-sections directly under `path`.
    fn child_keys(&self, path: &str) -> Vec<String>;

    /// Drop whatever is stored at `path`. Missing paths are a no-op.
    fn remove_section(&mut self, path: &str) -> Result<()>;
}

fn split_path(path: &str) -> Result<Vec<&str>> {
    let parts: Vec<&str> = path.split('.').collect();
    if parts.iter().any(|part| part.is_empty()) {
        return Err(RegionsError::invalid(format!(
            "Invalid configuration path `{path}`"
        )));
    }
    Ok(parts)
}

impl ConfigSection for serde_json::Value {
    fn get_string_list(&self, path: &str) -> Vec<String> {
        let Some(serde_json::Value::Array(items)) = json_lookup(self, path) else {
            return Vec::new();
        };
        items
            .iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Number(n) => Some(n.to_string()),
                serde_json::Value::Bool(b) => Some(b.to_string()),
                _ => None,
            })
            .collect()
    }

    fn set_string_list(&mut self, path: &str, values: Vec<String>) -> Result<()> {
        let parts = split_path(path)?;

        // Ensure we have an object to work with
        if !self.is_object() {
            *self = serde_json::Value::Object(serde_json::Map::new());
        }

        let mut current = self;

        // Navigate to the parent of the final key
        for part in &parts[..parts.len() - 1] {
            let map = current
                .as_object_mut()
                .ok_or_else(|| RegionsError::invalid("Expected object"))?;
            let entry = map
                .entry(part.to_string())
                .or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));
            if !entry.is_object() {
                *entry = serde_json::Value::Object(serde_json::Map::new());
            }
            current = entry;
        }

        let final_key = parts[parts.len() - 1];
        let map = current
            .as_object_mut()
            .ok_or_else(|| RegionsError::invalid("Cannot set value on non-object"))?;
        map.insert(
            final_key.to_string(),
            serde_json::Value::Array(values.into_iter().map(serde_json::Value::String).collect()),
        );
        Ok(())
    }

    fn child_keys(&self, path: &str) -> Vec<String> {
        match json_lookup(self, path) {
            Some(serde_json::Value::Object(map)) => map
                .iter()
                .filter(|(_, value)| value.is_object())
                .map(|(key, _)| key.clone())
                .collect(),
            _ => Vec::new(),
        }
    }

    fn remove_section(&mut self, path: &str) -> Result<()> {
        let parts = split_path(path)?;
        let Some((last, parents)) = parts.split_last() else {
            return Ok(());
        };

        let mut current = self;
        for part in parents {
            match current.get_mut(*part) {
                Some(next) => current = next,
                None => return Ok(()),
            }
        }
        if let Some(map) = current.as_object_mut() {
            map.remove(*last);
        }
        Ok(())
    }
}

fn json_lookup<'a>(root: &'a serde_json::Value, path: &str) -> Option<&'a serde_json::Value> {
    path.split('.')
        .try_fold(root, |current, part| current.as_object()?.get(part))
}

impl ConfigSection for toml::Table {
    fn get_string_list(&self, path: &str) -> Vec<String> {
        let Some(toml::Value::Array(items)) = toml_lookup(self, path) else {
            return Vec::new();
        };
        items
            .iter()
            .filter_map(|item| match item {
                toml::Value::String(s) => Some(s.clone()),
                toml::Value::Integer(i) => Some(i.to_string()),
                toml::Value::Float(f) => Some(f.to_string()),
                toml::Value::Boolean(b) => Some(b.to_string()),
                _ => None,
            })
            .collect()
    }

    fn set_string_list(&mut self, path: &str, values: Vec<String>) -> Result<()> {
        let parts = split_path(path)?;

        let mut current = self;
        for part in &parts[..parts.len() - 1] {
            let entry = current
                .entry(part.to_string())
                .or_insert(toml::Value::Table(toml::Table::new()));
            if !entry.is_table() {
                *entry = toml::Value::Table(toml::Table::new());
            }
            current = entry
                .as_table_mut()
                .ok_or_else(|| RegionsError::invalid("Expected table"))?;
        }

        current.insert(
            parts[parts.len() - 1].to_string(),
            toml::Value::Array(values.into_iter().map(toml::Value::String).collect()),
        );
        Ok(())
    }

    fn child_keys(&self, path: &str) -> Vec<String> {
        match toml_lookup(self, path) {
            Some(toml::Value::Table(table)) => table
                .iter()
                .filter(|(_, value)| value.is_table())
                .map(|(key, _)| key.clone())
                .collect(),
            _ => Vec::new(),
        }
    }

    fn remove_section(&mut self, path: &str) -> Result<()> {
        let parts = split_path(path)?;
        let Some((last, parents)) = parts.split_last() else {
            return Ok(());
        };

        let mut current = self;
        for part in parents {
            match current.get_mut(*part).and_then(toml::Value::as_table_mut) {
                Some(next) => current = next,
                None => return Ok(()),
            }
        }
        current.remove(*last);
        Ok(())
    }
}

fn toml_lookup<'a>(root: &'a toml::Table, path: &str) -> Option<&'a toml::Value> {
    let mut parts = path.split('.');
    let first = root.get(parts.next()?)?;
    parts.try_fold(first, |current, part| current.as_table()?.get(part))
}

/// Read a JSON configuration document. A missing file reads as an empty object.
pub fn load_json_file(path: &Path) -> Result<serde_json::Value> {
    if !path.exists() {
        return Ok(serde_json::Value::Object(serde_json::Map::new()));
    }
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Write a JSON configuration document, pretty-printed.
pub fn save_json_file(path: &Path, value: &serde_json::Value) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    fs::write(path, content)?;
    Ok(())
}

/// Read a TOML configuration document. A missing file reads as an empty table.
pub fn load_toml_file(path: &Path) -> Result<toml::Table> {
    if !path.exists() {
        return Ok(toml::Table::new());
    }
    let content = fs::read_to_string(path)?;
    Ok(content.parse::<toml::Table>()?)
}

/// Write a TOML configuration document.
pub fn save_toml_file(path: &Path, table: &toml::Table) -> Result<()> {
    let content = toml::to_string_pretty(table)?;
    fs::write(path, content)?;
    Ok(())
}
