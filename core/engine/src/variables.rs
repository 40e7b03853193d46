//! FILENAME: core/engine/src/variables.rs
//! PURPOSE: Variable table and the bulk loading formats hosts use to fill it.
//! CONTEXT: Names are trimmed and lower-cased on the way in and on lookup,
//! so `A`, ` a ` and `a` are the same variable.

use crate::error::{EvalError, EvalResult};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableTable {
    values: HashMap<String, f64>,
}

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(&normalize(name)).copied()
    }

    /// Stores a value. Blank names are ignored.
    pub fn set(&mut self, name: &str, value: f64) {
        let name = normalize(name);
        if !name.is_empty() {
            self.values.insert(name, value);
        }
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Loads every entry of `source`. Stops at the first malformed entry;
    /// entries before it stay loaded.
    pub fn load(&mut self, source: VariableSource) -> EvalResult<()> {
        match source {
            VariableSource::Text(text) => {
                for entry in text.split(';') {
                    self.load_entry(entry)?;
                }
            }
            VariableSource::List(entries) => {
                for entry in &entries {
                    self.load_entry(entry)?;
                }
            }
            VariableSource::Map(map) => {
                for (name, value) in map {
                    self.set(&name, value);
                }
            }
        }
        Ok(())
    }

    /// Parses one `name=value` entry. Blank entries (e.g. after a trailing `;`) are skipped.
    fn load_entry(&mut self, entry: &str) -> EvalResult<()> {
        if entry.trim().is_empty() {
            return Ok(());
        }

        let invalid = || EvalError::InvalidVariable {
            entry: entry.trim().to_string(),
        };

        let (name, value) = entry.split_once('=').ok_or_else(invalid)?;
        if name.trim().is_empty() {
            return Err(invalid());
        }
        let value: f64 = value.trim().parse().map_err(|_| invalid())?;

        self.set(name, value);
        Ok(())
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// The shapes a host may hand variables over in.
#[derive(Debug, Clone, PartialEq)]
pub enum VariableSource {
    /// `a=1;b=2.5`
    Text(String),
    /// `["a=1", "b=2.5"]`
    List(Vec<String>),
    Map(BTreeMap<String, f64>),
}

impl From<&str> for VariableSource {
    fn from(text: &str) -> Self {
        VariableSource::Text(text.to_string())
    }
}

impl From<String> for VariableSource {
    fn from(text: String) -> Self {
        VariableSource::Text(text)
    }
}

impl From<Vec<String>> for VariableSource {
    fn from(entries: Vec<String>) -> Self {
        VariableSource::List(entries)
    }
}

impl From<&[&str]> for VariableSource {
    fn from(entries: &[&str]) -> Self {
        VariableSource::List(entries.iter().map(|e| e.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for VariableSource {
    fn from(entries: [&str; N]) -> Self {
        VariableSource::List(entries.iter().map(|e| e.to_string()).collect())
    }
}

impl From<BTreeMap<String, f64>> for VariableSource {
    fn from(map: BTreeMap<String, f64>) -> Self {
        VariableSource::Map(map)
    }
}

impl From<HashMap<String, f64>> for VariableSource {
    fn from(map: HashMap<String, f64>) -> Self {
        VariableSource::Map(map.into_iter().collect())
    }
}
