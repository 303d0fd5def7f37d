use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::format::format_hours;

/// Something time is tracked against: a name and a balance in hours.
///
/// Balances are owned and computed elsewhere; dialogs only read them.
/// Zero or negative means there is no budget left to count down.
pub trait Activity {
    fn name(&self) -> &str;
    fn balance(&self) -> f64;

    fn has_budget(&self) -> bool {
        self.balance() > 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub name: String,
    #[serde(alias = "balance")]
    pub saldo: f64,
}

impl ActivityRecord {
    pub fn new(name: impl Into<String>, saldo: f64) -> Self {
        Self {
            name: name.into(),
            saldo,
        }
    }

    /// Label used when listing activities in a choice dialog.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, format_hours(self.saldo, false))
    }
}

impl Activity for ActivityRecord {
    fn name(&self) -> &str {
        &self.name
    }

    fn balance(&self) -> f64 {
        self.saldo
    }
}

/// Read a JSON array of `{ "name": ..., "saldo": ... }` objects.
pub fn load_activities(path: &Path) -> Result<Vec<ActivityRecord>> {
    let content = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })
}
