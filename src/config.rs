// Catalog Configuration - Loan policy as data
// Loaded from a JSON file, defaults apply to every missing field.

use anyhow::{bail, Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default loan period: two weeks
pub const DEFAULT_LOAN_PERIOD_DAYS: u32 = 14;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Days between checkout and due date
    pub loan_period_days: u32,
}

impl CatalogConfig {
    /// Load configuration from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: CatalogConfig =
            serde_json::from_str(&content).context("Failed to parse config JSON")?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.loan_period_days == 0 {
            bail!("loan_period_days must be at least 1");
        }
        Ok(())
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig {
            loan_period_days: DEFAULT_LOAN_PERIOD_DAYS,
        }
    }
}
