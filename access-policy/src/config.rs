//! Policy configuration loaded from YAML.
//!
//! Every key is optional and falls back to the default, so an empty mapping
//! (`{}`) yields the stock policy:
//!
//! ```yaml
//! max_bulk_selection: 50
//! territoryless_resources_visible: true
//! ```

use crate::error::{AuthzError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Upper bound on any bulk selection. Configuration may lower the cap but
/// never raise it past this value.
pub const HARD_SELECTION_CAP: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Maximum number of resources a bulk selection may hold.
    pub max_bulk_selection: usize,

    /// Whether KAM principals may act on resources that carry no territory.
    ///
    /// Defaults to `true`, which is the behavior the portal has always had.
    /// Setting it to `false` denies such resources with `TERRITORY_MISMATCH`.
    pub territoryless_resources_visible: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            max_bulk_selection: HARD_SELECTION_CAP,
            territoryless_resources_visible: true,
        }
    }
}

impl PolicyConfig {
    /// Parses and validates a YAML document.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: PolicyConfig =
            serde_yaml::from_str(content).map_err(|e| AuthzError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads, parses and validates a YAML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&content)?;
        info!(
            path = %path.display(),
            max_bulk_selection = config.max_bulk_selection,
            territoryless_resources_visible = config.territoryless_resources_visible,
            "Loaded access policy configuration"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_bulk_selection == 0 {
            return Err(AuthzError::ConfigValidation(
                "max_bulk_selection must be at least 1".to_string(),
            ));
        }
        if self.max_bulk_selection > HARD_SELECTION_CAP {
            return Err(AuthzError::ConfigValidation(format!(
                "max_bulk_selection cannot exceed {}, got {}",
                HARD_SELECTION_CAP, self.max_bulk_selection
            )));
        }
        Ok(())
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| AuthzError::ConfigParse(e.to_string()))
    }
}
