//! Protocol configuration loaded from YAML
//!
//! ```yaml
//! headers:
//!   - key: correlation-id
//!   - key: authorization-context
//!     read-from-external: false
//!     write-to-external: false
//! pass-unknown-headers: true
//! ```

use crate::error::ConfigError;
use crate::headers::{standard_definitions, DefinitionHeaderTranslator, HeaderDefinition};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProtocolConfig {
    /// How each known header key crosses the protocol boundary
    #[serde(default = "standard_definitions")]
    pub headers: Vec<HeaderDefinition>,

    /// Whether headers without a definition pass in both directions
    #[serde(default = "default_pass_unknown")]
    pub pass_unknown_headers: bool,
}

fn default_pass_unknown() -> bool {
    true
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            headers: standard_definitions(),
            pass_unknown_headers: true,
        }
    }
}

impl ProtocolConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: ProtocolConfig = serde_yaml::from_str(yaml)?;
        config.normalize()?;
        Ok(config)
    }

    /// Read a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&yaml)?;
        debug!(
            path = %path.display(),
            headers = config.headers.len(),
            "loaded protocol config"
        );
        Ok(config)
    }

    /// Header translator for these definitions
    pub fn header_translator(&self) -> DefinitionHeaderTranslator {
        DefinitionHeaderTranslator::new(self.headers.clone(), self.pass_unknown_headers)
    }

    fn normalize(&mut self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for definition in &mut self.headers {
            definition.key = definition.key.trim().to_ascii_lowercase();
            if definition.key.is_empty() {
                return Err(ConfigError::Invalid("empty header key".into()));
            }
            if !seen.insert(definition.key.clone()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate header key '{}'",
                    definition.key
                )));
            }
        }
        Ok(())
    }
}
