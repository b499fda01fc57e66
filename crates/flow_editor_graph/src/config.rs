// SPDX-License-Identifier: MIT OR Apache-2.0
//! Schema configuration files.
//!
//! A project can extend the built-in pin type table and describe its own
//! types in a RON file:
//!
//! ```ron
//! (
//!     version: 1,
//!     policies: {
//!         Custom("QuestId"): (rules: "STANDARD", accepted: [Name]),
//!     },
//!     types: [
//!         (path: "/Game/Quest.QuestGiver", kind: Class, parent: Some("/Script/Engine.Actor")),
//!     ],
//!     redirects: {},
//!     conversions: [],
//! )
//! ```

use crate::category::PinCategory;
use crate::hierarchy::{StructConversion, TypeCatalog};
use crate::registry::PinTypeRegistry;
use crate::rules::PinTypeMatchPolicy;
use crate::schema::FlowSchema;
use crate::types::{TypeDescriptor, TypePath};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current schema configuration format version
pub const SCHEMA_CONFIG_VERSION: u32 = 1;

/// Schema configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Reading or writing the file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid RON for a schema configuration
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Serializing the configuration failed
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),

    /// The file was written by a newer version
    #[error("Schema config version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version in the file
        found: u32,
        /// Newest supported version
        supported: u32,
    },

    /// Exec connections are fixed and cannot be given a policy
    #[error("Exec pins cannot have a type policy")]
    ExecPolicy,

    /// A redirect points at a type that is not described
    #[error("Redirect {from} points to unknown type {to}")]
    UnknownRedirectTarget {
        /// Stale type
        from: TypePath,
        /// Missing target
        to: TypePath,
    },
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Serializable schema configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Format version
    #[serde(default = "default_version")]
    pub version: u32,
    /// Policies added to or replacing the built-in table
    #[serde(default)]
    pub policies: IndexMap<PinCategory, PinTypeMatchPolicy>,
    /// Known type descriptors
    #[serde(default)]
    pub types: Vec<TypeDescriptor>,
    /// Stale type path to current type path
    #[serde(default)]
    pub redirects: IndexMap<TypePath, TypePath>,
    /// Registered struct conversions
    #[serde(default)]
    pub conversions: Vec<StructConversion>,
}

fn default_version() -> u32 {
    SCHEMA_CONFIG_VERSION
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            version: SCHEMA_CONFIG_VERSION,
            policies: IndexMap::new(),
            types: Vec::new(),
            redirects: IndexMap::new(),
            conversions: Vec::new(),
        }
    }
}

impl SchemaConfig {
    /// Parse a configuration from RON
    pub fn from_ron(s: &str) -> Result<Self> {
        let config: SchemaConfig = ron::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to pretty RON
    pub fn to_ron(&self) -> Result<String> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_ron(&content)?;
        tracing::info!(
            "Loaded schema config {:?}: {} policies, {} types",
            path,
            config.policies.len(),
            config.types.len()
        );
        Ok(config)
    }

    /// Save the configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }

    /// Check the configuration for contradictions
    pub fn validate(&self) -> Result<()> {
        if self.version > SCHEMA_CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: self.version,
                supported: SCHEMA_CONFIG_VERSION,
            });
        }

        if self.policies.contains_key(&PinCategory::Exec) {
            return Err(ConfigError::ExecPolicy);
        }

        for (from, to) in &self.redirects {
            if !self.types.iter().any(|t| &t.path == to) {
                return Err(ConfigError::UnknownRedirectTarget {
                    from: from.clone(),
                    to: to.clone(),
                });
            }
        }

        Ok(())
    }

    /// Build the type catalog described by this configuration
    pub fn catalog(&self) -> TypeCatalog {
        let mut catalog = TypeCatalog::new();
        for descriptor in &self.types {
            catalog.register(descriptor.clone());
        }
        for (from, to) in &self.redirects {
            catalog.redirect(from.clone(), to.clone());
        }
        for conversion in &self.conversions {
            catalog.add_conversion(conversion.clone());
        }
        catalog
    }

    /// Build the policy registry described by this configuration
    pub fn registry(&self) -> PinTypeRegistry {
        PinTypeRegistry::with_overrides(self.policies.clone())
    }
}

impl FlowSchema {
    /// Build a schema from a configuration
    pub fn from_config(config: &SchemaConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.registry(), config.catalog()))
    }
}
