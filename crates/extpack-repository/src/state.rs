use std::collections::{BTreeSet, HashSet};

use anyhow::{anyhow, Context};
use extpack_core::{ExtensionId, InstalledExtension};
use semver::Version;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstalledState {
    #[serde(default)]
    pub extensions: Vec<InstalledRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstalledRecord {
    pub id: String,
    pub version: Version,
    #[serde(rename = "type")]
    pub extension_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespaces: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
}

impl InstalledState {
    pub fn from_toml_str(input: &str) -> anyhow::Result<Self> {
        let state: Self = toml::from_str(input).context("failed to parse installed state")?;
        state.validate()?;
        Ok(state)
    }

    fn validate(&self) -> anyhow::Result<()> {
        let mut ids = HashSet::new();
        for record in &self.extensions {
            if record.id.trim().is_empty() {
                return Err(anyhow!("installed extension id must not be empty"));
            }
            if !ids.insert(record.id.as_str()) {
                return Err(anyhow!("duplicate installed extension '{}'", record.id));
            }
        }

        for record in &self.extensions {
            if record.extension_type.trim().is_empty() {
                return Err(anyhow!("extension '{}' has an empty type", record.id));
            }
            if let Some(namespaces) = &record.namespaces {
                if namespaces.is_empty() {
                    return Err(anyhow!(
                        "extension '{}' lists an empty namespace set; omit the key for a global install",
                        record.id
                    ));
                }
            }
            for dependency in &record.dependencies {
                if dependency == &record.id {
                    return Err(anyhow!("extension '{}' depends on itself", record.id));
                }
                if !ids.contains(dependency.as_str()) {
                    return Err(anyhow!(
                        "extension '{}' depends on '{dependency}', which is not installed",
                        record.id
                    ));
                }
            }
        }

        Ok(())
    }
}

impl InstalledRecord {
    pub fn to_extension(&self) -> InstalledExtension {
        InstalledExtension {
            id: ExtensionId::new(self.id.clone(), self.version.clone()),
            extension_type: self.extension_type.clone(),
            namespaces: self.namespaces.clone(),
        }
    }
}
