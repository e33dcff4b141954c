use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Context};
use semver::Version;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ExtensionId {
    pub id: String,
    pub version: Option<Version>,
}

impl ExtensionId {
    pub fn new(id: impl Into<String>, version: Version) -> Self {
        Self {
            id: id.into(),
            version: Some(version),
        }
    }

    pub fn unversioned(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: None,
        }
    }
}

impl fmt::Display for ExtensionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}@{version}", self.id),
            None => write!(f, "{}", self.id),
        }
    }
}

impl FromStr for ExtensionId {
    type Err = anyhow::Error;

    fn from_str(spec: &str) -> anyhow::Result<Self> {
        let spec = spec.trim();
        if spec.is_empty() {
            return Err(anyhow!("extension spec must not be empty"));
        }
        match spec.split_once('@') {
            Some((id, version)) => {
                if id.is_empty() {
                    return Err(anyhow!("extension spec is missing an id: '{spec}'"));
                }
                let version = Version::parse(version)
                    .with_context(|| format!("invalid version in extension spec '{spec}'"))?;
                Ok(Self::new(id, version))
            }
            None => Ok(Self::unversioned(spec)),
        }
    }
}

// Global orders before any named namespace, which pins the iteration order of
// namespace-grouped collections keyed by Namespace.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Namespace {
    Global,
    Named(String),
}

impl Namespace {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global)
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Global => None,
            Self::Named(name) => Some(name),
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => write!(f, "<global>"),
            Self::Named(name) => write!(f, "{name}"),
        }
    }
}

impl Serialize for Namespace {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Global => serializer.serialize_none(),
            Self::Named(name) => serializer.serialize_some(name),
        }
    }
}

impl<'de> Deserialize<'de> for Namespace {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name: Option<String> = Option::deserialize(deserializer)?;
        Ok(match name {
            Some(name) => Self::Named(name),
            None => Self::Global,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstalledExtension {
    pub id: ExtensionId,
    #[serde(rename = "type")]
    pub extension_type: String,
    pub namespaces: Option<BTreeSet<String>>,
}

impl InstalledExtension {
    pub fn is_global(&self) -> bool {
        self.namespaces.is_none()
    }

    // A global installation is visible from every namespace; a namespaced one
    // only from the namespaces it lists.
    pub fn is_installed_on(&self, namespace: &Namespace) -> bool {
        match (&self.namespaces, namespace) {
            (None, _) => true,
            (Some(_), Namespace::Global) => false,
            (Some(namespaces), Namespace::Named(name)) => namespaces.contains(name),
        }
    }
}

impl fmt::Display for InstalledExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
