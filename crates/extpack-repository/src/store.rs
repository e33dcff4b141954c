use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::Context;
use extpack_core::{ExtensionId, InstalledExtension, Namespace};
use extpack_planner::{InstalledRepository, RepositoryError};

use crate::state::{InstalledRecord, InstalledState};

// Interior mutability: planning reads through &self while an executor applies
// removals through the same handle. The planner snapshots what it iterates,
// so in-flight builds are not disturbed by mutation.
#[derive(Debug)]
pub struct InstalledStore {
    records: RwLock<BTreeMap<String, InstalledRecord>>,
}

impl InstalledStore {
    pub fn from_state(state: InstalledState) -> Self {
        let records = state
            .extensions
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect();
        Self {
            records: RwLock::new(records),
        }
    }

    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let input = fs::read_to_string(path)
            .with_context(|| format!("failed to read installed state: {}", path.display()))?;
        let state = InstalledState::from_toml_str(&input)
            .with_context(|| format!("invalid installed state: {}", path.display()))?;
        Ok(Self::from_state(state))
    }

    pub fn snapshot(&self) -> Vec<InstalledExtension> {
        self.read()
            .values()
            .map(InstalledRecord::to_extension)
            .collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.read().contains_key(id)
    }

    pub fn register(&self, record: InstalledRecord) {
        self.write().insert(record.id.clone(), record);
    }

    pub fn remove(&self, id: &str) -> bool {
        self.write().remove(id).is_some()
    }

    // Removing the last namespace removes the record itself; a global install
    // has no namespace to remove.
    pub fn remove_namespace(&self, id: &str, namespace: &str) -> bool {
        let mut records = self.write();
        let Some(record) = records.get_mut(id) else {
            return false;
        };
        let Some(namespaces) = &mut record.namespaces else {
            return false;
        };
        if !namespaces.remove(namespace) {
            return false;
        }
        if namespaces.is_empty() {
            records.remove(id);
        }
        true
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, InstalledRecord>> {
        self.records.read().unwrap_or_else(|err| err.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, InstalledRecord>> {
        self.records.write().unwrap_or_else(|err| err.into_inner())
    }
}

// A global install is reachable from every namespace when resolving, but
// dependent queries scoped to a concrete namespace are strict: global
// dependents are registered under the global group only.
fn record_scoped_on(record: &InstalledRecord, namespace: &Namespace) -> bool {
    match (&record.namespaces, namespace) {
        (None, Namespace::Global) => true,
        (None, Namespace::Named(_)) => false,
        (Some(_), Namespace::Global) => false,
        (Some(namespaces), Namespace::Named(name)) => namespaces.contains(name),
    }
}

fn record_depends_on(record: &InstalledRecord, id: &str) -> bool {
    record.dependencies.iter().any(|dependency| dependency == id)
}

impl InstalledRepository for InstalledStore {
    fn resolve(&self, id: &ExtensionId) -> Result<InstalledExtension, RepositoryError> {
        let records = self.read();
        records
            .get(&id.id)
            .filter(|record| match &id.version {
                Some(version) => record.version == *version,
                None => true,
            })
            .map(InstalledRecord::to_extension)
            .ok_or_else(|| RepositoryError::NotFound { id: id.to_string() })
    }

    fn installed(
        &self,
        id: &str,
        namespace: &Namespace,
    ) -> Result<Option<InstalledExtension>, RepositoryError> {
        let records = self.read();
        Ok(records
            .get(id)
            .map(InstalledRecord::to_extension)
            .filter(|extension| extension.is_installed_on(namespace)))
    }

    fn backward_dependents_on(
        &self,
        id: &str,
        namespace: &Namespace,
    ) -> Result<Vec<InstalledExtension>, RepositoryError> {
        let records = self.read();
        Ok(records
            .values()
            .filter(|record| record_depends_on(record, id))
            .filter(|record| record_scoped_on(record, namespace))
            .map(InstalledRecord::to_extension)
            .collect())
    }

    fn backward_dependents(
        &self,
        id: &str,
    ) -> Result<BTreeMap<Namespace, Vec<InstalledExtension>>, RepositoryError> {
        let records = self.read();
        let mut groups: BTreeMap<Namespace, Vec<InstalledExtension>> = BTreeMap::new();
        for record in records.values().filter(|record| record_depends_on(record, id)) {
            match &record.namespaces {
                None => groups
                    .entry(Namespace::Global)
                    .or_default()
                    .push(record.to_extension()),
                Some(namespaces) => {
                    for namespace in namespaces {
                        groups
                            .entry(Namespace::named(namespace.clone()))
                            .or_default()
                            .push(record.to_extension());
                    }
                }
            }
        }
        Ok(groups)
    }
}
