use std::collections::BTreeMap;

use extpack_core::{ExtensionId, InstalledExtension, Namespace};

use crate::error::RepositoryError;

pub trait InstalledRepository: Send + Sync {
    fn resolve(&self, id: &ExtensionId) -> Result<InstalledExtension, RepositoryError>;

    fn installed(
        &self,
        id: &str,
        namespace: &Namespace,
    ) -> Result<Option<InstalledExtension>, RepositoryError>;

    fn backward_dependents_on(
        &self,
        id: &str,
        namespace: &Namespace,
    ) -> Result<Vec<InstalledExtension>, RepositoryError>;

    fn backward_dependents(
        &self,
        id: &str,
    ) -> Result<BTreeMap<Namespace, Vec<InstalledExtension>>, RepositoryError>;
}
