use std::collections::BTreeSet;

use extpack_core::{ExtensionId, InstalledExtension, Namespace};
use tracing::info;

use crate::error::{RepositoryError, Result, UninstallError};
use crate::handler::HandlerRegistry;
use crate::plan::{PlanAction, PlanNode};
use crate::progress::{Progress, ProgressScope};
use crate::repository::InstalledRepository;

#[derive(Debug, Clone, Default)]
pub struct UninstallRequest {
    pub targets: Vec<ExtensionId>,
    pub namespaces: Option<BTreeSet<String>>,
    pub verbose: bool,
}

impl UninstallRequest {
    pub fn has_namespaces(&self) -> bool {
        self.namespaces
            .as_ref()
            .is_some_and(|namespaces| !namespaces.is_empty())
    }
}

pub struct UninstallPlanner<'a> {
    repository: &'a dyn InstalledRepository,
    handlers: &'a dyn HandlerRegistry,
    progress: &'a dyn Progress,
    request: &'a UninstallRequest,
}

impl<'a> UninstallPlanner<'a> {
    pub fn new(
        repository: &'a dyn InstalledRepository,
        handlers: &'a dyn HandlerRegistry,
        progress: &'a dyn Progress,
        request: &'a UninstallRequest,
    ) -> Self {
        Self {
            repository,
            handlers,
            progress,
            request,
        }
    }

    // Fail-fast: the first unresolvable (target, namespace) pair aborts the
    // whole build and no partial plan is returned.
    pub fn build_plan(&self) -> Result<Vec<PlanNode>> {
        let mut plan = Vec::new();

        let scope = ProgressScope::enter(self.progress, self.request.targets.len());
        for target in &self.request.targets {
            self.plan_target(target, &mut plan)?;
            scope.step();
        }

        Ok(plan)
    }

    fn plan_target(&self, target: &ExtensionId, branch: &mut Vec<PlanNode>) -> Result<()> {
        if target.version.is_some() {
            let installed = self.resolve_exact(target)?;
            if let Some(namespaces) = self.request_namespaces() {
                self.plan_installed_on_namespaces(&installed, &namespaces, branch)
            } else if installed.namespaces.is_some() {
                // Owned snapshot of the namespace set: the recursion below
                // queries the same repository state, which a live executor may
                // mutate while this iteration is in flight.
                let namespaces: Vec<Namespace> = installed
                    .namespaces
                    .iter()
                    .flatten()
                    .cloned()
                    .map(Namespace::Named)
                    .collect();
                self.plan_installed_on_namespaces(&installed, &namespaces, branch)
            } else {
                self.plan_installed_on(&installed, &Namespace::Global, branch)
            }
        } else if let Some(namespaces) = self.request_namespaces() {
            self.plan_id_on_namespaces(&target.id, &namespaces, branch)
        } else {
            self.plan_id_on(&target.id, &Namespace::Global, branch)
        }
    }

    fn request_namespaces(&self) -> Option<Vec<Namespace>> {
        if !self.request.has_namespaces() {
            return None;
        }
        let namespaces = self.request.namespaces.as_ref()?;
        Some(namespaces.iter().cloned().map(Namespace::Named).collect())
    }

    fn resolve_exact(&self, target: &ExtensionId) -> Result<InstalledExtension> {
        match self.repository.resolve(target) {
            Ok(installed) => Ok(installed),
            Err(RepositoryError::NotFound { .. }) => Err(UninstallError::NotInstalled {
                id: target.to_string(),
            }),
            Err(err) => Err(err.into()),
        }
    }

    fn plan_id_on_namespaces(
        &self,
        id: &str,
        namespaces: &[Namespace],
        branch: &mut Vec<PlanNode>,
    ) -> Result<()> {
        let scope = ProgressScope::enter(self.progress, namespaces.len());
        for namespace in namespaces {
            self.plan_id_on(id, namespace, branch)?;
            scope.step();
        }

        Ok(())
    }

    fn plan_id_on(&self, id: &str, namespace: &Namespace, branch: &mut Vec<PlanNode>) -> Result<()> {
        let installed = self
            .repository
            .installed(id, namespace)?
            .ok_or_else(|| UninstallError::NotInstalled { id: id.to_string() })?;

        self.plan_installed_on(&installed, namespace, branch)
    }

    fn plan_installed_on_namespaces(
        &self,
        extension: &InstalledExtension,
        namespaces: &[Namespace],
        branch: &mut Vec<PlanNode>,
    ) -> Result<()> {
        let scope = ProgressScope::enter(self.progress, namespaces.len());
        for namespace in namespaces {
            self.plan_installed_on(extension, namespace, branch)?;
            scope.step();
        }

        Ok(())
    }

    fn plan_dependents(
        &self,
        dependents: &[InstalledExtension],
        namespace: &Namespace,
        branch: &mut Vec<PlanNode>,
    ) -> Result<()> {
        let scope = ProgressScope::enter(self.progress, dependents.len());
        for dependent in dependents {
            self.plan_installed_on(dependent, namespace, branch)?;
            scope.step();
        }

        Ok(())
    }

    fn plan_installed_on(
        &self,
        extension: &InstalledExtension,
        namespace: &Namespace,
        branch: &mut Vec<PlanNode>,
    ) -> Result<()> {
        if let Namespace::Named(name) = namespace {
            let on_namespace = extension
                .namespaces
                .as_ref()
                .is_some_and(|namespaces| namespaces.contains(name));
            if !on_namespace {
                return Err(UninstallError::NotInstalledOnNamespace {
                    id: extension.id.to_string(),
                    namespace: name.clone(),
                });
            }
        }

        let handler =
            self.handlers
                .handler(&extension.extension_type)
                .map_err(|err| UninstallError::UnsupportedType {
                    id: extension.id.to_string(),
                    extension_type: extension.extension_type.clone(),
                    source: err,
                })?;

        handler.check_uninstall(extension, namespace, self.request)?;

        if self.request.verbose {
            match namespace {
                Namespace::Global => info!("resolving extension {}", extension.id),
                Namespace::Named(name) => {
                    info!("resolving extension {} from namespace {name}", extension.id)
                }
            }
        }

        let scope = ProgressScope::enter(self.progress, 2);

        // Backward dependents become children and are fully planned before
        // the node itself is appended.
        let mut children = Vec::new();
        match namespace {
            Namespace::Named(_) => {
                let dependents = self
                    .repository
                    .backward_dependents_on(&extension.id.id, namespace)
                    .map_err(|err| backward_dependencies_error(extension, err))?;
                self.plan_dependents(&dependents, namespace, &mut children)?;
            }
            Namespace::Global => {
                self.plan_global_dependents(extension, &mut children)?;
            }
        }

        scope.step();

        let action = PlanAction::uninstall(extension.clone(), namespace.clone());
        branch.push(PlanNode::new(action, children));

        Ok(())
    }

    fn plan_global_dependents(
        &self,
        extension: &InstalledExtension,
        branch: &mut Vec<PlanNode>,
    ) -> Result<()> {
        let groups = self
            .repository
            .backward_dependents(&extension.id.id)
            .map_err(|err| backward_dependencies_error(extension, err))?;

        let scope = ProgressScope::enter(self.progress, groups.len());
        for (namespace, dependents) in &groups {
            self.plan_dependents(dependents, namespace, branch)?;
            scope.step();
        }

        Ok(())
    }
}

fn backward_dependencies_error(
    extension: &InstalledExtension,
    source: RepositoryError,
) -> UninstallError {
    UninstallError::BackwardDependencies {
        id: extension.id.to_string(),
        source,
    }
}
