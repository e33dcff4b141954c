use extpack_core::{InstalledExtension, Namespace};

use crate::error::{HandlerLookupError, UninstallError};
use crate::uninstall::UninstallRequest;

// Handlers veto by returning an error, conventionally UninstallError::Vetoed;
// whatever they return is surfaced unmodified by the planner.
pub trait ExtensionHandler: Send + Sync {
    fn check_uninstall(
        &self,
        extension: &InstalledExtension,
        namespace: &Namespace,
        request: &UninstallRequest,
    ) -> Result<(), UninstallError>;
}

pub trait HandlerRegistry: Send + Sync {
    fn handler(&self, extension_type: &str) -> Result<&dyn ExtensionHandler, HandlerLookupError>;
}
