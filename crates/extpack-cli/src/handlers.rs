use std::collections::BTreeMap;

use extpack_core::{InstalledExtension, Namespace};
use extpack_planner::{
    ExtensionHandler, HandlerLookupError, HandlerRegistry, UninstallError, UninstallRequest,
};

struct DefaultHandler;

impl ExtensionHandler for DefaultHandler {
    fn check_uninstall(
        &self,
        _extension: &InstalledExtension,
        _namespace: &Namespace,
        _request: &UninstallRequest,
    ) -> Result<(), UninstallError> {
        Ok(())
    }
}

// Core system extensions are part of the manager itself and never removable.
struct CoreHandler;

impl ExtensionHandler for CoreHandler {
    fn check_uninstall(
        &self,
        extension: &InstalledExtension,
        _namespace: &Namespace,
        _request: &UninstallRequest,
    ) -> Result<(), UninstallError> {
        Err(UninstallError::Vetoed {
            id: extension.id.to_string(),
            reason: "core system extensions cannot be uninstalled".to_string(),
        })
    }
}

pub(crate) struct BuiltinHandlers {
    handlers: BTreeMap<&'static str, Box<dyn ExtensionHandler>>,
}

impl BuiltinHandlers {
    pub(crate) fn new() -> Self {
        let mut handlers: BTreeMap<&'static str, Box<dyn ExtensionHandler>> = BTreeMap::new();
        handlers.insert("jar", Box::new(DefaultHandler));
        handlers.insert("webjar", Box::new(DefaultHandler));
        handlers.insert("xar", Box::new(DefaultHandler));
        handlers.insert("core", Box::new(CoreHandler));
        Self { handlers }
    }
}

impl HandlerRegistry for BuiltinHandlers {
    fn handler(&self, extension_type: &str) -> Result<&dyn ExtensionHandler, HandlerLookupError> {
        self.handlers
            .get(extension_type)
            .map(|handler| handler.as_ref())
            .ok_or_else(|| HandlerLookupError {
                extension_type: extension_type.to_string(),
            })
    }
}
