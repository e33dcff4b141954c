use thiserror::Error;

pub type Result<T, E = UninstallError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum UninstallError {
    #[error("extension '{id}' is not installed")]
    NotInstalled { id: String },

    #[error("extension '{id}' is not installed on namespace '{namespace}'")]
    NotInstalledOnNamespace { id: String, namespace: String },

    #[error("unsupported type '{extension_type}' for extension '{id}'")]
    UnsupportedType {
        id: String,
        extension_type: String,
        #[source]
        source: HandlerLookupError,
    },

    #[error("uninstall of extension '{id}' is not allowed: {reason}")]
    Vetoed { id: String, reason: String },

    #[error("failed to resolve backward dependencies of extension '{id}'")]
    BackwardDependencies {
        id: String,
        #[source]
        source: RepositoryError,
    },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("no installed extension matching '{id}'")]
    NotFound { id: String },

    #[error("installed extension repository failure: {message}")]
    Backend { message: String },
}

#[derive(Debug, Error)]
#[error("no handler registered for extension type '{extension_type}'")]
pub struct HandlerLookupError {
    pub extension_type: String,
}
