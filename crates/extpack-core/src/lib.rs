mod extension;

pub use extension::{ExtensionId, InstalledExtension, Namespace};
