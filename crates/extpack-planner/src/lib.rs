mod error;
mod handler;
mod plan;
mod progress;
mod repository;
mod uninstall;

pub use error::{HandlerLookupError, RepositoryError, Result, UninstallError};
pub use handler::{ExtensionHandler, HandlerRegistry};
pub use plan::{ActionKind, PlanAction, PlanNode};
pub use progress::{NoProgress, Progress};
pub use repository::InstalledRepository;
pub use uninstall::{UninstallPlanner, UninstallRequest};
