pub mod convert;
pub mod document;
pub mod error;
pub mod handlers;
pub mod workspace;

pub use document::Document;
pub use error::HandlerError;
pub use handlers::Handlers;
pub use workspace::{Workspace, WorkspaceStats};
