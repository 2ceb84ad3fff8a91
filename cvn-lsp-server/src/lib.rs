pub mod config;
pub mod logging;
pub mod server;

pub use config::Args;
pub use server::CvnLanguageServer;
