//! SQLite store for classification and license-parsing results
//!
//! The engine never touches the store; HTTP handlers persist results after the
//! engine has produced them.

pub mod init;
pub mod models;
pub mod parsed_licenses;
pub mod usage_checks;

pub use init::*;
pub use models::*;
pub use parsed_licenses::*;
pub use usage_checks::*;
