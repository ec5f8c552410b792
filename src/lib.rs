pub mod apt;
pub mod config;
pub mod controller;
pub mod deb822;
pub mod error;
pub mod parser;
pub mod registry;
pub mod report;
pub mod source_list;
pub mod utils;

pub use apt::{AptGet, PackageManager, UpdateOutcome};
pub use config::Config;
pub use controller::RetryController;
pub use deb822::Deb822Sources;
pub use error::{CleanerError, CleanerResult};
pub use parser::failed_repo_urls;
pub use registry::{DisabledRecord, SourceFormat, SourceRegistry};
pub use report::{Report, RC_CHANGED, RC_ERROR, RC_SUCCESS};
pub use source_list::{SourceEntry, SourceList};

pub const REPOCLEANER_VERSION: &str = env!("CARGO_PKG_VERSION");

use lazy_static::lazy_static;
use std::path::PathBuf;

lazy_static! {
    pub static ref REPOCLEANER_CONFIG: PathBuf = {
        if let Ok(path) = std::env::var("REPOCLEANER_CONFIG") {
            PathBuf::from(path)
        } else {
            PathBuf::from("/etc/repocleaner/config.toml")
        }
    };
}
