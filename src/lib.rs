pub mod boundary;
pub mod changelog;
pub mod cli;
pub mod config;
pub mod conventional;
pub mod domain;
pub mod error;
pub mod git;
pub mod preparer;
pub mod ui;
pub mod version_files;

pub use error::{ReleasePrepError, Result};
