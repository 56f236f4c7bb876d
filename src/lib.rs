//! Postbuild - post-build step for packages shipping parallel ESM and CJS trees.
//!
//! This library provides the core functionality for postbuild, including:
//! - `postbuild.config.json` loading and validation
//! - Alias pattern compilation and import specifier rewriting
//! - Output tree walking, asset copying, and module-type markers
//! - The fixed pipeline that ties the stages together
//!
//! # Example
//!
//! ```no_run
//! use postbuild::config::load_config;
//! use postbuild::pipeline;
//!
//! let root = std::env::current_dir().unwrap();
//! let config = load_config(&root).unwrap();
//! let report = pipeline::run(&config).unwrap();
//!
//! println!("Rewrote {} files", report.extension_files_rewritten);
//! ```

pub mod config;
pub mod error;
pub mod pipeline;
pub mod rewrite;
pub mod tree;

pub use error::{PostbuildError, Result};
