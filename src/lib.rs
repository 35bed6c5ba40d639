pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::Settings};

pub use app::pipelines::cutting_pipeline::CuttingPipeline;
pub use core::engine::CutListEngine;
pub use domain::workspace::Workspace;
pub use utils::error::{CutListError, Result};
