pub mod cost;
pub mod engine;
pub mod manifest;
pub mod optimizer;

pub use crate::domain::model::{CostEstimate, CuttingDiagram, CuttingPlan};
pub use crate::domain::ports::{ConfigProvider, Pipeline, PlanInput, PlanResult, ReportFile, ReportFormat, Storage};
pub use crate::utils::error::Result;
