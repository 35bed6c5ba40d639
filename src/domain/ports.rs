use crate::core::cost::CostFactors;
use crate::core::optimizer::OptimizerSettings;
use crate::domain::model::{CostEstimate, CuttingPlan, Material, Project};
use crate::utils::error::Result;
use crate::utils::format::{Currency, LengthUnit};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Human-readable location of `path`, for log and console output.
    fn location(&self, path: &str) -> String {
        path.to_string()
    }
}

/// How a plan run writes its reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// A single `{project}_cutlist.zip` bundle.
    #[default]
    Zip,
    /// Loose files under a `{project}/` directory.
    Files,
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Zip => f.write_str("zip"),
            ReportFormat::Files => f.write_str("files"),
        }
    }
}

pub trait ConfigProvider: Send + Sync {
    fn optimizer_settings(&self) -> OptimizerSettings;
    fn cost_factors(&self) -> CostFactors;
    fn currency(&self) -> Currency;
    fn length_unit(&self) -> LengthUnit;
    fn report_format(&self) -> ReportFormat;
    fn include_diagrams(&self) -> bool;
    fn include_cost_breakdown(&self) -> bool;
}

/// A project together with the materials it references.
#[derive(Debug, Clone)]
pub struct PlanInput {
    pub project: Project,
    pub materials: Vec<Material>,
}

/// A rendered report, ready to be written under `name`.
#[derive(Debug, Clone)]
pub struct ReportFile {
    pub name: String,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct PlanResult {
    pub project: Project,
    pub plans: Vec<CuttingPlan>,
    pub estimate: CostEstimate,
    pub reports: Vec<ReportFile>,
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<PlanInput>;
    async fn transform(&self, input: PlanInput) -> Result<PlanResult>;
    async fn load(&self, result: &PlanResult) -> Result<String>;
}
