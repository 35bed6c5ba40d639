use crate::app::reports::{self, csv_report, svg_diagram};
use crate::core::cost::CostCalculator;
use crate::core::optimizer::CuttingOptimizer;
use crate::core::{
    ConfigProvider, Pipeline, PlanInput, PlanResult, ReportFile, ReportFormat, Storage,
};
use crate::domain::model::ProjectStatus;
use crate::utils::error::{CutListError, Result};
use crate::utils::format::slugify;
use serde::Serialize;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

const SUMMARY_FILE: &str = "plan_summary.json";

/// Plans one project: optimizes its components, prices it, and bundles every
/// report into a single zip archive.
pub struct CuttingPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    input: PlanInput,
}

#[derive(Serialize)]
struct PlanSummary<'a> {
    project: &'a str,
    plans: &'a [crate::domain::model::CuttingPlan],
    estimate: &'a crate::domain::model::CostEstimate,
}

impl<S: Storage, C: ConfigProvider> CuttingPipeline<S, C> {
    pub fn new(storage: S, config: C, input: PlanInput) -> Self {
        Self {
            storage,
            config,
            input,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CuttingPipeline<S, C> {
    async fn extract(&self) -> Result<PlanInput> {
        if self.input.project.components.is_empty() {
            return Err(CutListError::validation(format!(
                "project '{}' has no components to optimize",
                self.input.project.name
            )));
        }
        Ok(self.input.clone())
    }

    async fn transform(&self, input: PlanInput) -> Result<PlanResult> {
        let PlanInput {
            mut project,
            materials,
        } = input;

        let settings = self.config.optimizer_settings();
        tracing::debug!(
            "Optimizing with {} (kerf {}mm, rotation {})",
            settings.algorithm,
            settings.kerf,
            settings.allow_rotation
        );
        let plans = CuttingOptimizer::new(settings).plan_project(&project, &materials)?;
        for plan in &plans {
            if !plan.unplaced.is_empty() {
                tracing::warn!(
                    "{} piece(s) of '{}' do not fit its sheets: {}",
                    plan.unplaced.len(),
                    plan.material_name,
                    plan.unplaced.join(", ")
                );
            }
        }

        let factors = self.config.cost_factors();
        let estimate = CostCalculator::new(factors).estimate(&project, &materials);
        tracing::debug!(
            "Estimated total {}",
            self.config.currency().format(estimate.total_cost)
        );

        project.cutting_diagrams = plans.iter().flat_map(|p| p.sheets.clone()).collect();
        project.status = ProjectStatus::Planned;

        let mut report_files = vec![
            ReportFile {
                name: reports::parts_list_file(&project.name),
                content: csv_report::parts_list_csv(&project, &materials)?.into_bytes(),
            },
            ReportFile {
                name: reports::cost_estimate_file(&project.name),
                content: csv_report::cost_estimate_csv(
                    &estimate,
                    &factors,
                    self.config.include_cost_breakdown(),
                )?
                .into_bytes(),
            },
        ];

        if self.config.include_diagrams() {
            for plan in &plans {
                for (index, sheet) in plan.sheets.iter().enumerate() {
                    report_files.push(ReportFile {
                        name: reports::diagram_file(&project.name, &plan.material_name, index + 1),
                        content: svg_diagram::render_svg(sheet).into_bytes(),
                    });
                }
            }
        }

        let summary = PlanSummary {
            project: &project.name,
            plans: &plans,
            estimate: &estimate,
        };
        report_files.push(ReportFile {
            name: SUMMARY_FILE.to_string(),
            content: serde_json::to_vec_pretty(&summary)?,
        });

        Ok(PlanResult {
            project,
            plans,
            estimate,
            reports: report_files,
        })
    }

    async fn load(&self, result: &PlanResult) -> Result<String> {
        if self.config.report_format() == ReportFormat::Files {
            let dir = slugify(&result.project.name);
            for report in &result.reports {
                let path = format!("{}/{}", dir, report.name);
                tracing::debug!("Writing {} ({} bytes)", path, report.content.len());
                self.storage.write_file(&path, &report.content).await?;
            }
            return Ok(self.storage.location(&dir));
        }

        let bundle = reports::bundle_file(&result.project.name);
        tracing::debug!("Creating ZIP file with {} files", result.reports.len());

        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
            for report in &result.reports {
                zip.start_file::<_, ()>(report.name.as_str(), FileOptions::default())?;
                zip.write_all(&report.content)?;
            }
            let cursor = zip.finish()?;
            cursor.into_inner()
        };

        tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
        self.storage.write_file(&bundle, &zip_data).await?;
        Ok(self.storage.location(&bundle))
    }
}
