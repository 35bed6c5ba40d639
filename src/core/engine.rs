use crate::core::Pipeline;
use crate::domain::ports::PlanResult;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct CutListEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> CutListEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// Runs extract, transform and load. Returns the plan together with the
    /// path of the written bundle.
    pub async fn run(&self) -> Result<(PlanResult, String)> {
        tracing::info!("Starting cutting plan...");
        self.monitor.log_stats("Start");

        let input = self.pipeline.extract().await?;
        tracing::info!(
            "Loaded project '{}' with {} component(s)",
            input.project.name,
            input.project.components.len()
        );
        self.monitor.log_stats("Extract");

        let result = self.pipeline.transform(input).await?;
        let sheets: usize = result.plans.iter().map(|p| p.sheets.len()).sum();
        tracing::info!(
            "Optimized {} material(s) onto {} sheet(s), {} report(s) rendered",
            result.plans.len(),
            sheets,
            result.reports.len()
        );
        self.monitor.log_stats("Transform");

        let output_path = self.pipeline.load(&result).await?;
        tracing::info!("Reports saved to: {}", output_path);
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok((result, output_path))
    }
}
