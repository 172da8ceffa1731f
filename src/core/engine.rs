use crate::core::{Pipeline, TallyReport};
use crate::utils::error::Result;
use crate::utils::monitor::ResourceMonitor;

pub struct TallyEngine<P: Pipeline> {
    pipeline: P,
    monitor: ResourceMonitor,
}

impl<P: Pipeline> TallyEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: ResourceMonitor::new(monitor_enabled),
        }
    }

    /// Runs extract, transform and load strictly one after another.
    pub async fn run(&self) -> Result<TallyReport> {
        tracing::info!("Starting city tally");
        self.monitor.log_stats("Start");

        tracing::info!("Reading source files...");
        let documents = self.pipeline.extract().await?;
        let document_count = documents.len();
        tracing::info!("Read {} documents", document_count);
        self.monitor.log_stats("Extract");

        tracing::info!("Extracting city names...");
        let run = self.pipeline.transform(documents).await?;
        tracing::info!(
            "Recorded {} mentions of {} distinct cities",
            run.overall.total(),
            run.overall.distinct()
        );
        self.monitor.log_stats("Transform");

        let report = self.pipeline.load(run).await?;
        self.monitor.log_final_stats();

        Ok(report)
    }
}
