use crate::error::ConversionError;
use crate::events::EventSender;
use crate::metrics::Metrics;
use crate::models::{ConversionJob, JobState};
use crate::scene;
use crate::services::converter::SceneConverter;
use crate::services::transform::transform;
use std::sync::Arc;
use std::time::Instant;

/// Outcome counts for one batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Runs a batch of jobs one after another on the calling thread
///
/// Every job is attempted regardless of earlier failures. Event order per run:
/// `SetMax`, then per file `Status` / optional `Error` / `Progress`, then the completion
/// `Status` and `Info`, and finally `Done`.
pub struct JobRunner {
    converter: Arc<dyn SceneConverter>,
    events: EventSender,
    metrics: Arc<Metrics>,
}

impl JobRunner {
    pub fn new(
        converter: Arc<dyn SceneConverter>,
        events: EventSender,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            converter,
            events,
            metrics,
        }
    }

    /// Blocking. Meant to be called from a worker thread.
    pub fn run(&self, jobs: &[ConversionJob]) -> RunReport {
        // Done goes out last, even if a job panics
        let _done = self.events.done_on_drop();

        let total = jobs.len();
        let mut report = RunReport::default();

        self.metrics.record_batch_started();
        tracing::info!("Starting batch of {} files", total);
        self.events.set_max(total);

        for (i, job) in jobs.iter().enumerate() {
            let index = i + 1;
            self.events.status(format!(
                "Processing {} ({}/{})",
                job.display_name(),
                index,
                total
            ));

            match self.process_job(job) {
                JobState::Succeeded => report.succeeded += 1,
                _ => report.failed += 1,
            }
            report.attempted += 1;

            self.events.progress(index);
        }

        self.events.status("Conversion complete");
        self.events.info("Done", format!("{} files processed", total));

        tracing::info!(
            "Batch complete: {} succeeded, {} failed",
            report.succeeded,
            report.failed
        );
        self.metrics.log_summary();

        report
    }

    /// Convert, transform and save one job. Returns its terminal state.
    fn process_job(&self, job: &ConversionJob) -> JobState {
        let start = Instant::now();
        let name = job.display_name();
        let mut state = JobState::Pending;
        tracing::debug!("{}: {}", name, state);

        state = self.advance(name, state, JobState::Converting);
        if let Err(e) = self.converter.convert(job.source(), job.intermediate()) {
            tracing::error!("Conversion failed for {}: {}", name, e);
            self.report_conversion_failure(name, e);
            self.metrics.record_file_failed(start.elapsed());
            self.advance(name, state, JobState::Failed);
            return JobState::Failed;
        }

        state = self.advance(name, state, JobState::Transforming);
        if let Err(e) = post_process(job) {
            tracing::error!("Error processing {}: {}", name, e);
            self.events
                .error("Error", format!("Error processing {}: {}", name, e));
            self.metrics.record_file_failed(start.elapsed());
            self.advance(name, state, JobState::Failed);
            return JobState::Failed;
        }

        self.metrics.record_file_converted(start.elapsed());
        tracing::info!("Converted {} -> {}", job.source(), job.destination());
        self.advance(name, state, JobState::Succeeded)
    }

    fn advance(&self, name: &str, from: JobState, to: JobState) -> JobState {
        debug_assert!(!from.is_terminal(), "{} already finished", name);
        tracing::debug!("{}: {} -> {}", name, from, to);
        to
    }

    fn report_conversion_failure(&self, name: &str, error: ConversionError) {
        match error {
            ConversionError::ExternalToolFailed {
                program,
                diagnostics,
                ..
            } => self.events.error(
                "Conversion failed",
                format!("{} failed for {}:\n{}", program, name, diagnostics),
            ),
            other => self
                .events
                .error("Error", format!("Error processing {}: {}", name, other)),
        }
    }
}

/// Load the converter's output, apply the batch options and write the destination.
fn post_process(job: &ConversionJob) -> Result<(), ConversionError> {
    let mut graph = scene::load(job.intermediate())?;
    transform(&mut graph, job.options());
    scene::save(&graph, job.destination())?;
    Ok(())
}
