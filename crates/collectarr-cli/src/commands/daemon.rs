use crate::output::Output;
use collection_sync_config::{Config, PathManager, SchedulerConfig};
use collection_sync_core::Reconciler;
use color_eyre::Result;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{info, warn};

pub struct Scheduler {
    scheduler: JobScheduler,
    reconciler: Arc<Reconciler>,
    config: SchedulerConfig,
    // Held for the duration of a pass; a tick that can't take it is skipped
    running: Arc<Mutex<()>>,
}

impl Scheduler {
    pub async fn new(reconciler: Reconciler, config: SchedulerConfig) -> Result<Self> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| color_eyre::eyre::eyre!("Failed to create scheduler: {}", e))?;

        Ok(Self {
            scheduler,
            reconciler: Arc::new(reconciler),
            config,
            running: Arc::new(Mutex::new(())),
        })
    }

    pub async fn start(&mut self, output: &Output) -> Result<()> {
        if self.config.run_on_startup {
            info!(operation = "scheduler_startup", "Running initial pass on startup");
            let _guard = self.running.lock().await;
            let summary = self.reconciler.run_once().await;
            output.summary(&summary);
        }

        let period = refresh_period(self.config.refresh_minutes);
        let reconciler = self.reconciler.clone();
        let running = self.running.clone();
        let job = Job::new_repeated_async(period, move |_id, _scheduler| {
            let reconciler = reconciler.clone();
            let running = running.clone();
            Box::pin(async move {
                scheduled_pass(&reconciler, &running).await;
            })
        })
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create scheduled job: {}", e))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| color_eyre::eyre::eyre!("Failed to schedule job: {}", e))?;
        self.scheduler
            .start()
            .await
            .map_err(|e| color_eyre::eyre::eyre!("Failed to start scheduler: {}", e))?;

        info!(
            operation = "scheduler_started",
            refresh_minutes = self.config.refresh_minutes,
            "Scheduler started"
        );
        output.info(format!(
            "Checking collections every {} minute(s). Press Ctrl-C to stop.",
            self.config.refresh_minutes
        ));

        tokio::signal::ctrl_c().await?;
        info!(operation = "scheduler_stopping", "Shutdown requested");
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| color_eyre::eyre::eyre!("Failed to stop scheduler: {}", e))?;

        Ok(())
    }
}

/// `[logging] file` when set, otherwise the daemon log under the config directory
pub fn log_file(config: &Config, paths: &PathManager) -> PathBuf {
    config.logging.file.clone().unwrap_or_else(|| paths.daemon_log_file())
}

fn refresh_period(refresh_minutes: u64) -> Duration {
    Duration::from_secs(refresh_minutes.saturating_mul(60))
}

async fn scheduled_pass(reconciler: &Reconciler, running: &Mutex<()>) {
    let Ok(_guard) = running.try_lock() else {
        warn!(
            operation = "scheduled_run_skipped",
            "Previous pass still running, skipping this tick"
        );
        return;
    };

    info!(operation = "scheduled_run_start", "Starting scheduled pass");
    let summary = reconciler.run_once().await;
    info!(
        operation = "scheduled_run_complete",
        added = summary.titles_added,
        failures = summary.failure_count(),
        duration_ms = summary.duration.as_millis() as u64,
        "Scheduled pass completed"
    );
}

pub async fn run_daemon(
    config: Config,
    no_startup_run: bool,
    refresh_minutes: Option<u64>,
    output: &Output,
) -> Result<()> {
    let scheduler_config = SchedulerConfig {
        refresh_minutes: refresh_minutes.unwrap_or(config.scheduler.refresh_minutes),
        run_on_startup: config.scheduler.run_on_startup && !no_startup_run,
    };

    // The profile is resolved once; a missing profile stops the daemon before it schedules anything
    let reconciler = super::connect(&config).await?;
    info!(
        operation = "daemon_ready",
        quality_profile = %reconciler.quality_profile().name,
        quality_profile_id = reconciler.quality_profile().id,
        "Resolved quality profile"
    );

    let mut scheduler = Scheduler::new(reconciler, scheduler_config).await?;
    scheduler.start(output).await
}
