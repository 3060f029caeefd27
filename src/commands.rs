// Command entry points shared by the binary and integration tests

use crate::config::{Config, Profile};
use crate::error::Result;
use crate::notify::{self, Notification};
use crate::pipeline::{PipelineRunner, RunSummary};
use crate::tracker::ProcessedSetTracker;
use std::path::{Path, PathBuf};

/// Run the pipeline for one profile, without notifying
pub async fn reconcile(profile: &Profile) -> Result<RunSummary> {
    let runner = PipelineRunner::from_profile(profile)?;
    let tracker = ProcessedSetTracker::new(&profile.tracker_path);
    runner
        .run(
            &profile.reference_path,
            &profile.batch_root,
            &profile.output_dir,
            &tracker,
        )
        .await
}

/// Load the profile, run, and send exactly one notification describing the outcome
pub async fn run_command(config_path: &Path, profile_name: &str) -> Result<RunSummary> {
    let config = Config::load(config_path)?;
    let profile = config.profile(profile_name)?;
    let notifier = notify::notifier_for(profile)?;

    let outcome = reconcile(profile).await;
    notify::deliver(notifier.as_ref(), &Notification::from_outcome(&outcome)).await;
    outcome
}

pub async fn pending_command(config_path: &Path, profile_name: &str) -> Result<Vec<PathBuf>> {
    let config = Config::load(config_path)?;
    let profile = config.profile(profile_name)?;
    let runner = PipelineRunner::from_profile(profile)?;
    let tracker = ProcessedSetTracker::new(&profile.tracker_path);
    runner.pending(&profile.batch_root, &tracker).await
}
