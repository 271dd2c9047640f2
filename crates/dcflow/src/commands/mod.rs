pub mod capture;
pub mod decommission;
pub mod provision;
pub mod validate;

use colored::Colorize;
use dcflow_cloud::{CredentialStore, Engine, Report, StepOutcome};
use dcflow_cloud_aws::AwsProvider;
use dcflow_config::{DatacenterDirs, ProviderContext};
use dcflow_core::{BootTemplate, Datacenter, HostedZoneSpec, load_datacenter, load_hosted_zone};
use std::path::Path;
use std::sync::Arc;

/// Loaded configuration plus an engine wired to AWS
pub struct Session {
    pub datacenter: Datacenter,
    pub hosted_zone: HostedZoneSpec,
    pub engine: Engine,
}

impl Session {
    /// Configuration and credentials are checked before any remote call
    pub async fn open(datacenter: &Path, hosted_zone: &Path) -> anyhow::Result<Self> {
        let datacenter = load_datacenter(datacenter)?;
        let hosted_zone = load_hosted_zone(hosted_zone)?;
        let context = ProviderContext::from_env()?;
        let dirs = DatacenterDirs::from_env()?;

        let credentials = CredentialStore::new(dirs.ensure_access_dir()?);
        let template = BootTemplate::load(dirs.existing_templates_dir())?;
        let provider = AwsProvider::from_context(&context).await;

        Ok(Self {
            datacenter,
            hosted_zone,
            engine: Engine::new(Arc::new(provider), credentials, template),
        })
    }
}

fn outcome_label(outcome: StepOutcome) -> colored::ColoredString {
    let label = outcome.to_string();
    match outcome {
        StepOutcome::Created
        | StepOutcome::Attached
        | StepOutcome::Associated
        | StepOutcome::RouteAdded => label.green(),
        StepOutcome::Deleted => label.red(),
        StepOutcome::Skipped => label.yellow(),
        StepOutcome::Unchanged | StepOutcome::Absent => label.dimmed(),
    }
}

/// Print every step and the one-line summary
pub fn print_report(title: &str, report: &Report) {
    println!();
    println!("{}", title.bold());
    for step in &report.steps {
        print!(
            "  {:<20} {} {}",
            step.kind.to_string(),
            format!("{:<40}", step.name).cyan(),
            outcome_label(step.outcome)
        );
        match &step.detail {
            Some(detail) => println!(" ({})", detail),
            None => println!(),
        }
    }
    println!();
    println!(
        "{} {} ({} ms)",
        "✓".green().bold(),
        report.summary(),
        report.duration_ms
    );
}
