use super::{Session, print_report};
use colored::Colorize;
use std::path::Path;

pub async fn handle(datacenter: &Path, hosted_zone: &Path) -> anyhow::Result<()> {
    let session = Session::open(datacenter, hosted_zone).await?;
    println!(
        "{} {}",
        "Decommissioning datacenter".blue(),
        session.datacenter.network.name.to_string().cyan()
    );

    let report = session
        .engine
        .decommission(&session.datacenter, &session.hosted_zone)
        .await?;
    print_report("Decommission", &report);
    Ok(())
}
