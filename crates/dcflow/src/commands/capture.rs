use super::{Session, print_report};
use colored::Colorize;
use std::path::Path;

pub async fn handle(datacenter: &Path, hosted_zone: &Path) -> anyhow::Result<()> {
    let session = Session::open(datacenter, hosted_zone).await?;
    let targets = session
        .datacenter
        .instances
        .iter()
        .filter(|i| i.target_image.is_some())
        .count();
    if targets == 0 {
        println!("{}", "No instance declares a target image".yellow());
        return Ok(());
    }

    println!("{} ({})", "Capturing images".blue(), targets);
    let report = session.engine.capture_images(&session.datacenter).await?;
    print_report("Capture images", &report);
    Ok(())
}
