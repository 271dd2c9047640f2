//! Image capture pass

use crate::accessors::{ImageAccessor, ImageRequest};
use crate::engine::{Engine, log_abort, record_ensured};
use crate::error::Result;
use crate::lookup::{Accessor, ensure_created};
use crate::remote::ResourceKind;
use crate::report::{Report, StepOutcome};
use dcflow_core::Datacenter;
use tracing::{info, instrument, warn};

impl Engine {
    /// Capture the declared target image of every live instance
    #[instrument(skip_all, fields(network = %datacenter.network.name))]
    pub async fn capture_images(&self, datacenter: &Datacenter) -> Result<Report> {
        info!("Creating images ...");
        let mut report = Report::new();
        log_abort(
            "capture-images",
            self.run_capture(datacenter, &mut report).await,
        )?;
        report.finish();
        info!(summary = %report.summary(), "Images created");
        Ok(report)
    }

    async fn run_capture(&self, dc: &Datacenter, report: &mut Report) -> Result<()> {
        for spec in &dc.instances {
            let Some(target) = &spec.target_image else {
                continue;
            };

            let Some(instance) = self.instances.find(&spec.name).await? else {
                warn!(instance = %spec.name, image = %target, "Instance not found, image skipped");
                report.record_with(
                    ResourceKind::Image,
                    target.as_str(),
                    StepOutcome::Skipped,
                    format!("instance {} not found", spec.name),
                );
                continue;
            };

            let request = ImageRequest {
                instance_id: instance.id,
                description: Some(format!("Image of {}", spec.name)),
                tags: spec.tags.clone(),
            };
            let ensured = ensure_created(&self.images, target, &request).await?;
            record_ensured::<ImageAccessor>(report, target, &ensured);
        }
        Ok(())
    }
}
