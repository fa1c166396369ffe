use std::path::Path;

use super::Context;

pub async fn run(ctx: &Context, session_id: &str, dir: &Path) -> anyhow::Result<()> {
    let snapshot = ctx.client.get_session(session_id).await?;
    let report = ctx.client.export_audio(&snapshot, dir).await?;

    for file in &report.saved {
        println!("saved  {} ({} bytes)", file.path.display(), file.bytes);
    }
    for failure in &report.failed {
        println!("failed {}: {}", failure.file_name, failure.error);
    }

    if !report.is_complete() {
        anyhow::bail!(
            "{} of {} files failed",
            report.failed.len(),
            report.failed.len() + report.saved.len()
        );
    }
    Ok(())
}
