//! The `scrivener ocr` command for license image scans.

use clap::{Args, Subcommand};
use futures_util::{stream, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use scrivener_core::queue::LogQueue;
use scrivener_core::{MessageQueue, OcrService, PlatformType};
use std::sync::Arc;

use super::Context;

/// Arguments for the `ocr` command.
#[derive(Args, Debug)]
pub struct OcrArgs {
    #[command(subcommand)]
    pub command: OcrCommand,
}

/// OCR subcommands.
#[derive(Subcommand, Debug)]
pub enum OcrCommand {
    /// Print the license holder's name
    Name {
        /// Image URI
        uri: String,
    },

    /// Extract identity records and publish them as OCR events
    Info {
        /// User the licenses belong to
        #[arg(short, long)]
        user: String,

        /// Profession: apen, nurse or phar
        #[arg(short = 'P', long)]
        platform: PlatformType,

        /// Image URIs
        #[arg(required = true)]
        uris: Vec<String>,

        /// Number of images scanned concurrently
        #[arg(short, long, default_value = "4")]
        parallel: usize,
    },
}

/// Execute the ocr command.
pub async fn execute(ctx: &Context, args: OcrArgs) -> anyhow::Result<()> {
    let queue = queue_for(ctx, &args.command)?;
    let service = OcrService::new(ctx.generator()?, queue, ctx.config.ocr.clone());

    match args.command {
        OcrCommand::Name { uri } => {
            let name = service.scan_name(&uri).await?;
            println!("{name}");
        }

        OcrCommand::Info {
            user,
            platform,
            uris,
            parallel,
        } => scan_batch(&service, &user, platform, uris, parallel).await?,
    }

    Ok(())
}

/// Name scans never publish, so only `info` needs the configured queue.
fn queue_for(ctx: &Context, command: &OcrCommand) -> anyhow::Result<Arc<dyn MessageQueue>> {
    match command {
        OcrCommand::Name { .. } => Ok(Arc::new(LogQueue)),
        OcrCommand::Info { .. } => ctx.queue(),
    }
}

/// Scan every URI with bounded concurrency, printing one JSON line per record.
async fn scan_batch(
    service: &OcrService,
    user: &str,
    platform: PlatformType,
    uris: Vec<String>,
    parallel: usize,
) -> anyhow::Result<()> {
    let total = uris.len();
    let progress = if total > 1 {
        create_progress_bar(total as u64)?
    } else {
        ProgressBar::hidden()
    };

    let mut results = stream::iter(uris)
        .map(|uri| async move {
            let result = service.scan_raw_info(user, &uri, platform).await;
            (uri, result)
        })
        .buffer_unordered(parallel.max(1));

    let mut failed = 0usize;
    while let Some((uri, result)) = results.next().await {
        match result {
            Ok(info) => {
                let line = serde_json::to_string(&info)?;
                progress.suspend(|| println!("{line}"));
            }
            Err(e) => {
                failed += 1;
                tracing::error!(uri = %uri, kind = ?e.kind(), "OCR failed: {e}");
            }
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    if failed > 0 {
        anyhow::bail!("{failed} of {total} images failed");
    }
    tracing::info!("Scanned {total} images for platform {platform}");
    Ok(())
}

fn create_progress_bar(total: u64) -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
            )?
            .progress_chars("##-"),
    );
    pb.set_message("scanning...");
    Ok(pb)
}
