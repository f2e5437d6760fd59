//! Publish command - one full publish of the source tree

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use pressmark_core::Config;
use pressmark_generator::{PublishReport, Publisher};

/// Initialize a publisher and publish the whole tree once.
///
/// Document-level failures are printed but do not make this fail; the
/// returned publisher can be handed to watch mode.
pub fn run(source: &Path, target: &Path, base_url: &str, config: Config) -> Result<Publisher> {
    tracing::info!(?source, ?target, base_url, "Starting publish");

    let mut publisher = Publisher::initialize(source, target, base_url, config)
        .wrap_err_with(|| format!("Failed to prepare publishing from {}", source.display()))?;
    let report = publisher.publish_all().wrap_err("Publish failed")?;

    print_report(&report, publisher.target_root());
    Ok(publisher)
}

/// Print a publish report in a user-friendly format.
pub fn print_report(report: &PublishReport, target: &Path) {
    println!();
    println!("  Publish Summary:");
    println!("  ─────────────────────────────────");
    println!("  Documents:    {:>6}", report.documents);
    println!("  Pages:        {:>6}", report.converted);
    println!("  Assets:       {:>6}", report.assets);
    println!("  Ignored:      {:>6}", report.ignored);
    println!("  Failed:       {:>6}", report.failed());
    if report.pruned > 0 {
        println!("  Pruned:       {:>6}", report.pruned);
    }
    println!("  ─────────────────────────────────");
    println!("  Duration:     {:>6}ms", report.duration_ms);
    println!("  Output:       {}", target.display());

    if !report.failures.is_empty() {
        println!();
        println!("  {} of {} documents failed:", report.failed(), report.documents);
        for failure in &report.failures {
            println!("  ✗ {}: {}", failure.path.display(), failure.reason);
        }
    }
    println!();
}
