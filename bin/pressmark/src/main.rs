//! pressmark CLI
//!
//! `publish` converts a tree of Markdown documents into a static site, and
//! optionally uploads it or keeps it up to date while serving it locally.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use pressmark::cmd::{self, watch::WatchMode};
use pressmark_core::config::normalize_base_url;

/// Command-line interface for pressmark.
#[derive(Parser)]
#[command(name = "publish", version, about = "Publish a Markdown tree as a static site")]
struct Cli {
    /// Directory containing Markdown sources, assets and templates
    source: PathBuf,

    /// Directory to write the site to (wiped first)
    target: PathBuf,

    /// Link prefix for generated URLs and upload keys
    #[arg(
        short = 'b',
        long = "base-url",
        visible_aliases = ["base_url", "base"],
        default_value = ""
    )]
    base_url: String,

    /// Keep running: republish on changes and serve the target directory
    #[arg(short = 'w', long)]
    watchdog: bool,

    /// In watch mode, republish the whole tree on every change
    #[arg(short = 'i', long)]
    reindex: bool,

    /// Debug logging
    #[arg(short, long)]
    debug: bool,

    /// Upload the published tree to the object store
    #[arg(short, long)]
    upload: bool,

    /// Port for the local server in watch mode
    #[arg(short, long)]
    port: Option<u16>,

    /// Path to configuration file (default: <SOURCE>/pressmark.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    pressmark::init_tracing(cli.debug);

    let config = cmd::load_config(cli.config.as_deref(), &cli.source)?;
    let base_url = normalize_base_url(&cli.base_url);
    let port = cli.port.unwrap_or(config.server.port);

    let publisher = cmd::publish::run(&cli.source, &cli.target, &base_url, config)?;

    if cli.upload {
        cmd::upload::run(
            publisher.target_root(),
            &base_url,
            &publisher.config().upload,
        )
        .await?;
    }

    if cli.watchdog {
        let mode = if cli.reindex {
            WatchMode::Reindex
        } else {
            WatchMode::Fast
        };
        cmd::watch::run(publisher, mode, port).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_cli_positional_only() {
        let cli = Cli::parse_from(["publish", "src", "out"]);

        assert_eq!(cli.source, PathBuf::from("src"));
        assert_eq!(cli.target, PathBuf::from("out"));
        assert_eq!(cli.base_url, "");
        assert!(!cli.watchdog);
        assert!(!cli.reindex);
        assert!(!cli.debug);
        assert!(!cli.upload);
        assert!(cli.port.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "publish", "src", "out", "-b", "/blog", "-w", "-i", "-d", "-u", "-p", "9000", "-c",
            "site.toml",
        ]);

        assert_eq!(cli.base_url, "/blog");
        assert!(cli.watchdog);
        assert!(cli.reindex);
        assert!(cli.debug);
        assert!(cli.upload);
        assert_eq!(cli.port, Some(9000));
        assert_eq!(cli.config, Some(PathBuf::from("site.toml")));
    }

    #[test]
    fn test_cli_long_flags() {
        let cli = Cli::parse_from([
            "publish",
            "src",
            "out",
            "--base-url",
            "blog",
            "--watchdog",
            "--reindex",
            "--debug",
            "--upload",
            "--port",
            "8080",
            "--config",
            "other.toml",
        ]);

        assert_eq!(cli.base_url, "blog");
        assert!(cli.watchdog && cli.reindex && cli.debug && cli.upload);
        assert_eq!(cli.port, Some(8080));
        assert_eq!(cli.config, Some(PathBuf::from("other.toml")));
    }

    #[test]
    fn test_cli_base_url_aliases() {
        let cli = Cli::parse_from(["publish", "src", "out", "--base_url", "/a"]);
        assert_eq!(cli.base_url, "/a");

        let cli = Cli::parse_from(["publish", "src", "out", "--base", "/b"]);
        assert_eq!(cli.base_url, "/b");
    }

    #[test]
    fn test_cli_requires_both_dirs() {
        assert!(Cli::try_parse_from(["publish", "src"]).is_err());
        assert!(Cli::try_parse_from(["publish"]).is_err());
    }

    #[test]
    fn test_cli_rejects_bad_port() {
        assert!(Cli::try_parse_from(["publish", "src", "out", "-p", "http"]).is_err());
    }
}
