use crate::catalog::RevenueCatalog;
use crate::tooltip::PanelGeometry;
use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Default Natural Earth admin-0 layer
pub const DEFAULT_GEOGRAPHY: &str = "data/ne_110m_admin_0_countries.json";

#[derive(Parser, Debug)]
#[command(
    name = "revenue-map",
    about = "Terminal choropleth world map of per-country revenue"
)]
pub struct Args {
    /// GeoJSON file with country polygons
    #[arg(short, long, default_value = DEFAULT_GEOGRAPHY)]
    pub geography: PathBuf,

    /// TOML revenue catalog replacing the built-in countries
    #[arg(short, long)]
    pub catalog: Option<PathBuf>,

    /// Write logs to this file (the terminal is owned by the UI)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Debug-level logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Resolved startup configuration
pub struct Settings {
    pub geography: PathBuf,
    pub catalog: RevenueCatalog,
    pub panel: PanelGeometry,
}

impl Settings {
    /// Resolve arguments, loading the catalog file if one was given
    pub fn from_args(args: &Args) -> Result<Self> {
        let catalog = match &args.catalog {
            Some(path) => RevenueCatalog::load(path)
                .with_context(|| format!("failed to load catalog {}", path.display()))?,
            None => RevenueCatalog::builtin(),
        };

        Ok(Self {
            geography: args.geography.clone(),
            catalog,
            panel: PanelGeometry::CELLS,
        })
    }
}

/// Install a file-backed subscriber when a log file is configured.
/// RUST_LOG overrides the level chosen by `--verbose`.
pub fn init_logging(args: &Args) -> Result<()> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };

    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["revenue-map"]);
        assert_eq!(args.geography, PathBuf::from(DEFAULT_GEOGRAPHY));
        assert!(args.catalog.is_none());
        assert!(args.log_file.is_none());
        assert!(!args.verbose);

        let settings = Settings::from_args(&args).unwrap();
        assert_eq!(settings.catalog.len(), 5);
        assert_eq!(settings.panel, PanelGeometry::CELLS);
    }

    #[test]
    fn test_flags() {
        let args = Args::parse_from([
            "revenue-map",
            "--geography",
            "world.json",
            "--log-file",
            "map.log",
            "-v",
        ]);
        assert_eq!(args.geography, PathBuf::from("world.json"));
        assert_eq!(args.log_file, Some(PathBuf::from("map.log")));
        assert!(args.verbose);
    }

    #[test]
    fn test_missing_catalog_is_an_error() {
        let args = Args::parse_from(["revenue-map", "--catalog", "no/such/catalog.toml"]);
        let err = Settings::from_args(&args).err().unwrap();
        assert!(format!("{err:#}").contains("no/such/catalog.toml"));
    }

    #[test]
    fn test_logging_disabled_without_file() {
        let args = Args::parse_from(["revenue-map"]);
        assert!(init_logging(&args).is_ok());
    }
}
