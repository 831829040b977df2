//! CLI module - Command-line interface definitions and handlers

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use crate::core::render::{OutputFormat, RenderConfig};
use crate::geocode::gazetteer::GazetteerGeocoder;
use crate::geocode::nominatim::{
    NominatimConfig, NominatimGeocoder, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
use crate::geocode::Geocoder;

/// geocache - resolve place names to coordinates through a persistent cache.
#[derive(Parser, Debug)]
#[command(name = "geocache")]
#[command(
    author,
    version,
    about,
    long_about = r#"geocache resolves place names to latitude/longitude and remembers the answers.

Each run opens the cache file, answers lookups from it where possible, asks the
geocoding provider only for names it has not seen, and merges its new entries
back into the file on exit. Entries written by other runs in the meantime are kept.

Output formats:
- jsonl: one JSON object per line (default)
- json: a single JSON array
- md: human-friendly Markdown
- raw: tab-separated name, latitude, longitude

Examples:
    geocache lookup Canada UK "New York"
    geocache --provider gazetteer --gazetteer places.json lookup India
    geocache show --format md
    geocache plot data.json
"#
)]
pub struct Cli {
    /// Path to the cache snapshot file.
    #[arg(
        long,
        global = true,
        env = "GEOCACHE_FILE",
        default_value = "geo_cache.json",
        value_name = "PATH",
        long_help = "Path to the cache snapshot file.\n\n\
The file is created (empty) on first use. A file that exists but cannot be read or\n\
parsed is reported as an error and never silently replaced."
    )]
    pub cache: PathBuf,

    /// Geocoding provider used on cache misses.
    #[arg(
        long,
        global = true,
        env = "GEOCACHE_PROVIDER",
        value_enum,
        default_value_t = ProviderKind::Nominatim
    )]
    pub provider: ProviderKind,

    /// Gazetteer file for the gazetteer provider.
    #[arg(
        long,
        global = true,
        env = "GEOCACHE_GAZETTEER",
        value_name = "FILE",
        long_help = "JSON file mapping place names to {\"latitude\", \"longitude\"} objects.\n\n\
Required when --provider gazetteer is selected."
    )]
    pub gazetteer: Option<PathBuf>,

    /// Base URL of a Nominatim-compatible service.
    #[arg(
        long,
        global = true,
        env = "NOMINATIM_URL",
        default_value = DEFAULT_BASE_URL,
        value_name = "URL"
    )]
    pub nominatim_url: String,

    /// User-Agent sent to the geocoding service.
    #[arg(
        long,
        global = true,
        env = "GEOCACHE_USER_AGENT",
        default_value = DEFAULT_USER_AGENT,
        value_name = "UA"
    )]
    pub user_agent: String,

    /// Request timeout for the geocoding service.
    #[arg(
        long,
        global = true,
        env = "GEOCACHE_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_name = "SECS"
    )]
    pub timeout_secs: u64,

    /// Output format (jsonl/json/md/raw).
    #[arg(long, global = true, default_value = "jsonl", value_name = "FORMAT")]
    pub format: String,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Quiet mode (warnings and errors only on stderr).
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (log every cache hit and miss).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderKind {
    /// OpenStreetMap Nominatim over HTTP
    Nominatim,
    /// Local JSON gazetteer file (offline)
    Gazetteer,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve place names to coordinates.
    #[command(
        long_about = "Resolve each NAME through the cache, asking the provider on a miss.\n\n\
By default the first name the provider cannot resolve aborts the command; names\n\
resolved before it are still saved. With --skip-unresolved, failures are reported\n\
as error items and the remaining names are still looked up.\n\n\
Examples:\n\
  geocache lookup Canada UK\n\
  geocache lookup USA Atlantis --skip-unresolved\n"
    )]
    Lookup {
        /// Place names (exact, case-sensitive cache keys).
        #[arg(value_name = "NAME", required = true, num_args = 1..)]
        names: Vec<String>,

        /// Report unresolved names instead of aborting.
        #[arg(long)]
        skip_unresolved: bool,
    },

    /// List every cached entry without contacting the provider.
    Show,

    /// Compute map markers for a dataset of per-location values.
    #[command(
        long_about = "Read DATASET ({\"data\": {NAME: VALUE, ...}, \"baseline\": VALUE}), resolve\n\
every location through the cache and emit one marker per location: projected\n\
Mercator position, value/baseline ratio and arrow geometry/colour.\n\n\
Example:\n\
  geocache plot data.json --format md\n"
    )]
    Plot {
        /// Dataset JSON file.
        #[arg(value_name = "DATASET")]
        dataset: PathBuf,

        /// Skip locations the provider cannot resolve.
        #[arg(long)]
        skip_unresolved: bool,
    },
}

impl Cli {
    /// Build the provider selected on the command line
    pub fn geocoder(&self) -> Result<Box<dyn Geocoder>> {
        match self.provider {
            ProviderKind::Nominatim => {
                let geocoder = NominatimGeocoder::new(NominatimConfig {
                    base_url: self.nominatim_url.clone(),
                    user_agent: self.user_agent.clone(),
                    timeout: Duration::from_secs(self.timeout_secs),
                })?;
                Ok(Box::new(geocoder))
            }
            ProviderKind::Gazetteer => {
                let path = self
                    .gazetteer
                    .as_deref()
                    .context("--gazetteer <FILE> is required with --provider gazetteer")?;
                Ok(Box::new(GazetteerGeocoder::load(path)?))
            }
        }
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let format: OutputFormat = cli.format.parse().unwrap_or_default();
    let render_config = RenderConfig::with_pretty(format, cli.pretty);

    match &cli.command {
        Commands::Lookup {
            names,
            skip_unresolved,
        } => crate::commands::lookup::run_lookup(
            &cli.cache,
            cli.geocoder()?,
            names,
            *skip_unresolved,
            render_config,
        ),

        Commands::Show => crate::commands::show::run_show(&cli.cache, render_config),

        Commands::Plot {
            dataset,
            skip_unresolved,
        } => crate::commands::plot::run_plot(
            &cli.cache,
            cli.geocoder()?,
            dataset,
            *skip_unresolved,
            render_config,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["geocache", "lookup", "Canada"]).unwrap();
        assert_eq!(cli.provider, ProviderKind::Nominatim);
        assert_eq!(cli.format, "jsonl");
        assert!(matches!(
            cli.command,
            Commands::Lookup { ref names, skip_unresolved: false } if names == &["Canada"]
        ));
    }

    #[test]
    fn test_lookup_requires_a_name() {
        assert!(Cli::try_parse_from(["geocache", "lookup"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "geocache",
            "lookup",
            "UK",
            "--cache",
            "/tmp/x.json",
            "--provider",
            "gazetteer",
        ])
        .unwrap();
        assert_eq!(cli.cache, PathBuf::from("/tmp/x.json"));
        assert_eq!(cli.provider, ProviderKind::Gazetteer);
    }

    #[test]
    fn test_gazetteer_requires_file() {
        let cli =
            Cli::try_parse_from(["geocache", "--provider", "gazetteer", "lookup", "UK"]).unwrap();
        let cli = Cli {
            gazetteer: None,
            ..cli
        };
        let err = cli.geocoder().err().unwrap();
        assert!(err.to_string().contains("--gazetteer"));
    }
}
