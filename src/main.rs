use clap::{Parser, Subcommand};
use radio_atlas::{config, data, facets, output, sitemap, validate};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "radio-atlas")]
#[command(about = "Facet index, sitemaps and build validation for a radio station directory")]
#[command(long_about = "\
Facet index, sitemaps and build validation for a radio station directory

A single JSON file of station records drives the site. Listed stations
(lastcheckok = 1) are grouped into cities, genres, bitrate quality tiers and
alphabetical letter hubs; every listing page of the built site is one of
those facets.

Project structure:

  project/
  ├── config.toml                # Optional overrides (see gen-config)
  ├── src/data/stations.json     # Station records
  └── dist/                      # Built site
      ├── station/<slug>/
      ├── city/<slug>/[page/<n>/]
      ├── city/<city>/genre/<genre>/
      ├── genre/<slug>/[page/<n>/]
      ├── city/letter/<a-z|0-9|other>/
      ├── genre/letter/<a-z|0-9|other>/
      ├── quality/<low|standard|high|hd>/
      ├── top-rated/
      └── sitemap*.xml

Run 'radio-atlas gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Project root (holds config.toml, the station file and the output dir)
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the facet index and print a summary
    Index {
        /// Number of cities and genres to list
        #[arg(long, default_value_t = 10)]
        limit: usize,
        /// Print city and genre statistics as JSON instead
        #[arg(long)]
        json: bool,
    },
    /// Write sitemap.xml and the per-family sitemaps into the output dir
    Sitemap {
        /// Fixed lastmod timestamp (default: now, UTC)
        #[arg(long)]
        lastmod: Option<String>,
    },
    /// Check the built site against facets recomputed from the station file
    Validate,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    match cli.command {
        Command::Index { limit, json } => {
            let site_config = config::load_config(&cli.root)?;
            let index = load_index(&cli.root, &site_config)?;
            if json {
                let value = json!({
                    "total": index.total_stations(),
                    "listed": index.listed_count(),
                    "cities": index.cities(),
                    "genres": index.genres(),
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                output::print_index_summary(&index, limit);
            }
        }
        Command::Sitemap { lastmod } => {
            let site_config = config::load_config(&cli.root)?;
            let index = load_index(&cli.root, &site_config)?;
            let lastmod = lastmod.unwrap_or_else(sitemap::lastmod_now);
            let dir = site_config.output_dir(&cli.root);
            let site = site_config.urls()?;
            let written = sitemap::write_sitemaps(&dir, &index, &site, &lastmod)?;
            output::print_sitemap_output(&written, &dir);
        }
        Command::Validate => return Ok(run_validate(&cli.root)),
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn load_index(
    root: &Path,
    site_config: &config::SiteConfig,
) -> Result<facets::Index, data::LoadError> {
    let stations = data::load_stations(&site_config.data_path(root))?;
    Ok(facets::Index::build(stations, &site_config.facets))
}

/// Exit 0 when clean, 1 with issues, 2 when validation could not run.
fn run_validate(root: &Path) -> ExitCode {
    let result = config::load_config(root)
        .map_err(|e| e.to_string())
        .and_then(|c| validate::run(root, &c).map_err(|e| e.to_string()));
    match result {
        Ok(report) => {
            output::print_validation_report(&report);
            if report.is_clean() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(e) => {
            eprintln!("SEO validation could not run: {e}");
            ExitCode::from(2)
        }
    }
}
