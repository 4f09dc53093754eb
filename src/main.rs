use clap::{Args, Parser, Subcommand};
use manifest_gal::config::{self, SiteConfig};
use manifest_gal::gallery::{self, Gallery, ImportMode};
use manifest_gal::ingest::HttpSource;
use manifest_gal::output;
use manifest_gal::render::HtmlGallery;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "manifest-gal")]
#[command(about = "Image gallery builder for IIIF manifests")]
#[command(long_about = "\
Image gallery builder for IIIF manifests

Fetches IIIF Presentation 2 manifests and renders every canvas with an image
service as a gallery card in OUTPUT/index.html.

Card fields (first available wins, canvas metadata before manifest metadata):
  Title:       Title → manifest label
  Author:      Creator → Contributors → Author → Contributor
  Date:        Date → Created Published
  Collection:  Location
  Attribution: manifest attribution
  Link:        related → Identifier → Item Url

Everything fetched can be saved with --export as one combined manifest, and
loaded again with 'manifest-gal import'.

Run 'manifest-gal gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Config file (missing file = defaults)
    #[arg(long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Log filter (e.g. warn, debug, manifest_gal=trace)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

/// Flags shared by commands that build a gallery page.
#[derive(Args, Clone)]
struct PageArgs {
    /// Also write the combined manifest as NAME.json (blank = config default)
    #[arg(long, num_args = 0..=1, default_missing_value = "", value_name = "NAME")]
    export: Option<String>,

    /// Open the Nth card (1-based) in the viewer when the page loads
    #[arg(long, value_name = "N")]
    open: Option<usize>,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch manifests and build the gallery
    Fetch {
        /// Manifest URLs; each may also be a comma-separated list
        urls: Vec<String>,

        #[command(flatten)]
        page: PageArgs,
    },
    /// Rebuild the gallery from a combined manifest file
    Import {
        /// Combined manifest written by --export
        file: PathBuf,

        /// Also collect the imported manifests, so --export includes them
        #[arg(long)]
        append: bool,

        #[command(flatten)]
        page: PageArgs,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Command::Fetch { urls, page } => {
            let urls: Vec<String> = urls.iter().flat_map(|u| gallery::split_urls(u)).collect();
            if urls.is_empty() {
                println!("Please enter one or more IIIF Manifest URLs");
                return Ok(ExitCode::FAILURE);
            }
            let config = config::load_config(&cli.config)?;
            let source = HttpSource::new(&config.http)?;

            let mut gallery = Gallery::new(config.export.clone());
            let mut html = HtmlGallery::new();
            let report = gallery.ingest_batch(&source, &urls, &mut html);
            output::print_batch_report(&report, html.cards());

            finish_page(&gallery, &mut html, &page, &config, &cli.output)?;
            Ok(exit_code(report.has_failures()))
        }
        Command::Import { file, append, page } => {
            let config = config::load_config(&cli.config)?;
            let mode = if append {
                ImportMode::Append
            } else {
                ImportMode::ViewOnly
            };

            let mut gallery = Gallery::new(config.export.clone());
            let mut html = HtmlGallery::new();
            let result = match std::fs::read_to_string(&file) {
                Ok(text) => gallery.import_combined_str(&text, mode, &mut html),
                Err(e) => Err(e.into()),
            };
            output::print_import_result(&file, &result);
            if result.is_err() {
                return Ok(ExitCode::FAILURE);
            }
            output::print_records(html.cards());

            finish_page(&gallery, &mut html, &page, &config, &cli.output)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Apply `--open`, write the page, and write the export if asked for.
fn finish_page(
    gallery: &Gallery,
    html: &mut HtmlGallery,
    page: &PageArgs,
    config: &SiteConfig,
    output_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(n) = page.open {
        let record = n
            .checked_sub(1)
            .and_then(|i| html.cards().get(i))
            .cloned()
            .ok_or_else(|| format!("--open {n}: gallery has {} cards", html.cards().len()))?;
        gallery::open_in_viewer(&record, html);
    }

    let index = html.write(output_dir, config)?;
    println!("{}", output::format_written("Gallery", &index));

    if let Some(name) = &page.export {
        let path = gallery.export_combined(name).write_to(output_dir)?;
        println!("{}", output::format_written("Combined manifest", &path));
    }
    Ok(())
}

fn exit_code(failed: bool) -> ExitCode {
    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
