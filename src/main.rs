use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use folio::portfolio::{generate, Portfolio};
use folio::rescale::{default_output_path, rescale_file, DEFAULT_TARGET_WIDTH};
use folio::Pt;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(version, about = "Portfolio PDF generator and page rescaler", long_about = None)]
struct CliArguments {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a portfolio PDF
    Build {
        #[arg(help = "Portfolio content in the JSON format; the built-in sample if omitted")]
        content: Option<PathBuf>,
        #[arg(short, long, help = "Where to write the PDF; defaults to the file name in the content")]
        output: Option<PathBuf>,
        #[arg(
            short,
            long = "assets",
            help = "Directory fonts and images are relative to; defaults to the content file's directory"
        )]
        asset_dir: Option<PathBuf>,
    },
    /// Rescale every page of a PDF to a fixed width, keeping aspect ratios
    Rescale {
        input: PathBuf,
        #[arg(short, long, help = "Where to write the PDF; defaults to <input>_A4width.pdf, or <input>_<WIDTH>ptwidth.pdf for other widths")]
        output: Option<PathBuf>,
        #[arg(short, long, help = "Target page width in points", default_value_t = DEFAULT_TARGET_WIDTH.0)]
        width: f32,
    },
    /// Print the built-in sample portfolio, as a starting point for your own
    Sample,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(error) = fallible_main() {
        log::error!("{:#}", error);
        std::process::exit(1);
    }
}

fn fallible_main() -> Result<()> {
    match CliArguments::parse().command {
        Command::Build {
            content,
            output,
            asset_dir,
        } => build(content.as_deref(), output, asset_dir),
        Command::Rescale { input, output, width } => {
            let output = output.unwrap_or_else(|| default_output_path(&input, Pt(width)));
            let report = rescale_file(&input, &output, Pt(width))
                .with_context(|| format!("Unable to rescale {}", input.display()))?;
            for page in &report {
                log::debug!(
                    "page {}: {} x {} -> {} x {}",
                    page.page_number,
                    page.original.0,
                    page.original.1,
                    page.rescaled.0,
                    page.rescaled.1
                );
            }
            println!("Rescaled {} page(s) to {}pt wide: {}", report.len(), width, output.display());
            Ok(())
        }
        Command::Sample => {
            let sample = Portfolio::sample().context("The built-in sample is invalid")?;
            println!("{}", sample.to_json()?);
            Ok(())
        }
    }
}

fn build(content: Option<&Path>, output: Option<PathBuf>, asset_dir: Option<PathBuf>) -> Result<()> {
    let (portfolio, content_dir) = match content {
        Some(path) => {
            let portfolio = Portfolio::from_path(path)
                .with_context(|| format!("Unable to load the portfolio from {}", path.display()))?;
            let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
            (portfolio, dir)
        }
        None => (
            Portfolio::sample().context("The built-in sample is invalid")?,
            PathBuf::new(),
        ),
    };

    // an empty path means the current directory
    let asset_dir = asset_dir.unwrap_or(content_dir);
    let output = output.unwrap_or_else(|| PathBuf::from(&portfolio.document.file_name));

    let pages = generate(&portfolio, &asset_dir, &output)
        .with_context(|| format!("Unable to generate {}", output.display()))?;
    println!("Portfolio PDF created: {} ({} pages)", output.display(), pages);
    Ok(())
}
