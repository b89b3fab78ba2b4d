use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{error, info, warn};

use cardgen::export::{self, JPG_QUALITY};
use cardgen::record::slug;
use cardgen::{input, lookup, render, CardError, CardSpec, FragranceRecord};

#[derive(Parser, Debug)]
#[command(name = "cardgen", about = "Fragrance card generator", version)]
struct Args {
    /// Single fragrance name (looked up via the data source)
    #[arg(long)]
    name: Option<String>,

    /// CSV path with multiple fragrances
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Output directory
    #[arg(long, default_value = "out")]
    out: PathBuf,

    /// Template spec path
    #[arg(long, default_value = "template_spec.json")]
    spec: PathBuf,

    /// Integer upscale factor for saved cards
    #[arg(long, default_value_t = 1)]
    scale: u32,

    /// Also export a JPG next to each PNG
    #[arg(long)]
    jpg: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let spec = CardSpec::load(&args.spec)
        .with_context(|| format!("loading spec {}", args.spec.display()))?;

    let mut jobs: Vec<FragranceRecord> = Vec::new();
    if let Some(csv_path) = &args.csv {
        for raw in input::read_csv(csv_path)? {
            match raw.normalize() {
                Ok(rec) => jobs.push(rec),
                Err(e) => warn!("skipping row: {e}"),
            }
        }
    }
    if let Some(name) = &args.name {
        if name.trim().is_empty() {
            bail!("--name must not be empty");
        }
        jobs.push(lookup::fetch_by_name(name));
    }
    if jobs.is_empty() {
        bail!("provide --name or --csv");
    }

    // One bad record must not take down its siblings; render everything and
    // report a summary.
    let total = jobs.len();
    let mut failures = 0usize;
    for job in &jobs {
        match run_job(job, &spec, &args) {
            Ok(path) => info!("saved {}", path.display()),
            Err(e) => {
                failures += 1;
                error!("{}: {e}", job.name);
            }
        }
    }
    if failures > 0 {
        bail!("{failures} of {total} cards failed");
    }
    Ok(())
}

fn run_job(record: &FragranceRecord, spec: &CardSpec, args: &Args) -> Result<PathBuf, CardError> {
    let mut img = render::render_card(record, spec)?;
    if args.scale > 1 {
        img = export::upscale(&img, args.scale);
    }
    let out_path = args.out.join(format!("{}.png", slug(&record.name)));
    render::save_card(&img, &out_path)?;
    if args.jpg {
        export::export_jpg(&out_path, JPG_QUALITY)?;
    }
    Ok(out_path)
}
