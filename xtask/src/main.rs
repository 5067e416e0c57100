use anyhow::{Context, Result};
use burn_ndarray::NdArray;
use clap::{Parser, Subcommand};
use cmri_core::synthetic::brain_phantom;
use cmri_core::{Phantom, SpinEchoParams, Tissue, Weighting};
use cmri_io::{load_phantom, save_phantom, write_nifti_2d, PhantomSource};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

type Backend = NdArray<f32>;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Phantom tooling for the cmri project")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a synthetic brain phantom as NIfTI maps plus manifest
    GeneratePhantom {
        /// Output directory
        #[arg(short, long, default_value = "phantom")]
        output: PathBuf,

        /// Edge length of the square grid
        #[arg(short, long, default_value_t = 128)]
        size: usize,

        /// Overwrite an existing phantom
        #[arg(short, long)]
        force: bool,
    },

    /// Print mean T1, T2 and PD per tissue
    TissueStats {
        /// Phantom directory or manifest
        #[arg(short, long, default_value = "phantom")]
        phantom: PathBuf,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Simulate spin-echo images and write them as NIfTI
    Simulate {
        /// Phantom directory or manifest
        #[arg(short, long, default_value = "phantom")]
        phantom: PathBuf,

        /// Repetition time in ms
        #[arg(long, requires = "te", conflicts_with = "weighting")]
        tr: Option<f64>,

        /// Echo time in ms
        #[arg(long, requires = "tr")]
        te: Option<f64>,

        /// Preset weighting (pdw, t1w, t2w); all three when no timing is given
        #[arg(short, long)]
        weighting: Option<Weighting>,

        /// Output directory
        #[arg(short, long, default_value = "simulated")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::GeneratePhantom { output, size, force } => {
            generate_phantom(&output, size, force)?;
        }
        Commands::TissueStats { phantom, json } => {
            tissue_stats(&phantom, json)?;
        }
        Commands::Simulate { phantom, tr, te, weighting, output } => {
            simulate(&phantom, tr.zip(te), weighting, &output)?;
        }
    }

    Ok(())
}

fn open_phantom(path: &Path) -> Result<Phantom<Backend>> {
    let source = PhantomSource::discover(path)?;
    let device = Default::default();
    load_phantom::<Backend>(&source, &device)
        .with_context(|| format!("Failed to load phantom from {}", path.display()))
}

fn generate_phantom(output: &Path, size: usize, force: bool) -> Result<()> {
    let manifest = output.join(cmri_io::source::MANIFEST_FILE);
    if manifest.exists() && !force {
        info!("Phantom already exists at {}. Use --force to overwrite.", output.display());
        return Ok(());
    }

    info!("Generating {}x{} synthetic phantom", size, size);
    let device = Default::default();
    let phantom = brain_phantom::<Backend>(size, &device)?;
    save_phantom(&phantom, output)?;

    info!("Phantom written to {}", output.display());
    Ok(())
}

fn tissue_stats(path: &Path, json: bool) -> Result<()> {
    let phantom = open_phantom(path)?;
    let summary = phantom.tissue_summary()?;

    if summary.len() < Tissue::ALL.len() {
        warn!("Only {} of {} tissues present in label map", summary.len(), Tissue::ALL.len());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{:<6} {:>8} {:>10} {:>10} {:>8}", "Tissue", "Pixels", "T1 [ms]", "T2 [ms]", "PD");
    for stats in &summary {
        println!(
            "{:<6} {:>8} {:>10.1} {:>10.1} {:>8.3}",
            stats.tissue.abbreviation(),
            stats.pixel_count,
            stats.mean_t1,
            stats.mean_t2,
            stats.mean_pd
        );
    }

    println!();
    println!("Predicted spin-echo signal:");
    for weighting in Weighting::ALL {
        let params = weighting.params();
        let signals: Vec<String> = summary
            .iter()
            .map(|stats| format!("{}={:.4}", stats.tissue, stats.signal(&params)))
            .collect();
        println!("  {:<4} ({})  {}", weighting, params, signals.join("  "));
    }

    Ok(())
}

fn simulate(
    path: &Path,
    timing: Option<(f64, f64)>,
    weighting: Option<Weighting>,
    output: &Path,
) -> Result<()> {
    let phantom = open_phantom(path)?;
    std::fs::create_dir_all(output)?;

    let runs: Vec<(String, SpinEchoParams)> = match (timing, weighting) {
        (Some((tr, te)), _) => vec![(format!("se_tr{}_te{}", tr, te), SpinEchoParams::new(tr, te)?)],
        (None, Some(weighting)) => vec![(weighting.label().to_string(), weighting.params())],
        (None, None) => Weighting::ALL
            .iter()
            .map(|w| (w.label().to_string(), w.params()))
            .collect(),
    };

    for (name, params) in runs {
        let image = phantom.simulate(&params);
        let file = output.join(format!("{}.nii", name));
        write_nifti_2d(&file, &image)?;
        info!(
            "{} ({}): signal range [{:.4}, {:.4}], mean {:.4} -> {}",
            name,
            params,
            image.min(),
            image.max(),
            image.mean(),
            file.display()
        );
    }

    Ok(())
}
