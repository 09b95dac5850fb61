//! Command-line generator for synthetic residual-limb meshes.
//!
//! Loads the four model artifacts once, runs the requested number of
//! generations, and writes each result as `Random<i>.stl` in the output
//! directory, filling the lowest unused index.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use ssm_core::{generate, GenerateParams};
use ssm_io::{load_mode_matrix, load_range_table, load_regressor, load_stl, next_random_path, save_stl};
use tracing::info;

/// Generate synthetic residual-limb meshes from a statistical shape model.
#[derive(Debug, Parser)]
#[command(name = "limb-gen", version, about)]
struct Args {
    /// Mean limb shape (STL).
    #[arg(long, value_name = "FILE")]
    mean: PathBuf,

    /// Deformation mode matrix (NPY, float64 2-D).
    #[arg(long, value_name = "FILE")]
    modes: PathBuf,

    /// Trained score regression model (JSON).
    #[arg(long, value_name = "FILE")]
    regressor: PathBuf,

    /// Per-component score ranges (JSON).
    #[arg(long, value_name = "FILE")]
    ranges: PathBuf,

    /// Directory to write generated meshes into.
    #[arg(long, short, value_name = "DIR", default_value = ".")]
    out: PathBuf,

    /// Number of shapes to generate.
    #[arg(long, short = 'n', default_value_t = 1)]
    count: usize,

    /// Apply only the first K deformation modes.
    #[arg(long, value_name = "K")]
    leading_modes: Option<usize>,

    /// Scale each output to this intact-tibia length in millimetres.
    /// Without it, output stays in the model's size-normalised space.
    #[arg(long, value_name = "MM", conflicts_with = "scale_range")]
    scale: Option<f64>,

    /// Sample the tibia length per shape from LO,HI millimetres.
    #[arg(long, value_name = "LO,HI", value_parser = parse_scale_range)]
    scale_range: Option<(f64, f64)>,

    /// RNG seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,
}

fn parse_scale_range(s: &str) -> Result<(f64, f64), String> {
    let (lo, hi) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LO,HI, got '{s}'"))?;
    let lo: f64 = lo.trim().parse().map_err(|_| format!("bad bound '{lo}'"))?;
    let hi: f64 = hi.trim().parse().map_err(|_| format!("bad bound '{hi}'"))?;
    Ok((lo, hi))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mean = load_stl(&args.mean)
        .with_context(|| format!("loading mean shape from {}", args.mean.display()))?;
    info!(vertices = mean.vertex_count(), "mean shape loaded");

    let model = load_mode_matrix(mean, &args.modes)
        .with_context(|| format!("loading mode matrix from {}", args.modes.display()))?;
    let regressor = load_regressor(&args.regressor)
        .with_context(|| format!("loading regression model from {}", args.regressor.display()))?;
    let table = load_range_table(&args.ranges)
        .with_context(|| format!("loading range table from {}", args.ranges.display()))?;

    for run in 0..args.count {
        let mut params = GenerateParams::new();
        if let Some(k) = args.leading_modes {
            params = params.with_leading_modes(k);
        }
        if let Some(factor) = args.scale {
            params = params.with_scale_factor(factor);
        } else if let Some((lo, hi)) = args.scale_range {
            params = params.with_sampled_scale(lo, hi);
        }
        // Derive per-run seeds so a seeded batch is reproducible but each
        // shape in it is distinct.
        if let Some(seed) = args.seed {
            params = params.with_seed(seed.wrapping_add(run as u64));
        }

        let synthesis = generate(&model, &table, &regressor, &params)?;
        let path = next_random_path(&args.out, "stl")?;
        save_stl(&synthesis.mesh, &path)
            .with_context(|| format!("writing {}", path.display()))?;

        info!(path = %path.display(), "{}", synthesis.summary());
    }

    Ok(())
}
