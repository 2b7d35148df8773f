#![deny(unsafe_code)]
//! CLI binary for the powerbox field synthesiser.
//!
//! Subcommands:
//! - `realize` writes a realised over-density field as JSON
//! - `sample` writes a Poisson tracer catalogue as JSON
//! - `power` prints the binned power spectrum of a fresh realisation
//! - `list` prints available spectra and field models

mod error;
mod output;

use clap::{Args, Parser, Subcommand};
use error::CliError;
use output::{CatalogueDocument, FieldDocument};
use powerbox_core::{get_power, list_models, BoxConfig, Recipe, SampleOptions};
use powerbox_spectra::{build_box, SpectrumKind};
use std::path::PathBuf;
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "powerbox", about = "Random fields with a prescribed power spectrum")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

/// Box, spectrum and seed options shared by every realising subcommand.
#[derive(Args)]
struct BoxArgs {
    /// Load everything below from a recipe file instead.
    #[arg(long)]
    recipe: Option<PathBuf>,

    /// Spectrum name (see `list`).
    #[arg(long, default_value = "power-law")]
    spectrum: String,

    /// Spectrum parameters as a JSON string.
    #[arg(long, default_value = "{}")]
    params: String,

    /// Field model: gaussian or lognormal.
    #[arg(short, long, default_value = "gaussian")]
    model: String,

    /// Cells per side.
    #[arg(short, long, default_value_t = 64)]
    n: usize,

    /// Number of dimensions.
    #[arg(short, long, default_value_t = 2)]
    dim: usize,

    /// Physical side length of the box.
    #[arg(short = 'L', long, default_value_t = 1.0)]
    box_length: f64,

    /// Fourier convention normalisation parameter.
    #[arg(short, long, default_value_t = 1.0, allow_negative_numbers = true)]
    a: f64,

    /// Fourier convention kernel parameter.
    #[arg(short, long, default_value_t = 1.0, allow_negative_numbers = true)]
    b: f64,

    /// Clip Gaussian over-densities at -1.
    #[arg(long)]
    ensure_physical: bool,

    /// Use the spectrum as given instead of dividing it by the box volume.
    #[arg(long)]
    no_vol_normalise: bool,

    /// PRNG seed for deterministic output.
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

impl BoxArgs {
    fn recipe(&self) -> Result<Recipe, CliError> {
        if let Some(path) = &self.recipe {
            return output::read_recipe(path);
        }
        let spectrum_params: serde_json::Value = serde_json::from_str(&self.params)
            .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
        let config = BoxConfig::new(self.n)
            .with_dim(self.dim)
            .with_box_length(self.box_length)
            .with_convention(self.a, self.b)
            .with_ensure_physical(self.ensure_physical)
            .with_vol_normalised_power(!self.no_vol_normalise);
        Ok(Recipe {
            spectrum: self.spectrum.clone(),
            spectrum_params,
            model: self.model.clone(),
            config,
            seed: self.seed,
        })
    }
}

#[derive(Subcommand)]
enum Command {
    /// Realise an over-density field and write it as JSON.
    Realize {
        #[command(flatten)]
        box_args: BoxArgs,

        /// Output file path.
        #[arg(short, long, default_value = "field.json")]
        output: PathBuf,
    },
    /// Realise a field, Poisson-sample tracers from it and write them as JSON.
    Sample {
        #[command(flatten)]
        box_args: BoxArgs,

        /// Mean tracer density per unit volume.
        #[arg(long, default_value_t = 100.0)]
        nbar: f64,

        /// Place tracers on cell coordinates instead of jittering them.
        #[arg(long)]
        no_jitter: bool,

        /// Put the lower corner of the box at the origin.
        #[arg(long)]
        min_at_zero: bool,

        /// Output file path.
        #[arg(short, long, default_value = "tracers.json")]
        output: PathBuf,
    },
    /// Estimate the power spectrum of a fresh realisation.
    Power {
        #[command(flatten)]
        box_args: BoxArgs,

        /// Number of linear |k| bins.
        #[arg(long, default_value_t = 20)]
        bins: usize,
    },
    /// List available spectra and field models.
    List,
}

fn print_json(value: &serde_json::Value) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let spectra = SpectrumKind::list_spectra();
            let models = list_models();
            if cli.json {
                print_json(&serde_json::json!({
                    "spectra": spectra,
                    "models": models,
                }))?;
            } else {
                println!("Spectra:");
                for name in spectra {
                    println!("  {name}");
                }
                println!("Models:");
                println!("  {}", models.join(", "));
            }
        }
        Command::Realize { box_args, output } => {
            let recipe = box_args.recipe()?;
            let pb = build_box(&recipe)?;
            let field = pb.delta_x(&mut recipe.random_source())?;
            output::write_json(
                &FieldDocument {
                    recipe: &recipe,
                    field: &field,
                },
                &output,
            )?;
            info!(output = %output.display(), "wrote field");

            if cli.json {
                print_json(&serde_json::json!({
                    "spectrum": recipe.spectrum,
                    "model": recipe.model,
                    "n": recipe.config.n,
                    "dim": recipe.config.dim,
                    "seed": recipe.seed,
                    "mean": field.mean(),
                    "variance": field.variance(),
                    "output": output.display().to_string(),
                }))?;
            } else {
                eprintln!(
                    "realised {} {} field ({}^{}, seed {}) -> {}",
                    recipe.model,
                    recipe.spectrum,
                    recipe.config.n,
                    recipe.config.dim,
                    recipe.seed,
                    output.display()
                );
            }
        }
        Command::Sample {
            box_args,
            nbar,
            no_jitter,
            min_at_zero,
            output,
        } => {
            let recipe = box_args.recipe()?;
            let mut pb = build_box(&recipe)?;
            let options = SampleOptions {
                randomise_in_cell: !no_jitter,
                min_at_zero,
                store_pos: false,
            };
            let catalogue = pb.create_discrete_sample(nbar, options, &mut recipe.random_source())?;
            output::write_json(
                &CatalogueDocument {
                    recipe: &recipe,
                    nbar,
                    catalogue: &catalogue,
                },
                &output,
            )?;
            info!(tracers = catalogue.len(), output = %output.display(), "wrote catalogue");

            if cli.json {
                print_json(&serde_json::json!({
                    "tracers": catalogue.len(),
                    "nbar": nbar,
                    "seed": recipe.seed,
                    "output": output.display().to_string(),
                }))?;
            } else {
                eprintln!(
                    "sampled {} tracers (nbar {nbar}, seed {}) -> {}",
                    catalogue.len(),
                    recipe.seed,
                    output.display()
                );
            }
        }
        Command::Power { box_args, bins } => {
            let recipe = box_args.recipe()?;
            let pb = build_box(&recipe)?;
            let field = pb.delta_x(&mut recipe.random_source())?;
            let estimate = get_power(&field, pb.grid(), bins)?;

            if cli.json {
                print_json(&serde_json::to_value(&estimate)?)?;
            } else {
                println!("{:>14} {:>14} {:>8}", "k", "P(k)", "cells");
                for ((k, p), count) in estimate
                    .k
                    .iter()
                    .zip(&estimate.power)
                    .zip(&estimate.counts)
                {
                    println!("{k:>14.6e} {p:>14.6e} {count:>8}");
                }
            }
        }
    }

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
