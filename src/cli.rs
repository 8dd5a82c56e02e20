// ============================================================================
// grayconv CLI: headless batch filtering via command-line arguments
// ============================================================================
//
// Usage examples:
//   grayconv -i photo.png                          (all six results in ./)
//   grayconv -i a.png b.jpg -o out/                (batch into out/)
//   grayconv -i photo.png -f edge-detection -f sharpen
//   grayconv -i photo.png -k "1,0,-1;2,0,-2;1,0,-1" (adds photo_custom.png)
//
// Each input is decoded to grayscale, run through the filter bank and
// written as <stem>_<slug>.png. A failing input is reported and skipped.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use log::{error, info};
use ndarray::Array2;

use crate::filters::bank::{BankConfig, FilterBank, FilterId, FilterResult};
use crate::filters::core::{convolve_with, Kernel};
use crate::filters::edge::GradientFallback;
use crate::io::{load_grayscale, named_output_path, save_grayscale, save_results};

// ============================================================================
// CLI argument definition (clap Derive)
// ============================================================================

/// grayconv headless image filter.
#[derive(Parser, Debug)]
#[command(
    name = "grayconv",
    about = "Apply box blur, Sobel edges, sharpen, high pass and low pass to grayscale images",
    long_about = "Decode each input as 8-bit grayscale, run the filter bank and write\n\
                  one PNG per result named <stem>_<filter>.png.\n\n\
                  Filters: input, box_blur, edge_detection, sharpen, high_pass, low_pass.\n\n\
                  Example:\n  \
                  grayconv -i photo.png -o out/\n  \
                  grayconv -i photo.png -f edge-detection -k \"0,0,0;0,1,0;0,0,0\""
)]
pub struct CliArgs {
    /// Input image file(s). Any format the decoder supports; color is
    /// converted to grayscale on load.
    #[arg(short, long, required = true, num_args = 1.., value_name = "FILE")]
    pub input: Vec<PathBuf>,

    /// Directory for the output PNGs. Created if missing.
    #[arg(short, long, default_value = ".", value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Only write the named result(s). Repeatable. Default: all six.
    #[arg(short, long = "filter", value_name = "NAME", value_parser = parse_filter_id)]
    pub filters: Vec<FilterId>,

    /// Extra custom kernel, rows separated by ';' and weights by ','.
    /// Written as <stem>_custom.png.
    #[arg(
        short,
        long,
        value_name = "ROWS",
        value_parser = parse_kernel,
        allow_hyphen_values = true
    )]
    pub kernel: Option<Kernel>,

    /// Run the filters one after another instead of on the thread pool.
    #[arg(long)]
    pub sequential: bool,

    /// Fail edge detection on perfectly flat images instead of writing zeros.
    #[arg(long)]
    pub strict_gradient: bool,

    /// Debug-level logging (overridden by RUST_LOG).
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliArgs {
    pub fn bank_config(&self) -> BankConfig {
        BankConfig {
            parallel: !self.sequential,
            gradient_fallback: if self.strict_gradient {
                GradientFallback::Error
            } else {
                GradientFallback::Zeros
            },
        }
    }
}

fn parse_filter_id(value: &str) -> Result<FilterId, String> {
    FilterId::from_slug(value).ok_or_else(|| {
        let known: Vec<&str> = FilterId::ALL.iter().map(|id| id.slug()).collect();
        format!("unknown filter '{}', expected one of: {}", value, known.join(", "))
    })
}

/// Parse "a,b,c;d,e,f;g,h,i" into a kernel.
pub fn parse_kernel(value: &str) -> Result<Kernel, String> {
    let rows: Vec<Vec<f64>> = value
        .split(';')
        .map(|row| {
            row.split(',')
                .map(|w| {
                    w.trim()
                        .parse::<f64>()
                        .map_err(|e| format!("bad weight '{}': {}", w.trim(), e))
                })
                .collect::<Result<Vec<f64>, String>>()
        })
        .collect::<Result<_, _>>()?;

    let height = rows.len();
    let width = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|row| row.len() != width) {
        return Err("kernel rows must all have the same number of weights".to_string());
    }

    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    let weights = Array2::from_shape_vec((height, width), flat).map_err(|e| e.to_string())?;
    Kernel::new(weights).map_err(|e| e.to_string())
}

// ============================================================================
// Public entry point
// ============================================================================

/// Set up env_logger; `RUST_LOG` wins over `--verbose`.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env = env_logger::Env::default().default_filter_or(default_level);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}

/// Process every input and return an OS exit code.
/// `0` = all files succeeded, `1` = one or more files failed.
pub fn run(args: &CliArgs) -> ExitCode {
    let bank = FilterBank::new(args.bank_config());
    let mut failures = 0usize;

    for path in &args.input {
        let start = Instant::now();
        match process_file(args, &bank, path) {
            Ok(written) => {
                for out in &written {
                    println!("{}", out.display());
                }
                info!(
                    "{}: wrote {} file(s) in {:.2?}",
                    path.display(),
                    written.len(),
                    start.elapsed()
                );
            }
            Err(err) => {
                error!("{}: {:#}", path.display(), err);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        error!("{} of {} input(s) failed", failures, args.input.len());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Filter one file and write its outputs. Returns the written paths.
pub fn process_file(
    args: &CliArgs,
    bank: &FilterBank,
    path: &Path,
) -> anyhow::Result<Vec<PathBuf>> {
    let image = load_grayscale(path)?;
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");

    let results: Vec<FilterResult> = if args.filters.is_empty() {
        bank.apply_all(image.view())?
    } else {
        args.filters
            .iter()
            .map(|&id| {
                bank.apply(id, image.view())
                    .map(|image| FilterResult { id, image })
                    .with_context(|| format!("applying {}", id))
            })
            .collect::<anyhow::Result<_>>()?
    };

    let mut written = save_results(&results, &args.output_dir, stem)?;

    if let Some(kernel) = &args.kernel {
        let custom = convolve_with(image.view(), kernel).context("applying custom kernel")?;
        let out = named_output_path(&args.output_dir, stem, "custom");
        save_grayscale(custom.view(), &out)?;
        written.push(out);
    }

    Ok(written)
}
