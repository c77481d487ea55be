use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use ekg_lib::{
    config::load_config,
    detectors::peaks::{find_peaks, separation_samples},
    filters::bandpass::{bandpass, FilterSymmetry},
    io::{csv as csv_io, text as text_io},
    metrics::rate::{estimate_rate, RateEstimate},
    pipeline::{analyze, run_pipeline, PipelineConfig},
    signal::{PeakSet, TimeSeries},
    spectral::forward,
    synth::{synthesize_with_noise, GaussianNoise, NoiseProfile},
};
use log::info;
use serde::Serialize;
use std::{
    fs::File,
    io::{self, BufWriter, Read, Write},
    path::{Path, PathBuf},
};

#[derive(Parser)]
#[command(
    name = "ekg",
    version,
    about = "Synthesize, band-limit and rate-estimate periodic ECG-like signals"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where to read samples from: a newline-delimited file, a CSV column, or stdin.
#[derive(Args)]
struct InputArgs {
    #[arg(long)]
    input: Option<PathBuf>,
    /// Column to read when --input is a CSV file
    #[arg(long)]
    column: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize a noisy pulse train and print one sample per line
    Synthesize {
        #[arg(long, default_value_t = 10.0)]
        duration_s: f64,
        #[arg(long, default_value_t = 250.0)]
        fs: f64,
        #[arg(long)]
        seed: Option<u64>,
        /// Skip every noise and interference component
        #[arg(long)]
        clean: bool,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the magnitude spectrum of the input as JSON
    Spectrum {
        #[arg(long, default_value_t = 250.0)]
        fs: f64,
        #[command(flatten)]
        input: InputArgs,
    },
    /// Band-limit the input in the frequency domain
    Bandpass {
        #[arg(long, default_value_t = 250.0)]
        fs: f64,
        #[arg(long, default_value_t = 0.5)]
        lowcut_hz: f64,
        #[arg(long, default_value_t = 40.0)]
        highcut_hz: f64,
        /// Compare cutoffs against |f| instead of the signed frequency
        #[arg(long)]
        mirrored: bool,
        #[command(flatten)]
        input: InputArgs,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Detect peaks in an already filtered input and estimate the rate
    FindPeaks {
        #[arg(long, default_value_t = 250.0)]
        fs: f64,
        #[arg(long, default_value_t = 0.6)]
        min_separation_s: f64,
        #[arg(long, default_value_t = 0.5)]
        min_height: f64,
        #[command(flatten)]
        input: InputArgs,
    },
    /// Run synthesis (or read --input) → bandpass → peaks → rate
    Pipeline {
        /// TOML file with pipeline parameters
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        duration_s: Option<f64>,
        #[arg(long)]
        fs: Option<f64>,
        #[arg(long)]
        lowcut_hz: Option<f64>,
        #[arg(long)]
        highcut_hz: Option<f64>,
        #[arg(long)]
        min_separation_s: Option<f64>,
        #[arg(long)]
        min_height: Option<f64>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        mirrored: bool,
        /// Analyze this recording instead of synthesizing one
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        column: Option<String>,
        /// Export time, raw, filtered and peak columns (synthesized runs only)
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct SpectrumReport {
    fs: f64,
    bins: usize,
    points: Vec<[f64; 2]>,
}

#[derive(Serialize)]
struct PeakReport {
    fs: f64,
    peaks: PeakSet,
    peak_times_s: Vec<f64>,
    rate: RateEstimate,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Synthesize {
            duration_s,
            fs,
            seed,
            clean,
            out,
        } => cmd_synthesize(duration_s, fs, seed, clean, out.as_deref())?,
        Commands::Spectrum { fs, input } => cmd_spectrum(fs, &input)?,
        Commands::Bandpass {
            fs,
            lowcut_hz,
            highcut_hz,
            mirrored,
            input,
            out,
        } => cmd_bandpass(fs, lowcut_hz, highcut_hz, mirrored, &input, out.as_deref())?,
        Commands::FindPeaks {
            fs,
            min_separation_s,
            min_height,
            input,
        } => cmd_find_peaks(fs, min_separation_s, min_height, &input)?,
        Commands::Pipeline {
            config,
            duration_s,
            fs,
            lowcut_hz,
            highcut_hz,
            min_separation_s,
            min_height,
            seed,
            mirrored,
            input,
            column,
            csv,
        } => {
            let mut cfg = match config {
                Some(path) => load_config(&path)?,
                None => PipelineConfig::default(),
            };
            cfg.duration_s = duration_s.unwrap_or(cfg.duration_s);
            cfg.fs = fs.unwrap_or(cfg.fs);
            cfg.lowcut_hz = lowcut_hz.unwrap_or(cfg.lowcut_hz);
            cfg.highcut_hz = highcut_hz.unwrap_or(cfg.highcut_hz);
            cfg.min_peak_separation_s = min_separation_s.unwrap_or(cfg.min_peak_separation_s);
            cfg.min_peak_height = min_height.unwrap_or(cfg.min_peak_height);
            cfg.seed = seed.or(cfg.seed);
            if mirrored {
                cfg.symmetry = FilterSymmetry::Mirrored;
            }
            let input = InputArgs { input, column };
            cmd_pipeline(&cfg, &input, csv.as_deref())?
        }
    }
    Ok(())
}

fn read_samples(input: &InputArgs) -> Result<Vec<f64>> {
    match (&input.input, &input.column) {
        (Some(path), Some(column)) => csv_io::read_column(path, column),
        (Some(path), None) => text_io::read_samples(path),
        (None, _) => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            text_io::parse_samples(&buf)
        }
    }
}

fn write_output(out: Option<&Path>, samples: &[f64]) -> Result<()> {
    match out {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("creating {}", path.display()))?;
            text_io::write_samples(BufWriter::new(file), samples)
        }
        None => text_io::write_samples(io::stdout().lock(), samples),
    }
}

fn symmetry(mirrored: bool) -> FilterSymmetry {
    if mirrored {
        FilterSymmetry::Mirrored
    } else {
        FilterSymmetry::Signed
    }
}

fn cmd_synthesize(
    duration_s: f64,
    fs: f64,
    seed: Option<u64>,
    clean: bool,
    out: Option<&Path>,
) -> Result<()> {
    let profile = if clean {
        NoiseProfile::clean()
    } else {
        NoiseProfile::default()
    };
    let mut noise = GaussianNoise::new(seed);
    let ts = synthesize_with_noise(duration_s, fs, &profile, &mut noise)?;
    info!("synthesized {} samples", ts.len());
    write_output(out, &ts.data)
}

fn cmd_spectrum(fs: f64, input: &InputArgs) -> Result<()> {
    let ts = TimeSeries::new(fs, read_samples(input)?);
    let spectrum = forward(&ts)?;
    let report = SpectrumReport {
        fs,
        bins: spectrum.len(),
        points: spectrum.magnitude_points(),
    };
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}

fn cmd_bandpass(
    fs: f64,
    lowcut_hz: f64,
    highcut_hz: f64,
    mirrored: bool,
    input: &InputArgs,
    out: Option<&Path>,
) -> Result<()> {
    let ts = TimeSeries::new(fs, read_samples(input)?);
    let filtered = bandpass(&ts, lowcut_hz, highcut_hz, symmetry(mirrored))?;
    write_output(out, &filtered.data)
}

fn cmd_find_peaks(
    fs: f64,
    min_separation_s: f64,
    min_height: f64,
    input: &InputArgs,
) -> Result<()> {
    let separation = separation_samples(min_separation_s, fs)?;
    let data = read_samples(input)?;
    let peaks = find_peaks(&data, separation, min_height);
    let rate = estimate_rate(&peaks, fs)?;
    let report = PeakReport {
        fs,
        peak_times_s: peaks.times(fs),
        peaks,
        rate,
    };
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}

fn cmd_pipeline(cfg: &PipelineConfig, input: &InputArgs, csv: Option<&Path>) -> Result<()> {
    let summary = if input.input.is_some() {
        if csv.is_some() {
            anyhow::bail!("--csv export needs a synthesized run, drop --input");
        }
        let ts = TimeSeries::new(cfg.fs, read_samples(input)?);
        analyze(&ts, cfg)?.summary()
    } else {
        let output = run_pipeline(cfg)?;
        if let Some(path) = csv {
            csv_io::write_run(path, &output)?;
        }
        output.summary()
    };
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", serde_json::to_string(&summary)?)?;
    Ok(())
}
