use anyhow::Result;
use clap::{CommandFactory, Parser};
use fast16::app::{load_config, run_detection, DetectionConfig};
use std::path::PathBuf;
use std::process::ExitCode;

/// Parallel FAST-16 segment-test corner detector. Paints the ring of every
/// accepted center red and writes the annotated copy as a PNG.
#[derive(Parser, Debug)]
#[command(name = "fast16")]
struct Cli {
    /// Input image [default: test3.jpg]
    #[arg(short = 'i', value_name = "IMAGE")]
    image: Option<PathBuf>,

    /// Luminosity threshold in (0, 1] [default: 0.1]
    #[arg(short = 'd', value_name = "THRESHOLD", value_parser = parse_threshold)]
    threshold: Option<f64>,

    /// Minimum arc length, 0-16; the arc must be strictly longer [default: 8]
    #[arg(short = 'n', value_name = "N", value_parser = clap::value_parser!(u8).range(0..=16))]
    min_arc: Option<u8>,

    /// Worker threads, >= 1 [default: 8]
    #[arg(short = 't', value_name = "THREADS", value_parser = clap::value_parser!(u32).range(1..))]
    threads: Option<u32>,

    /// Output PNG [default: outputimage.png]
    #[arg(short = 'o', value_name = "PNG")]
    output: Option<PathBuf>,

    /// Also write accepted centers as JSON
    #[arg(long = "json", value_name = "PATH")]
    json: Option<PathBuf>,

    /// JSON config file; command-line flags override its fields
    #[arg(long = "config", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset [default: info]
    #[arg(long = "log-level", value_name = "FILTER")]
    log_level: Option<String>,
}

impl Cli {
    fn overrides(&self) -> DetectionConfig {
        DetectionConfig {
            image: self.image.clone(),
            output_png: self.output.clone(),
            output_json: self.json.clone(),
            threshold: self.threshold,
            min_arc: self.min_arc,
            workers: self.threads.map(|t| t as usize),
            log_level: self.log_level.clone(),
        }
    }
}

fn parse_threshold(s: &str) -> Result<f64, String> {
    let t: f64 = s
        .parse()
        .map_err(|e| format!("'{s}' is not a number: {e}"))?;
    if t > 0.0 && t <= 1.0 {
        Ok(t)
    } else {
        Err(format!("{t} is outside (0, 1]"))
    }
}

fn print_usage() {
    println!("{}", Cli::command().render_long_help());
}

/// Merge the optional config file with the command-line overrides.
fn resolve_config(cli: &Cli) -> Result<DetectionConfig> {
    let file_cfg = match &cli.config {
        Some(path) => load_config(path)?,
        None => DetectionConfig::default(),
    };
    Ok(file_cfg.overridden_by(cli.overrides()))
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => {
            // --help
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            let _ = e.print();
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    let cfg = match resolve_config(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    // Config-file values bypass clap's range checks.
    if let Err(e) = cfg.params().validate() {
        eprintln!("error: {e}");
        print_usage();
        return ExitCode::FAILURE;
    }

    match run(&cfg) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cfg: &DetectionConfig) -> Result<()> {
    fast16::logger::init(cfg.log_level())?;

    let report = run_detection(cfg)?;
    println!("{report}");
    Ok(())
}
