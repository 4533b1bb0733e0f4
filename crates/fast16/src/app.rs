//! Shared application-level helpers for the CLI.
//!
//! These functions wire up I/O (load image, optional JSON config, PNG and
//! JSON output) around the `fast16` detection APIs.

use crate::image::annotate_image;
use anyhow::{Context, Result};
use fast16_core::FastParams;
use image::{ImageFormat, ImageReader, RgbaImage};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use std::{fs::File, io::Write, path::Path, path::PathBuf};

pub const DEFAULT_IMAGE: &str = "test3.jpg";
pub const DEFAULT_OUTPUT_PNG: &str = "outputimage.png";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Run configuration. Every field is optional so a JSON file and the command
/// line can each supply a subset; missing fields fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetectionConfig {
    pub image: Option<PathBuf>,
    pub output_png: Option<PathBuf>,
    pub output_json: Option<PathBuf>,
    pub threshold: Option<f64>,
    pub min_arc: Option<u8>,
    pub workers: Option<usize>,
    pub log_level: Option<String>,
}

impl DetectionConfig {
    /// Fields set in `other` win over fields set in `self`.
    pub fn overridden_by(self, other: DetectionConfig) -> Self {
        Self {
            image: other.image.or(self.image),
            output_png: other.output_png.or(self.output_png),
            output_json: other.output_json.or(self.output_json),
            threshold: other.threshold.or(self.threshold),
            min_arc: other.min_arc.or(self.min_arc),
            workers: other.workers.or(self.workers),
            log_level: other.log_level.or(self.log_level),
        }
    }

    pub fn params(&self) -> FastParams {
        let mut params = FastParams::default();
        if let Some(t) = self.threshold {
            params.threshold = t;
        }
        if let Some(n) = self.min_arc {
            params.min_arc = n;
        }
        if let Some(k) = self.workers {
            params.workers = k;
        }
        params
    }

    pub fn image_path(&self) -> PathBuf {
        self.image
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_IMAGE))
    }

    pub fn output_png_path(&self) -> PathBuf {
        self.output_png
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PNG))
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

#[derive(Serialize)]
pub struct CenterOut {
    pub x: u32,
    pub y: u32,
}

#[derive(Serialize)]
pub struct DetectionDump {
    pub image: String,
    pub width: u32,
    pub height: u32,
    pub threshold: f64,
    pub min_arc: u8,
    pub workers: usize,
    pub corners: usize,
    pub centers: Vec<CenterOut>,
}

/// Timing and count summary of one run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub corners: usize,
    pub width: u32,
    pub height: u32,
    pub output_png: PathBuf,
    pub total_ms: f64,
    pub scan_ms: f64,
    pub paint_ms: f64,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total time: {:.2} ms", self.total_ms)?;
        writeln!(f, "Total corners: {}", self.corners)?;
        writeln!(f, "Time for corner detection: {:.2} ms", self.scan_ms)?;
        write!(f, "Time for draw: {:.2} ms", self.paint_ms)
    }
}

/// Load, detect, paint and write the annotated PNG (plus the optional JSON dump).
///
/// Nothing is written unless both detection phases complete.
pub fn run_detection(cfg: &DetectionConfig) -> Result<RunReport> {
    let params = cfg.params();
    params.validate()?;

    let input = cfg.image_path();
    let img = load_image(&input)?;
    tracing::info!(
        image = %input.display(),
        width = img.width(),
        height = img.height(),
        "loaded image"
    );

    let started = Instant::now();
    let (annotated, trace) = annotate_image(&img, &params)?;
    let total_ms = started.elapsed().as_secs_f64() * 1000.0;

    let png_out = cfg.output_png_path();
    annotated
        .save_with_format(&png_out, ImageFormat::Png)
        .with_context(|| format!("writing {}", png_out.display()))?;
    tracing::info!(path = %png_out.display(), "saved annotated image");

    if let Some(json_out) = &cfg.output_json {
        let dump = DetectionDump {
            image: input.to_string_lossy().into_owned(),
            width: img.width(),
            height: img.height(),
            threshold: params.threshold,
            min_arc: params.min_arc,
            workers: params.workers,
            corners: trace.corners,
            centers: trace
                .centers
                .iter()
                .map(|&(x, y)| CenterOut { x, y })
                .collect(),
        };
        write_json(json_out, &dump)?;
        tracing::info!(path = %json_out.display(), "saved JSON dump");
    }

    Ok(RunReport {
        corners: trace.corners,
        width: img.width(),
        height: img.height(),
        output_png: png_out,
        total_ms,
        scan_ms: trace.scan_ms,
        paint_ms: trace.paint_ms,
    })
}

fn load_image(path: &Path) -> Result<RgbaImage> {
    let img = ImageReader::open(path)
        .with_context(|| format!("opening image {}", path.display()))?
        .with_guessed_format()
        .with_context(|| format!("reading image {}", path.display()))?
        .decode()
        .with_context(|| format!("decoding image {}", path.display()))?;
    Ok(img.to_rgba8())
}

fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let mut json_file =
        File::create(path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(&mut json_file, value)?;
    json_file.write_all(b"\n")?;
    Ok(())
}

pub fn load_config(path: &Path) -> Result<DetectionConfig> {
    let file = File::open(path).with_context(|| format!("opening config {}", path.display()))?;
    let cfg: DetectionConfig = serde_json::from_reader(file)
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let cfg = DetectionConfig::default();
        assert_eq!(cfg.params(), FastParams::default());
        assert_eq!(cfg.image_path(), PathBuf::from(DEFAULT_IMAGE));
        assert_eq!(cfg.output_png_path(), PathBuf::from(DEFAULT_OUTPUT_PNG));
        assert_eq!(cfg.log_level(), "info");
    }

    #[test]
    fn command_line_fields_override_file_fields() {
        let file = DetectionConfig {
            image: Some("from_file.png".into()),
            threshold: Some(0.3),
            min_arc: Some(12),
            workers: Some(2),
            ..Default::default()
        };
        let cli = DetectionConfig {
            threshold: Some(0.05),
            workers: Some(4),
            ..Default::default()
        };
        let merged = file.overridden_by(cli);
        assert_eq!(merged.image_path(), PathBuf::from("from_file.png"));
        assert_eq!(
            merged.params(),
            FastParams {
                threshold: 0.05,
                min_arc: 12,
                workers: 4,
            }
        );
    }

    #[test]
    fn config_json_accepts_partial_documents() {
        let cfg: DetectionConfig =
            serde_json::from_str(r#"{ "threshold": 0.2, "output_png": "out.png" }"#).unwrap();
        assert_eq!(cfg.threshold, Some(0.2));
        assert_eq!(cfg.output_png_path(), PathBuf::from("out.png"));
        assert_eq!(cfg.min_arc, None);

        let unknown = serde_json::from_str::<DetectionConfig>(r#"{ "radius": 5 }"#);
        assert!(unknown.is_err());
    }

    #[test]
    fn report_lists_all_timings() {
        let report = RunReport {
            corners: 7,
            width: 10,
            height: 10,
            output_png: "x.png".into(),
            total_ms: 1.5,
            scan_ms: 1.0,
            paint_ms: 0.25,
        };
        let text = report.to_string();
        assert!(text.contains("Total time: 1.50 ms"));
        assert!(text.contains("Total corners: 7"));
        assert!(text.contains("Time for corner detection: 1.00 ms"));
        assert!(text.contains("Time for draw: 0.25 ms"));
    }
}
