use clap::Parser;
use detnms::{
    nms_with, oks_nms_with, soft_nms_with, BoxConvention, DecayMethod, Detections, Element,
    KeypointSigmas, NmsConfig, NmsResult, OksNmsConfig, SoftNmsConfig, Suppressed,
    VisibilityPolicy, COCO_SIGMAS_TENTHS,
};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "detnms CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ModeConfig {
    #[default]
    Hard,
    Soft,
    Oks,
    OksVis,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum PrecisionConfig {
    #[default]
    F32,
    F64,
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ConventionConfig {
    Continuous,
    #[default]
    Pixel,
}

impl From<ConventionConfig> for BoxConvention {
    fn from(value: ConventionConfig) -> Self {
        match value {
            ConventionConfig::Continuous => BoxConvention::Continuous,
            ConventionConfig::Pixel => BoxConvention::Pixel,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    input_path: String,
    output_path: Option<String>,
    mode: ModeConfig,
    precision: PrecisionConfig,
    convention: ConventionConfig,
    iou_thr: f64,
    method: String,
    sigma: f64,
    min_score: f64,
    /// Per-keypoint sigmas in the published x10 form; COCO when absent.
    sigmas: Option<Vec<f64>>,
    vis_thr: f64,
    device_id: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        let soft = SoftNmsConfig::default();
        Self {
            input_path: String::new(),
            output_path: None,
            mode: ModeConfig::Hard,
            precision: PrecisionConfig::F32,
            convention: ConventionConfig::Pixel,
            iou_thr: NmsConfig::default().iou_thr,
            method: soft.method.as_str().to_owned(),
            sigma: soft.sigma,
            min_score: soft.min_score,
            sigmas: None,
            vis_thr: 0.1,
            device_id: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct Output<T> {
    indices: Vec<usize>,
    kept: Vec<Vec<T>>,
}

fn load_rows<T>(path: &str) -> Result<Detections<T>, Box<dyn std::error::Error>>
where
    T: Element + for<'de> Deserialize<'de>,
{
    let text = fs::read_to_string(path)?;
    let rows: Vec<Vec<T>> = serde_json::from_str(&text)?;
    let cols = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|row| row.len() != cols) {
        return Err("input rows must all have the same length".into());
    }
    let nrows = rows.len();
    let flat: Vec<T> = rows.into_iter().flatten().collect();
    Ok(Array2::from_shape_vec((nrows, cols), flat)?.into())
}

fn run<T>(config: &Config) -> Result<String, Box<dyn std::error::Error>>
where
    T: Element + Serialize + for<'de> Deserialize<'de>,
{
    let dets = load_rows::<T>(&config.input_path)?;
    let result: NmsResult<Suppressed<T>> = match config.mode {
        ModeConfig::Hard => {
            let cfg = NmsConfig {
                iou_thr: config.iou_thr,
                convention: config.convention.into(),
            };
            nms_with(&dets, &cfg, config.device_id)
        }
        ModeConfig::Soft => {
            let cfg = SoftNmsConfig {
                iou_thr: config.iou_thr,
                method: config.method.parse::<DecayMethod>()?,
                sigma: config.sigma,
                min_score: config.min_score,
                convention: config.convention.into(),
            };
            soft_nms_with(&dets, &cfg)
        }
        ModeConfig::Oks | ModeConfig::OksVis => {
            let tenths = config.sigmas.as_deref().unwrap_or(&COCO_SIGMAS_TENTHS);
            let visibility = match config.mode {
                ModeConfig::OksVis => VisibilityPolicy::KeptAtLeast(config.vis_thr),
                _ => VisibilityPolicy::Both,
            };
            let cfg = OksNmsConfig {
                iou_thr: config.iou_thr,
                sigmas: KeypointSigmas::from_tenths(tenths)?,
                visibility,
            };
            oks_nms_with(&dets, &cfg, config.device_id)
        }
    };
    let (kept, indices) = result?;
    let kept = kept
        .into_array()
        .rows()
        .into_iter()
        .map(|row| row.to_vec())
        .collect();
    Ok(serde_json::to_string_pretty(&Output { indices, kept })?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("detnms=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.input_path.is_empty() {
        return Err("input_path must be set in the config".into());
    }

    let json = match config.precision {
        PrecisionConfig::F32 => run::<f32>(&config)?,
        PrecisionConfig::F64 => run::<f64>(&config)?,
    };
    tracing::info!(path = %config.input_path, "suppression finished");

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
