use clap::Parser;
use detgrid::{
    Affine2, CoordinateMapper, CycleStats, Detection, Detector, DetectorConfig, LabelSet,
    OverflowPolicy,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "detgrid CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Override the tensor path from the config.
    #[arg(short, long, value_name = "FILE")]
    tensor: Option<PathBuf>,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum OverflowConfig {
    DropLowest,
    Error,
}

impl From<OverflowConfig> for OverflowPolicy {
    fn from(value: OverflowConfig) -> Self {
        match value {
            OverflowConfig::DropLowest => OverflowPolicy::DropLowest,
            OverflowConfig::Error => OverflowPolicy::Error,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DetectorConfigJson {
    input_width: usize,
    input_height: usize,
    num_classes: usize,
    prob_threshold: f32,
    nms_threshold: f32,
    candidate_capacity: usize,
    max_detections: usize,
    parallel: bool,
    decode_chunk_size: usize,
    overflow: OverflowConfig,
}

impl Default for DetectorConfigJson {
    fn default() -> Self {
        let cfg = DetectorConfig::default();
        Self {
            input_width: cfg.input_width,
            input_height: cfg.input_height,
            num_classes: cfg.num_classes,
            prob_threshold: cfg.prob_threshold,
            nms_threshold: cfg.nms_threshold,
            candidate_capacity: cfg.candidate_capacity,
            max_detections: cfg.max_detections,
            parallel: cfg.parallel,
            decode_chunk_size: cfg.decode_chunk_size,
            overflow: OverflowConfig::DropLowest,
        }
    }
}

impl From<DetectorConfigJson> for DetectorConfig {
    fn from(value: DetectorConfigJson) -> Self {
        Self {
            input_width: value.input_width,
            input_height: value.input_height,
            num_classes: value.num_classes,
            prob_threshold: value.prob_threshold,
            nms_threshold: value.nms_threshold,
            candidate_capacity: value.candidate_capacity,
            max_detections: value.max_detections,
            parallel: value.parallel,
            decode_chunk_size: value.decode_chunk_size,
            overflow: value.overflow.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SourceSize {
    width: f32,
    height: f32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    tensor_path: String,
    output_path: Option<String>,
    labels: Option<Vec<String>>,
    /// Size of the image that was letterboxed into the model input.
    source_size: Option<SourceSize>,
    detector: DetectorConfigJson,
}

#[derive(Debug, Serialize)]
struct DetectionRecord {
    label: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    probability: f32,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl DetectionRecord {
    fn new(det: &Detection, name: Option<&str>) -> Self {
        Self {
            label: det.label,
            name: name.map(str::to_owned),
            probability: det.probability,
            x: det.rect.x,
            y: det.rect.y,
            width: det.rect.width,
            height: det.rect.height,
        }
    }
}

#[derive(Debug, Serialize)]
struct StatsRecord {
    decoded: usize,
    dropped: usize,
    candidates: usize,
    kept: usize,
}

impl From<CycleStats> for StatsRecord {
    fn from(value: CycleStats) -> Self {
        Self {
            decoded: value.decoded,
            dropped: value.dropped,
            candidates: value.candidates,
            kept: value.kept,
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    stats: StatsRecord,
    detections: Vec<DetectionRecord>,
}

/// Reads a raw little-endian `f32` tensor dump.
fn load_tensor(path: &Path) -> Result<Vec<f32>, Box<dyn std::error::Error>> {
    let bytes = fs::read(path)?;
    if bytes.len() % 4 != 0 {
        return Err(format!(
            "{}: length {} is not a multiple of 4 bytes",
            path.display(),
            bytes.len()
        )
        .into());
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("detgrid=info".parse()?))
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
    let tensor_path = match cli.tensor {
        Some(path) => path,
        None if !config.tensor_path.is_empty() => PathBuf::from(&config.tensor_path),
        None => return Err("tensor_path must be set in the config or via --tensor".into()),
    };

    let det_cfg = DetectorConfig::from(config.detector);
    let mapper = match &config.source_size {
        Some(src) => Some(CoordinateMapper::new(
            det_cfg.input_width,
            det_cfg.input_height,
            Affine2::letterbox(
                src.width,
                src.height,
                det_cfg.input_width as f32,
                det_cfg.input_height as f32,
            )?,
        )),
        None => None,
    };
    let mut detector = match config.labels {
        Some(labels) => Detector::with_labels(det_cfg, LabelSet::new(labels)?)?,
        None => Detector::new(det_cfg)?,
    };
    tracing::info!(
        anchors = detector.anchor_grid().len(),
        expected_len = detector.expected_tensor_len(),
        "detector ready"
    );

    let tensor = load_tensor(&tensor_path)?;
    let detections = detector.detect(&tensor)?.to_vec();

    let records = detections
        .iter()
        .map(|det| {
            let mapped = mapper.map_or(*det, |m| m.map_detection(det));
            DetectionRecord::new(&mapped, detector.label_name(det))
        })
        .collect();
    let output = Output {
        stats: detector.last_stats().into(),
        detections: records,
    };
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
