//! AutoFix CLI
//!
//! Usage:
//!   autofix value <request.yaml|request.json> [--uploads-dir <dir>]
//!   autofix extract [file]
//!   autofix interior --text <file> --base-price <price>
//!   autofix tables
//!
//! Results are printed to stdout as pretty JSON. Logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use autofix_core::mapping::{CONDITION_TABLE, MILEAGE_BRACKETS, NO_PENALTY_MAX_KM};
use autofix_core::{
    assess_interior_or_fallback, parse_json_object, parse_price_or_default, ClassifierOutput,
    VALUE_RANGE_HALF_WIDTH,
};
use autofix_runtime::{RuntimeConfig, ValuationPipeline, ValuationRequest};

#[derive(Parser, Debug)]
#[command(name = "autofix")]
#[command(version)]
#[command(about = "Explainable used-car valuation from photos and repair estimates")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a full valuation for a request file
    Value {
        /// Request file (.yaml, .yml or .json)
        request: PathBuf,

        /// Directory holding the uploaded photos (overrides AUTOFIX_UPLOADS_DIR)
        #[arg(long)]
        uploads_dir: Option<PathBuf>,
    },

    /// Extract the JSON object from classifier text (stdin when no file)
    Extract {
        file: Option<PathBuf>,
    },

    /// Assess interior wear from saved classifier text
    Interior {
        /// File containing the raw classifier reply
        #[arg(long)]
        text: PathBuf,

        /// Base price; unusable values fall back to the default
        #[arg(long, default_value = "")]
        base_price: String,
    },

    /// Print the adjustment tables
    Tables,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = RuntimeConfig::from_env().context("Failed to load configuration")?;
    init_tracing(&config.log_level)?;

    let output = match cli.command {
        Command::Value {
            request,
            uploads_dir,
        } => run_value(&request, uploads_dir, config).await?,
        Command::Extract { file } => run_extract(file.as_deref())?,
        Command::Interior { text, base_price } => run_interior(&text, &base_price)?,
        Command::Tables => tables(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn init_tracing(fallback_level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(fallback_level)
            .with_context(|| format!("Invalid log level/filter '{}'", fallback_level))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))
}

async fn run_value(
    path: &Path,
    uploads_dir: Option<PathBuf>,
    mut config: RuntimeConfig,
) -> Result<serde_json::Value> {
    let request = load_request(path)?;
    tracing::debug!(
        path = %path.display(),
        captures = request.captures.len(),
        repairs = request.repairs.len(),
        "Loaded valuation request"
    );

    if let Some(dir) = uploads_dir {
        config.uploads_dir = dir;
    }

    let pipeline = ValuationPipeline::builder()
        .provider(config.vision_provider())
        .config(config)
        .build()?;

    let report = pipeline.run(&request).await;
    Ok(serde_json::to_value(report)?)
}

fn load_request(path: &Path) -> Result<ValuationRequest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read request file: {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON request: {}", path.display()))
    } else {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid YAML request: {}", path.display()))
    }
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read: {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn run_extract(file: Option<&Path>) -> Result<serde_json::Value> {
    let raw = read_input(file)?;
    let object = parse_json_object(&raw).context("No usable JSON object in input")?;
    let output = ClassifierOutput::from_object(&object);

    Ok(json!({
        "object": object,
        "condition": output.condition,
        "reasons": output.reasons,
    }))
}

fn run_interior(text: &Path, base_price: &str) -> Result<serde_json::Value> {
    let raw = read_input(Some(text))?;
    let assessment = assess_interior_or_fallback(&raw, parse_price_or_default(base_price));
    Ok(json!({
        "assessment": assessment,
        "adjustment": assessment.to_adjustment(),
    }))
}

fn tables() -> serde_json::Value {
    let conditions: Vec<_> = CONDITION_TABLE
        .iter()
        .map(|(label, row)| json!({ "condition": label, "adjustment": row }))
        .collect();

    json!({
        "condition": conditions,
        "mileage": {
            "noPenaltyMaxKm": NO_PENALTY_MAX_KM,
            "brackets": MILEAGE_BRACKETS,
        },
        "valueRangeHalfWidth": VALUE_RANGE_HALF_WIDTH,
    })
}
