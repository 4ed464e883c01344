//! OncoData CLI
//!
//! Entry point for classifying medical images from the command line and
//! for running the upload server.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use oncodata::backend::backend_name;
use oncodata::labels::LabelRegistry;
use oncodata::utils::init_logging;
use oncodata::{is_supported_image, AppConfig, Resources, SUPPORTED_EXTENSIONS};

/// OncoData - AI-powered cancer image classification
#[derive(Parser, Debug)]
#[command(name = "oncodata")]
#[command(version)]
#[command(about = "Classify medical images into cancer types with Burn", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, default_value = "false")]
    verbose: bool,

    /// JSON configuration file
    #[arg(short, long, env = "ONCODATA_CONFIG")]
    config: Option<PathBuf>,

    /// Model artifact directory (config.json + model.mpk)
    #[arg(long, env = "ONCODATA_MODEL_DIR")]
    model_dir: Option<PathBuf>,

    /// Class index JSON ({"class_key": index, ...})
    #[arg(long, env = "ONCODATA_CLASS_INDEX")]
    class_index: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify a single image or every supported image in a directory
    Classify {
        /// Path to input image or directory
        #[arg(short, long)]
        input: PathBuf,

        /// Print results as JSON instead of text cards
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// List known classes with display names and descriptions
    Labels,

    /// Run the HTTP upload server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;

    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(model_dir) = cli.model_dir {
        config.model_dir = model_dir;
    }
    if let Some(class_index) = cli.class_index {
        config.class_index_path = class_index;
    }

    if let Commands::Serve { host, port } = &cli.command {
        if let Some(host) = host {
            config.host = host.clone();
        }
        if let Some(port) = port {
            config.port = *port;
        }
    }
    config.validate()?;

    match cli.command {
        Commands::Classify { input, json } => cmd_classify(config, &input, json),
        Commands::Labels => cmd_labels(config),
        Commands::Serve { .. } => cmd_serve(config),
    }
}

fn print_banner() {
    println!("{}", "OncoData".green().bold());
    println!("{}", "AI-Powered Cancer Image Classification".green());
    println!();
}

/// Collect the images to classify from a file or directory path
fn collect_inputs(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_dir() {
        let mut files: Vec<PathBuf> = std::fs::read_dir(input)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && is_supported_image(p))
            .collect();
        files.sort();
        Ok(files)
    } else {
        Ok(vec![input.to_path_buf()])
    }
}

fn cmd_classify(config: AppConfig, input: &Path, json: bool) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input path not found: {}", input.display());
    }

    let files = collect_inputs(input)?;
    if files.is_empty() {
        anyhow::bail!(
            "No images found in {} (supported: {})",
            input.display(),
            SUPPORTED_EXTENSIONS.join(", ")
        );
    }

    if !json {
        print_banner();
        println!("{}", "Inference Configuration:".cyan().bold());
        println!("  Input:       {}", input.display());
        println!("  Model:       {}", config.model_dir.display());
        println!("  Class index: {}", config.class_index_path.display());
        println!("  Backend:     {}", backend_name());
        println!();
    }

    let resources = Resources::new(config);
    let predictor = resources.predictor()?;

    let mut results = Vec::with_capacity(files.len());
    let mut failures = 0usize;

    for path in &files {
        match predictor.classify_file(path) {
            Ok(result) => {
                if !json {
                    println!("{}", path.display().to_string().bold());
                    println!("{}", result.display());
                }
                results.push(serde_json::json!({
                    "path": path,
                    "prediction": result,
                }));
            }
            Err(e) => {
                failures += 1;
                if json {
                    results.push(serde_json::json!({
                        "path": path,
                        "error": e.to_string(),
                    }));
                } else {
                    println!("{} {}: {}", "Error:".red(), path.display(), e);
                    println!();
                }
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        info!(
            "Classified {} image(s), {} failed",
            files.len() - failures,
            failures
        );
    }

    if failures == files.len() {
        anyhow::bail!("No image could be classified");
    }

    Ok(())
}

fn cmd_labels(config: AppConfig) -> Result<()> {
    let registry = LabelRegistry::reference();

    // Show model output order when a class index is available
    let keys: Vec<String> = match oncodata::ClassIndex::load(&config.class_index_path) {
        Ok(index) => index.classes().to_vec(),
        Err(e) => {
            info!("{}; listing registry order", e);
            registry.entries().map(|e| e.key.to_string()).collect()
        }
    };

    println!("{}", "Known classes:".cyan().bold());
    for (i, key) in keys.iter().enumerate() {
        println!(
            "  {:>2}. {:<18} {:<30} {}",
            i,
            key,
            registry.display_name(key),
            registry.description(key).dimmed()
        );
    }

    Ok(())
}

fn cmd_serve(config: AppConfig) -> Result<()> {
    print_banner();
    info!("OncoData server v{}", oncodata::VERSION);
    info!("  Model dir:   {}", config.model_dir.display());
    info!("  Class index: {}", config.class_index_path.display());
    info!("  Backend:     {}", backend_name());

    // Startup errors stop here, before the listener binds
    let resources = Resources::new(config.clone());
    let predictor = resources.predictor()?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(oncodata::server::serve(&config, predictor))
}
