//! fbx2glb - Batch FBX to GLB conversion
//!
//! Main entry point for the command line application.
//!
//! # Overview
//!
//! This binary crate provides the CLI frontend for fbx2glb. It initializes:
//! - Configuration loading ([`ConfigManager`])
//! - Logging infrastructure (file rotation + console output on stderr)
//! - Tokio runtime (the batch runs on its blocking pool)
//! - The [`BatchOrchestrator`], which it then polls for events
//!
//! # Execution Flow
//!
//! 1. Parse arguments, load `fbx2glb Config.yaml` from the config directory
//! 2. Initialize logging → logs/fbx2glb.<date>
//! 3. Create the tokio runtime and the orchestrator
//! 4. `convert`: start the batch, drain events every `poll_interval_ms` until `Done`
//!    `check`: look for the converter on PATH and report
//! 5. Exit non-zero if any error was reported
//!
//! # Output
//!
//! Events are printed one per line on stdout; with `--json` each line is the event as a JSON
//! object (`{"kind": "progress", "index": 3}`).

use anyhow::{Context, Result, bail};
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use fbx2glb::models::ConverterSettings;
use fbx2glb::{
    APP_NAME, BatchOrchestrator, BatchStart, ConfigManager, Event, Fbx2GltfConverter, VERSION,
};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "fbx2glb", version, about = "Batch convert FBX files to GLB")]
struct Cli {
    /// Directory holding `fbx2glb Config.yaml`
    #[arg(long, global = true, default_value = "fbx2glb Data")]
    config_dir: Utf8PathBuf,

    /// Log at debug level
    #[arg(long, global = true)]
    debug: bool,

    /// Print events as JSON lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Convert every FBX file directly inside the input folder
    Convert(ConvertArgs),

    /// Check that the converter executable can be found
    Check {
        /// Converter executable (overrides the config file)
        #[arg(long)]
        converter: Option<String>,
    },
}

#[derive(Debug, Args)]
struct ConvertArgs {
    #[arg(long, short)]
    input: Utf8PathBuf,

    #[arg(long, short)]
    output: Utf8PathBuf,

    /// Remove materials and detach them from every primitive
    #[arg(long)]
    strip_materials: bool,

    /// Keep textures and images
    #[arg(long)]
    keep_textures: bool,

    /// JSON object merged into every scene's extras
    #[arg(long, conflicts_with = "metadata_file")]
    metadata: Option<String>,

    /// File holding the JSON object merged into every scene's extras
    #[arg(long)]
    metadata_file: Option<Utf8PathBuf>,

    /// Converter executable (overrides the config file)
    #[arg(long)]
    converter: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_manager = ConfigManager::new(&cli.config_dir)?;
    let mut settings = config_manager.load_settings()?;
    settings.logging.debug |= cli.debug;

    let converter_override = match &cli.command {
        Command::Convert(args) => args.converter.clone(),
        Command::Check { converter } => converter.clone(),
    };
    if let Some(converter) = converter_override {
        settings.converter.executable = converter;
    }

    let _guard = fbx2glb::logging::setup_logging(&settings.logging)?;
    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(2)
        .thread_name("fbx2glb-worker")
        .build()
        .context("Failed to create tokio runtime")?;

    let orchestrator = BatchOrchestrator::new(
        runtime.handle().clone(),
        Arc::new(Fbx2GltfConverter::new(settings.converter.executable.clone())),
        &settings,
    );
    let poll_interval = Duration::from_millis(settings.poll_interval_ms.max(1));

    let result = match cli.command {
        Command::Convert(args) => convert(&orchestrator, &settings, args, cli.json, poll_interval),
        Command::Check { .. } => check(&orchestrator, cli.json, poll_interval),
    };

    runtime.shutdown_timeout(Duration::from_secs(5));
    tracing::info!("Shutdown complete");

    result
}

fn convert(
    orchestrator: &BatchOrchestrator,
    settings: &ConverterSettings,
    args: ConvertArgs,
    json: bool,
    poll_interval: Duration,
) -> Result<()> {
    let mut options = settings.defaults.to_options();
    options.keep_materials &= !args.strip_materials;
    options.remove_textures &= !args.keep_textures;

    // Metadata always arrives as text; explicit metadata replaces the configured default
    options.custom_metadata.clear();
    let metadata_text = match (args.metadata, args.metadata_file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read metadata file: {}", path))?,
        (None, None) => settings.defaults.metadata_text(),
    };
    tracing::debug!("Custom metadata: {}", metadata_text);

    match orchestrator.start_batch(&args.input, &args.output, options, &metadata_text) {
        BatchStart::Busy => bail!("A batch is already running"),
        BatchStart::Launched { files } => tracing::info!("Converting {} files", files),
        BatchStart::Finished => {}
    }

    loop {
        while let Some(event) = orchestrator.try_next_event() {
            print_event(&event, orchestrator, json)?;
            if event.is_done() {
                let state = orchestrator.snapshot();
                if state.error_count > 0 {
                    bail!("Batch finished with {} error(s)", state.error_count);
                }
                return Ok(());
            }
        }
        std::thread::sleep(poll_interval);
    }
}

fn check(orchestrator: &BatchOrchestrator, json: bool, poll_interval: Duration) -> Result<()> {
    orchestrator.check_dependencies(std::env::var_os("PATH"));

    loop {
        while let Some(event) = orchestrator.try_next_event() {
            print_event(&event, orchestrator, json)?;
            match event {
                Event::Info { .. } => return Ok(()),
                Event::Warning { message, .. } => bail!("{}", message),
                _ => {}
            }
        }
        std::thread::sleep(poll_interval);
    }
}

fn print_event(event: &Event, orchestrator: &BatchOrchestrator, json: bool) -> Result<()> {
    if json {
        let line = serde_json::to_string(event).context("Failed to serialize event")?;
        println!("{}", line);
        return Ok(());
    }

    match event {
        Event::SetMax { total } => println!("Converting {} files", total),
        Event::Progress { index } => {
            let state = orchestrator.snapshot();
            println!(
                "[{}/{}] {:.0}%",
                index,
                state.total_files,
                state.fraction_complete() * 100.0
            );
        }
        Event::Status { message } => println!("{}", message),
        Event::Info { title, message } => println!("{}: {}", title, message),
        Event::Warning { title, message } => eprintln!("warning: {}: {}", title, message),
        Event::Error { title, message } => eprintln!("error: {}: {}", title, message),
        Event::Done => {}
    }
    Ok(())
}
