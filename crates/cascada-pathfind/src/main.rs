//! CLI entry point for the cascada attack path analyzer.
//!
//! Reads a JSON system description, writes scored attack paths to stdout
//! (and optionally to a report file). Logs go to stderr.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use cascada_core::config::load_profile;
use cascada_core::{PathMode, SystemModel};
use cascada_pathfind::config::AnalysisConfig;
use cascada_pathfind::graph::AttackGraph;
use cascada_pathfind::report::{self, OutputFormat};
use cascada_pathfind::AnalysisEngine;

#[derive(Parser)]
#[command(name = "cascada")]
#[command(about = "Design-time attack path discovery and risk scoring")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file prefix (default: cascada).
    #[arg(short, long, default_value = "cascada", global = true)]
    config: String,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Discover and score attack paths in a system description.
    Analyze {
        /// System description (JSON).
        #[arg(short, long)]
        input: PathBuf,

        /// Output format: json, text.
        #[arg(short, long)]
        format: Option<String>,

        /// Maximum nodes per path.
        #[arg(long)]
        max_depth: Option<usize>,

        /// Maximum number of paths across all entry points.
        #[arg(long)]
        max_paths: Option<usize>,

        /// Path mode: first_impact, full.
        #[arg(short, long)]
        mode: Option<String>,

        /// Rule set profile name.
        #[arg(short, long)]
        profile: Option<String>,

        /// Directory holding profile files.
        #[arg(long)]
        profiles_dir: Option<String>,

        /// Also write the JSON report to this file.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a system description and print graph statistics.
    Validate {
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Render a previously written report as text.
    Show {
        /// Report file written by `analyze --output`.
        report: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if cli.log_json {
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
    }

    match cli.command {
        Command::Analyze {
            input,
            format,
            max_depth,
            max_paths,
            mode,
            profile,
            profiles_dir,
            output,
        } => {
            let mut settings = AnalysisConfig::load(&cli.config)?;
            if let Some(v) = max_depth {
                settings.max_depth = v;
            }
            if let Some(v) = max_paths {
                settings.max_paths = v;
            }
            if let Some(v) = mode {
                settings.path_mode = v.parse::<PathMode>()?;
            }
            if let Some(v) = format {
                settings.format = v.parse::<OutputFormat>()?;
            }
            if let Some(v) = profile {
                settings.profile = v;
            }
            if let Some(v) = profiles_dir {
                settings.profiles_dir = v;
            }
            settings.validate()?;

            let rules = load_profile(&settings.profiles_dir, &settings.profile)?;
            let system = SystemModel::load(&input)?;

            let engine = AnalysisEngine::new(rules);
            let result = engine.analyze(&system, &settings.to_request())?;

            if let Some(path) = &output {
                report::write_report(path, &result)?;
            }
            println!("{}", report::render(&result, settings.format)?);
        }
        Command::Validate { input } => {
            let system = SystemModel::load(&input)?;
            let graph = AttackGraph::build(&system)?;
            println!(
                "{}: {} entities, {} relationships, {} entry points, {} targets",
                input.display(),
                graph.node_count(),
                graph.edge_count(),
                system.entry_points.len(),
                system.targets.len()
            );
        }
        Command::Show { report: path } => {
            let result = report::read_report(&path)?;
            println!("{}", report::render_text(&result));
        }
    }

    Ok(())
}
