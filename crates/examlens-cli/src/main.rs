//! examlens CLI — explore exam performance insights from the command line.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "examlens", version, about = "Exam performance insight explorer")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the insight record files (overrides config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List students with their exam attempt counts
    Students {
        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// List exams found in the test insight records
    Exams {
        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// List batches found in the batch insight records
    Batches {
        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Show stage and zone insight for one student on one exam
    Student {
        /// Student key (name)
        #[arg(long)]
        name: String,

        /// Exam key
        #[arg(long)]
        exam: String,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,

        /// Also save the report as JSON to this path
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Show cohort stats, stage and zone insight for one batch on one exam
    Batch {
        /// Batch key
        #[arg(long)]
        batch: String,

        /// Exam key
        #[arg(long)]
        exam: String,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,

        /// Also save the report as JSON to this path
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Create a starter examlens.toml
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("examlens=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let source = commands::DataSource {
        config: cli.config,
        data_dir: cli.data_dir,
    };

    let result = match cli.command {
        Commands::Students { format } => commands::students::execute(&source, &format),
        Commands::Exams { format } => commands::list::exams(&source, &format),
        Commands::Batches { format } => commands::list::batches(&source, &format),
        Commands::Student {
            name,
            exam,
            format,
            output,
        } => commands::insight::student(&source, &name, &exam, &format, output),
        Commands::Batch {
            batch,
            exam,
            format,
            output,
        } => commands::insight::batch(&source, &batch, &exam, &format, output),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
