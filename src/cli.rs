use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "stereomap")]
#[command(about = "Method and class stereotype annotator for srcML archives", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Annotate an archive with stereotype attributes
    Annotate {
        /// srcML archive to analyse
        input: PathBuf,

        /// Where to write the annotated copy
        #[arg(short, long)]
        output: PathBuf,

        /// Replace the built-in primitive type table
        #[arg(long)]
        primitives: Option<PathBuf>,

        /// Validate labels against a taxonomy file
        #[arg(long)]
        taxonomy: Option<PathBuf>,

        /// Method-count threshold for the large-class rule
        #[arg(long)]
        methods_per_class_threshold: Option<usize>,

        /// Also emit a summary report
        #[arg(long, value_enum)]
        report: Option<ReportFormat>,

        /// Report destination (defaults to stdout)
        #[arg(long)]
        report_output: Option<PathBuf>,

        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the stereotype summary without writing an annotated copy
    Report {
        /// srcML archive to analyse
        input: PathBuf,

        /// Report format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: ReportFormat,

        /// Report destination (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Replace the built-in primitive type table
        #[arg(long)]
        primitives: Option<PathBuf>,

        /// Validate labels against a taxonomy file
        #[arg(long)]
        taxonomy: Option<PathBuf>,

        /// Method-count threshold for the large-class rule
        #[arg(long)]
        methods_per_class_threshold: Option<usize>,

        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Json,
    Terminal,
}

impl From<ReportFormat> for crate::io::OutputFormat {
    fn from(f: ReportFormat) -> Self {
        match f {
            ReportFormat::Json => crate::io::OutputFormat::Json,
            ReportFormat::Terminal => crate::io::OutputFormat::Terminal,
        }
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
