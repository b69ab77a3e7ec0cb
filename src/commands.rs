//! Command handlers behind the CLI surface.

use crate::archive::{run_engine, AnalysisContext, EngineRun};
use crate::cli::{Cli, Commands, ReportFormat};
use crate::config::StereomapConfig;
use crate::io::{create_writer, StereotypeReport};
use crate::primitives::PrimitiveTypes;
use crate::taxonomy::Taxonomy;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Annotate {
            input,
            output,
            primitives,
            taxonomy,
            methods_per_class_threshold,
            report,
            report_output,
            config,
        } => {
            let ctx = build_context(config, primitives, taxonomy, methods_per_class_threshold)?;
            let run = analyse(&input, &ctx, true)?;
            let annotated = run
                .annotated_xml
                .as_deref()
                .context("engine did not produce an annotated archive")?;
            fs::write(&output, annotated)
                .with_context(|| format!("writing {}", output.display()))?;
            if let Some(format) = report {
                write_report(&input, &run, format, report_output)?;
            }
            Ok(())
        }
        Commands::Report {
            input,
            format,
            output,
            primitives,
            taxonomy,
            methods_per_class_threshold,
            config,
        } => {
            let ctx = build_context(config, primitives, taxonomy, methods_per_class_threshold)?;
            let run = analyse(&input, &ctx, false)?;
            write_report(&input, &run, format, output)
        }
    }
}

/// Resolves configuration in precedence order: defaults, config file,
/// command-line flags.
fn build_context(
    config: Option<PathBuf>,
    primitives: Option<PathBuf>,
    taxonomy: Option<PathBuf>,
    methods_per_class_threshold: Option<usize>,
) -> Result<AnalysisContext> {
    let mut resolved = match config {
        Some(path) => StereomapConfig::load(&path)?,
        None => StereomapConfig::default(),
    };
    if primitives.is_some() {
        resolved.primitives = primitives;
    }
    if taxonomy.is_some() {
        resolved.taxonomy = taxonomy;
    }
    if let Some(threshold) = methods_per_class_threshold {
        resolved.methods_per_class_threshold = threshold;
    }
    resolved.validate()?;

    let primitives = match &resolved.primitives {
        Some(path) => PrimitiveTypes::from_file(path)?,
        None => PrimitiveTypes::default(),
    };
    let taxonomy = match &resolved.taxonomy {
        Some(path) => Taxonomy::from_file(path)?,
        None => Taxonomy::default(),
    };

    Ok(AnalysisContext {
        primitives,
        taxonomy,
        methods_per_class_threshold: resolved.methods_per_class_threshold,
    })
}

fn analyse(input: &Path, ctx: &AnalysisContext, annotate: bool) -> Result<EngineRun> {
    let xml = fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;
    let run = run_engine(&xml, ctx, annotate)
        .with_context(|| format!("analysing {}", input.display()))?;
    Ok(run)
}

fn write_report(
    input: &Path,
    run: &EngineRun,
    format: ReportFormat,
    destination: Option<PathBuf>,
) -> Result<()> {
    let report = StereotypeReport::from_run(input.to_path_buf(), run);
    let sink: Box<dyn Write> = match destination {
        Some(path) => Box::new(
            fs::File::create(&path).with_context(|| format!("creating {}", path.display()))?,
        ),
        None => Box::new(std::io::stdout()),
    };
    let mut writer = create_writer(format.into(), sink);
    writer.write_report(&report)
}
