//! Auxiliary stereotype reports.
//!
//! The annotated archive is the primary output; these writers produce the
//! optional per-class summary in JSON or on the terminal.

use crate::archive::{EngineRun, SkippedUnit};
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Terminal,
}

#[derive(Debug, Serialize)]
pub struct StereotypeReport {
    pub generated_at: DateTime<Utc>,
    pub input: PathBuf,
    pub classes: Vec<ClassReport>,
    pub class_label_totals: BTreeMap<String, usize>,
    pub method_label_totals: BTreeMap<String, usize>,
    pub skipped_units: Vec<SkippedUnit>,
}

#[derive(Debug, Serialize)]
pub struct ClassReport {
    pub name: String,
    pub language: String,
    pub stereotypes: Vec<String>,
    pub methods: Vec<MethodReport>,
}

#[derive(Debug, Serialize)]
pub struct MethodReport {
    pub name: String,
    pub unit: usize,
    pub xpath: String,
    pub stereotypes: Vec<String>,
}

impl StereotypeReport {
    pub fn from_run(input: PathBuf, run: &EngineRun) -> Self {
        let mut class_label_totals: BTreeMap<String, usize> = BTreeMap::new();
        let mut method_label_totals: BTreeMap<String, usize> = BTreeMap::new();
        let mut classes = Vec::with_capacity(run.classes.len());

        for model in &run.classes {
            for label in &model.stereotypes {
                *class_label_totals.entry(label.to_string()).or_default() += 1;
            }
            let mut methods = Vec::with_capacity(model.methods.len());
            for method in &model.methods {
                for label in &method.stereotypes {
                    *method_label_totals.entry(label.to_string()).or_default() += 1;
                }
                methods.push(MethodReport {
                    name: method.name.clone(),
                    unit: method.unit_index,
                    xpath: method.xpath.clone(),
                    stereotypes: method.stereotypes.iter().map(|s| s.to_string()).collect(),
                });
            }
            classes.push(ClassReport {
                name: if model.names.trimmed.is_empty() {
                    "<anonymous>".to_string()
                } else {
                    model.names.trimmed.clone()
                },
                language: model.language.to_string(),
                stereotypes: model.stereotypes.iter().map(|s| s.to_string()).collect(),
                methods,
            });
        }

        StereotypeReport {
            generated_at: Utc::now(),
            input,
            classes,
            class_label_totals,
            method_label_totals,
            skipped_units: run.skipped_units.clone(),
        }
    }
}

pub trait OutputWriter {
    fn write_report(&mut self, report: &StereotypeReport) -> anyhow::Result<()>;
}

pub fn create_writer(format: OutputFormat, sink: Box<dyn Write>) -> Box<dyn OutputWriter> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(sink)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(sink)),
    }
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_report(&mut self, report: &StereotypeReport) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        self.writer.write_all(json.as_bytes())?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_report(&mut self, report: &StereotypeReport) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", "Stereotype Summary".bold())?;
        writeln!(self.writer, "{}", "==================".bold())?;
        writeln!(self.writer)?;

        for class in &report.classes {
            writeln!(
                self.writer,
                "{} {} [{}]",
                class.name.cyan().bold(),
                format!("({})", class.language).dimmed(),
                class.stereotypes.join(" ").green()
            )?;
            for method in &class.methods {
                writeln!(
                    self.writer,
                    "  {} {}",
                    method.name,
                    format!("[{}]", method.stereotypes.join(" ")).yellow()
                )?;
            }
            writeln!(self.writer)?;
        }

        writeln!(self.writer, "{}", "Class label totals".bold())?;
        for (label, count) in &report.class_label_totals {
            writeln!(self.writer, "  {label:<20} {count}")?;
        }
        writeln!(self.writer, "{}", "Method label totals".bold())?;
        for (label, count) in &report.method_label_totals {
            writeln!(self.writer, "  {label:<20} {count}")?;
        }
        for skipped in &report.skipped_units {
            writeln!(
                self.writer,
                "{}",
                format!(
                    "skipped unit {} (language {})",
                    skipped.index, skipped.language
                )
                .red()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::{AnalysisContext, run_engine};

    fn sample_run() -> EngineRun {
        let xml = r#"<unit xmlns="http://www.srcML.org/srcML/src" language="C++"><class>class <name>Point</name> <block>{<public>public:
<decl_stmt><decl><type><name>int</name></type> <name>x</name></decl>;</decl_stmt>
<function><type><name>int</name></type> <name>getX</name><parameter_list>()</parameter_list> <specifier>const</specifier> <block>{<block_content> <return>return <expr><name>x</name></expr>;</return> </block_content>}</block></function>
</public>}</block>;</class></unit>"#;
        run_engine(xml, &AnalysisContext::default(), false).unwrap()
    }

    #[test]
    fn json_report_serialises() {
        let run = sample_run();
        let report = StereotypeReport::from_run(PathBuf::from("test.xml"), &run);
        let mut out = Vec::new();
        JsonWriter::new(&mut out).write_report(&report).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\"Point\""));
        assert!(text.contains("\"get\""));
        assert!(text.contains("method_label_totals"));
    }

    #[test]
    fn terminal_report_lists_classes_and_methods() {
        colored::control::set_override(false);
        let run = sample_run();
        let report = StereotypeReport::from_run(PathBuf::from("test.xml"), &run);
        let mut out = Vec::new();
        TerminalWriter::new(&mut out).write_report(&report).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Point"));
        assert!(text.contains("getX"));
        assert!(text.contains("get"));
    }

    #[test]
    fn totals_count_each_label_occurrence() {
        let run = sample_run();
        let report = StereotypeReport::from_run(PathBuf::from("test.xml"), &run);
        assert_eq!(report.method_label_totals.get("get"), Some(&1));
        assert!(report.class_label_totals.contains_key("small-class"));
    }
}
