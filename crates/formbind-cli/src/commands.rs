use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{info, info_span};

use formbind_cli::render::{entries_table, write_csv};
use formbind_ingest::{Source, load_json, load_source, load_value};
use formbind_model::{
    MappingSet, NormalizeError, NormalizeOutcome, NormalizedDataset, NormalizedReport,
    ReportMetadata, cell_text,
};
use formbind_normalize::{
    NormalizeOptions, build_form_structure, normalize_backend, normalize_document,
    transform_dataset,
};
use formbind_path::{Entry, NodeKind};
use formbind_resolve::{TransformRegistry, resolve};

use crate::cli::{FindArgs, NodeKindArg, NormalizeArgs, OutputFormatArg, PathCommand, ResolveArgs};
use crate::summary::{print_failures, print_report};
use crate::types::CommandStatus;

pub fn run_normalize(args: &NormalizeArgs, options: &NormalizeOptions) -> Result<CommandStatus> {
    let span = info_span!("normalize", file = %args.file.display());
    let _guard = span.enter();

    let report = match normalize_file(&args.file, options)? {
        Ok(report) => report,
        Err(error) => {
            if args.format == OutputFormatArg::Json {
                print_json(&NormalizeOutcome::Failure {
                    error: error.to_string(),
                })?;
            } else {
                eprintln!("error: {error}");
            }
            return Ok(CommandStatus::Reported);
        }
    };
    info!(
        columns = report.dataset.columns.len(),
        rows = report.dataset.rows.len(),
        primary_axis = report.dataset.primary_axis_key.as_deref().unwrap_or("-"),
        "normalized report"
    );

    if args.form {
        print_json(&transform_dataset(&report.dataset))?;
        return Ok(CommandStatus::Success);
    }
    match args.format {
        OutputFormatArg::Table => print_report(&report),
        OutputFormatArg::Json => print_json(&NormalizeOutcome::Report(Box::new(report)))?,
        OutputFormatArg::Csv => {
            write_csv(&report.dataset, io::stdout().lock()).context("write CSV output")?;
        }
    }
    Ok(CommandStatus::Success)
}

pub fn run_resolve(args: &ResolveArgs, options: &NormalizeOptions) -> Result<CommandStatus> {
    let span = info_span!("resolve", mapping = %args.mapping.display());
    let _guard = span.enter();

    let mapping: MappingSet = load_json(&args.mapping).context("load mapping configuration")?;
    let base = match &args.base {
        Some(path) => load_json::<Value>(path).context("load base properties")?,
        None => Value::Null,
    };
    let source = load_source(&args.data)
        .with_context(|| format!("load {}", args.data.display()))?;
    let form = match source {
        Source::Form(data) => data.form_structure,
        other => {
            let dataset = normalize_source(&args.data, other, options)?
                .map(|report| report.dataset)
                .map_err(|error| anyhow!("normalize {}: {error}", args.data.display()))?;
            build_form_structure(&dataset)
        }
    };

    let resolution = resolve(&mapping, &form, &base, &TransformRegistry::new());
    info!(
        fields = mapping.len(),
        failures = resolution.failures.len(),
        "resolved mapping set"
    );
    print_json(&resolution.props)?;
    print_failures(&resolution.failures);
    Ok(if resolution.is_ok() {
        CommandStatus::Success
    } else {
        CommandStatus::Reported
    })
}

pub fn run_path(command: &PathCommand) -> Result<CommandStatus> {
    match command {
        PathCommand::Get(target) => {
            let document = load_document(&target.file)?;
            match formbind_path::get(&document, &target.path) {
                Some(value) => {
                    print_json(value)?;
                    Ok(CommandStatus::Success)
                }
                None => {
                    eprintln!("no value at '{}'", target.path);
                    Ok(CommandStatus::Reported)
                }
            }
        }
        PathCommand::Set { target, value } => {
            let document = load_document(&target.file)?;
            let updated = formbind_path::try_set(&document, &target.path, parse_value_arg(value))
                .with_context(|| format!("set '{}'", target.path))?;
            print_json(&updated)?;
            Ok(CommandStatus::Success)
        }
        PathCommand::Delete(target) => {
            let document = load_document(&target.file)?;
            print_json(&formbind_path::delete(&document, &target.path))?;
            Ok(CommandStatus::Success)
        }
        PathCommand::Find(args) => run_find(args),
    }
}

fn run_find(args: &FindArgs) -> Result<CommandStatus> {
    let document = load_document(&args.file)?;
    let target = args.value.as_deref().map(parse_value_arg);
    let entries: Vec<Entry<'_>> = match (&target, args.kind) {
        (Some(target), _) => formbind_path::find_by_value(&document, target, args.exact).collect(),
        (None, Some(kind)) => formbind_path::find_by_type(&document, node_kind(kind)).collect(),
        (None, None) => formbind_path::enumerate(&document).collect(),
    };
    info!(matches = entries.len(), "walked document");

    match args.format {
        OutputFormatArg::Table => println!("{}", entries_table(entries)),
        OutputFormatArg::Json => {
            let rows: Vec<Value> = entries
                .iter()
                .map(|entry| {
                    json!({
                        "path": entry.path,
                        "kind": entry.kind.as_str(),
                        "value": entry.value,
                    })
                })
                .collect();
            print_json(&rows)?;
        }
        OutputFormatArg::Csv => {
            let mut writer = csv::Writer::from_writer(io::stdout().lock());
            writer.write_record(["path", "kind", "value"])?;
            for entry in &entries {
                let value = entry.value.map(cell_text).unwrap_or_default();
                writer.write_record([entry.path.as_str(), entry.kind.as_str(), value.as_str()])?;
            }
            writer.flush()?;
        }
    }
    Ok(CommandStatus::Success)
}

/// Loads and normalizes a report or backend file. The outer error is an I/O or
/// parse failure; the inner one is a report-level failure the caller may
/// present.
fn normalize_file(
    path: &Path,
    options: &NormalizeOptions,
) -> Result<std::result::Result<NormalizedReport, NormalizeError>> {
    let source = load_source(path).with_context(|| format!("load {}", path.display()))?;
    normalize_source(path, source, options)
}

fn normalize_source(
    path: &Path,
    source: Source,
    options: &NormalizeOptions,
) -> Result<std::result::Result<NormalizedReport, NormalizeError>> {
    match source {
        Source::Report(document) => Ok(normalize_document(&document, options)),
        Source::Backend(data) => Ok(normalize_backend(&data, options).map(report_of)),
        Source::Form(_) => Err(anyhow!(
            "{} already holds a FormStructure; nothing to normalize",
            path.display()
        )),
    }
}

fn report_of(dataset: NormalizedDataset) -> NormalizedReport {
    NormalizedReport {
        metadata: ReportMetadata::default(),
        dataset,
    }
}

fn load_document(path: &Path) -> Result<Value> {
    load_value(path).with_context(|| format!("load {}", path.display()))
}

/// JSON when it parses as JSON, otherwise the raw text as a string.
fn parse_value_arg(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn node_kind(kind: NodeKindArg) -> NodeKind {
    match kind {
        NodeKindArg::Array => NodeKind::Array,
        NodeKindArg::Object => NodeKind::Object,
        NodeKindArg::String => NodeKind::String,
        NodeKindArg::Number => NodeKind::Number,
        NodeKindArg::Boolean => NodeKind::Boolean,
        NodeKindArg::Null => NodeKind::Null,
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialize output")?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{text}").context("write output")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn resolve_accepts_transformed_data() {
        let dir = TempDir::new().unwrap();
        let mapping = dir.path().join("mapping.json");
        let data = dir.path().join("form.json");
        fs::write(
            &mapping,
            json!({
                "value": {
                    "inputType": "mapped",
                    "mappedConfig": {"chaField": "ZSCMCMD", "chaValue": "OCTG", "kfField": "VALUE002"}
                }
            })
            .to_string(),
        )
        .unwrap();
        fs::write(
            &data,
            json!({"FormStructure": {"ZSCMCMD": {"OCTG": {"VALUE002": 51.4}}}}).to_string(),
        )
        .unwrap();

        let args = ResolveArgs {
            mapping,
            data: data.clone(),
            base: None,
        };
        let status = run_resolve(&args, &NormalizeOptions::default()).unwrap();
        assert_eq!(status, CommandStatus::Success);

        let err = normalize_file(&data, &NormalizeOptions::default()).unwrap_err();
        assert!(err.to_string().contains("FormStructure"), "{err}");
    }

    #[test]
    fn value_arguments_fall_back_to_strings() {
        assert_eq!(parse_value_arg("10"), json!(10));
        assert_eq!(parse_value_arg("[1, 2]"), json!([1, 2]));
        assert_eq!(parse_value_arg("OCTG"), json!("OCTG"));
        assert_eq!(parse_value_arg("\"10\""), json!("10"));
    }
}
