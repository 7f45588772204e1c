use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use comfy_table::Table;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, info_span, trace};

use claims_cli::logging::redact_value;
use claims_detect::detect_format_with_filename;
use claims_ingest::{
    CsvRowReader, IngestConfig, JsonLinesSink, ProcessRequest, ProgressEvent, StreamRequest,
    Upload, UploadResponse, detect_format_from_file, file_id, preview_upload, process_file,
    process_stream, read_csv_file, read_file, resolve_mapping,
};
use claims_map::{
    JsonFilePreferenceStore, MappingSet, PreferenceStore, SchemaType, generate_mappings,
};
use claims_model::{CarrierDetectionResult, FieldMapping, ValidationResult};
use claims_standards::CarrierRegistry;
use claims_validate::validate_data;

use crate::cli::{DetectArgs, FileArgs, IngestArgs, MapArgs, SchemaArg};
use crate::summary::apply_table_style;
use crate::types::{IngestReport, ValidateReport};

const SPINNER_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] {pos} rows {msg}";

pub fn load_config(path: Option<&Path>) -> Result<IngestConfig> {
    match path {
        Some(path) => IngestConfig::load(path)
            .with_context(|| format!("load config {}", path.display())),
        None => Ok(IngestConfig::default()),
    }
}

pub fn run_carriers(registry: &CarrierRegistry) {
    let mut table = Table::new();
    table.set_header(vec![
        "Carrier",
        "Aliases",
        "Required columns",
        "Date formats",
        "Amount formats",
    ]);
    apply_table_style(&mut table);
    for carrier in registry.iter() {
        table.add_row(vec![
            carrier.name.clone(),
            carrier.aliases.join(", "),
            carrier.required_columns.join(", "),
            join_display(&carrier.date_formats),
            join_display(&carrier.amount_formats),
        ]);
    }
    println!("{table}");
}

pub fn run_detect(
    args: &DetectArgs,
    registry: &CarrierRegistry,
    config: &IngestConfig,
) -> Result<Vec<CarrierDetectionResult>> {
    ensure_file(&args.file)?;
    let results = detect_format_from_file(
        &args.file,
        registry,
        &config.detection,
        config.preview.sample_rows,
    );
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&results).context("serialize detection results")?
        );
    }
    Ok(results)
}

pub fn run_map(args: &MapArgs) -> Result<MappingSet> {
    let headers = read_headers(&args.file)?;
    let schema = schema_type(args.schema);
    let mut set = generate_mappings(&headers, schema);

    let store = args.preferences.as_deref().map(JsonFilePreferenceStore::new);
    if let Some(store) = &store {
        let saved = store
            .load(schema)
            .with_context(|| format!("load preferences {}", store.path().display()))?;
        let applied = set.apply_preferences(&saved);
        info!(applied, "applied saved preferences");
    }

    for assignment in &args.assign {
        let (source, target) = parse_assignment(assignment)?;
        let applied = match target {
            Some(target) => set.assign(&source, &target),
            None => set.clear(&source),
        };
        applied.with_context(|| format!("apply --assign {assignment}"))?;
    }

    if args.save_preferences
        && let Some(mut store) = store
    {
        store
            .save(schema, &set.preferences())
            .with_context(|| format!("save preferences {}", store.path().display()))?;
    }

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&set).context("serialize mapping set")?
        );
    }
    Ok(set)
}

pub fn run_preview(
    args: &FileArgs,
    registry: &CarrierRegistry,
    config: &IngestConfig,
) -> Result<UploadResponse> {
    let data = read_file(&args.file).with_context(|| format!("read {}", args.file.display()))?;
    let upload = Upload {
        file_name: file_label(&args.file),
        mapping: load_mapping(args.mapping.as_deref())?,
        data,
    };
    let response = preview_upload(&upload, registry, config)
        .unwrap_or_else(|error| UploadResponse::failed(file_id(&upload.data), &error));
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&response).context("serialize preview")?
        );
    }
    Ok(response)
}

pub fn run_validate(
    args: &FileArgs,
    registry: &CarrierRegistry,
    config: &IngestConfig,
) -> Result<ValidateReport> {
    let span = info_span!("validate", file = %args.file.display());
    let _guard = span.enter();

    let table = read_csv_file(&args.file)?;
    let candidates = detect_format_with_filename(
        registry,
        &file_label(&args.file),
        &table.headers,
        table.head(config.preview.sample_rows),
        &config.detection,
    );
    let resolved = resolve_mapping(
        &args.file,
        load_mapping(args.mapping.as_deref())?,
        &candidates,
        &table.headers,
    )?;

    let result = validate_data(&table.rows, &resolved.mapping, &config.validation);
    trace_issues(&result);
    info!(
        rows = result.stats.row_count,
        valid_rows = result.stats.valid_rows,
        issues = result.errors.len(),
        "validated file"
    );

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("serialize validation result")?
        );
    }
    Ok(ValidateReport {
        file: args.file.clone(),
        carrier: resolved.carrier,
        confidence: resolved.confidence,
        mapping_source: resolved.source,
        result,
    })
}

pub fn run_ingest(
    args: &IngestArgs,
    registry: &CarrierRegistry,
    config: &IngestConfig,
) -> Result<IngestReport> {
    let path = &args.file.file;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(path));
    let mapping = load_mapping(args.file.mapping.as_deref())?;
    let writer = File::create(&output)
        .map(BufWriter::new)
        .with_context(|| format!("create {}", output.display()))?;
    let mut sink = JsonLinesSink::new(writer);

    let report = if args.stream {
        let mut config = config.clone();
        if let Some(chunk_size) = args.chunk_size {
            config.streaming.chunk_size = chunk_size;
        }
        let reader = File::open(path)
            .map(BufReader::new)
            .with_context(|| format!("open {}", path.display()))?;
        let progress = if args.file.json {
            ProgressBar::hidden()
        } else {
            create_spinner()?
        };
        let result = process_stream(
            StreamRequest {
                file_name: file_label(path),
                reader,
                mapping,
                total_rows: None,
            },
            registry,
            &mut sink,
            &config,
            |event| update_progress(&progress, event),
        );
        progress.finish_and_clear();
        let summary = result?;
        if args.file.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&summary).context("serialize stream summary")?
            );
        }
        IngestReport::from_stream(path.clone(), output, summary)
    } else {
        let request = ProcessRequest {
            file_name: file_label(path),
            data: read_file(path).with_context(|| format!("read {}", path.display()))?,
            mapping,
            ..ProcessRequest::default()
        };
        let response = process_file(&request, registry, &mut sink, config)?;
        if args.file.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&response).context("serialize process response")?
            );
        }
        IngestReport::from_batch(path.clone(), output, response)
    };
    Ok(report)
}

/// Splits `SOURCE=FIELD`; an empty field clears the column.
pub fn parse_assignment(value: &str) -> Result<(String, Option<String>)> {
    let (source, target) = value
        .split_once('=')
        .ok_or_else(|| anyhow!("expected SOURCE=FIELD, got `{value}`"))?;
    let source = source.trim();
    if source.is_empty() {
        bail!("missing source column in `{value}`");
    }
    let target = target.trim();
    Ok((
        source.to_string(),
        (!target.is_empty()).then(|| target.to_string()),
    ))
}

/// `<FILE>.claims.jsonl` next to the input.
pub fn default_output_path(path: &Path) -> PathBuf {
    path.with_extension("claims.jsonl")
}

fn load_mapping(path: Option<&Path>) -> Result<Option<FieldMapping>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let file = File::open(path).with_context(|| format!("open mapping {}", path.display()))?;
    let mapping = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parse mapping {}", path.display()))?;
    Ok(Some(mapping))
}

fn read_headers(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let reader = CsvRowReader::new(BufReader::new(file), path)?;
    Ok(reader.headers().to_vec())
}

fn ensure_file(path: &Path) -> Result<()> {
    if !path.is_file() {
        bail!("file not found: {}", path.display());
    }
    Ok(())
}

fn file_label(path: &Path) -> String {
    path.display().to_string()
}

fn schema_type(schema: SchemaArg) -> SchemaType {
    match schema {
        SchemaArg::Claims => SchemaType::Claims,
        SchemaArg::Experience => SchemaType::Experience,
    }
}

fn join_display<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn trace_issues(result: &ValidationResult) {
    for issue in &result.errors {
        trace!(
            row = issue.row,
            field = %issue.field,
            severity = %issue.severity,
            value = redact_value(&issue.value),
            "{}",
            issue.message
        );
    }
}

fn create_spinner() -> Result<ProgressBar> {
    let style = ProgressStyle::default_spinner()
        .template(SPINNER_TEMPLATE)
        .context("progress template")?;
    let progress = ProgressBar::new_spinner();
    progress.set_style(style);
    progress.enable_steady_tick(Duration::from_millis(100));
    Ok(progress)
}

fn update_progress(progress: &ProgressBar, event: &ProgressEvent) {
    progress.set_position(event.processed as u64);
    progress.set_message(format!(
        "{} claims, {} errors",
        event.valid_claims, event.errors
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("Member # = claimantId").unwrap(),
            ("Member #".to_string(), Some("claimantId".to_string()))
        );
        assert_eq!(
            parse_assignment("notes=").unwrap(),
            ("notes".to_string(), None)
        );
        assert!(parse_assignment("claimantId").is_err());
        assert!(parse_assignment("=claimantId").is_err());
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("exports/anthem_q1.csv")),
            PathBuf::from("exports/anthem_q1.claims.jsonl")
        );
    }

    #[test]
    fn test_map_applies_assignments_and_saves_preferences() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("upload.csv");
        std::fs::write(&csv, "Member #,Date of Service,Category,Notes\nM1,01/02/2024,RX,x\n")
            .unwrap();
        let prefs = dir.path().join("prefs.json");

        let args = MapArgs {
            file: csv.clone(),
            schema: SchemaArg::Claims,
            preferences: Some(prefs.clone()),
            save_preferences: true,
            assign: vec!["Member #=claimantId".to_string(), "Notes=".to_string()],
            json: false,
        };
        let set = run_map(&args).unwrap();
        assert_eq!(set.target_of("Member #"), Some("claimantId"));
        assert_eq!(set.target_of("Notes"), None);

        let saved = JsonFilePreferenceStore::new(&prefs)
            .load(SchemaType::Claims)
            .unwrap();
        assert_eq!(saved.get("Member #").map(String::as_str), Some("claimantId"));
    }

    #[test]
    fn test_validate_and_ingest_write_claims() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("anthem_march.csv");
        std::fs::write(
            &csv,
            "member_id,service_date,claim_type,paid_amount\n\
             M1,03/01/2024,Medical,$100.00\n\
             ,03/02/2024,Medical,$5.00\n",
        )
        .unwrap();
        let config = IngestConfig::default();
        let registry = CarrierRegistry::builtin();

        let file_args = FileArgs {
            file: csv.clone(),
            mapping: None,
            json: false,
        };
        let report = run_validate(&file_args, registry, &config).unwrap();
        assert_eq!(report.carrier.as_deref(), Some("Anthem"));
        assert_eq!(report.result.stats.valid_rows, 1);

        for stream in [false, true] {
            let output = dir.path().join(format!("out-{stream}.jsonl"));
            let args = IngestArgs {
                file: FileArgs {
                    file: csv.clone(),
                    mapping: None,
                    json: true,
                },
                output: Some(output.clone()),
                stream,
                chunk_size: stream.then_some(1),
            };
            let report = run_ingest(&args, registry, &config).unwrap();
            assert!(report.is_stored());
            assert_eq!(report.stored, 1);
            assert_eq!(report.chunks, stream.then_some(2));
            let written = std::fs::read_to_string(&output).unwrap();
            assert_eq!(written.lines().count(), 1);
        }
    }
}
