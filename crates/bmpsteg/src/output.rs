use std::io::IsTerminal;

use bmpsteg_embed::{CapacityReport, EmbedReport, ExtractReport};
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

const EMBED_SCHEMA_ID: &str = "https://schemas.3leaps.dev/bmpsteg/cli/v1/embed-report.schema.json";
const EXTRACT_SCHEMA_ID: &str =
    "https://schemas.3leaps.dev/bmpsteg/cli/v1/extract-report.schema.json";
const CAPACITY_SCHEMA_ID: &str =
    "https://schemas.3leaps.dev/bmpsteg/cli/v1/capacity-report.schema.json";

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct Envelope<'a, T> {
    schema_id: &'a str,
    #[serde(flatten)]
    report: &'a T,
}

fn to_json<T: Serialize>(schema_id: &str, report: &T) -> String {
    serde_json::to_string(&Envelope { schema_id, report }).unwrap_or_else(|_| "{}".to_string())
}

fn key_value_table(rows: Vec<(&str, String)>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["FIELD", "VALUE"]);
    for (key, value) in rows {
        table.add_row(vec![key.to_string(), value]);
    }
    table
}

pub fn render_embed(report: &EmbedReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(EMBED_SCHEMA_ID, report),
        OutputFormat::Table => key_value_table(vec![
            ("carrier", report.carrier.display().to_string()),
            ("secret", report.secret.display().to_string()),
            ("output", report.output.display().to_string()),
            ("extension", report.extension.clone()),
            ("payload bytes", report.payload_len.to_string()),
            (
                "capacity",
                format!("{} / {} bytes", report.required_bytes, report.capacity_bytes),
            ),
            ("written", report.bytes_written.to_string()),
        ])
        .to_string(),
        OutputFormat::Pretty => format!(
            "hid {} ({} bytes, {}) in {} -> {}",
            report.secret.display(),
            report.payload_len,
            display_extension(&report.extension),
            report.carrier.display(),
            report.output.display()
        ),
        OutputFormat::Raw => report.output.display().to_string(),
    }
}

pub fn render_extract(report: &ExtractReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(EXTRACT_SCHEMA_ID, report),
        OutputFormat::Table => key_value_table(vec![
            ("stego", report.stego.display().to_string()),
            ("output", report.output.display().to_string()),
            ("extension", report.extension.clone()),
            ("payload bytes", report.payload_len.to_string()),
        ])
        .to_string(),
        OutputFormat::Pretty => format!(
            "recovered {} bytes ({}) from {} -> {}",
            report.payload_len,
            display_extension(&report.extension),
            report.stego.display(),
            report.output.display()
        ),
        OutputFormat::Raw => report.output.display().to_string(),
    }
}

pub fn render_capacity(report: &CapacityReport, format: OutputFormat) -> String {
    let max_payload = report
        .max_payload_len
        .map(|len| len.to_string())
        .unwrap_or_else(|| "none".to_string());

    match format {
        OutputFormat::Json => to_json(CAPACITY_SCHEMA_ID, report),
        OutputFormat::Table => {
            let mut rows = vec![
                ("carrier", report.carrier.display().to_string()),
                (
                    "dimensions",
                    format!("{} x {}", report.width, report.height),
                ),
                ("file bytes", report.file_len.to_string()),
                ("capacity bytes", report.capacity_bytes.to_string()),
                ("max payload", max_payload),
            ];
            if let Some(fit) = &report.secret {
                rows.push(("secret", fit.path.display().to_string()));
                rows.push(("required bytes", fit.required_bytes.to_string()));
                rows.push(("fits", fit.fits.to_string()));
            }
            key_value_table(rows).to_string()
        }
        OutputFormat::Pretty => {
            let mut line = format!(
                "{}: {}x{}, {} usable bytes, max payload {}",
                report.carrier.display(),
                report.width,
                report.height,
                report.capacity_bytes,
                max_payload
            );
            if let Some(fit) = &report.secret {
                line.push_str(&format!(
                    "; {} needs {} bytes ({})",
                    fit.path.display(),
                    fit.required_bytes,
                    if fit.fits { "fits" } else { "does not fit" }
                ));
            }
            line
        }
        OutputFormat::Raw => max_payload,
    }
}

fn display_extension(extension: &str) -> &str {
    if extension.is_empty() {
        "no extension"
    } else {
        extension
    }
}
