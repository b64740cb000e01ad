//! Output formatting for CLI results.

use std::fmt::Write as FmtWrite;

use console::style;
use serde_json::json;

use crate::models::{ChatReply, OutputFormat};
use crate::services::IngestReport;

/// Infrastructure status as shown by `ragchat status`.
#[derive(Debug, Clone)]
pub struct StatusInfo {
    pub store_url: String,
    pub store_connected: bool,
    pub collection: String,
    pub points: u64,
    pub provider_key_set: bool,
    pub serve_key_set: bool,
    pub tokenizer_configured: bool,
}

/// One row of the `ragchat tokens` report.
#[derive(Debug, Clone)]
pub struct TokenRow {
    pub url: String,
    pub tokens: usize,
    pub over_limit: bool,
}

pub trait Formatter {
    fn format_chat(&self, reply: &ChatReply) -> String;
    fn format_status(&self, status: &StatusInfo) -> String;
    fn format_ingest_report(&self, report: &IngestReport) -> String;
    fn format_tokens(&self, rows: &[TokenRow], limit: usize) -> String;
    fn format_message(&self, message: &str) -> String;
    fn format_error(&self, error: &str) -> String;
}

pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format_chat(&self, reply: &ChatReply) -> String {
        let mut output = String::new();
        writeln!(output, "{}", reply.response).unwrap();
        if let Some(ref source) = reply.source {
            writeln!(output, "\n{} {}", style("Source:").dim(), source).unwrap();
        }
        output
    }

    fn format_status(&self, status: &StatusInfo) -> String {
        let mut output = String::new();
        let check = |ok: bool| if ok { style("ok").green() } else { style("unavailable").red() };

        writeln!(
            output,
            "Vector store:   {} ({})",
            check(status.store_connected),
            status.store_url
        )
        .unwrap();
        writeln!(
            output,
            "Collection:     {} ({} points)",
            status.collection, status.points
        )
        .unwrap();
        writeln!(
            output,
            "Provider key:   {}",
            if status.provider_key_set { "set" } else { "missing" }
        )
        .unwrap();
        writeln!(
            output,
            "Serve key:      {}",
            if status.serve_key_set { "set" } else { "missing" }
        )
        .unwrap();
        writeln!(
            output,
            "Tokenizer:      {}",
            if status.tokenizer_configured {
                "configured"
            } else {
                "not configured"
            }
        )
        .unwrap();
        output
    }

    fn format_ingest_report(&self, report: &IngestReport) -> String {
        let mut output = String::new();
        writeln!(
            output,
            "Ingested {} of {} documents ({} chunks written, {} skipped)",
            report.indexed, report.documents, report.chunks_written, report.skipped
        )
        .unwrap();
        for (url, error) in &report.failures {
            writeln!(output, "  {} {} - {}", style("skipped").yellow(), url, error).unwrap();
        }
        output
    }

    fn format_tokens(&self, rows: &[TokenRow], limit: usize) -> String {
        let mut output = String::new();
        for row in rows {
            writeln!(output, "{} -> {} tokens", row.url, row.tokens).unwrap();
        }

        let over: Vec<&TokenRow> = rows.iter().filter(|r| r.over_limit).collect();
        if over.is_empty() {
            writeln!(output, "\nNo documents exceed {} tokens.", limit).unwrap();
        } else {
            writeln!(output, "\nDocuments exceeding {} tokens:", limit).unwrap();
            for row in over {
                writeln!(
                    output,
                    "  {} {} -> {} tokens",
                    style("over").red(),
                    row.url,
                    row.tokens
                )
                .unwrap();
            }
        }
        output
    }

    fn format_message(&self, message: &str) -> String {
        message.to_string()
    }

    fn format_error(&self, error: &str) -> String {
        format!("{} {}", style("Error:").red(), error)
    }
}

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_chat(&self, reply: &ChatReply) -> String {
        serde_json::to_string_pretty(reply).unwrap_or_default()
    }

    fn format_status(&self, status: &StatusInfo) -> String {
        json!({
            "vector_store": {
                "url": status.store_url,
                "connected": status.store_connected,
                "collection": status.collection,
                "points": status.points,
            },
            "provider_key_set": status.provider_key_set,
            "serve_key_set": status.serve_key_set,
            "tokenizer_configured": status.tokenizer_configured,
        })
        .to_string()
    }

    fn format_ingest_report(&self, report: &IngestReport) -> String {
        json!({
            "documents": report.documents,
            "indexed": report.indexed,
            "skipped": report.skipped,
            "chunks_written": report.chunks_written,
            "failures": report
                .failures
                .iter()
                .map(|(url, error)| json!({"url": url, "error": error}))
                .collect::<Vec<_>>(),
        })
        .to_string()
    }

    fn format_tokens(&self, rows: &[TokenRow], limit: usize) -> String {
        json!({
            "limit": limit,
            "documents": rows
                .iter()
                .map(|r| json!({"url": r.url, "tokens": r.tokens, "over_limit": r.over_limit}))
                .collect::<Vec<_>>(),
        })
        .to_string()
    }

    fn format_message(&self, message: &str) -> String {
        json!({"message": message}).to_string()
    }

    fn format_error(&self, error: &str) -> String {
        json!({"error": error}).to_string()
    }
}

pub fn get_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}
