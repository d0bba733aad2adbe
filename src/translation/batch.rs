/*!
 * Batch document translation.
 *
 * Three walkers share the per-unit contract of `RoutingResolver::translate`
 * but differ in traversal and failure policy:
 * - text: one unit per non-blank line, failures abort the batch
 * - json: one unit per non-blank string leaf, failures abort the batch
 * - csv: one unit per non-blank cell; an inference failure keeps the
 *   original cell and the batch continues
 */

use futures::future::{BoxFuture, FutureExt};
use log::{debug, info, warn};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::errors::{DocumentError, TranslationError};

use super::routing::{RouteDecision, RoutingResolver};

/// Supported document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// Line-oriented plain text
    Text,
    /// Nested JSON tree
    Json,
    /// Table with a header row
    Csv,
}

impl DocumentFormat {
    /// Map a file extension to a format
    pub fn from_extension(extension: &str) -> Result<Self, DocumentError> {
        match extension.trim_start_matches('.').to_lowercase().as_str() {
            "txt" | "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(DocumentError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Canonical file extension
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }

    /// Name of the batch unit for this format
    pub fn unit_name(&self) -> &'static str {
        match self {
            Self::Text => "lines",
            Self::Json => "fields",
            Self::Csv => "cells",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for DocumentFormat {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s)
    }
}

/// Status of a finished batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    Success,
}

/// Result of translating one document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchOutcome {
    pub status: BatchStatus,
    pub format: DocumentFormat,
    /// Units that were sent for translation
    pub units_attempted: usize,
    /// Units whose translation was applied
    pub units_translated: usize,
    /// The transformed document
    #[serde(skip_serializing)]
    pub document: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_file: Option<String>,
}

#[derive(Debug, Default)]
struct Counters {
    attempted: usize,
    translated: usize,
}

/// Applies routed translation to every unit of a document
#[derive(Clone)]
pub struct BatchProcessor {
    resolver: Arc<RoutingResolver>,
}

impl BatchProcessor {
    pub fn new(resolver: Arc<RoutingResolver>) -> Self {
        Self { resolver }
    }

    /// Translate a whole document held in memory
    pub async fn process(
        &self,
        format: DocumentFormat,
        content: &str,
        source: &str,
        target: &str,
    ) -> Result<BatchOutcome, TranslationError> {
        if self.resolver.resolve(source, target) == RouteDecision::Unsupported {
            return Err(TranslationError::unsupported_pair(source, target));
        }

        let mut counters = Counters::default();
        let document = match format {
            DocumentFormat::Text => self.process_text(content, source, target, &mut counters).await?,
            DocumentFormat::Json => self.process_json(content, source, target, &mut counters).await?,
            DocumentFormat::Csv => self.process_csv(content, source, target, &mut counters).await?,
        };

        info!(
            "Translated {}/{} {} ({} -> {})",
            counters.translated,
            counters.attempted,
            format.unit_name(),
            source,
            target
        );

        Ok(BatchOutcome {
            status: BatchStatus::Success,
            format,
            units_attempted: counters.attempted,
            units_translated: counters.translated,
            document,
            input_file: None,
            output_file: None,
        })
    }

    async fn translate_unit(&self, source: &str, target: &str, text: &str) -> Result<String, TranslationError> {
        let result = self.resolver.translate(source, target, text).await?;
        Ok(result.translated_text)
    }

    async fn process_text(
        &self,
        content: &str,
        source: &str,
        target: &str,
        counters: &mut Counters,
    ) -> Result<String, TranslationError> {
        let mut output = String::with_capacity(content.len());

        for segment in content.split_inclusive('\n') {
            let (line, ending) = split_line_ending(segment);
            if line.trim().is_empty() {
                output.push_str(segment);
                continue;
            }

            counters.attempted += 1;
            let translated = self.translate_unit(source, target, line.trim()).await?;
            counters.translated += 1;

            output.push_str(&translated);
            output.push_str(ending);
        }

        Ok(output)
    }

    async fn process_json(
        &self,
        content: &str,
        source: &str,
        target: &str,
        counters: &mut Counters,
    ) -> Result<String, TranslationError> {
        let mut tree: Value = serde_json::from_str(content).map_err(|e| DocumentError::Format {
            format: DocumentFormat::Json.to_string(),
            message: e.to_string(),
        })?;

        self.walk_tree(&mut tree, source, target, counters).await?;

        let output = serde_json::to_string_pretty(&tree).map_err(|e| DocumentError::Write {
            path: "<memory>".to_string(),
            reason: e.to_string(),
        })?;
        Ok(output)
    }

    fn walk_tree<'a>(
        &'a self,
        node: &'a mut Value,
        source: &'a str,
        target: &'a str,
        counters: &'a mut Counters,
    ) -> BoxFuture<'a, Result<(), TranslationError>> {
        async move {
            match node {
                Value::String(text) => {
                    if !text.trim().is_empty() {
                        counters.attempted += 1;
                        let translated = self.translate_unit(source, target, text.as_str()).await?;
                        *text = translated;
                        counters.translated += 1;
                    }
                }
                Value::Object(map) => {
                    for (_, child) in map.iter_mut() {
                        self.walk_tree(child, source, target, counters).await?;
                    }
                }
                Value::Array(items) => {
                    for item in items.iter_mut() {
                        self.walk_tree(item, source, target, counters).await?;
                    }
                }
                Value::Null | Value::Bool(_) | Value::Number(_) => {}
            }
            Ok(())
        }
        .boxed()
    }

    async fn process_csv(
        &self,
        content: &str,
        source: &str,
        target: &str,
        counters: &mut Counters,
    ) -> Result<String, TranslationError> {
        let format_error = |e: csv::Error| DocumentError::Format {
            format: DocumentFormat::Csv.to_string(),
            message: e.to_string(),
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(content.as_bytes());
        let headers = reader.headers().map_err(format_error)?.clone();
        let rows = reader
            .records()
            .collect::<Result<Vec<csv::StringRecord>, _>>()
            .map_err(format_error)?;

        let mut translated_rows = Vec::with_capacity(rows.len());
        for (row_index, row) in rows.iter().enumerate() {
            let mut cells = Vec::with_capacity(row.len());
            for (column, value) in headers.iter().zip(row.iter()) {
                if value.trim().is_empty() {
                    cells.push(value.to_string());
                    continue;
                }

                counters.attempted += 1;
                match self.translate_unit(source, target, value).await {
                    Ok(translated) => {
                        counters.translated += 1;
                        cells.push(translated);
                    }
                    Err(TranslationError::Inference(e)) => {
                        warn!("Keeping original cell (row {}, column '{}'): {}", row_index + 1, column, e);
                        cells.push(value.to_string());
                    }
                    Err(e) => return Err(e),
                }
            }
            translated_rows.push(cells);
        }

        debug!("Writing {} csv rows", translated_rows.len());
        write_csv(&headers, &translated_rows).map_err(TranslationError::from)
    }
}

/// Split a line into its content and its line ending
fn split_line_ending(segment: &str) -> (&str, &str) {
    if let Some(line) = segment.strip_suffix("\r\n") {
        (line, "\r\n")
    } else if let Some(line) = segment.strip_suffix('\n') {
        (line, "\n")
    } else {
        (segment, "")
    }
}

fn write_csv(headers: &csv::StringRecord, rows: &[Vec<String>]) -> Result<String, DocumentError> {
    let write_error = |reason: String| DocumentError::Write {
        path: "<memory>".to_string(),
        reason,
    };

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(headers).map_err(|e| write_error(e.to_string()))?;
    for row in rows {
        writer.write_record(row).map_err(|e| write_error(e.to_string()))?;
    }

    let bytes = writer.into_inner().map_err(|e| write_error(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| write_error(e.to_string()))
}
