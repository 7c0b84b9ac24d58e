//! Toolkit commands for encoding, decoding and inspecting ABI data

pub mod decode;
pub mod encode;
pub mod schema;

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use crate::codec::dump_words;
use crate::config::OutputFormat;

/// Result of a toolkit operation
#[derive(Debug)]
pub struct ToolResult {
    pub title: String,
    pub content: Vec<(String, String)>, // (label, value) pairs
    /// Structured payload for JSON output
    pub data: Option<Value>,
}

impl ToolResult {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: Vec::new(),
            data: None,
        }
    }

    pub fn add(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.content.push((label.into(), value.into()));
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn render(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => {
                let mut object = Map::new();
                for (label, value) in &self.content {
                    object.insert(label.clone(), Value::String(value.clone()));
                }
                if let Some(data) = &self.data {
                    object.insert("item".into(), data.clone());
                }
                serde_json::to_string_pretty(&Value::Object(object)).unwrap_or_default()
            }
            OutputFormat::Words | OutputFormat::Hex => {
                let mut out = self.title.clone();
                for (label, value) in &self.content {
                    if value.contains('\n') {
                        out.push_str(&format!("\n{}:\n{}", label, value.trim_end()));
                    } else {
                        out.push_str(&format!("\n{}: {}", label, value));
                    }
                }
                out
            }
        }
    }
}

/// Render encoded bytes for the chosen output format
pub fn render_bytes(data: &[u8], format: OutputFormat) -> String {
    match format {
        OutputFormat::Words => dump_words(data),
        OutputFormat::Hex | OutputFormat::Json => format!("0x{}", hex::encode(data)),
    }
}

/// Parse hex input, tolerating a 0x prefix and whitespace between words
pub fn parse_hex(input: &str) -> Result<Vec<u8>> {
    let trimmed = input.trim();
    let payload = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(&compact).context("Invalid hex input")
}
