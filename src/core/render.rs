//! Renderer module
//!
//! Renders ResultSet to different output formats: jsonl, json, md, raw

use crate::core::model::{Kind, ResultItem, ResultSet};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jsonl,
    Json,
    Markdown,
    Raw,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jsonl" => Ok(OutputFormat::Jsonl),
            "json" => Ok(OutputFormat::Json),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            "raw" => Ok(OutputFormat::Raw),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl RenderConfig {
    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

/// Renderer for result sets
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a result set to a string
    pub fn render(&self, result_set: &ResultSet) -> String {
        match self.config.format {
            OutputFormat::Jsonl => self.render_jsonl(result_set),
            OutputFormat::Json => self.render_json(result_set),
            OutputFormat::Markdown => self.render_markdown(result_set),
            OutputFormat::Raw => self.render_raw(result_set),
        }
    }

    /// Render as JSON Lines (one JSON object per line)
    fn render_jsonl(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .filter_map(|item| {
                if self.config.pretty {
                    serde_json::to_string_pretty(item).ok()
                } else {
                    serde_json::to_string(item).ok()
                }
            })
            .collect::<Vec<_>>()
            .join(if self.config.pretty { "\n\n" } else { "\n" })
    }

    /// Render as a single JSON array
    fn render_json(&self, result_set: &ResultSet) -> String {
        if self.config.pretty {
            serde_json::to_string_pretty(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        } else {
            serde_json::to_string(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        }
    }

    /// Render as Markdown
    fn render_markdown(&self, result_set: &ResultSet) -> String {
        let mut output = String::new();

        let mut locations = Vec::new();
        let mut markers = Vec::new();
        let mut errors = Vec::new();

        for item in &result_set.items {
            match item.kind {
                Kind::Location => locations.push(item),
                Kind::Marker => markers.push(item),
                Kind::Error => errors.push(item),
            }
        }

        if !errors.is_empty() {
            output.push_str("## Errors\n\n");
            for item in errors {
                for error in &item.errors {
                    match &item.name {
                        Some(name) => output.push_str(&format!(
                            "- **{}** `{}`: {}\n",
                            error.code, name, error.message
                        )),
                        None => {
                            output.push_str(&format!("- **{}**: {}\n", error.code, error.message))
                        }
                    }
                }
            }
            output.push('\n');
        }

        if !locations.is_empty() {
            output.push_str("## Locations\n\n");
            output.push_str("| Name | Latitude | Longitude | Source |\n");
            output.push_str("|------|----------|-----------|--------|\n");
            for item in locations {
                output.push_str(&format!(
                    "| {} | {} | {} | {} |\n",
                    item.name.as_deref().unwrap_or(""),
                    fmt_opt(item.latitude),
                    fmt_opt(item.longitude),
                    item.source_mode
                        .and_then(|s| serde_json::to_value(s).ok())
                        .and_then(|v| v.as_str().map(str::to_string))
                        .unwrap_or_default()
                ));
            }
            output.push('\n');
        }

        if !markers.is_empty() {
            output.push_str("## Markers\n\n");
            for item in markers {
                self.render_marker_md(&mut output, item);
            }
            output.push('\n');
        }

        output
    }

    fn render_marker_md(&self, output: &mut String, item: &ResultItem) {
        let name = item.name.as_deref().unwrap_or("");
        let data = item.data.as_ref();
        let ratio = data.and_then(|d| d.get("ratio")).and_then(|r| r.as_f64());
        let color = data
            .and_then(|d| d.pointer("/arrow/color"))
            .and_then(|c| c.as_str())
            .unwrap_or("black");

        output.push_str(&format!(
            "- **{}** ({}, {}): ratio {} ({})",
            name,
            fmt_opt(item.latitude),
            fmt_opt(item.longitude),
            fmt_opt(ratio),
            color
        ));
        if data.and_then(|d| d.get("position")).is_some_and(|p| p.is_null()) {
            output.push_str(" - off map");
        }
        output.push('\n');
    }

    /// Raw mode: tab-separated `name, latitude, longitude`
    fn render_raw(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .filter(|item| item.kind != Kind::Error)
            .map(|item| {
                format!(
                    "{}\t{}\t{}",
                    item.name.as_deref().unwrap_or(""),
                    fmt_opt(item.latitude),
                    fmt_opt(item.longitude)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
