//! Markdown <-> Atlassian document format conversion for Jira text fields.
//!
//! Outbound, user-authored markdown is parsed into a [`Document`] and encoded
//! as ADF JSON. Inbound, ADF received from Jira is decoded leniently and
//! rendered back to markdown. Both directions are pure functions; parsing
//! never fails and rendering degrades instead of erroring.

pub mod adf;
mod block;
mod config;
mod error;
mod inline;
mod parser;
mod render;

pub use block::{Block, Document, Inline, ListItem, Mark, TableCell, TableRow};
pub use config::{CodeConfig, Config, HeadingsConfig, LinksConfig};
pub use error::{ConfigError, ConvertError};
pub use inline::tokenize;
pub use render::{render_block, render_inlines};

use serde_json::Value;

/// Parse markdown text into a document using the bundled config.
pub fn parse(markdown: &str) -> Document {
    parse_with_config(markdown, &Config::compiled_default())
}

/// Parse markdown text into a document with custom config.
pub fn parse_with_config(markdown: &str, config: &Config) -> Document {
    let doc = parser::parse(markdown, config);
    tracing::debug!(
        input_len = markdown.len(),
        blocks = doc.blocks().len(),
        "parsed markdown"
    );
    doc
}

/// Parse possibly absent markdown; `None` gives the empty document.
pub fn parse_optional(markdown: Option<&str>, config: &Config) -> Document {
    parse_with_config(markdown.unwrap_or_default(), config)
}

/// Render a document back to markdown text.
pub fn render(doc: &Document) -> String {
    render::render_document(doc)
}

/// Convert a field value to ADF JSON using the bundled config.
pub fn markdown_to_adf(markdown: Option<&str>) -> Value {
    markdown_to_adf_with_config(markdown, &Config::compiled_default())
}

/// Convert a field value to ADF JSON with custom config.
pub fn markdown_to_adf_with_config(markdown: Option<&str>, config: &Config) -> Value {
    adf::to_value(&parse_optional(markdown, config))
}

/// Render an ADF value from Jira as markdown. Absent or `null` gives `""`.
pub fn adf_to_markdown(value: Option<&Value>) -> String {
    match value {
        Some(value) if !value.is_null() => render(&adf::from_value(value)),
        _ => String::new(),
    }
}

/// Render serialized ADF JSON as markdown.
pub fn adf_json_to_markdown(json: &str) -> Result<String, ConvertError> {
    let value: Value = serde_json::from_str(json)?;
    Ok(adf_to_markdown(Some(&value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn absent_markdown_is_empty_doc() {
        assert_eq!(
            markdown_to_adf(None),
            json!({
                "type": "doc",
                "version": 1,
                "content": [{ "type": "paragraph", "content": [] }],
            })
        );
        assert_eq!(markdown_to_adf(Some("")), markdown_to_adf(None));
    }

    #[test]
    fn absent_adf_is_empty_string() {
        assert_eq!(adf_to_markdown(None), "");
        assert_eq!(adf_to_markdown(Some(&Value::Null)), "");
    }

    #[test]
    fn adf_json_text() {
        let json = r#"{"type":"doc","version":1,"content":[{"type":"rule"}]}"#;
        assert_eq!(adf_json_to_markdown(json).unwrap(), "---");
        assert!(matches!(adf_json_to_markdown("{"), Err(ConvertError::Json(_))));
    }

    #[test]
    fn markdown_round_trip_through_adf() {
        let markdown = "# Title\n\n- a\n- b\n\n```sh\nls\n```";
        let value = markdown_to_adf(Some(markdown));
        assert_eq!(adf_to_markdown(Some(&value)), markdown);
    }
}
