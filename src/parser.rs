use once_cell::sync::Lazy;
use regex::Regex;
use std::str::Lines;

use crate::block::{Block, Document, ListItem};
use crate::config::Config;
use crate::inline::tokenize;

static LEGACY_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^h([1-6])\.\s+(.*)$").unwrap());
static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,6})\s+(.*)$").unwrap());
static ORDERED_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s+(.*)$").unwrap());
static FENCE_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^```\s*([^\s`]+)?\s*$").unwrap());

const FENCE: &str = "```";

/// Classification of one trimmed, non-blank source line
#[derive(Debug, PartialEq, Eq)]
enum LineKind<'a> {
    Heading(u8, &'a str),
    BulletItem(&'a str),
    OrderedItem(&'a str),
    Quote(&'a str),
    Rule,
    FenceOpen(&'a str),
    Text(&'a str),
}

/// Parse markdown text into a document
pub fn parse(markdown: &str, config: &Config) -> Document {
    let mut blocks = Vec::new();
    let mut lines = markdown.lines();

    while let Some(line) = lines.next() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match classify(trimmed, config) {
            LineKind::Heading(level, rest) => {
                blocks.push(Block::heading(level, tokenize(rest, config)));
            }
            LineKind::BulletItem(rest) => {
                append_list_item(&mut blocks, false, list_item(rest, config));
            }
            LineKind::OrderedItem(rest) => {
                append_list_item(&mut blocks, true, list_item(rest, config));
            }
            LineKind::Quote(rest) => {
                append_quote_line(&mut blocks, Block::paragraph(tokenize(rest, config)));
            }
            LineKind::Rule => blocks.push(Block::Rule),
            LineKind::FenceOpen(tag) => {
                blocks.push(capture_fence(tag, &mut lines, config));
            }
            LineKind::Text(text) => {
                blocks.push(Block::paragraph(tokenize(text, config)));
            }
        }
    }

    tracing::trace!(blocks = blocks.len(), "built blocks");
    Document::new(blocks)
}

/// First match wins; the order matters where patterns overlap.
fn classify<'a>(line: &'a str, config: &Config) -> LineKind<'a> {
    if config.headings.legacy_syntax {
        if let Some(caps) = LEGACY_HEADING.captures(line) {
            let level = caps[1].parse().unwrap_or(1);
            let rest = caps.get(2).map_or("", |m| m.as_str());
            return LineKind::Heading(level, rest.trim());
        }
    }
    if let Some(caps) = HEADING.captures(line) {
        let level = caps[1].len() as u8;
        let rest = caps.get(2).map_or("", |m| m.as_str());
        return LineKind::Heading(level, rest.trim());
    }
    if let Some(rest) = line.strip_prefix("* ").or_else(|| line.strip_prefix("- ")) {
        return LineKind::BulletItem(rest.trim());
    }
    if let Some(caps) = ORDERED_ITEM.captures(line) {
        let rest = caps.get(1).map_or("", |m| m.as_str());
        return LineKind::OrderedItem(rest.trim());
    }
    if let Some(rest) = line.strip_prefix("> ") {
        return LineKind::Quote(rest.trim());
    }
    if line == "---" || line == "----" {
        return LineKind::Rule;
    }
    // Only a bare fence or one language token opens a block
    if let Some(caps) = FENCE_OPEN.captures(line) {
        return LineKind::FenceOpen(caps.get(1).map_or("", |m| m.as_str()));
    }
    LineKind::Text(line)
}

fn list_item(text: &str, config: &Config) -> ListItem {
    ListItem {
        content: tokenize(text, config),
    }
}

/// Extend the previous block if it is a list of the same kind, otherwise
/// start a new list.
fn append_list_item(blocks: &mut Vec<Block>, ordered: bool, item: ListItem) {
    match blocks.last_mut() {
        Some(Block::BulletList { items }) if !ordered => {
            items.push(item);
            return;
        }
        Some(Block::OrderedList { items }) if ordered => {
            items.push(item);
            return;
        }
        _ => {}
    }

    let items = vec![item];
    blocks.push(if ordered {
        Block::OrderedList { items }
    } else {
        Block::BulletList { items }
    });
}

fn append_quote_line(blocks: &mut Vec<Block>, paragraph: Block) {
    if let Some(Block::Blockquote { content }) = blocks.last_mut() {
        content.push(paragraph);
    } else {
        blocks.push(Block::Blockquote {
            content: vec![paragraph],
        });
    }
}

/// Consume raw lines up to a closing fence or end of input.
fn capture_fence(tag: &str, lines: &mut Lines<'_>, config: &Config) -> Block {
    let mut body = Vec::new();
    let mut closed = false;

    for line in lines.by_ref() {
        if line.trim() == FENCE {
            closed = true;
            break;
        }
        body.push(line);
    }

    if !closed {
        tracing::debug!(lines = body.len(), "unterminated code fence, captured to end of input");
    }

    let text = body.join("\n");
    Block::CodeBlock {
        language: config.code.accept_language(tag),
        text: if text.is_empty() { None } else { Some(text) },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{Inline, Mark};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn blocks(markdown: &str) -> Vec<Block> {
        parse(markdown, &Config::default()).into_blocks()
    }

    fn item(text: &str) -> ListItem {
        ListItem {
            content: vec![Inline::text(text)],
        }
    }

    #[rstest]
    #[case("# Title", 1)]
    #[case("### Title", 3)]
    #[case("###### Title", 6)]
    #[case("h1. Title", 1)]
    #[case("h4. Title", 4)]
    fn headings(#[case] line: &str, #[case] level: u8) {
        assert_eq!(
            blocks(line),
            vec![Block::Heading {
                level,
                content: vec![Inline::text("Title")]
            }]
        );
    }

    #[rstest]
    #[case("####### Title")]
    #[case("#Title")]
    #[case("h7. Title")]
    fn not_headings(#[case] line: &str) {
        assert_eq!(blocks(line), vec![Block::paragraph(vec![Inline::text(line)])]);
    }

    #[test]
    fn legacy_headings_can_be_disabled() {
        let mut config = Config::default();
        config.headings.legacy_syntax = false;
        assert_eq!(
            parse("h2. Title", &config).into_blocks(),
            vec![Block::paragraph(vec![Inline::text("h2. Title")])]
        );
    }

    #[test]
    fn heading_content_is_tokenized() {
        assert_eq!(
            blocks("## A **big** deal"),
            vec![Block::Heading {
                level: 2,
                content: vec![
                    Inline::text("A "),
                    Inline::marked("big", vec![Mark::Strong]),
                    Inline::text(" deal"),
                ]
            }]
        );
    }

    #[test]
    fn bullet_run_merges() {
        assert_eq!(
            blocks("- a\n* b"),
            vec![Block::BulletList {
                items: vec![item("a"), item("b")]
            }]
        );
    }

    #[test]
    fn list_kinds_never_merge() {
        assert_eq!(
            blocks("- a\n1. b"),
            vec![
                Block::BulletList { items: vec![item("a")] },
                Block::OrderedList { items: vec![item("b")] },
            ]
        );
    }

    #[test]
    fn ordered_numbers_are_discarded() {
        assert_eq!(
            blocks("7. a\n3. b"),
            vec![Block::OrderedList {
                items: vec![item("a"), item("b")]
            }]
        );
    }

    #[test]
    fn blank_line_does_not_break_list_run() {
        assert_eq!(
            blocks("- a\n\n- b"),
            vec![Block::BulletList {
                items: vec![item("a"), item("b")]
            }]
        );
    }

    #[test]
    fn paragraph_breaks_list_run() {
        assert_eq!(
            blocks("- a\ntext\n- b"),
            vec![
                Block::BulletList { items: vec![item("a")] },
                Block::paragraph(vec![Inline::text("text")]),
                Block::BulletList { items: vec![item("b")] },
            ]
        );
    }

    #[test]
    fn quote_lines_accumulate() {
        assert_eq!(
            blocks("> one\n> two"),
            vec![Block::Blockquote {
                content: vec![
                    Block::paragraph(vec![Inline::text("one")]),
                    Block::paragraph(vec![Inline::text("two")]),
                ]
            }]
        );
    }

    #[test]
    fn rules_stand_alone() {
        assert_eq!(blocks("---\n----"), vec![Block::Rule, Block::Rule]);
        assert_eq!(
            blocks("-----"),
            vec![Block::paragraph(vec![Inline::text("-----")])]
        );
    }

    #[test]
    fn fenced_code_with_language() {
        assert_eq!(
            blocks("```js\nx=1\n```"),
            vec![Block::CodeBlock {
                language: Some("js".to_string()),
                text: Some("x=1".to_string()),
            }]
        );
    }

    #[test]
    fn fence_body_is_verbatim() {
        assert_eq!(
            blocks("```\n  - not a list\n\n# nor a heading\n```\nafter"),
            vec![
                Block::CodeBlock {
                    language: None,
                    text: Some("  - not a list\n\n# nor a heading".to_string()),
                },
                Block::paragraph(vec![Inline::text("after")]),
            ]
        );
    }

    #[test]
    fn unterminated_fence_runs_to_end() {
        assert_eq!(
            blocks("```\nunterminated"),
            vec![Block::CodeBlock {
                language: None,
                text: Some("unterminated".to_string()),
            }]
        );
    }

    #[test]
    fn empty_fence_omits_text() {
        assert_eq!(
            blocks("```rust\n```"),
            vec![Block::CodeBlock {
                language: Some("rust".to_string()),
                text: None,
            }]
        );
    }

    #[test]
    fn fence_language_whitelist() {
        let mut config = Config::default();
        config.code.languages = vec!["rust".to_string()];
        assert_eq!(
            parse("```cobol\nMOVE\n```", &config).into_blocks(),
            vec![Block::CodeBlock {
                language: None,
                text: Some("MOVE".to_string()),
            }]
        );
    }

    #[rstest]
    #[case("")]
    #[case("   \n\t\n")]
    fn blank_input_is_one_empty_paragraph(#[case] markdown: &str) {
        assert_eq!(blocks(markdown), vec![Block::paragraph(vec![])]);
    }

    #[test]
    fn lines_are_trimmed_before_classification() {
        assert_eq!(
            blocks("   - a   "),
            vec![Block::BulletList { items: vec![item("a")] }]
        );
    }

    #[test]
    fn classify_priority() {
        let config = Config::default();
        assert_eq!(classify("# - x", &config), LineKind::Heading(1, "- x"));
        assert_eq!(classify("- 1. x", &config), LineKind::BulletItem("1. x"));
        assert_eq!(classify("1. > x", &config), LineKind::OrderedItem("> x"));
        assert_eq!(classify("```", &config), LineKind::FenceOpen(""));
        assert_eq!(classify("**bold**", &config), LineKind::Text("**bold**"));
    }

    #[rstest]
    #[case("```js", LineKind::FenceOpen("js"))]
    #[case("```  sh  ", LineKind::FenceOpen("sh"))]
    #[case("```make install```", LineKind::Text("```make install```"))]
    #[case("```two words", LineKind::Text("```two words"))]
    #[case("````", LineKind::Text("````"))]
    fn fence_open_needs_single_tag(#[case] line: &str, #[case] kind: LineKind<'static>) {
        assert_eq!(classify(line, &Config::default()), kind);
    }

    #[test]
    fn one_line_triple_backtick_span_is_a_paragraph() {
        assert_eq!(
            blocks("```make install```\nnext\n# Heading"),
            vec![
                Block::paragraph(vec![
                    Inline::text("``"),
                    Inline::marked("make install", vec![Mark::Code]),
                    Inline::text("``"),
                ]),
                Block::paragraph(vec![Inline::text("next")]),
                Block::heading(1, vec![Inline::text("Heading")]),
            ]
        );
    }

    #[test]
    fn blank_line_does_not_break_ordered_run() {
        assert_eq!(
            blocks("1. a\n\n2. b"),
            vec![Block::OrderedList {
                items: vec![item("a"), item("b")]
            }]
        );
    }

    #[test]
    fn blank_line_does_not_break_quote_run() {
        assert_eq!(
            blocks("> a\n\n> b"),
            vec![Block::Blockquote {
                content: vec![
                    Block::paragraph(vec![Inline::text("a")]),
                    Block::paragraph(vec![Inline::text("b")]),
                ]
            }]
        );
    }

    #[test]
    fn indented_closing_fence_closes() {
        assert_eq!(
            blocks("```\ncode\n   ```  \nafter"),
            vec![
                Block::CodeBlock {
                    language: None,
                    text: Some("code".to_string()),
                },
                Block::paragraph(vec![Inline::text("after")]),
            ]
        );
    }
}
