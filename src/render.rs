use crate::block::{Block, Document, Inline, ListItem, Mark, TableRow};

/// Convert a document to markdown text, blocks separated by a blank line
pub fn render_document(doc: &Document) -> String {
    let rendered: Vec<String> = doc
        .blocks()
        .iter()
        .map(render_block)
        .filter(|text| !text.is_empty())
        .collect();
    rendered.join("\n\n")
}

/// Markdown for a single block, without trailing newline
pub fn render_block(block: &Block) -> String {
    let mut out = String::new();
    emit_block(block, &mut out);
    out
}

fn emit_block(block: &Block, out: &mut String) {
    match block {
        Block::Heading { level, content } => {
            for _ in 0..(*level).clamp(1, 6) {
                out.push('#');
            }
            out.push(' ');
            spans_to_markdown(content, out);
        }
        Block::Paragraph { content } => {
            spans_to_markdown(content, out);
        }
        Block::BulletList { items } => {
            list_to_markdown(items, |_| "-".to_string(), out);
        }
        Block::OrderedList { items } => {
            list_to_markdown(items, |position| format!("{}.", position), out);
        }
        Block::Blockquote { content } => {
            let quoted: Vec<String> = content
                .iter()
                .map(render_block)
                .filter(|text| !text.is_empty())
                .flat_map(|text| {
                    text.lines()
                        .map(|line| format!("> {line}"))
                        .collect::<Vec<_>>()
                })
                .collect();
            out.push_str(&quoted.join("\n"));
        }
        Block::CodeBlock { language, text } => {
            out.push_str("```");
            if let Some(lang) = language {
                out.push_str(lang);
            }
            out.push('\n');
            if let Some(text) = text {
                out.push_str(text);
                out.push('\n');
            }
            out.push_str("```");
        }
        Block::Rule => {
            out.push_str("---");
        }
        Block::Table { rows } => {
            table_to_markdown(rows, out);
        }
        Block::Other { node_type, content } => {
            tracing::trace!(node_type = node_type.as_str(), "rendering unknown block by content");
            let parts: Vec<String> = content
                .iter()
                .map(render_block)
                .filter(|text| !text.is_empty())
                .collect();
            out.push_str(&parts.join("\n"));
        }
    }
}

fn list_to_markdown(items: &[ListItem], marker: impl Fn(usize) -> String, out: &mut String) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&marker(i + 1));
        out.push(' ');
        spans_to_markdown(&item.content, out);
    }
}

fn table_to_markdown(rows: &[TableRow], out: &mut String) {
    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let cells: Vec<String> = row
            .cells
            .iter()
            .map(|cell| {
                let parts: Vec<String> = cell.content.iter().map(render_block).collect();
                parts.join(" ")
            })
            .collect();
        out.push_str("| ");
        out.push_str(&cells.join(" | "));
        out.push_str(" |");
    }
}

/// Render inline content back to markdown text
pub fn render_inlines(spans: &[Inline]) -> String {
    let mut out = String::new();
    spans_to_markdown(spans, &mut out);
    out
}

fn spans_to_markdown(spans: &[Inline], out: &mut String) {
    for span in spans {
        span_to_markdown(span, out);
    }
}

fn span_to_markdown(span: &Inline, out: &mut String) {
    match span {
        Inline::Text { value, marks } => {
            out.push_str(&apply_marks(value, marks));
        }
        Inline::HardBreak => out.push('\n'),
        Inline::Mention { id, label } => {
            out.push('@');
            match label.as_deref().filter(|l| !l.is_empty()) {
                Some(label) => out.push_str(label.strip_prefix('@').unwrap_or(label)),
                None => out.push_str(id),
            }
        }
        Inline::InlineCard { url } => out.push_str(url),
        Inline::Emoji { short_name } => out.push_str(short_name),
        Inline::Other { .. } => {}
    }
}

/// Wrap a run in its delimiters, innermost first: strong, emphasis,
/// strike, code, link.
fn apply_marks(value: &str, marks: &[Mark]) -> String {
    let mut text = value.to_string();

    if marks.contains(&Mark::Strong) {
        text = format!("**{text}**");
    }
    if marks.contains(&Mark::Emphasis) {
        text = format!("*{text}*");
    }
    if marks.contains(&Mark::Strike) {
        text = format!("~~{text}~~");
    }
    if marks.contains(&Mark::Code) {
        text = format!("`{text}`");
    }
    if let Some(href) = marks.iter().find_map(|mark| match mark {
        Mark::Link { href } => Some(href),
        _ => None,
    }) {
        text = format!("[{text}]({href})");
    }

    text
}
