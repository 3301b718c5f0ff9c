//! Atlassian document format (ADF) codec.
//!
//! Encoding writes the node shapes the Jira REST API accepts. Decoding is
//! lenient: documents come from the backend and are only trusted
//! structurally, so every missing or mistyped field degrades to empty
//! content instead of failing.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value};

use crate::block::{Block, Document, Inline, ListItem, Mark, TableCell, TableRow};

pub const ADF_VERSION: u64 = 1;

/// Inline node types that may appear directly in block content.
const INLINE_TYPES: &[&str] = &[
    "text",
    "hardBreak",
    "mention",
    "inlineCard",
    "emoji",
    "status",
    "date",
    "placeholder",
    "mediaInline",
    "inlineExtension",
];

// Encoding

/// Encode a document as an ADF `doc` node.
pub fn to_value(doc: &Document) -> Value {
    json!({
        "type": "doc",
        "version": ADF_VERSION,
        "content": blocks_to_value(doc.blocks()),
    })
}

fn blocks_to_value(blocks: &[Block]) -> Vec<Value> {
    blocks.iter().map(block_to_value).collect()
}

fn block_to_value(block: &Block) -> Value {
    match block {
        Block::Heading { level, content } => json!({
            "type": "heading",
            "attrs": { "level": level },
            "content": inlines_to_value(content),
        }),
        Block::Paragraph { content } => json!({
            "type": "paragraph",
            "content": inlines_to_value(content),
        }),
        Block::BulletList { items } => json!({
            "type": "bulletList",
            "content": items.iter().map(list_item_to_value).collect::<Vec<_>>(),
        }),
        Block::OrderedList { items } => json!({
            "type": "orderedList",
            "content": items.iter().map(list_item_to_value).collect::<Vec<_>>(),
        }),
        Block::Blockquote { content } => json!({
            "type": "blockquote",
            "content": blocks_to_value(content),
        }),
        Block::CodeBlock { language, text } => {
            let mut node = Map::new();
            node.insert("type".into(), json!("codeBlock"));
            if let Some(language) = language {
                node.insert("attrs".into(), json!({ "language": language }));
            }
            if let Some(text) = text {
                node.insert("content".into(), json!([{ "type": "text", "text": text }]));
            }
            Value::Object(node)
        }
        Block::Rule => json!({ "type": "rule" }),
        Block::Table { rows } => json!({
            "type": "table",
            "content": rows.iter().map(row_to_value).collect::<Vec<_>>(),
        }),
        Block::Other { node_type, content } => {
            let mut node = Map::new();
            node.insert("type".into(), json!(node_type));
            if !content.is_empty() {
                node.insert("content".into(), Value::Array(blocks_to_value(content)));
            }
            Value::Object(node)
        }
    }
}

fn list_item_to_value(item: &ListItem) -> Value {
    json!({
        "type": "listItem",
        "content": [{
            "type": "paragraph",
            "content": inlines_to_value(&item.content),
        }],
    })
}

fn row_to_value(row: &TableRow) -> Value {
    let cells: Vec<Value> = row
        .cells
        .iter()
        .map(|cell| {
            let kind = if cell.header { "tableHeader" } else { "tableCell" };
            json!({ "type": kind, "content": blocks_to_value(&cell.content) })
        })
        .collect();
    json!({ "type": "tableRow", "content": cells })
}

fn inlines_to_value(spans: &[Inline]) -> Vec<Value> {
    spans.iter().map(inline_to_value).collect()
}

fn inline_to_value(span: &Inline) -> Value {
    match span {
        Inline::Text { value, marks } => {
            let mut node = Map::new();
            node.insert("type".into(), json!("text"));
            node.insert("text".into(), json!(value));
            if !marks.is_empty() {
                let marks: Vec<Value> = marks.iter().map(mark_to_value).collect();
                node.insert("marks".into(), Value::Array(marks));
            }
            Value::Object(node)
        }
        Inline::HardBreak => json!({ "type": "hardBreak" }),
        Inline::Mention { id, label } => {
            let mut attrs = Map::new();
            attrs.insert("id".into(), json!(id));
            if let Some(label) = label {
                attrs.insert("text".into(), json!(label));
            }
            json!({ "type": "mention", "attrs": attrs })
        }
        Inline::InlineCard { url } => json!({ "type": "inlineCard", "attrs": { "url": url } }),
        Inline::Emoji { short_name } => {
            json!({ "type": "emoji", "attrs": { "shortName": short_name } })
        }
        Inline::Other { node_type } => json!({ "type": node_type }),
    }
}

fn mark_to_value(mark: &Mark) -> Value {
    match mark {
        Mark::Strong => json!({ "type": "strong" }),
        Mark::Emphasis => json!({ "type": "em" }),
        Mark::Strike => json!({ "type": "strike" }),
        Mark::Code => json!({ "type": "code" }),
        Mark::Link { href } => json!({ "type": "link", "attrs": { "href": href } }),
        Mark::Other(name) => json!({ "type": name }),
    }
}

// Decoding

/// Decode an ADF document. Never fails; `null` gives the empty document.
pub fn from_value(value: &Value) -> Document {
    if value.is_null() {
        return Document::empty();
    }
    Document::new(decode_blocks(children(value)))
}

fn node_type(node: &Value) -> &str {
    node.get("type").and_then(Value::as_str).unwrap_or_default()
}

fn children(node: &Value) -> &[Value] {
    node.get("content")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn attr_str(node: &Value, key: &str) -> Option<String> {
    node.get("attrs")
        .and_then(|attrs| attrs.get(key))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Decode block content, gathering stray inline nodes into paragraphs.
fn decode_blocks(nodes: &[Value]) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut stray = Vec::new();

    for node in nodes {
        if INLINE_TYPES.contains(&node_type(node)) {
            stray.push(decode_inline(node));
            continue;
        }
        if !stray.is_empty() {
            blocks.push(Block::paragraph(std::mem::take(&mut stray)));
        }
        blocks.push(decode_block(node));
    }

    if !stray.is_empty() {
        blocks.push(Block::paragraph(stray));
    }
    blocks
}

fn decode_block(node: &Value) -> Block {
    match node_type(node) {
        "heading" => {
            let level = node
                .get("attrs")
                .and_then(|attrs| attrs.get("level"))
                .and_then(Value::as_u64)
                .unwrap_or(1)
                .clamp(1, 6) as u8;
            Block::heading(level, decode_inlines(children(node)))
        }
        "paragraph" => Block::paragraph(decode_inlines(children(node))),
        kind @ ("bulletList" | "orderedList") => {
            let items: Vec<ListItem> = children(node).iter().map(decode_list_item).collect();
            if items.is_empty() {
                return Block::Other {
                    node_type: kind.to_string(),
                    content: Vec::new(),
                };
            }
            if kind == "bulletList" {
                Block::BulletList { items }
            } else {
                Block::OrderedList { items }
            }
        }
        "blockquote" => Block::Blockquote {
            content: decode_blocks(children(node)),
        },
        "codeBlock" => {
            let text: String = children(node)
                .iter()
                .filter_map(|child| child.get("text").and_then(Value::as_str))
                .collect();
            Block::CodeBlock {
                language: attr_str(node, "language").filter(|l| !l.is_empty()),
                text: if text.is_empty() { None } else { Some(text) },
            }
        }
        "rule" => Block::Rule,
        "table" => Block::Table {
            rows: children(node).iter().map(decode_row).collect(),
        },
        other => {
            tracing::debug!(node_type = other, "unrecognized block node");
            Block::Other {
                node_type: other.to_string(),
                content: decode_blocks(children(node)),
            }
        }
    }
}

/// A list item flattens to the inline content of everything inside it.
fn decode_list_item(node: &Value) -> ListItem {
    let mut content = Vec::new();
    for block in decode_blocks(children(node)) {
        let inline = flatten_inline(&block);
        if inline.is_empty() {
            continue;
        }
        if !content.is_empty() {
            content.push(Inline::text(" "));
        }
        content.extend(inline);
    }
    ListItem { content }
}

fn flatten_inline(block: &Block) -> Vec<Inline> {
    match block {
        Block::BulletList { items } | Block::OrderedList { items } => {
            let mut content = Vec::new();
            for item in items.iter().filter(|item| !item.content.is_empty()) {
                if !content.is_empty() {
                    content.push(Inline::text(" "));
                }
                content.extend(item.content.iter().cloned());
            }
            content
        }
        other => other.inline_content(),
    }
}

fn decode_row(node: &Value) -> TableRow {
    TableRow {
        cells: children(node)
            .iter()
            .map(|cell| TableCell {
                header: node_type(cell) == "tableHeader",
                content: decode_blocks(children(cell)),
            })
            .collect(),
    }
}

fn decode_inlines(nodes: &[Value]) -> Vec<Inline> {
    nodes.iter().map(decode_inline).collect()
}

fn decode_inline(node: &Value) -> Inline {
    match node_type(node) {
        "text" => Inline::Text {
            value: node
                .get("text")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            marks: node
                .get("marks")
                .and_then(Value::as_array)
                .map(|marks| marks.iter().map(decode_mark).collect())
                .unwrap_or_default(),
        },
        "hardBreak" => Inline::HardBreak,
        "mention" => Inline::Mention {
            id: attr_str(node, "id").unwrap_or_default(),
            label: attr_str(node, "text"),
        },
        "inlineCard" => Inline::InlineCard {
            url: attr_str(node, "url").unwrap_or_default(),
        },
        "emoji" => Inline::Emoji {
            short_name: attr_str(node, "shortName")
                .or_else(|| attr_str(node, "text"))
                .unwrap_or_default(),
        },
        other => Inline::Other {
            node_type: other.to_string(),
        },
    }
}

fn decode_mark(mark: &Value) -> Mark {
    match node_type(mark) {
        "strong" => Mark::Strong,
        "em" => Mark::Emphasis,
        "strike" => Mark::Strike,
        "code" => Mark::Code,
        "link" => Mark::Link {
            href: attr_str(mark, "href").unwrap_or_default(),
        },
        other => Mark::Other(other.to_string()),
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        to_value(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(from_value(&value))
    }
}
