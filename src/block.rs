/// Formatting attribute carried by a text run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mark {
    Strong,
    Emphasis,
    Strike,
    Code,
    Link { href: String },
    /// A mark this crate does not interpret, kept so it survives re-encoding
    Other(String),
}

/// Inline content of a paragraph, heading or list item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text { value: String, marks: Vec<Mark> },
    HardBreak,
    Mention { id: String, label: Option<String> },
    InlineCard { url: String },
    Emoji { short_name: String },
    /// Unrecognized inline node received from the backend
    Other { node_type: String },
}

impl Inline {
    /// Unmarked text run.
    pub fn text(value: impl Into<String>) -> Self {
        Inline::Text {
            value: value.into(),
            marks: Vec::new(),
        }
    }

    /// Text run carrying the given marks.
    pub fn marked(value: impl Into<String>, marks: Vec<Mark>) -> Self {
        Inline::Text {
            value: value.into(),
            marks,
        }
    }
}

/// A single list item; always one paragraph worth of inline content
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListItem {
    pub content: Vec<Inline>,
}

/// One table cell. Header cells are only distinguished on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableCell {
    pub header: bool,
    pub content: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

/// Block-level nodes of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading {
        level: u8,
        content: Vec<Inline>,
    },
    Paragraph {
        content: Vec<Inline>,
    },
    BulletList {
        items: Vec<ListItem>,
    },
    OrderedList {
        items: Vec<ListItem>,
    },
    /// Quote holding paragraphs only when built from markdown
    Blockquote {
        content: Vec<Block>,
    },
    CodeBlock {
        language: Option<String>,
        text: Option<String>,
    },
    Rule,
    Table {
        rows: Vec<TableRow>,
    },
    /// Unrecognized block node received from the backend
    Other {
        node_type: String,
        content: Vec<Block>,
    },
}

impl Block {
    pub fn paragraph(content: Vec<Inline>) -> Self {
        Block::Paragraph { content }
    }

    /// Heading with the level clamped into 1..=6.
    pub fn heading(level: u8, content: Vec<Inline>) -> Self {
        Block::Heading {
            level: level.clamp(1, 6),
            content,
        }
    }

    /// Inline content reachable from this block without rendering structure.
    ///
    /// Lists and tables contribute nothing; quotes and unknown nodes
    /// concatenate their children.
    pub fn inline_content(&self) -> Vec<Inline> {
        match self {
            Block::Heading { content, .. } | Block::Paragraph { content } => content.clone(),
            Block::Blockquote { content } | Block::Other { content, .. } => {
                content.iter().flat_map(Block::inline_content).collect()
            }
            Block::CodeBlock { text, .. } => text.iter().map(|t| Inline::text(t.as_str())).collect(),
            Block::BulletList { .. } | Block::OrderedList { .. } | Block::Rule | Block::Table { .. } => {
                Vec::new()
            }
        }
    }
}

/// Root of a rich document; never empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    /// Wrap blocks into a document, substituting a single empty paragraph
    /// when there are none.
    pub fn new(blocks: Vec<Block>) -> Self {
        if blocks.is_empty() {
            return Self::empty();
        }
        Self { blocks }
    }

    /// Document holding one empty paragraph.
    pub fn empty() -> Self {
        Self {
            blocks: vec![Block::paragraph(Vec::new())],
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::empty()
    }
}
