//! Conversion of article bodies into CMS rich-text blocks

use serde::{Deserialize, Serialize};
use std::fmt;

/// Heading depth of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
    H4,
}

impl HeadingLevel {
    /// Rich-text style name of this level
    pub fn style(&self) -> &'static str {
        match self {
            HeadingLevel::H1 => "h1",
            HeadingLevel::H2 => "h2",
            HeadingLevel::H3 => "h3",
            HeadingLevel::H4 => "h4",
        }
    }
}

impl From<HeadingLevel> for u8 {
    fn from(level: HeadingLevel) -> u8 {
        match level {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
            HeadingLevel::H4 => 4,
        }
    }
}

impl TryFrom<u8> for HeadingLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(HeadingLevel::H1),
            2 => Ok(HeadingLevel::H2),
            3 => Ok(HeadingLevel::H3),
            4 => Ok(HeadingLevel::H4),
            other => Err(format!("heading level out of range: {}", other)),
        }
    }
}

/// One unit of body content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ContentBlock {
    Heading { level: HeadingLevel, text: String },
    Paragraph { text: String },
}

impl ContentBlock {
    pub fn text(&self) -> &str {
        match self {
            ContentBlock::Heading { text, .. } | ContentBlock::Paragraph { text } => text,
        }
    }

    pub fn style(&self) -> &'static str {
        match self {
            ContentBlock::Heading { level, .. } => level.style(),
            ContentBlock::Paragraph { .. } => "normal",
        }
    }

    /// Write the block back as a markdown paragraph
    pub fn to_markdown(&self) -> String {
        match self {
            ContentBlock::Heading { level, text } => {
                format!("{} {}", "#".repeat(u8::from(*level) as usize), text)
            }
            ContentBlock::Paragraph { text } => text.clone(),
        }
    }
}

impl fmt::Display for ContentBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.style(), self.text())
    }
}

// Longest marker first so "### x" never reads as a level 1 heading
const HEADING_MARKERS: [(&str, HeadingLevel); 3] = [
    ("### ", HeadingLevel::H3),
    ("## ", HeadingLevel::H2),
    ("# ", HeadingLevel::H1),
];

/// Convert a body made of blank-line separated paragraphs into blocks.
///
/// Inline markdown (emphasis, links, lists) is kept as literal text.
pub fn convert_content(content: &str) -> Vec<ContentBlock> {
    content
        .split("\n\n")
        .map(str::trim)
        .filter(|paragraph| !paragraph.is_empty())
        .map(classify_paragraph)
        .collect()
}

/// Classify a single trimmed paragraph
pub fn classify_paragraph(paragraph: &str) -> ContentBlock {
    for (marker, level) in HEADING_MARKERS {
        if let Some(text) = paragraph.strip_prefix(marker) {
            return ContentBlock::Heading {
                level,
                text: text.to_string(),
            };
        }
    }

    ContentBlock::Paragraph {
        text: paragraph.to_string(),
    }
}

/// Join blocks back into blank-line separated markdown
pub fn blocks_to_markdown(blocks: &[ContentBlock]) -> String {
    blocks
        .iter()
        .map(ContentBlock::to_markdown)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// A text run inside a rich-text block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    #[serde(rename = "_type")]
    pub kind: String,
    #[serde(rename = "_key")]
    pub key: String,
    pub text: String,
    #[serde(default)]
    pub marks: Vec<String>,
}

/// A block in the CMS rich-text format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortableTextBlock {
    #[serde(rename = "_type")]
    pub kind: String,
    #[serde(rename = "_key")]
    pub key: String,
    pub style: String,
    #[serde(rename = "markDefs", default)]
    pub mark_defs: Vec<serde_json::Value>,
    pub children: Vec<Span>,
}

impl PortableTextBlock {
    /// Build the CMS form of a block; keys only need to be unique per array
    pub fn from_block(index: usize, block: &ContentBlock) -> Self {
        let key = format!("b{}", index);
        Self {
            kind: "block".to_string(),
            style: block.style().to_string(),
            mark_defs: Vec::new(),
            children: vec![Span {
                kind: "span".to_string(),
                key: format!("{}s0", key),
                text: block.text().to_string(),
                marks: Vec::new(),
            }],
            key,
        }
    }
}

/// Convert blocks into the CMS rich-text representation
pub fn to_portable_text(blocks: &[ContentBlock]) -> Vec<PortableTextBlock> {
    blocks
        .iter()
        .enumerate()
        .map(|(i, block)| PortableTextBlock::from_block(i, block))
        .collect()
}
