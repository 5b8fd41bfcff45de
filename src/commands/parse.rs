//! Parse a saved completion without calling the model

use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::fs;
use std::io::Read;
use std::path::Path;

use crate::content::{convert_content, extract_article, to_portable_text};

/// Parsed article and its blocks as JSON
pub fn parse_completion(text: &str, cms_blocks: bool) -> Value {
    let article = extract_article(text);
    let blocks = convert_content(&article.content);

    let mut output = json!({
        "article": article,
        "blocks": blocks,
    });
    if cms_blocks {
        output["body"] = json!(to_portable_text(&blocks));
    }
    output
}

/// Read a completion from a file, or stdin when no path is given
pub fn run(input: Option<&Path>, cms_blocks: bool) -> Result<()> {
    let text = match input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {:?}", path))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    let output = parse_completion(&text, cms_blocks);
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_completion() {
        let text = "META_DESCRIPTION: Hello world\n\nSLUG: hello-world\n\nCONTENT:\n# Title\n\nBody text.";
        let output = parse_completion(text, false);
        assert_eq!(output["article"]["metaDescription"], "Hello world");
        assert_eq!(output["blocks"][0]["kind"], "heading");
        assert_eq!(output["blocks"][0]["level"], 1);
        assert_eq!(output["blocks"][1]["text"], "Body text.");
        assert!(output.get("body").is_none());

        let output = parse_completion(text, true);
        assert_eq!(output["body"][0]["style"], "h1");
    }

    #[test]
    fn test_run_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.txt");
        assert!(run(Some(missing.as_path()), false).is_err());
    }
}
