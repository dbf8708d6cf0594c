//! Upstream stages that turn PDF files into a [`TopicTree`](crate::ir::TopicTree):
//! text extraction with a fallback chain, then heading and sentence heuristics.

pub mod extract;
pub mod outline;

pub use extract::{DocumentText, PageText, extract_text, extract_text_from_bytes, validate_pdf};
pub use outline::{OutlineRules, Section, generate_hierarchy, generate_hierarchy_with};

use crate::error::Result;
use crate::ir::TopicTree;
use std::path::Path;

/// Extract every input in order and build one hierarchy from all of them.
pub fn analyze_files<P: AsRef<Path>>(paths: &[P]) -> Result<TopicTree> {
    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), "extracting text");
        let text = extract_text(path)?;
        documents.push(DocumentText {
            path: path.to_path_buf(),
            text,
        });
    }
    Ok(generate_hierarchy(&documents))
}
