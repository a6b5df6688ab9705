//! PDF text extraction

use std::path::Path;

use lopdf::Document;
use tracing::debug;

use crate::Result;

/// Extract the text of every page, in page order.
pub fn extract_pages(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let doc = Document::load(path.as_ref())?;

    // get_pages is keyed by page number, so iteration is already in order
    let mut pages = Vec::new();
    for page_number in doc.get_pages().into_keys() {
        pages.push(doc.extract_text(&[page_number])?);
    }

    debug!(pages = pages.len(), path = %path.as_ref().display(), "pdf text extracted");
    Ok(pages)
}

/// Extract the whole document text, pages joined with `\n`.
pub fn extract_text(path: impl AsRef<Path>) -> Result<String> {
    Ok(extract_pages(path)?.join("\n"))
}

/// A titled run of document lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub body: String,
}

/// Group page lines under upper-case headings.
///
/// A line counts as a heading when it has at least one cased character, no
/// lower-case ones, and more than four characters once trimmed. Text before the
/// first heading lands in an `Introduction` section. A heading seen twice starts
/// over: only its last body is kept, at the position of its first occurrence.
pub fn split_sections<S: AsRef<str>>(pages: &[S]) -> Vec<Section> {
    let mut sections = vec![Section {
        title: "Introduction".to_string(),
        body: String::new(),
    }];
    let mut current = 0;

    for line in pages.iter().flat_map(|p| p.as_ref().split('\n')) {
        if is_heading(line) {
            let title = line.trim().to_string();
            current = match sections.iter().position(|s| s.title == title) {
                Some(i) => {
                    sections[i].body.clear();
                    i
                }
                None => {
                    sections.push(Section {
                        title,
                        body: String::new(),
                    });
                    sections.len() - 1
                }
            };
        } else {
            sections[current].body.push_str(line);
            sections[current].body.push('\n');
        }
    }
    sections
}

fn is_heading(line: &str) -> bool {
    let has_upper = line.chars().any(char::is_uppercase);
    let has_lower = line.chars().any(char::is_lowercase);
    has_upper && !has_lower && line.trim().chars().count() > 4
}
