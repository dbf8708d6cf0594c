use crate::error::{Error, Result};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Below this many non-whitespace characters a page (or a whole pass) counts as a miss.
const MIN_MEANINGFUL_CHARS: usize = 50;
const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageText {
    pub pages: Vec<(usize, String)>,
}

impl PageText {
    pub fn single(text: impl Into<String>) -> Self {
        Self {
            pages: vec![(0, text.into())],
        }
    }

    pub fn from_pages<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pages: pages
                .into_iter()
                .enumerate()
                .map(|(idx, text)| (idx, text.into()))
                .collect(),
        }
    }

    /// All pages joined with newlines, in page order.
    pub fn joined(&self) -> String {
        let mut pages: Vec<&(usize, String)> = self.pages.iter().collect();
        pages.sort_by_key(|(idx, _)| *idx);
        pages
            .iter()
            .map(|(_, text)| text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn meaningful_chars(&self) -> usize {
        self.pages.iter().map(|(_, text)| meaningful_chars(text)).sum()
    }

    fn has_sparse_page(&self) -> bool {
        self.pages
            .iter()
            .any(|(_, text)| meaningful_chars(text) < MIN_MEANINGFUL_CHARS)
    }
}

fn meaningful_chars(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}

/// Text of one input document, tagged with where it came from.
#[derive(Debug, Clone)]
pub struct DocumentText {
    pub path: PathBuf,
    pub text: PageText,
}

impl DocumentText {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// `.pdf` extension (any case) and a `%PDF-` header.
pub fn validate_pdf(path: &Path) -> bool {
    let has_pdf_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);
    if !has_pdf_extension {
        return false;
    }
    let Ok(mut file) = std::fs::File::open(path) else {
        return false;
    };
    let mut header = [0u8; 5];
    file.read_exact(&mut header).is_ok() && header == PDF_MAGIC
}

pub fn extract_text(path: &Path) -> Result<PageText> {
    if !validate_pdf(path) {
        return Err(Error::NotPdf(path.to_path_buf()));
    }
    let bytes = std::fs::read(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(extract_text_from_bytes(&bytes))
}

/// Per-page extraction first, whole-document extraction split on form feeds second.
/// Never fails: when both passes come up empty the result is a single blank page.
pub fn extract_text_from_bytes(bytes: &[u8]) -> PageText {
    match guarded(|| pdf_extract::extract_text_from_mem_by_pages(bytes)) {
        Ok(pages) => {
            let mut text = PageText::from_pages(pages);
            let total = text.meaningful_chars();
            if total >= MIN_MEANINGFUL_CHARS && !text.has_sparse_page() {
                tracing::debug!(pages = text.pages.len(), "per-page extraction succeeded");
                return text;
            }
            tracing::info!(
                chars = total,
                "per-page extraction found little text; trying whole-document pass"
            );
            let Some(fallback) = whole_document_pass(bytes) else {
                return text;
            };
            if total < MIN_MEANINGFUL_CHARS {
                return if fallback.meaningful_chars() > total { fallback } else { text };
            }
            let filled = fill_sparse_pages(&mut text, &fallback);
            tracing::debug!(filled, "refilled sparse pages from whole-document pass");
            text
        }
        Err(err) => {
            tracing::warn!(error = %err, "per-page extraction failed; trying whole-document pass");
            whole_document_pass(bytes).unwrap_or_else(|| PageText::single(""))
        }
    }
}

fn whole_document_pass(bytes: &[u8]) -> Option<PageText> {
    match guarded(|| pdf_extract::extract_text_from_mem(bytes)) {
        Ok(text) => Some(split_form_feeds(&text)),
        Err(err) => {
            tracing::warn!(error = %err, "whole-document extraction failed");
            None
        }
    }
}

/// Runs one extractor, turning both its errors and its panics into a message.
fn guarded<T, E, F>(extract: F) -> std::result::Result<T, String>
where
    E: std::fmt::Display,
    F: FnOnce() -> std::result::Result<T, E> + std::panic::UnwindSafe,
{
    match std::panic::catch_unwind(extract) {
        Ok(result) => result.map_err(|err| err.to_string()),
        Err(_) => Err("extractor panicked on malformed input".to_string()),
    }
}

/// Replaces each sparse page of `primary` with the matching page of `fallback` when
/// the fallback has more text there. Passes that disagree on page count are not mixed.
fn fill_sparse_pages(primary: &mut PageText, fallback: &PageText) -> usize {
    if fallback.pages.len() < primary.pages.len() {
        return 0;
    }
    let mut filled = 0;
    for (idx, text) in primary.pages.iter_mut() {
        let have = meaningful_chars(text);
        if have >= MIN_MEANINGFUL_CHARS {
            continue;
        }
        let candidate = fallback.pages.iter().find(|(page, _)| *page == *idx);
        if let Some((_, candidate)) = candidate {
            if meaningful_chars(candidate) > have {
                *text = candidate.clone();
                filled += 1;
            }
        }
    }
    filled
}

fn split_form_feeds(text: &str) -> PageText {
    PageText::from_pages(text.split('\u{c}'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn form_feeds_separate_pages() {
        let text = split_form_feeds("first page\u{c}second page\u{c}");
        assert_eq!(text.pages.len(), 3);
        assert_eq!(text.pages[1], (1, "second page".to_string()));
        assert_eq!(text.joined(), "first page\nsecond page\n");
    }

    #[test]
    fn sparse_pages_are_refilled_from_the_fallback() {
        let rich = "This page came through the text layer with plenty of words on it.";
        let recovered = "The scanned page has a usable text layer in the second pass too.";
        let mut primary = PageText::from_pages([rich, "  ", rich]);
        let fallback = PageText::from_pages(["short", recovered, "", ""]);

        assert!(primary.has_sparse_page());
        assert_eq!(fill_sparse_pages(&mut primary, &fallback), 1);
        assert_eq!(primary.pages[0].1, rich);
        assert_eq!(primary.pages[1].1, recovered);
        assert_eq!(primary.pages[2].1, rich);
        assert!(!primary.has_sparse_page());
    }

    #[test]
    fn misaligned_fallback_is_not_mixed_in() {
        let rich = "This page came through the text layer with plenty of words on it.";
        let mut primary = PageText::from_pages([rich, ""]);
        let fallback = PageText::single(format!("{rich} {rich}"));
        assert_eq!(fill_sparse_pages(&mut primary, &fallback), 0);
        assert_eq!(primary.pages[1].1, "");
    }

    #[test]
    fn joined_follows_page_order() {
        let text = PageText {
            pages: vec![(1, "b".to_string()), (0, "a".to_string())],
        };
        assert_eq!(text.joined(), "a\nb");
    }

    #[test]
    fn garbage_bytes_yield_blank_text() {
        let text = extract_text_from_bytes(b"definitely not a pdf");
        assert_eq!(text.joined().trim(), "");
    }

    #[test]
    fn validation_checks_extension_and_magic() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("paper.PDF");
        std::fs::File::create(&good)
            .unwrap()
            .write_all(b"%PDF-1.7\n")
            .unwrap();
        assert!(validate_pdf(&good));

        let wrong_magic = dir.path().join("fake.pdf");
        std::fs::write(&wrong_magic, b"hello").unwrap();
        assert!(!validate_pdf(&wrong_magic));

        let wrong_ext = dir.path().join("paper.txt");
        std::fs::write(&wrong_ext, b"%PDF-1.7\n").unwrap();
        assert!(!validate_pdf(&wrong_ext));

        assert!(!validate_pdf(&dir.path().join("missing.pdf")));
    }

    #[test]
    fn extract_rejects_non_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"text").unwrap();
        assert!(matches!(extract_text(&path), Err(Error::NotPdf(_))));
    }

    #[test]
    fn file_name_strips_directories() {
        let doc = DocumentText {
            path: PathBuf::from("/tmp/reports/q3.pdf"),
            text: PageText::default(),
        };
        assert_eq!(doc.file_name(), "q3.pdf");
    }
}
