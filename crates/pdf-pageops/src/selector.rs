//! Page selection
//!
//! Turns a [`PageSpec`] into the zero-based page indices an operation acts
//! on. Results are always deduplicated, ascending and non-empty.

use std::collections::BTreeSet;
use std::fmt;

use crate::types::*;

/// Which pages of a document an operation targets
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PageSpec {
    /// Every page
    #[default]
    All,
    /// 1-based inclusive range, clamped to the document
    Range { start: i64, end: i64 },
    /// Comma separated list of pages and ranges, e.g. `"1,3,5-7"`
    Explicit(String),
    /// Odd or even pages
    Parity(Parity),
}

impl PageSpec {
    /// Parse user input: `all`, `odd`, `even` or an explicit list
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "" | "all" => PageSpec::All,
            "odd" => PageSpec::Parity(Parity::Odd),
            "even" => PageSpec::Parity(Parity::Even),
            _ => PageSpec::Explicit(trimmed.to_string()),
        }
    }

    /// Resolve against a document with `page_count` pages.
    ///
    /// Explicit tokens that are malformed or point past the last page are
    /// rejected with [`PageOpsError::InvalidPageSpecification`].
    pub fn resolve(&self, page_count: usize) -> Result<Vec<usize>> {
        self.resolve_with(page_count, true)
    }

    /// Like [`PageSpec::resolve`], but malformed explicit tokens are dropped
    /// and ranges running past the end are cut short. Fails only when
    /// nothing is left.
    pub fn resolve_lenient(&self, page_count: usize) -> Result<Vec<usize>> {
        self.resolve_with(page_count, false)
    }

    fn resolve_with(&self, page_count: usize, strict: bool) -> Result<Vec<usize>> {
        let pages: BTreeSet<usize> = match self {
            PageSpec::All => (0..page_count).collect(),
            PageSpec::Parity(Parity::Odd) => (0..page_count).step_by(2).collect(),
            PageSpec::Parity(Parity::Even) => (1..page_count).step_by(2).collect(),
            PageSpec::Range { start, end } => {
                let first = (*start).max(1);
                let last = (*end).min(page_count as i64);
                if first > last {
                    return Err(PageOpsError::EmptyRange {
                        start: *start,
                        end: *end,
                        page_count,
                    });
                }
                (first as usize - 1..last as usize).collect()
            }
            PageSpec::Explicit(text) => explicit_pages(text, page_count, strict)?,
        };

        if pages.is_empty() {
            return Err(PageOpsError::InvalidPageSpecification(format!(
                "'{self}' selects no pages of a {page_count}-page document"
            )));
        }
        Ok(pages.into_iter().collect())
    }
}

impl fmt::Display for PageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSpec::All => f.write_str("all"),
            PageSpec::Range { start, end } => write!(f, "{start}-{end}"),
            PageSpec::Explicit(text) => f.write_str(text),
            PageSpec::Parity(Parity::Odd) => f.write_str("odd"),
            PageSpec::Parity(Parity::Even) => f.write_str("even"),
        }
    }
}

fn explicit_pages(text: &str, page_count: usize, strict: bool) -> Result<BTreeSet<usize>> {
    let mut pages = BTreeSet::new();

    for token in text.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let Some((first, last)) = parse_token(token) else {
            if strict {
                return Err(PageOpsError::InvalidPageSpecification(format!(
                    "'{token}' is not a page number or range"
                )));
            }
            log::debug!("Dropping malformed page token '{token}'");
            continue;
        };

        if last > page_count {
            if strict {
                return Err(PageOpsError::InvalidPageSpecification(format!(
                    "'{token}' is beyond the last page ({page_count})"
                )));
            }
            log::debug!("Clipping page token '{token}' to {page_count} pages");
        }

        let last = last.min(page_count);
        pages.extend((first..=last).map(|page| page - 1));
    }

    Ok(pages)
}

/// `n` or `a-b`, 1-based and inclusive
fn parse_token(token: &str) -> Option<(usize, usize)> {
    let (first, last) = match token.split_once('-') {
        Some((a, b)) => (a.trim().parse::<usize>().ok()?, b.trim().parse::<usize>().ok()?),
        None => {
            let page = token.parse::<usize>().ok()?;
            (page, page)
        }
    };
    (first >= 1 && first <= last).then_some((first, last))
}
