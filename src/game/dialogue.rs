//! Dialogue
//!
//! Paged text shown while the world is in the Scene phase.

use serde::{Deserialize, Serialize};

/// Notice shown when the player swings without a sword selected.
pub const NO_WEAPON_NOTICE: &str = "You need to have a weapon equipped\nto do that.";

/// A sequence of text pages and the page currently shown.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialogue {
    pages: Vec<String>,
    page: usize,
}

impl Dialogue {
    /// Build from explicit pages. Empty pages are dropped.
    pub fn new<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pages: pages
                .into_iter()
                .map(Into::into)
                .filter(|p: &String| !p.trim().is_empty())
                .collect(),
            page: 0,
        }
    }

    /// Parse dialogue text. Blank lines separate pages.
    pub fn parse(text: &str) -> Self {
        let mut pages = Vec::new();
        let mut current = String::new();
        for line in text.lines() {
            if line.trim().is_empty() {
                if !current.is_empty() {
                    pages.push(std::mem::take(&mut current));
                }
            } else {
                if !current.is_empty() {
                    current.push('\n');
                }
                current.push_str(line.trim_end());
            }
        }
        if !current.is_empty() {
            pages.push(current);
        }
        Self { pages, page: 0 }
    }

    /// Text of the current page.
    pub fn current(&self) -> Option<&str> {
        self.pages.get(self.page).map(String::as_str)
    }

    /// All pages.
    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    /// Index of the current page.
    pub fn page_index(&self) -> usize {
        self.page
    }

    /// Whether there is nothing to show.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Move to the next page. Returns false once the last page has been
    /// dismissed, and rewinds so the dialogue can be shown again.
    pub fn advance(&mut self) -> bool {
        if self.page + 1 < self.pages.len() {
            self.page += 1;
            true
        } else {
            self.page = 0;
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pages() {
        let d = Dialogue::parse("Hello there.\nWelcome.\n\nSecond page\n\n\nThird\n");
        assert_eq!(d.pages(), &["Hello there.\nWelcome.", "Second page", "Third"]);
    }

    #[test]
    fn test_parse_windows_line_endings() {
        let d = Dialogue::parse("a\r\n\r\nb\r\n");
        assert_eq!(d.pages(), &["a", "b"]);
    }

    #[test]
    fn test_advance_and_rewind() {
        let mut d = Dialogue::parse("one\n\ntwo");
        assert_eq!(d.current(), Some("one"));
        assert!(d.advance());
        assert_eq!(d.current(), Some("two"));
        assert!(!d.advance());
        assert_eq!(d.page_index(), 0);
    }

    #[test]
    fn test_notice_is_single_page() {
        let d = Dialogue::new([NO_WEAPON_NOTICE]);
        assert_eq!(d.pages().len(), 1);
        assert!(d.current().is_some_and(|t| t.contains('\n')));
        assert!(Dialogue::parse("\n\n").is_empty());
    }
}
