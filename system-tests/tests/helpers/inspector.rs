// system-tests/tests/helpers/inspector.rs
// ============================================================================
// Module: HTML Inspector
// Description: Query rendered pages by test-marker classes.
// Purpose: Assert on the HTML contract without string matching.
// Dependencies: scraper
// ============================================================================

use scraper::Html;
use scraper::Selector;

/// Parsed HTML page.
pub struct HtmlPage {
    /// Parsed document.
    document: Html,
}

impl HtmlPage {
    /// Parses a response body.
    pub fn parse(body: &str) -> Self {
        Self {
            document: Html::parse_document(body),
        }
    }

    /// Returns the trimmed text of every element matching the selector.
    pub fn texts(&self, selector: &str) -> Result<Vec<String>, String> {
        let selector = parse_selector(selector)?;
        Ok(self
            .document
            .select(&selector)
            .map(|element| element.text().collect::<String>().trim().to_string())
            .collect())
    }

    /// Returns how many elements match the selector.
    pub fn count(&self, selector: &str) -> Result<usize, String> {
        let selector = parse_selector(selector)?;
        Ok(self.document.select(&selector).count())
    }

    /// Returns the document title.
    pub fn title(&self) -> Result<String, String> {
        Ok(self.texts("title")?.concat())
    }

    /// Returns the attribute values of every matching element.
    pub fn attributes(&self, selector: &str, name: &str) -> Result<Vec<String>, String> {
        let selector = parse_selector(selector)?;
        Ok(self
            .document
            .select(&selector)
            .filter_map(|element| element.value().attr(name).map(str::to_string))
            .collect())
    }
}

/// Parses a CSS selector.
fn parse_selector(selector: &str) -> Result<Selector, String> {
    Selector::parse(selector).map_err(|err| format!("invalid selector {selector}: {err}"))
}
