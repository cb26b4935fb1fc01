//! Locator abstraction for element selection.
//!
//! A locator is a CSS selector, optionally narrowed by text content, that
//! compiles to the JavaScript executed in the page. Locators never hold an
//! element handle: every probe re-queries the live DOM, which is what lets
//! assertions auto-wait on pages that settle after load.

use serde::{Deserialize, Serialize};

/// Selector for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selector {
    /// CSS selector (e.g. `.logo-img`, `a[target="_blank"]`)
    Css(String),
    /// CSS selector narrowed to elements whose text contains a substring
    CssWithText {
        /// Base CSS selector
        css: String,
        /// Text content to match
        text: String,
    },
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Human-readable form for error messages and mock keys
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Css(css) => css.clone(),
            Self::CssWithText { css, text } => format!("{css}:has-text({text:?})"),
        }
    }

    /// JavaScript expression evaluating to the array of matched elements
    #[must_use]
    pub fn to_array_expr(&self) -> String {
        match self {
            Self::Css(css) => format!("Array.from(document.querySelectorAll({css:?}))"),
            Self::CssWithText { css, text } => format!(
                "Array.from(document.querySelectorAll({css:?})).filter(el => el.textContent.includes({text:?}))"
            ),
        }
    }
}

/// A locator for finding elements in the rendered page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locator {
    selector: Selector,
}

impl Locator {
    /// Create a locator from a CSS selector
    #[must_use]
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: Selector::Css(selector.into()),
        }
    }

    /// Create a locator from a selector
    #[must_use]
    pub const fn from_selector(selector: Selector) -> Self {
        Self { selector }
    }

    /// Narrow to elements whose text content contains `text`
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        let selector = match self.selector {
            Selector::Css(css) | Selector::CssWithText { css, .. } => Selector::CssWithText {
                css,
                text: text.into(),
            },
        };
        Self { selector }
    }

    /// Get the selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Human-readable form for error messages
    #[must_use]
    pub fn describe(&self) -> String {
        self.selector.describe()
    }

    /// The probe script: resolves the locator and returns an
    /// [`ElementSnapshot`](crate::ElementSnapshot)-shaped object.
    #[must_use]
    pub fn probe_js(&self) -> String {
        format!(
            "(() => {{ \
                const els = {array}; \
                if (els.length === 0) {{ return {{ count: 0, first: null }}; }} \
                const el = els[0]; \
                const rect = el.getBoundingClientRect(); \
                const style = window.getComputedStyle(el); \
                return {{ \
                    count: els.length, \
                    first: {{ \
                        visible: rect.width > 0 && rect.height > 0 \
                            && style.display !== 'none' && style.visibility !== 'hidden', \
                        text: el.textContent || '', \
                        attrs: Object.fromEntries(Array.from(el.attributes).map(a => [a.name, a.value])) \
                    }} \
                }}; \
            }})()",
            array = self.selector.to_array_expr()
        )
    }

    /// The click script: clicks the first match, returns whether one existed.
    #[must_use]
    pub fn click_js(&self) -> String {
        format!(
            "(() => {{ \
                const els = {array}; \
                if (els.length === 0) {{ return false; }} \
                els[0].click(); \
                return true; \
            }})()",
            array = self.selector.to_array_expr()
        )
    }
}

impl From<&str> for Locator {
    fn from(selector: &str) -> Self {
        Self::new(selector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_locator_describe() {
        let locator = Locator::new(".logo-img");
        assert_eq!(locator.describe(), ".logo-img");
    }

    #[test]
    fn test_with_text_describe() {
        let locator =
            Locator::new("a[href=\"https://root.acreetionos.org\"]").with_text("Create a Ticket");
        let desc = locator.describe();
        assert!(desc.contains("has-text"));
        assert!(desc.contains("Create a Ticket"));
    }

    #[test]
    fn test_with_text_replaces_previous_filter() {
        let locator = Locator::new("a").with_text("first").with_text("second");
        assert_eq!(
            locator.selector(),
            &Selector::CssWithText {
                css: "a".to_string(),
                text: "second".to_string(),
            }
        );
    }

    #[test]
    fn test_probe_js_queries_all_matches() {
        let js = Locator::new(".comparison-table").probe_js();
        assert!(js.contains("document.querySelectorAll(\".comparison-table\")"));
        assert!(js.contains("count: els.length"));
        assert!(js.contains("getBoundingClientRect"));
        assert!(js.contains("getComputedStyle"));
    }

    #[test]
    fn test_probe_js_escapes_quoted_selectors() {
        let js = Locator::new("a[target=\"_blank\"]").probe_js();
        // The selector's inner quotes must survive as escaped JS string content
        assert!(js.contains(r#"querySelectorAll("a[target=\"_blank\"]")"#));
    }

    #[test]
    fn test_text_filter_appears_in_probe() {
        let js = Locator::new("a").with_text("Root").probe_js();
        assert!(js.contains("textContent.includes(\"Root\")"));
    }

    #[test]
    fn test_click_js_targets_first_match() {
        let js = Locator::new("[data-modal-target=\"#donate-modal\"]").click_js();
        assert!(js.contains("els[0].click()"));
        assert!(js.contains("return false"));
    }
}
