//! Element snapshots returned by the in-page probe script.
//!
//! A probe collects everything an expectation might ask about in one round
//! trip: how many elements matched, and the first match's visibility, text
//! and attributes. Expectations then evaluate against the snapshot without
//! further page traffic, so one poll tick costs one evaluation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What a locator resolved to at one instant
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElementSnapshot {
    /// Number of elements the selector matched
    pub count: u64,
    /// State of the first match, if any
    pub first: Option<ElementState>,
}

impl ElementSnapshot {
    /// A snapshot where the selector matched nothing
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            count: 0,
            first: None,
        }
    }

    /// A snapshot with `count` matches, the first in the given state
    #[must_use]
    pub fn of(count: u64, first: ElementState) -> Self {
        Self {
            count,
            first: Some(first),
        }
    }

    /// Whether the selector matched at least one element
    #[must_use]
    pub const fn found(&self) -> bool {
        self.count > 0
    }
}

/// Observed state of a single element
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElementState {
    /// Whether the element has a non-empty box and is not display/visibility hidden
    pub visible: bool,
    /// The element's text content
    #[serde(default)]
    pub text: String,
    /// All attributes present on the element
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
}

impl ElementState {
    /// Create an invisible, empty element state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a visible element state
    #[must_use]
    pub fn visible() -> Self {
        Self {
            visible: true,
            ..Self::default()
        }
    }

    /// Set text content
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set an attribute
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Look up an attribute value
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Whether the `class` attribute contains the given token.
    ///
    /// Token match, not substring match: `has_class("visible")` is false for
    /// `class="invisible"`.
    #[must_use]
    pub fn has_class(&self, token: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|t| t == token))
    }
}
