//! Expectations evaluated against element snapshots.
//!
//! Evaluation is pure: an [`Expectation`] inspects an
//! [`ElementSnapshot`] and yields a [`CheckOutcome`]. The wait loop in
//! [`crate::wait`] re-probes until the outcome is a pass or the budget runs
//! out, then converts the final outcome into the matching error variant so
//! reports distinguish missing elements, unmet conditions, and wrong values.

use crate::dom::ElementSnapshot;
use crate::result::E2eError;

/// A property expected to hold for the elements a locator resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expectation {
    /// First match is rendered (non-empty box, not hidden)
    Visible,
    /// First match's text content contains the substring
    ContainsText(String),
    /// First match's `class` attribute contains the token
    HasClass(String),
    /// First match's `class` attribute does not contain the token
    LacksClass(String),
    /// First match has the attribute with exactly this value
    AttrEquals {
        /// Attribute name
        name: String,
        /// Expected value
        value: String,
    },
    /// First match's attribute value contains the substring
    AttrContains {
        /// Attribute name
        name: String,
        /// Substring the value must contain
        value: String,
    },
    /// The selector matches at least this many elements
    CountAtLeast(u64),
}

/// Outcome of evaluating one expectation against one snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The expectation holds
    Pass,
    /// The selector matched nothing, but the expectation needs an element
    NotFound,
    /// Element present but the condition has not been reached yet; becomes a
    /// timeout if it never passes
    Pending {
        /// Description of the awaited condition
        condition: String,
    },
    /// Element present with a definite wrong value
    Mismatch {
        /// What the check wanted
        expected: String,
        /// What the page actually had
        actual: String,
    },
}

impl CheckOutcome {
    /// Whether the expectation held
    #[must_use]
    pub const fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Convert a final (post-timeout) outcome into the error a report sees.
    ///
    /// Returns `None` for a pass.
    #[must_use]
    pub fn into_failure(self, selector: &str, budget_ms: u64) -> Option<E2eError> {
        match self {
            Self::Pass => None,
            Self::NotFound => Some(E2eError::LocatorNotFound {
                selector: selector.to_string(),
            }),
            Self::Pending { condition } => Some(E2eError::Timeout {
                ms: budget_ms,
                condition: format!("{selector} to {condition}"),
            }),
            Self::Mismatch { expected, actual } => Some(E2eError::Mismatch { expected, actual }),
        }
    }
}

impl Expectation {
    /// Check the expectation against a snapshot
    #[must_use]
    pub fn check(&self, snapshot: &ElementSnapshot) -> CheckOutcome {
        match self {
            Self::CountAtLeast(min) => {
                if snapshot.count >= *min {
                    CheckOutcome::Pass
                } else if snapshot.count == 0 {
                    CheckOutcome::NotFound
                } else {
                    CheckOutcome::Mismatch {
                        expected: format!("at least {min} matches"),
                        actual: format!("{} matches", snapshot.count),
                    }
                }
            }
            _ => match &snapshot.first {
                None => CheckOutcome::NotFound,
                Some(first) => self.check_first(first),
            },
        }
    }

    fn check_first(&self, first: &crate::dom::ElementState) -> CheckOutcome {
        match self {
            Self::Visible => {
                if first.visible {
                    CheckOutcome::Pass
                } else {
                    // Not a value mismatch: the element may still be rendering
                    CheckOutcome::Pending {
                        condition: "be visible".to_string(),
                    }
                }
            }
            Self::ContainsText(needle) => {
                if first.text.contains(needle) {
                    CheckOutcome::Pass
                } else {
                    CheckOutcome::Mismatch {
                        expected: format!("text containing {needle:?}"),
                        actual: format!("text {:?}", truncate(&first.text, 120)),
                    }
                }
            }
            Self::HasClass(token) => {
                if first.has_class(token) {
                    CheckOutcome::Pass
                } else {
                    CheckOutcome::Mismatch {
                        expected: format!("class containing token {token:?}"),
                        actual: format!("class {:?}", first.attr("class").unwrap_or("")),
                    }
                }
            }
            Self::LacksClass(token) => {
                if first.has_class(token) {
                    CheckOutcome::Mismatch {
                        expected: format!("class without token {token:?}"),
                        actual: format!("class {:?}", first.attr("class").unwrap_or("")),
                    }
                } else {
                    CheckOutcome::Pass
                }
            }
            Self::AttrEquals { name, value } => match first.attr(name) {
                Some(actual) if actual == value => CheckOutcome::Pass,
                actual => CheckOutcome::Mismatch {
                    expected: format!("{name}={value:?}"),
                    actual: format!("{name}={:?}", actual.unwrap_or("<absent>")),
                },
            },
            Self::AttrContains { name, value } => match first.attr(name) {
                Some(actual) if actual.contains(value.as_str()) => CheckOutcome::Pass,
                actual => CheckOutcome::Mismatch {
                    expected: format!("{name} containing {value:?}"),
                    actual: format!("{name}={:?}", actual.unwrap_or("<absent>")),
                },
            },
            Self::CountAtLeast(_) => unreachable!("handled in check()"),
        }
    }

    /// Short description of what the expectation wants, for log lines
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Visible => "be visible".to_string(),
            Self::ContainsText(text) => format!("contain text {text:?}"),
            Self::HasClass(token) => format!("have class {token:?}"),
            Self::LacksClass(token) => format!("not have class {token:?}"),
            Self::AttrEquals { name, value } => format!("have {name}={value:?}"),
            Self::AttrContains { name, value } => format!("have {name} containing {value:?}"),
            Self::CountAtLeast(min) => format!("match at least {min} elements"),
        }
    }
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ElementState;

    fn visible_link() -> ElementSnapshot {
        ElementSnapshot::of(
            1,
            ElementState::visible()
                .with_text("Root Community")
                .with_attr("rel", "noopener noreferrer")
                .with_attr("target", "_blank")
                .with_attr("class", "sidebar-link external"),
        )
    }

    mod visibility {
        use super::*;

        #[test]
        fn test_visible_passes() {
            assert!(Expectation::Visible.check(&visible_link()).is_pass());
        }

        #[test]
        fn test_hidden_is_pending_not_mismatch() {
            let snap = ElementSnapshot::of(1, ElementState::new());
            match Expectation::Visible.check(&snap) {
                CheckOutcome::Pending { condition } => assert_eq!(condition, "be visible"),
                other => panic!("expected pending, got {other:?}"),
            }
        }

        #[test]
        fn test_missing_is_not_found() {
            let outcome = Expectation::Visible.check(&ElementSnapshot::empty());
            assert_eq!(outcome, CheckOutcome::NotFound);
        }
    }

    mod text_and_attrs {
        use super::*;

        #[test]
        fn test_contains_text() {
            let check = Expectation::ContainsText("Root".to_string());
            assert!(check.check(&visible_link()).is_pass());
        }

        #[test]
        fn test_text_mismatch_reports_actual() {
            let check = Expectation::ContainsText("Donate".to_string());
            match check.check(&visible_link()) {
                CheckOutcome::Mismatch { expected, actual } => {
                    assert!(expected.contains("Donate"));
                    assert!(actual.contains("Root Community"));
                }
                other => panic!("expected mismatch, got {other:?}"),
            }
        }

        #[test]
        fn test_attr_equals() {
            let check = Expectation::AttrEquals {
                name: "target".to_string(),
                value: "_blank".to_string(),
            };
            assert!(check.check(&visible_link()).is_pass());
        }

        #[test]
        fn test_attr_contains_superset_value() {
            let check = Expectation::AttrContains {
                name: "rel".to_string(),
                value: "noopener".to_string(),
            };
            assert!(check.check(&visible_link()).is_pass());
        }

        #[test]
        fn test_absent_attr_is_mismatch_with_marker() {
            let check = Expectation::AttrContains {
                name: "rel".to_string(),
                value: "noopener".to_string(),
            };
            let snap = ElementSnapshot::of(1, ElementState::visible());
            match check.check(&snap) {
                CheckOutcome::Mismatch { actual, .. } => assert!(actual.contains("<absent>")),
                other => panic!("expected mismatch, got {other:?}"),
            }
        }
    }

    mod classes {
        use super::*;

        #[test]
        fn test_has_class_token() {
            let check = Expectation::HasClass("external".to_string());
            assert!(check.check(&visible_link()).is_pass());
        }

        #[test]
        fn test_lacks_class_after_modal_close() {
            let closed = ElementSnapshot::of(1, ElementState::new().with_attr("class", "modal"));
            let check = Expectation::LacksClass("visible".to_string());
            assert!(check.check(&closed).is_pass());

            let open =
                ElementSnapshot::of(1, ElementState::new().with_attr("class", "modal visible"));
            assert!(!check.check(&open).is_pass());
        }
    }

    mod counts {
        use super::*;

        #[test]
        fn test_count_at_least() {
            let snap = ElementSnapshot::of(5, ElementState::visible());
            assert!(Expectation::CountAtLeast(5).check(&snap).is_pass());
            assert!(Expectation::CountAtLeast(1).check(&snap).is_pass());
        }

        #[test]
        fn test_count_below_minimum_is_mismatch() {
            let snap = ElementSnapshot::of(3, ElementState::visible());
            match Expectation::CountAtLeast(5).check(&snap) {
                CheckOutcome::Mismatch { expected, actual } => {
                    assert!(expected.contains('5'));
                    assert!(actual.contains('3'));
                }
                other => panic!("expected mismatch, got {other:?}"),
            }
        }

        #[test]
        fn test_zero_matches_is_not_found() {
            let outcome = Expectation::CountAtLeast(2).check(&ElementSnapshot::empty());
            assert_eq!(outcome, CheckOutcome::NotFound);
        }
    }

    mod failure_conversion {
        use super::*;

        #[test]
        fn test_not_found_becomes_locator_error() {
            let err = CheckOutcome::NotFound
                .into_failure(".contact-form", 5000)
                .unwrap();
            assert_eq!(err.kind(), "locator-not-found");
            assert!(err.to_string().contains(".contact-form"));
        }

        #[test]
        fn test_pending_becomes_timeout() {
            let err = CheckOutcome::Pending {
                condition: "be visible".to_string(),
            }
            .into_failure(".logo-img", 5000)
            .unwrap();
            assert_eq!(err.kind(), "timeout");
            assert!(err.to_string().contains("5000ms"));
            assert!(err.to_string().contains(".logo-img to be visible"));
        }

        #[test]
        fn test_pass_has_no_failure() {
            assert!(CheckOutcome::Pass.into_failure("x", 100).is_none());
        }
    }
}
