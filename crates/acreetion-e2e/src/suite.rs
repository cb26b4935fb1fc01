//! The declarative check table for the AcreetionOS website.
//!
//! Each [`CaseSpec`] is one independent test case: a page path, an optional
//! viewport override, and a linear sequence of steps. Cases share nothing
//! and may run in any order or in parallel. The table in [`cases`] is the
//! deduplicated union of every distinct check the site's suites carried -
//! the drifted per-file variants are collapsed into single rows here.

use crate::driver::Viewport;
use crate::expect::Expectation;
use crate::locator::Locator;

/// One action or assertion within a case
#[derive(Debug, Clone)]
pub enum Step {
    /// Assert the document title matches a regex pattern
    AssertTitle(&'static str),
    /// Assert an expectation holds for a locator (auto-waiting)
    Assert(Locator, Expectation),
    /// Click the first element a locator resolves to (waits for visibility)
    Click(Locator),
}

impl Step {
    /// Assert the first match is visible
    #[must_use]
    pub fn visible(selector: &str) -> Self {
        Self::Assert(Locator::new(selector), Expectation::Visible)
    }

    /// Assert the first match's text contains `needle`
    #[must_use]
    pub fn text(selector: &str, needle: &str) -> Self {
        Self::Assert(
            Locator::new(selector),
            Expectation::ContainsText(needle.to_string()),
        )
    }

    /// Assert the first match's class attribute carries `token`
    #[must_use]
    pub fn has_class(selector: &str, token: &str) -> Self {
        Self::Assert(
            Locator::new(selector),
            Expectation::HasClass(token.to_string()),
        )
    }

    /// Assert the first match's class attribute lacks `token`
    #[must_use]
    pub fn lacks_class(selector: &str, token: &str) -> Self {
        Self::Assert(
            Locator::new(selector),
            Expectation::LacksClass(token.to_string()),
        )
    }

    /// Assert the first match's attribute equals `value`
    #[must_use]
    pub fn attr_equals(selector: &str, name: &str, value: &str) -> Self {
        Self::Assert(
            Locator::new(selector),
            Expectation::AttrEquals {
                name: name.to_string(),
                value: value.to_string(),
            },
        )
    }

    /// Assert the first match's attribute contains `value`
    #[must_use]
    pub fn attr_contains(selector: &str, name: &str, value: &str) -> Self {
        Self::Assert(
            Locator::new(selector),
            Expectation::AttrContains {
                name: name.to_string(),
                value: value.to_string(),
            },
        )
    }

    /// Assert the selector matches at least `min` elements
    #[must_use]
    pub fn count_at_least(selector: &str, min: u64) -> Self {
        Self::Assert(Locator::new(selector), Expectation::CountAtLeast(min))
    }

    /// Click the first match
    #[must_use]
    pub fn click(selector: &str) -> Self {
        Self::Click(Locator::new(selector))
    }
}

/// One independent test case
#[derive(Debug, Clone)]
pub struct CaseSpec {
    /// Case name, used in reports
    pub name: &'static str,
    /// Relative page path, joined onto the configured base URL
    pub path: &'static str,
    /// Viewport override; None uses the configured default
    pub viewport: Option<Viewport>,
    /// Actions and assertions, executed in order
    pub steps: Vec<Step>,
}

impl CaseSpec {
    /// Create a case for a page at the default viewport
    #[must_use]
    pub fn new(name: &'static str, path: &'static str, steps: Vec<Step>) -> Self {
        Self {
            name,
            path,
            viewport: None,
            steps,
        }
    }

    /// Create a case with a viewport override
    #[must_use]
    pub fn at(
        name: &'static str,
        path: &'static str,
        viewport: Viewport,
        steps: Vec<Step>,
    ) -> Self {
        Self {
            name,
            path,
            viewport: Some(viewport),
            steps,
        }
    }
}

const ROOT_LINK: &str = "a[href=\"https://root.acreetionos.org\"]";

/// The full check table for the site.
#[must_use]
pub fn cases() -> Vec<CaseSpec> {
    vec![
        CaseSpec::new(
            "homepage loads successfully",
            "/",
            vec![Step::AssertTitle("AcreetionOS")],
        ),
        CaseSpec::new(
            "logo and branding visible",
            "/",
            vec![
                Step::visible(".logo-img"),
                Step::text(".logo-text", "AcreetionOS"),
            ],
        ),
        CaseSpec::new(
            "navigation links are present",
            "/",
            vec![
                Step::visible("a[href=\"#about\"]"),
                Step::visible("a[href=\"#manual-downloads\"]"),
            ],
        ),
        CaseSpec::new(
            "download buttons render",
            "/",
            vec![Step::visible(".btn-cinnamon")],
        ),
        CaseSpec::new(
            "contact page loads",
            "/contact.html",
            vec![
                Step::AssertTitle("Contact"),
                Step::visible(".contact-form"),
            ],
        ),
        CaseSpec::new(
            "donate modal opens and closes",
            "/",
            vec![
                Step::click("[data-modal-target=\"#donate-modal\"]"),
                Step::has_class("#donate-modal", "visible"),
                Step::click("#donate-modal .modal-close-btn"),
                Step::lacks_class("#donate-modal", "visible"),
            ],
        ),
        CaseSpec::new(
            "external links carry noopener",
            "/",
            vec![
                Step::count_at_least("a[target=\"_blank\"]", 1),
                Step::attr_contains("a[target=\"_blank\"]", "rel", "noopener"),
            ],
        ),
        CaseSpec::new(
            "root link in homepage sidebar",
            "/",
            vec![
                Step::visible(ROOT_LINK),
                Step::text(ROOT_LINK, "Root"),
                Step::attr_contains(ROOT_LINK, "rel", "noopener noreferrer"),
                Step::attr_equals(ROOT_LINK, "target", "_blank"),
            ],
        ),
        CaseSpec::new(
            "root links on contact page",
            "/contact.html",
            vec![
                Step::count_at_least(ROOT_LINK, 2),
                Step::Assert(
                    Locator::new(ROOT_LINK).with_text("Create a Ticket on Root"),
                    Expectation::Visible,
                ),
                Step::visible("aside a[href=\"https://root.acreetionos.org\"]"),
            ],
        ),
        CaseSpec::at(
            "homepage renders on mobile viewport",
            "/",
            Viewport::MOBILE,
            vec![
                Step::AssertTitle("AcreetionOS"),
                Step::visible(".logo-img"),
                Step::visible(".main-nav"),
            ],
        ),
        CaseSpec::at(
            "homepage renders on tablet viewport",
            "/",
            Viewport::TABLET,
            vec![
                Step::AssertTitle("AcreetionOS"),
                Step::visible(".content-box"),
            ],
        ),
        CaseSpec::at(
            "homepage renders on extra small viewport",
            "/",
            Viewport::EXTRA_SMALL,
            vec![
                Step::AssertTitle("AcreetionOS"),
                Step::visible(".logo-img"),
            ],
        ),
        CaseSpec::at(
            "contact form accessible on mobile",
            "/contact.html",
            Viewport::MOBILE,
            vec![
                Step::visible(".contact-form"),
                Step::visible("input[name=\"name\"]"),
            ],
        ),
        CaseSpec::at(
            "compare tables scrollable on mobile",
            "/compare.html",
            Viewport::MOBILE,
            vec![
                Step::AssertTitle("Compare"),
                Step::count_at_least("div[style*=\"overflow-x: auto\"]", 5),
                Step::count_at_least(".comparison-table", 1),
                Step::visible(".comparison-table"),
            ],
        ),
        CaseSpec::at(
            "compare feature cards stack on mobile",
            "/compare.html",
            Viewport::MOBILE,
            vec![
                Step::count_at_least(".feature-card", 1),
                Step::visible(".feature-card"),
            ],
        ),
        CaseSpec::at(
            "install guide readable on mobile",
            "/install.html",
            Viewport::MOBILE,
            vec![
                Step::AssertTitle("Installation Guide"),
                Step::visible("h1"),
                Step::text("h1", "Installation Guide"),
                Step::visible("pre"),
                Step::visible(".box-body ul, .box-body ol"),
            ],
        ),
        CaseSpec::at(
            "install guide renders on extra small viewport",
            "/install.html",
            Viewport::EXTRA_SMALL,
            vec![
                Step::AssertTitle("Installation Guide"),
                Step::visible(".logo-img"),
                Step::visible("h1"),
            ],
        ),
        CaseSpec::at(
            "install guide renders on tablet viewport",
            "/install.html",
            Viewport::TABLET,
            vec![
                Step::AssertTitle("Installation Guide"),
                Step::visible(".content-box"),
                Step::visible(".sidebar-column"),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_covers_every_page() {
        let paths: HashSet<&str> = cases().iter().map(|c| c.path).collect();
        assert_eq!(
            paths,
            HashSet::from(["/", "/contact.html", "/compare.html", "/install.html"])
        );
    }

    #[test]
    fn test_case_names_are_unique() {
        let all = cases();
        let names: HashSet<&str> = all.iter().map(|c| c.name).collect();
        assert_eq!(names.len(), all.len());
    }

    #[test]
    fn test_no_case_is_empty() {
        assert!(cases().iter().all(|c| !c.steps.is_empty()));
    }

    #[test]
    fn test_union_includes_root_link_and_install_checks() {
        // These rows drifted across the original per-file copies; the table
        // must carry all of them.
        let all = cases();
        assert!(all.iter().any(|c| c.name.contains("root link")));
        assert!(all.iter().any(|c| c.name.contains("root links")));
        assert!(all.iter().filter(|c| c.path == "/install.html").count() >= 3);
    }

    #[test]
    fn test_responsive_cases_use_fixed_viewports() {
        let all = cases();
        let viewports: HashSet<String> = all
            .iter()
            .filter_map(|c| c.viewport.map(|v| v.to_string()))
            .collect();
        assert_eq!(
            viewports,
            HashSet::from([
                "320x568".to_string(),
                "375x667".to_string(),
                "768x1024".to_string()
            ])
        );
    }

    #[test]
    fn test_modal_case_toggles_visible_class() {
        let all = cases();
        let modal = all
            .iter()
            .find(|c| c.name.contains("modal"))
            .expect("modal case present");
        let mut saw_open = false;
        let mut saw_close = false;
        for step in &modal.steps {
            if let Step::Assert(_, expectation) = step {
                match expectation {
                    Expectation::HasClass(token) if token == "visible" => saw_open = true,
                    Expectation::LacksClass(token) if token == "visible" => saw_close = true,
                    _ => {}
                }
            }
        }
        assert!(saw_open && saw_close);
    }

    #[test]
    fn test_compare_page_expects_five_overflow_wrappers() {
        let all = cases();
        let compare = all
            .iter()
            .find(|c| c.name.contains("compare tables"))
            .expect("compare case present");
        let has_wrapper_count = compare.steps.iter().any(|s| {
            matches!(
                s,
                Step::Assert(locator, Expectation::CountAtLeast(5))
                    if locator.describe().contains("overflow-x")
            )
        });
        assert!(has_wrapper_count);
    }
}
