use serde::{Deserialize, Serialize};
use std::fmt;

/// One way of finding an element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "by", content = "value", rename_all = "snake_case")]
pub enum LocatorSpec {
    Id(String),
    /// Matches the `name` attribute.
    Name(String),
    Css(String),
    #[serde(rename = "xpath")]
    XPath(String),
    LinkText(String),
}

impl LocatorSpec {
    /// CSS selector equivalent for strategies WebDriver has no native form for.
    pub fn name_selector(name: &str) -> String {
        format!("[name=\"{}\"]", name.replace('"', "\\\""))
    }
}

impl fmt::Display for LocatorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocatorSpec::Id(v) => write!(f, "id={}", v),
            LocatorSpec::Name(v) => write!(f, "name={}", v),
            LocatorSpec::Css(v) => write!(f, "css={}", v),
            LocatorSpec::XPath(v) => write!(f, "xpath={}", v),
            LocatorSpec::LinkText(v) => write!(f, "link_text={}", v),
        }
    }
}

/// Which condition an element must meet before the resolver hands it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessMode {
    /// Attached to the document.
    Present,
    /// Present, displayed, enabled and not covered.
    Interactable,
}

/// Ordered alternatives for finding the same logical control.
///
/// Order is priority: the first spec that yields an element wins and later
/// specs are never consulted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatorChain {
    pub label: String,
    pub specs: Vec<LocatorSpec>,
}

impl LocatorChain {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            specs: Vec::new(),
        }
    }

    pub fn id(mut self, value: impl Into<String>) -> Self {
        self.specs.push(LocatorSpec::Id(value.into()));
        self
    }

    pub fn name(mut self, value: impl Into<String>) -> Self {
        self.specs.push(LocatorSpec::Name(value.into()));
        self
    }

    pub fn css(mut self, value: impl Into<String>) -> Self {
        self.specs.push(LocatorSpec::Css(value.into()));
        self
    }

    pub fn xpath(mut self, value: impl Into<String>) -> Self {
        self.specs.push(LocatorSpec::XPath(value.into()));
        self
    }

    pub fn link_text(mut self, value: impl Into<String>) -> Self {
        self.specs.push(LocatorSpec::LinkText(value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocatorSpec> {
        self.specs.iter()
    }
}
