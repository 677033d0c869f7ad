use std::{fmt, io, path::PathBuf};

use thiserror::Error;

pub mod assets;
pub mod html_page;
pub mod menu;
pub mod template;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("could not find template {0}")]
    TemplateNotFound(String),
    #[error("could not read template at {0:?}")]
    Read(PathBuf, #[source] io::Error),
    #[error("includes nested too deeply in {0}")]
    IncludeDepth(String),
    #[error("unbalanced conditional in {0}")]
    UnbalancedConditional(String),
}

/// Escapes text for use in html content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateValue {
    Text(String),
    Bool(bool),
    Number(i64),
}

impl TemplateValue {
    pub fn is_truthy(&self) -> bool {
        match self {
            TemplateValue::Text(s) => !s.is_empty(),
            TemplateValue::Bool(b) => *b,
            TemplateValue::Number(n) => *n != 0,
        }
    }
}

impl fmt::Display for TemplateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateValue::Text(s) => f.write_str(s),
            TemplateValue::Bool(b) => write!(f, "{}", b),
            TemplateValue::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<String> for TemplateValue {
    fn from(s: String) -> Self {
        TemplateValue::Text(s)
    }
}

impl From<&str> for TemplateValue {
    fn from(s: &str) -> Self {
        TemplateValue::Text(s.to_owned())
    }
}

impl From<bool> for TemplateValue {
    fn from(b: bool) -> Self {
        TemplateValue::Bool(b)
    }
}

impl From<u32> for TemplateValue {
    fn from(n: u32) -> Self {
        TemplateValue::Number(n.into())
    }
}

/// The two page layouts a theme provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTemplate {
    /// Header, sidebar menu and footer.
    Full,
    /// Content only, used for inline and print pages.
    Reduced,
}

impl PageTemplate {
    pub fn id(&self) -> &'static str {
        match self {
            PageTemplate::Full => "index",
            PageTemplate::Reduced => "index_reduced",
        }
    }
}

/// Variable bag plus a render step. Pages fill the bag and then ask for a
/// template by id.
pub trait TemplateRenderer {
    fn set_variable(&mut self, key: &str, value: TemplateValue);
    fn variable(&self, key: &str) -> Option<&TemplateValue>;
    fn render_template(&mut self, id: &str) -> Result<String, RenderError>;

    fn assign<V: Into<TemplateValue>>(&mut self, key: &str, value: V)
    where
        Self: Sized,
    {
        self.set_variable(key, value.into());
    }
}
