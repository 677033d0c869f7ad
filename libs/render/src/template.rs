use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use lazy_static::lazy_static;
use log::debug;
use regex::{Captures, Regex};

use crate::{RenderError, TemplateRenderer, TemplateValue};

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"<%=\s*([A-Za-z_][A-Za-z0-9_]*)\s*%>").unwrap();
    static ref CONDITION: Regex =
        Regex::new(r"^<%\s*(if|else|endif)\s*(!?)([A-Za-z_][A-Za-z0-9_]*)?\s*%>$").unwrap();
}

const MAX_INCLUDE_DEPTH: usize = 8;

/// Theme templates read from disk. Each template id maps to `<id>.html`
/// inside the template directory.
#[derive(Debug, Clone)]
pub struct FileTemplates {
    template_dir: PathBuf,
    variables: BTreeMap<String, TemplateValue>,
}

pub fn parse_includes(include_str: &str) -> Option<&str> {
    include_str
        .strip_prefix("<%= include \"")?
        .strip_suffix("\" %>")
}

struct Frame {
    parent_visible: bool,
    holds: bool,
    in_else: bool,
}

fn visible(frames: &[Frame]) -> bool {
    frames
        .last()
        .map(|frame| frame.parent_visible && frame.holds)
        .unwrap_or(true)
}

impl FileTemplates {
    pub fn new(template_dir: PathBuf) -> Self {
        Self {
            template_dir,
            variables: BTreeMap::new(),
        }
    }

    pub fn for_theme(root: &Path, theme: &str) -> Self {
        Self::new(root.join("themes").join(theme).join("templates"))
    }

    pub fn get_template_file(&self, requested_file: &str) -> Result<String, RenderError> {
        let file_path = self.template_dir.join(format!("{}.html", requested_file));
        match fs::read_to_string(&file_path) {
            Ok(filestring) => Ok(filestring),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(RenderError::TemplateNotFound(requested_file.to_owned()))
            }
            Err(e) => Err(RenderError::Read(file_path, e)),
        }
    }

    fn render_includes(&self, id: &str, ctx: &str, depth: usize) -> Result<String, RenderError> {
        if depth > MAX_INCLUDE_DEPTH {
            return Err(RenderError::IncludeDepth(id.to_owned()));
        }
        let mut lines = Vec::new();
        for line in ctx.lines() {
            match parse_includes(line.trim()) {
                Some(included) => {
                    let included_ctx = self.get_template_file(included)?;
                    lines.push(self.render_includes(included, &included_ctx, depth + 1)?);
                }
                None => lines.push(line.to_owned()),
            }
        }
        Ok(lines.join("\n"))
    }

    fn render_conditionals(&self, id: &str, ctx: &str) -> Result<String, RenderError> {
        let unbalanced = || RenderError::UnbalancedConditional(id.to_owned());
        let mut frames: Vec<Frame> = Vec::new();
        let mut lines = Vec::new();
        for line in ctx.lines() {
            if let Some(caps) = CONDITION.captures(line.trim()) {
                match &caps[1] {
                    "if" => {
                        let name = caps.get(3).ok_or_else(unbalanced)?.as_str();
                        let negate = &caps[2] == "!";
                        let holds = self.is_truthy(name) != negate;
                        frames.push(Frame {
                            parent_visible: visible(&frames),
                            holds,
                            in_else: false,
                        });
                    }
                    "else" => {
                        let frame = frames.last_mut().ok_or_else(unbalanced)?;
                        if frame.in_else {
                            return Err(unbalanced());
                        }
                        frame.in_else = true;
                        frame.holds = !frame.holds;
                    }
                    _ => {
                        frames.pop().ok_or_else(unbalanced)?;
                    }
                }
                continue;
            }
            if visible(&frames) {
                lines.push(line);
            }
        }
        if !frames.is_empty() {
            return Err(unbalanced());
        }
        Ok(lines.join("\n"))
    }

    fn render_variables(&self, ctx: &str) -> String {
        PLACEHOLDER
            .replace_all(ctx, |caps: &Captures| {
                self.variables
                    .get(&caps[1])
                    .map(|v| v.to_string())
                    .unwrap_or_default()
            })
            .into_owned()
    }

    fn is_truthy(&self, key: &str) -> bool {
        self.variables
            .get(key)
            .map(TemplateValue::is_truthy)
            .unwrap_or(false)
    }
}

impl TemplateRenderer for FileTemplates {
    fn set_variable(&mut self, key: &str, value: TemplateValue) {
        self.variables.insert(key.to_owned(), value);
    }

    fn variable(&self, key: &str) -> Option<&TemplateValue> {
        self.variables.get(key)
    }

    fn render_template(&mut self, id: &str) -> Result<String, RenderError> {
        debug!("rendering template {} from {:?}", id, self.template_dir);
        let ctx = self.get_template_file(id)?;
        let ctx = self.render_includes(id, &ctx, 0)?;
        let ctx = self.render_conditionals(id, &ctx)?;
        Ok(self.render_variables(&ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn templates(files: &[(&str, &str)]) -> (TempDir, FileTemplates) {
        let dir = tempfile::tempdir().unwrap();
        for (name, body) in files {
            fs::write(dir.path().join(format!("{}.html", name)), body).unwrap();
        }
        let templates = FileTemplates::new(dir.path().to_owned());
        (dir, templates)
    }

    #[test]
    fn replaces_variables() {
        let (_dir, mut t) = templates(&[("page", "<title><%= title %></title><%=missing%>")]);
        t.assign("title", "Hello");
        assert_eq!(t.render_template("page").unwrap(), "<title>Hello</title>");
    }

    #[test]
    fn inserted_values_are_not_reparsed() {
        let (_dir, mut t) = templates(&[("page", "<%= content %>")]);
        t.assign("content", "<%= secret %>");
        t.assign("secret", "leaked");
        assert_eq!(t.render_template("page").unwrap(), "<%= secret %>");
    }

    #[test]
    fn renders_includes() {
        let (_dir, mut t) = templates(&[
            ("page", "<body>\n  <%= include \"footer\" %>\n</body>"),
            ("footer", "<footer><%= org %></footer>"),
        ]);
        t.assign("org", "Demo");
        assert_eq!(
            t.render_template("page").unwrap(),
            "<body>\n<footer>Demo</footer>\n</body>"
        );
    }

    #[test]
    fn stops_recursive_includes() {
        let (_dir, mut t) = templates(&[("loop", "<%= include \"loop\" %>")]);
        assert!(matches!(
            t.render_template("loop"),
            Err(RenderError::IncludeDepth(_))
        ));
    }

    #[test]
    fn evaluates_conditionals() {
        let body = "<% if cookieNote %>\nnote\n<% if !printView %>\nscreen\n<% else %>\nprint\n<% endif %>\n<% else %>\nnone\n<% endif %>";
        let (_dir, mut t) = templates(&[("page", body)]);
        t.assign("cookieNote", true);
        t.assign("printView", false);
        assert_eq!(t.render_template("page").unwrap(), "note\nscreen");
        t.assign("printView", true);
        assert_eq!(t.render_template("page").unwrap(), "note\nprint");
        t.assign("cookieNote", "");
        assert_eq!(t.render_template("page").unwrap(), "none");
    }

    #[test]
    fn rejects_unbalanced_conditionals() {
        let (_dir, mut t) = templates(&[("open", "<% if a %>\nx"), ("close", "x\n<% endif %>")]);
        assert!(matches!(
            t.render_template("open"),
            Err(RenderError::UnbalancedConditional(_))
        ));
        assert!(matches!(
            t.render_template("close"),
            Err(RenderError::UnbalancedConditional(_))
        ));
    }

    #[test]
    fn rejects_second_else_in_one_block() {
        let body = "<% if a %>\none\n<% else %>\ntwo\n<% else %>\nthree\n<% endif %>";
        let (_dir, mut t) = templates(&[("page", body)]);
        t.assign("a", true);
        assert!(matches!(
            t.render_template("page"),
            Err(RenderError::UnbalancedConditional(id)) if id == "page"
        ));
    }

    #[test]
    fn reports_missing_template() {
        let (_dir, mut t) = templates(&[]);
        assert!(matches!(
            t.render_template("index"),
            Err(RenderError::TemplateNotFound(id)) if id == "index"
        ));
    }
}
