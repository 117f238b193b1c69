//! Indentation-aware text emitter for generated source.
//!
//! Every generated fragment goes through [`SourceWriter`], which tracks a
//! stack of open scopes so nested blocks, enums and modules come out
//! consistently indented. Unbalanced scopes are reported by [`finish`].
//!
//! [`finish`]: SourceWriter::finish

use crate::config::IndentStyle;
use crate::error::{GeneratorError, Result};

pub struct SourceWriter {
    out: String,
    unit: String,
    scopes: Vec<String>,
}

impl SourceWriter {
    pub fn new(indent: IndentStyle) -> Self {
        Self {
            out: String::new(),
            unit: indent.unit(),
            scopes: Vec::new(),
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Writes one indented line.
    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if text.is_empty() {
            self.out.push('\n');
            return;
        }
        for _ in 0..self.scopes.len() {
            self.out.push_str(&self.unit);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    /// Writes an empty line unless the previous one already is.
    pub fn blank(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with("\n\n") && !self.out.ends_with("{\n") {
            self.out.push('\n');
        }
    }

    /// Opens `header {` and indents what follows.
    pub fn begin_scope(&mut self, header: impl AsRef<str>) {
        let header = header.as_ref();
        if header.is_empty() {
            self.line("{");
        } else {
            self.line(format!("{} {{", header));
        }
        self.scopes.push(header.to_string());
    }

    pub fn end_scope(&mut self) -> Result<()> {
        self.end_scope_with("")
    }

    /// Closes the innermost scope, appending `suffix` after the brace.
    pub fn end_scope_with(&mut self, suffix: &str) -> Result<()> {
        if self.scopes.pop().is_none() {
            return Err(GeneratorError::Internal(
                "closed a scope that was never opened".to_string(),
            ));
        }
        self.line(format!("}}{}", suffix));
        Ok(())
    }

    pub fn begin_module(&mut self, vis: &str, name: &str) {
        self.begin_scope(join_words(&[vis, "mod", name]));
    }

    pub fn end_module(&mut self) -> Result<()> {
        self.end_scope()
    }

    /// Writes `use` lines, skipping blanks and duplicates.
    pub fn write_uses<I, S>(&mut self, uses: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen: Vec<String> = Vec::new();
        for item in uses {
            let item = item.as_ref().trim();
            if item.is_empty() || seen.iter().any(|s| s == item) {
                continue;
            }
            seen.push(item.to_string());
            self.line(item);
        }
    }

    pub fn write_attribute(&mut self, body: &str) {
        self.line(format!("#[{}]", body));
    }

    pub fn write_derives(&mut self, derives: &[String]) {
        if !derives.is_empty() {
            self.write_attribute(&format!("derive({})", derives.join(", ")));
        }
    }

    /// Writes a fieldless enumeration.
    pub fn write_enum(&mut self, vis: &str, name: &str, members: &[&str]) -> Result<()> {
        self.begin_scope(join_words(&[vis, "enum", name]));
        for member in members {
            self.line(format!("{},", member));
        }
        self.end_scope()
    }

    pub fn write_field(&mut self, vis: &str, name: &str, ty: &str) {
        self.line(format!("{}{}: {},", prefixed(vis), name, ty));
    }

    pub fn write_let(&mut self, mutable: bool, name: &str, expr: &str) {
        let binding = if mutable { "let mut" } else { "let" };
        self.line(format!("{} {} = {};", binding, name, expr));
    }

    /// Writes multi-line text re-indented to the current depth.
    pub fn write_block(&mut self, text: &str) {
        let lines: Vec<&str> = text.lines().collect();
        let common = lines
            .iter()
            .filter(|l| !l.trim().is_empty())
            .map(|l| l.len() - l.trim_start().len())
            .min()
            .unwrap_or(0);
        for line in lines {
            if line.trim().is_empty() {
                self.line("");
            } else {
                self.line(line[common..].trim_end());
            }
        }
    }

    /// Returns the text, failing if a scope was left open.
    pub fn finish(self) -> Result<String> {
        if let Some(open) = self.scopes.last() {
            return Err(GeneratorError::Internal(format!(
                "{} scope(s) left open, innermost `{}`",
                self.scopes.len(),
                open
            )));
        }
        Ok(self.out)
    }
}

fn join_words(words: &[&str]) -> String {
    words
        .iter()
        .filter(|w| !w.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

/// `vis` followed by a space, or nothing.
pub(crate) fn prefixed(vis: &str) -> String {
    if vis.is_empty() {
        String::new()
    } else {
        format!("{} ", vis)
    }
}
