//! Substitution descriptors and template-text scanning.
//!
//! A descriptor appears inline in template text as
//! `{field[line_regex]:field_regex}`. `field` names the slot that stores the
//! substitution data, `field_regex` is a regular expression guaranteed to
//! match the form of the substitution data, and `line_regex` is an optional
//! regex that the line containing the field must match. When not given, all
//! non-empty lines match.

use crate::{Result, XrbError};
use serde::{Deserialize, Serialize};

/// Line pattern used when a descriptor does not declare one: any non-empty
/// line.
pub const DEFAULT_LINE_PATTERN: &str = ".+";

/// A single substitution point parsed out of template text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    /// Field name, unique across the template.
    pub name: String,

    /// Regex guaranteed to match the field's rendered textual form.
    pub value_pattern: String,

    /// Optional regex the entire containing line must match.
    pub line_pattern: Option<String>,
}

impl Descriptor {
    /// Create a descriptor with no line pattern.
    pub fn new(name: impl Into<String>, value_pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value_pattern: value_pattern.into(),
            line_pattern: None,
        }
    }

    /// Set the line pattern.
    pub fn with_line_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.line_pattern = Some(pattern.into());
        self
    }

    /// The declared line pattern, or [`DEFAULT_LINE_PATTERN`].
    pub fn line_pattern_or_default(&self) -> &str {
        self.line_pattern.as_deref().unwrap_or(DEFAULT_LINE_PATTERN)
    }
}

/// Scan template text for substitution descriptors, in scan order.
///
/// Brace groups are tracked by depth, so value patterns may contain nested
/// braces (`{resdata:[0-9]{2,4}}`). A duplicate field name keeps its first
/// scan position; the later occurrence's patterns win. Template authors are
/// responsible for keeping duplicate descriptors consistent.
///
/// Fails with [`XrbError::MalformedTemplate`] on unbalanced braces or a
/// descriptor with an empty field name.
pub fn scan(template: &str) -> Result<Vec<Descriptor>> {
    let mut descriptors: Vec<Descriptor> = Vec::new();
    let mut chars = template.char_indices();

    while let Some((start, c)) = chars.next() {
        if c != '{' {
            continue;
        }
        let mut depth = 1usize;
        let mut inner_end = None;
        for (i, c) in chars.by_ref() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        inner_end = Some(i);
                        break;
                    }
                }
                _ => {}
            }
        }
        let Some(end) = inner_end else {
            return Err(XrbError::MalformedTemplate(format!(
                "unbalanced braces starting at byte {}",
                start
            )));
        };
        let descriptor = parse_inner(&template[start + 1..end])?;
        match descriptors.iter_mut().find(|d| d.name == descriptor.name) {
            Some(existing) => {
                existing.value_pattern = descriptor.value_pattern;
                existing.line_pattern = descriptor.line_pattern;
            }
            None => descriptors.push(descriptor),
        }
    }

    Ok(descriptors)
}

/// Parse the text between a descriptor's outer braces.
///
/// The field name runs up to the first `[` or the separating `:`. A `[`
/// opens the line pattern, which extends to the last `]` before the
/// separating `:` (a `:` inside the brackets does not separate). Everything
/// after the separating `:` is the value pattern; a descriptor without one
/// gets an empty value pattern, which matches the empty string.
fn parse_inner(inner: &str) -> Result<Descriptor> {
    let mut in_brackets = false;
    let mut saw_brackets = false;
    let mut split_colon = None;
    for (i, c) in inner.char_indices() {
        match c {
            '[' if !in_brackets && !saw_brackets => {
                in_brackets = true;
                saw_brackets = true;
            }
            ']' if in_brackets => in_brackets = false,
            ':' if !in_brackets => {
                split_colon = Some(i);
                break;
            }
            _ => {}
        }
    }

    let (name_segment, value_pattern) = match split_colon {
        Some(i) => (&inner[..i], &inner[i + 1..]),
        None => (inner, ""),
    };

    let (name, line_pattern) = match name_segment.find('[') {
        Some(open) => {
            let close = name_segment.rfind(']').filter(|&c| c > open).ok_or_else(|| {
                XrbError::MalformedTemplate(format!(
                    "descriptor '{{{}}}' has an unterminated line pattern",
                    inner
                ))
            })?;
            (
                name_segment[..open].trim(),
                Some(name_segment[open + 1..close].to_string()),
            )
        }
        None => (name_segment.trim(), None),
    };

    if name.is_empty() {
        return Err(XrbError::MalformedTemplate(format!(
            "descriptor '{{{}}}' has no field name",
            inner
        )));
    }

    Ok(Descriptor {
        name: name.to_string(),
        value_pattern: value_pattern.to_string(),
        line_pattern,
    })
}
