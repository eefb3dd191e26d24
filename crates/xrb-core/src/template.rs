//! Template parsing, rendering, and data recovery.
//!
//! A [`Template`] can be rendered into concrete text from a set of field
//! values, and can also run the other way: given text produced from (or
//! structurally compatible with) the template, it recovers the field values
//! by matching each descriptor's patterns against the input line by line.

use crate::descriptor::{self, Descriptor};
use crate::schema::DefinedMap;
use crate::{Result, XrbError};
use regex::Regex;
use std::collections::{HashMap, VecDeque};
use std::io::BufRead;
use tracing::debug;

/// Compiled patterns for one field, parallel to the descriptor list.
#[derive(Debug, Clone)]
struct FieldMatcher {
    /// Matches the field's rendered value within a line.
    value: Regex,

    /// Anchored form of the line pattern; the entire line must match.
    line: Regex,
}

/// A bidirectional text template.
///
/// The template text and its descriptor set are immutable once constructed.
/// Field values start unset and are populated either by the caller (for
/// rendering) or by [`Template::parse_reader`] (recovering them from
/// rendered text).
///
/// # Example
///
/// ```
/// use xrb_core::Template;
///
/// let mut template = Template::new("{name:[A-Za-z]+} = {val:[0-9]+}").unwrap();
/// template.set_field("name", "x").unwrap();
/// template.set_field("val", "5").unwrap();
/// assert_eq!(template.render().unwrap(), "x = 5");
/// ```
#[derive(Debug, Clone)]
pub struct Template {
    /// Original template text.
    content: String,

    /// Descriptors in template scan order. The order is load-bearing: parse
    /// consumes fields front-to-back in this order.
    descriptors: Vec<Descriptor>,

    /// Compiled patterns, index-parallel to `descriptors`.
    matchers: Vec<FieldMatcher>,

    /// Field values, keyed by the same frozen field set as the descriptors.
    values: DefinedMap<Option<String>>,
}

impl Template {
    /// Construct a template, scanning and indexing all descriptors once.
    ///
    /// Every value and line pattern is compiled here, so an invalid regex
    /// fails construction with [`XrbError::Pattern`] rather than surfacing
    /// later during parse.
    pub fn new(content: impl Into<String>) -> Result<Self> {
        let content = content.into();
        let descriptors = descriptor::scan(&content)?;

        let matchers = descriptors
            .iter()
            .map(|d| {
                Ok(FieldMatcher {
                    value: Regex::new(&d.value_pattern)?,
                    line: Regex::new(&format!("^(?:{})$", d.line_pattern_or_default()))?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let values = DefinedMap::new(
            descriptors.iter().map(|d| (d.name.clone(), None)),
            descriptors
                .iter()
                .map(|d| (d.name.clone(), format!("value matching /{}/", d.value_pattern))),
        )?;

        Ok(Self {
            content,
            descriptors,
            matchers,
            values,
        })
    }

    /// The original template text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Descriptors in template scan order.
    pub fn descriptors(&self) -> &[Descriptor] {
        &self.descriptors
    }

    /// Field names in template scan order.
    pub fn field_names(&self) -> Vec<&str> {
        self.descriptors.iter().map(|d| d.name.as_str()).collect()
    }

    /// Get the data stored in `field`, or `None` if it has not been set.
    pub fn get_field(&self, field: &str) -> Result<Option<&str>> {
        Ok(self.values.get(field)?.as_deref())
    }

    /// Set `field` to store `value`.
    pub fn set_field(&mut self, field: &str, value: impl Into<String>) -> Result<()> {
        self.values.set(field, Some(value.into()))
    }

    /// Replace all field values wholesale.
    ///
    /// The keys of `data` must be exactly the template's field set; fails
    /// with [`XrbError::SchemaMismatch`] otherwise, leaving values untouched.
    pub fn init_data<I, K, S>(&mut self, data: I) -> Result<()>
    where
        K: Into<String>,
        S: Into<String>,
        I: IntoIterator<Item = (K, S)>,
    {
        let data: HashMap<String, String> = data
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        if data.len() != self.descriptors.len() || !data.keys().all(|k| self.values.contains(k)) {
            return Err(XrbError::SchemaMismatch);
        }
        for (key, value) in data {
            self.values.set(&key, Some(value))?;
        }
        Ok(())
    }

    /// Render the template using the internally stored values.
    ///
    /// All-or-nothing: an unset field fails with [`XrbError::MissingData`]
    /// before any text is produced. Stored values are never mutated.
    pub fn render(&self) -> Result<String> {
        self.render_impl(&|name| match self.values.get(name)? {
            Some(value) => Ok(value.clone()),
            None => Err(XrbError::MissingData(name.to_string())),
        })
    }

    /// Render using an explicit map instead of the stored values.
    ///
    /// The map fully replaces the internal state for this call; the two are
    /// never blended. A field absent from the map fails with
    /// [`XrbError::MissingData`].
    pub fn render_with(&self, data: &HashMap<String, String>) -> Result<String> {
        self.render_impl(&|name| {
            data.get(name)
                .cloned()
                .ok_or_else(|| XrbError::MissingData(name.to_string()))
        })
    }

    fn render_impl(&self, lookup: &dyn Fn(&str) -> Result<String>) -> Result<String> {
        let mut rendered = String::with_capacity(self.content.len());
        for line in self.content.split_inclusive('\n') {
            rendered.push_str(&render_line(line, lookup)?);
        }
        Ok(rendered)
    }

    /// Recover field values from rendered text, populating internal state.
    ///
    /// Fields are searched strictly in template scan order, consuming the
    /// input line by line without backtracking: once a line is passed
    /// without completing the current field's match it is never revisited.
    /// A line must match the current field's line pattern in full before
    /// its value pattern is searched for within the line. After a value
    /// matches, subsequent fields are tried against the same line by value
    /// pattern alone; descriptors sharing a line are assumed to carry
    /// consistent line patterns.
    ///
    /// When input runs out first, fails with [`XrbError::FieldsNotFound`]
    /// listing the unmatched fields in search order, the in-flight field at
    /// the front. Fields matched before the failure point remain set.
    pub fn parse_reader<R: BufRead>(&mut self, reader: R) -> Result<()> {
        let mut pending: VecDeque<usize> = (0..self.descriptors.len()).collect();
        let mut current = match pending.pop_front() {
            Some(index) => index,
            None => return Ok(()),
        };

        for line in reader.lines() {
            let line = line?;
            if !self.matchers[current].line.is_match(&line) {
                continue;
            }
            while let Some(found) = self.matchers[current].value.find(&line) {
                let name = self.descriptors[current].name.clone();
                debug!(field = %name, value = found.as_str(), "field matched");
                self.values.set(&name, Some(found.as_str().to_string()))?;
                current = match pending.pop_front() {
                    Some(next) => next,
                    None => return Ok(()),
                };
            }
        }

        pending.push_front(current);
        let remaining = pending
            .iter()
            .map(|&i| self.descriptors[i].name.clone())
            .collect();
        Err(XrbError::FieldsNotFound(remaining))
    }
}

/// States of the line renderer. A descriptor is stripped down to its field
/// name by suppressing everything from the first `[` or `:` inside a brace
/// group up to the group's closing `}`, with nested braces tracked by depth.
enum RenderState {
    /// Copying literal text.
    Outside,
    /// Inside a brace group, accumulating the field name.
    Name,
    /// Inside a brace group, past the `[` or `:`; output suppressed.
    Suppressed,
}

/// Render a single template line, substituting each descriptor with the
/// value `lookup` returns for its field name.
fn render_line(line: &str, lookup: &dyn Fn(&str) -> Result<String>) -> Result<String> {
    if !line.contains('{') {
        // No substitution descriptors, render as is.
        return Ok(line.to_string());
    }

    let mut out = String::with_capacity(line.len());
    let mut state = RenderState::Outside;
    let mut depth = 0usize;
    let mut name = String::new();

    for c in line.chars() {
        match state {
            RenderState::Outside => {
                if c == '{' {
                    state = RenderState::Name;
                    depth = 1;
                    name.clear();
                } else {
                    out.push(c);
                }
            }
            RenderState::Name => match c {
                '[' | ':' => state = RenderState::Suppressed,
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        out.push_str(&lookup(name.trim())?);
                        state = RenderState::Outside;
                    }
                }
                _ => name.push(c),
            },
            RenderState::Suppressed => match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        out.push_str(&lookup(name.trim())?);
                        state = RenderState::Outside;
                    }
                }
                _ => {}
            },
        }
    }

    if !matches!(state, RenderState::Outside) {
        return Err(XrbError::MalformedTemplate(format!(
            "unterminated descriptor in line: {:?}",
            line.trim_end_matches(['\r', '\n'])
        )));
    }

    Ok(out)
}
