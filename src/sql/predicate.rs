use serde::Serialize;

use super::template::{param_name, Template};

/// An intermediate predicate: a structured template plus the sanitized
/// parameter values it references, in index order (`params[0]` backs
/// `field1`, and so on).
///
/// The empty value (`Predicate::unsupported()`) is the sentinel for a node
/// that contributes nothing to the output: its template and parameter list
/// are both empty, and it is silently skipped by every merge step.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Predicate {
    template: Template,
    params: Vec<String>,
}

impl Predicate {
    /// The "this node contributes nothing" sentinel.
    pub fn unsupported() -> Self {
        Self::default()
    }

    /// A predicate over a single parameter. The template should reference
    /// `Param(1)` exactly once.
    pub fn single(template: Template, value: impl Into<String>) -> Self {
        Self {
            template,
            params: vec![value.into()],
        }
    }

    pub fn is_unsupported(&self) -> bool {
        self.template.is_empty() && self.params.is_empty()
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    pub(crate) fn push_literal(&mut self, text: &str) {
        self.template.push_literal(text);
    }

    /// Appends another predicate's template and parameters, renumbering the
    /// appended parameters to continue after this predicate's own. This is
    /// the merge primitive behind boolean grouping and field expansion.
    pub(crate) fn append(&mut self, other: Predicate) {
        let Predicate {
            mut template,
            params,
        } = other;
        template.shift_params(self.params.len());
        for segment in template.segments() {
            match segment {
                super::template::Segment::Literal(text) => self.template.push_literal(text),
                super::template::Segment::Column => self.template.push_column(),
                super::template::Segment::Param(index) => self.template.push_param(*index),
            }
        }
        self.params.extend(params);
    }

    /// Appends `(other)`.
    pub(crate) fn append_wrapped(&mut self, other: Predicate) {
        self.push_literal("(");
        self.append(other);
        self.push_literal(")");
    }

    /// Returns a copy with the column placeholder bound to a concrete
    /// identifier, parameters unchanged.
    pub(crate) fn bind_column(&self, column: &str) -> Predicate {
        Predicate {
            template: self.template.bind_column(column),
            params: self.params.clone(),
        }
    }

    /// Checks the contiguity invariant: the template references exactly the
    /// parameters `field1..fieldN`, first appearances in ascending order.
    pub fn is_contiguous(&self) -> bool {
        let indices = self.template.param_indices();
        indices.len() == self.params.len()
            && indices.iter().enumerate().all(|(pos, index)| *index == pos + 1)
    }

    /// Renders into the public output form.
    pub fn into_parameterized_sql(self) -> ParameterizedSql {
        let sql = self.template.render();
        let parameters = self
            .params
            .into_iter()
            .enumerate()
            .map(|(pos, value)| (param_name(pos + 1), value))
            .collect();
        ParameterizedSql { sql, parameters }
    }
}

/// The compiler's output: a SQL template and the named parameter values it
/// references, in `field1..fieldN` order.
///
/// An empty `sql` means the query had no supported content; check
/// [`ParameterizedSql::is_empty`] before using the result. Parameter values
/// are data: bind them through the driver, never concatenate them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterizedSql {
    /// SQL text containing `{{COLUMN}}` placeholders (unless already
    /// expanded) and `@fieldN` parameter references.
    pub sql: String,
    /// `(name, value)` pairs in ascending parameter order.
    pub parameters: Vec<(String, String)>,
}

impl ParameterizedSql {
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty() && self.parameters.is_empty()
    }

    /// Looks up a parameter value by name.
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}
