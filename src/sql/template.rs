use serde::Serialize;

/// Reserved token substituted with a concrete column identifier during
/// field expansion. Never derived from end-user input; literal occurrences
/// in search text are neutralized by the dialect escaping rules.
pub const COLUMN_PLACEHOLDER: &str = "{{COLUMN}}";

/// One piece of a predicate template.
///
/// Templates are kept structured instead of as flat SQL text so that
/// parameter renumbering is an index rewrite rather than a textual
/// substitution. A textual rename of `@field1` can also match inside
/// `@field10`; an index rewrite cannot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    /// Verbatim SQL text.
    Literal(String),
    /// The column placeholder.
    Column,
    /// A named parameter, identified by its 1-based index (`field1`, ...).
    Param(usize),
}

/// A predicate template: a sequence of literal SQL fragments, column
/// placeholders, and parameter markers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn push_literal(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        // Coalesce adjacent literals so templates stay canonical.
        if let Some(Segment::Literal(last)) = self.segments.last_mut() {
            last.push_str(text);
        } else {
            self.segments.push(Segment::Literal(text.to_string()));
        }
    }

    pub fn push_column(&mut self) {
        self.segments.push(Segment::Column);
    }

    pub fn push_param(&mut self, index: usize) {
        self.segments.push(Segment::Param(index));
    }

    /// Renames every parameter marker `field(i)` to `field(i + offset)`.
    /// Parameter count and order are conserved.
    pub fn shift_params(&mut self, offset: usize) {
        for segment in &mut self.segments {
            if let Segment::Param(index) = segment {
                *index += offset;
            }
        }
    }

    /// Returns a copy with every column placeholder replaced by the given
    /// identifier. The identifier is trusted; quote it before calling if
    /// the dialect requires quoting.
    pub fn bind_column(&self, column: &str) -> Template {
        let mut bound = Template::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => bound.push_literal(text),
                Segment::Column => bound.push_literal(column),
                Segment::Param(index) => bound.push_param(*index),
            }
        }
        bound
    }

    /// Renders the template to SQL text, with `{{COLUMN}}` for column
    /// placeholders and `@fieldN` for parameter markers.
    pub fn render(&self) -> String {
        let mut sql = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => sql.push_str(text),
                Segment::Column => sql.push_str(COLUMN_PLACEHOLDER),
                Segment::Param(index) => {
                    sql.push('@');
                    sql.push_str(&param_name(*index));
                }
            }
        }
        sql
    }

    /// Parameter indices in order of first appearance.
    pub fn param_indices(&self) -> Vec<usize> {
        let mut seen = Vec::new();
        for segment in &self.segments {
            if let Segment::Param(index) = segment {
                if !seen.contains(index) {
                    seen.push(*index);
                }
            }
        }
        seen
    }
}

/// The name of the 1-based parameter `index` as it appears to drivers.
pub fn param_name(index: usize) -> String {
    format!("field{}", index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn like_template(index: usize) -> Template {
        let mut t = Template::new();
        t.push_column();
        t.push_literal(" LIKE '%' + ");
        t.push_param(index);
        t.push_literal(" + '%'");
        t
    }

    #[test]
    fn test_render_with_column_and_param() {
        let t = like_template(1);
        assert_eq!(t.render(), "{{COLUMN}} LIKE '%' + @field1 + '%'");
    }

    #[test]
    fn test_shift_params() {
        let mut t = like_template(1);
        t.shift_params(4);
        assert_eq!(t.render(), "{{COLUMN}} LIKE '%' + @field5 + '%'");
        assert_eq!(t.param_indices(), vec![5]);
    }

    #[test]
    fn test_shift_does_not_collide_adjacent_indices() {
        // field1 and field10 in the same template must stay distinct
        // through renumbering.
        let mut t = Template::new();
        t.push_param(1);
        t.push_literal(" AND ");
        t.push_param(10);
        t.shift_params(1);
        assert_eq!(t.render(), "@field2 AND @field11");
    }

    #[test]
    fn test_bind_column() {
        let t = like_template(1);
        let bound = t.bind_column("\"name\"");
        assert_eq!(bound.render(), "\"name\" LIKE '%' + @field1 + '%'");
        // original untouched
        assert_eq!(t.render(), "{{COLUMN}} LIKE '%' + @field1 + '%'");
    }

    #[test]
    fn test_push_literal_coalesces() {
        let mut t = Template::new();
        t.push_literal("a");
        t.push_literal("b");
        assert_eq!(t.segments().len(), 1);
        assert_eq!(t.render(), "ab");
    }

    #[test]
    fn test_param_name() {
        assert_eq!(param_name(1), "field1");
        assert_eq!(param_name(12), "field12");
    }
}
