#![forbid(unsafe_code)]

//! Form schema: the ordered list of field descriptors a form renders.

use std::collections::HashSet;
use std::fmt;

/// Largest span a field may claim (the grid has four columns).
pub const MAX_SPAN: u16 = 4;

/// What kind of input a field is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Free text.
    Text,
    /// Text rendered masked.
    Password,
    /// Text expected to hold an email address.
    Email,
    /// A drop target holding at most one file.
    File,
}

impl FieldKind {
    /// True for the kinds edited as text.
    #[inline]
    pub const fn is_text_like(self) -> bool {
        !matches!(self, FieldKind::File)
    }

    /// Short lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Password => "password",
            FieldKind::Email => "email",
            FieldKind::File => "file",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field of a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Key in the form values. Unique within a schema.
    pub name: String,
    /// Human-readable label drawn above the input.
    pub label: String,
    pub kind: FieldKind,
    /// Grid columns covered, 1..=4.
    pub span: u16,
    /// Hint shown while the field is empty.
    pub placeholder: Option<String>,
}

impl FieldDescriptor {
    /// Create a field spanning the full row.
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            span: MAX_SPAN,
            placeholder: None,
        }
    }

    pub fn text(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    pub fn password(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Password)
    }

    pub fn email(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Email)
    }

    pub fn file(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::File)
    }

    #[must_use]
    pub fn span(mut self, span: u16) -> Self {
        self.span = span;
        self
    }

    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }
}

/// Errors detected while building a [`FormSchema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The field at `index` has an empty name.
    EmptyName { index: usize },
    /// Two fields share a name.
    DuplicateName(String),
    /// A span outside `1..=4`.
    InvalidSpan { name: String, span: u16 },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName { index } => write!(f, "field #{index} has an empty name"),
            Self::DuplicateName(name) => write!(f, "duplicate field name `{name}`"),
            Self::InvalidSpan { name, span } => {
                write!(f, "field `{name}` has span {span}, expected 1..={MAX_SPAN}")
            }
        }
    }
}

impl std::error::Error for SchemaError {}

/// An ordered, validated list of fields. Order is render order and focus
/// order. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormSchema {
    fields: Vec<FieldDescriptor>,
}

impl FormSchema {
    /// Validate and wrap `fields`.
    pub fn new(fields: Vec<FieldDescriptor>) -> Result<Self, SchemaError> {
        let mut seen = HashSet::with_capacity(fields.len());
        for (index, field) in fields.iter().enumerate() {
            if field.name.is_empty() {
                return Err(SchemaError::EmptyName { index });
            }
            if !(1..=MAX_SPAN).contains(&field.span) {
                return Err(SchemaError::InvalidSpan {
                    name: field.name.clone(),
                    span: field.span,
                });
            }
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateName(field.name.clone()));
            }
        }
        Ok(Self { fields })
    }

    #[inline]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter()
    }
}

impl<'a> IntoIterator for &'a FormSchema {
    type Item = &'a FieldDescriptor;
    type IntoIter = std::slice::Iter<'a, FieldDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_full_span() {
        let f = FieldDescriptor::email("email", "Email");
        assert_eq!(f.span, 4);
        assert_eq!(f.kind, FieldKind::Email);
        assert!(f.placeholder.is_none());
    }

    #[test]
    fn rejects_empty_name() {
        let err = FormSchema::new(vec![
            FieldDescriptor::text("a", "A"),
            FieldDescriptor::text("", "B"),
        ])
        .unwrap_err();
        assert_eq!(err, SchemaError::EmptyName { index: 1 });
    }

    #[test]
    fn rejects_duplicate_name() {
        let err = FormSchema::new(vec![
            FieldDescriptor::text("a", "A"),
            FieldDescriptor::password("a", "Again"),
        ])
        .unwrap_err();
        assert_eq!(err, SchemaError::DuplicateName("a".into()));
        assert_eq!(err.to_string(), "duplicate field name `a`");
    }

    #[test]
    fn rejects_bad_span() {
        for span in [0, 5] {
            let err = FormSchema::new(vec![FieldDescriptor::text("a", "A").span(span)]).unwrap_err();
            assert!(matches!(err, SchemaError::InvalidSpan { .. }));
        }
    }

    #[test]
    fn lookup_preserves_order() {
        let schema = FormSchema::new(vec![
            FieldDescriptor::text("first", "First").span(2),
            FieldDescriptor::text("last", "Last").span(2),
            FieldDescriptor::file("avatar", "Avatar").placeholder("Add picture"),
        ])
        .unwrap();
        assert_eq!(schema.len(), 3);
        assert_eq!(schema.index_of("avatar"), Some(2));
        assert_eq!(schema.get("last").map(|f| f.span), Some(2));
        let names: Vec<&str> = schema.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["first", "last", "avatar"]);
    }

    #[test]
    fn text_like_kinds() {
        assert!(FieldKind::Password.is_text_like());
        assert!(!FieldKind::File.is_text_like());
        assert_eq!(FieldKind::File.to_string(), "file");
    }
}
