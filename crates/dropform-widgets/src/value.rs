#![forbid(unsafe_code)]

//! Form values: the current content of every field, keyed by name.

use std::path::{Path, PathBuf};

use crate::schema::FieldKind;

/// A file chosen for a file field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileHandle {
    pub path: PathBuf,
    /// Final path component, for display.
    pub name: String,
}

impl FileHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name }
    }

    /// Lower-cased extension without the dot.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
    }
}

impl From<PathBuf> for FileHandle {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&Path> for FileHandle {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}

impl From<&str> for FileHandle {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

/// The value of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    /// Empty or exactly one file.
    File(Option<FileHandle>),
}

impl FieldValue {
    /// The empty value for a field of `kind`.
    pub fn empty(kind: FieldKind) -> Self {
        match kind {
            FieldKind::File => Self::File(None),
            _ => Self::Text(String::new()),
        }
    }

    /// True when this value can be stored in a field of `kind`.
    pub fn fits(&self, kind: FieldKind) -> bool {
        matches!(
            (self, kind.is_text_like()),
            (Self::Text(_), true) | (Self::File(_), false)
        )
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::File(f) => f.is_none(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileHandle> {
        match self {
            Self::File(f) => f.as_ref(),
            Self::Text(_) => None,
        }
    }
}

/// Ordered name to value mapping.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormValues {
    entries: Vec<(String, FieldValue)>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, FieldValue::Text(value.into()));
        self
    }

    #[must_use]
    pub fn with_file(mut self, name: impl Into<String>, file: impl Into<FileHandle>) -> Self {
        self.insert(name, FieldValue::File(Some(file.into())));
        self
    }

    /// Insert or replace, keeping the original position on replace.
    /// Returns the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) -> Option<FieldValue> {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut FieldValue> {
        self.entries
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Text of a text-like field; `None` for files or missing names.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    /// File of a file field, if one is set.
    pub fn file(&self, name: &str) -> Option<&FileHandle> {
        self.get(name).and_then(FieldValue::as_file)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Export as a JSON object. Files become `{ "name", "path" }`, an empty
    /// file field becomes `null`.
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .entries
            .iter()
            .map(|(name, value)| {
                let v = match value {
                    FieldValue::Text(s) => serde_json::Value::String(s.clone()),
                    FieldValue::File(None) => serde_json::Value::Null,
                    FieldValue::File(Some(f)) => serde_json::json!({
                        "name": f.name,
                        "path": f.path.to_string_lossy(),
                    }),
                };
                (name.clone(), v)
            })
            .collect();
        serde_json::Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_handle_name_and_extension() {
        let f = FileHandle::new("/tmp/pics/Photo.PNG");
        assert_eq!(f.name, "Photo.PNG");
        assert_eq!(f.extension().as_deref(), Some("png"));
        assert_eq!(FileHandle::new("/tmp/README").extension(), None);
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut v = FormValues::new().with_text("a", "1").with_text("b", "2");
        let prev = v.insert("a", FieldValue::Text("3".into()));
        assert_eq!(prev, Some(FieldValue::Text("1".into())));
        let names: Vec<&str> = v.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(v.text("a"), Some("3"));
    }

    #[test]
    fn typed_accessors() {
        let v = FormValues::new()
            .with_text("email", "a@b.com")
            .with_file("avatar", "/x/photo.png");
        assert_eq!(v.text("email"), Some("a@b.com"));
        assert_eq!(v.text("avatar"), None);
        assert_eq!(v.file("avatar").map(|f| f.name.as_str()), Some("photo.png"));
        assert!(v.file("missing").is_none());
    }

    #[test]
    fn empty_values_fit_their_kind() {
        for kind in [
            FieldKind::Text,
            FieldKind::Password,
            FieldKind::Email,
            FieldKind::File,
        ] {
            let v = FieldValue::empty(kind);
            assert!(v.is_empty());
            assert!(v.fits(kind));
        }
        assert!(!FieldValue::Text(String::new()).fits(FieldKind::File));
        assert!(!FieldValue::File(None).fits(FieldKind::Email));
    }

    #[cfg(feature = "json")]
    #[test]
    fn json_export() {
        let v = FormValues::new()
            .with_text("email", "a@b.com")
            .with_file("avatar", "/x/photo.png");
        let mut v2 = v.clone();
        v2.insert("cover", FieldValue::File(None));
        let json = v2.to_json();
        assert_eq!(json["email"], "a@b.com");
        assert_eq!(json["avatar"]["name"], "photo.png");
        assert_eq!(json["avatar"]["path"], "/x/photo.png");
        assert!(json["cover"].is_null());
    }
}
