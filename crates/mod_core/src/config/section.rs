//! Config sections

/// A section in a config handler
///
/// Sections are matched by name case-insensitively and map onto the
/// lowercased category of the same name in the backing configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: String,
    lang: String,
    comment: Option<String>,
}

impl Section {
    pub(crate) fn new(name: impl Into<String>, lang_key: impl AsRef<str>, comment: Option<String>) -> Self {
        Self {
            name: name.into(),
            lang: format!("section.{}", lang_key.as_ref()),
            comment,
        }
    }

    /// Section name as registered
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Language key used by the settings UI, `section.<lang>`
    pub fn lang_key(&self) -> &str {
        &self.lang
    }

    /// Section comment
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Lowercased name, as used for the backing category
    pub fn lc(&self) -> String {
        self.name.to_lowercase()
    }

    /// Whether `name` refers to this section (case-insensitive)
    pub fn is_named(&self, name: &str) -> bool {
        self.lc() == name.to_lowercase()
    }
}
