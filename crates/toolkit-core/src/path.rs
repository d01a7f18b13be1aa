//! Path template parsing.
//!
//! Endpoint paths such as `/crm/v3/objects/contacts/{contactId}` are split
//! into literal and placeholder segments. Both `{name}` and `:name`
//! placeholder styles are recognized.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\{([^{}/]+)\}|:([A-Za-z_][A-Za-z0-9_]*))$")
        .unwrap_or_else(|e| unreachable!("placeholder pattern is valid: {e}"))
});

/// One segment of a path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A fixed path segment, e.g. `contacts`.
    Literal(String),
    /// A placeholder, e.g. `id` for `{id}`.
    Placeholder(String),
}

impl Segment {
    /// Returns `true` for placeholder segments.
    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }
}

/// A parsed endpoint path.
///
/// # Examples
///
/// ```
/// use toolkit_engine_core::PathTemplate;
///
/// let template = PathTemplate::parse("/v1/persons/{id}");
/// assert_eq!(template.literal_count(), 2);
/// assert_eq!(template.placeholders(), vec!["id"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Parses a path, ignoring empty segments and any query string.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let path = path.split('?').next().unwrap_or_default();
        let segments = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|raw| match PLACEHOLDER.captures(raw) {
                Some(caps) => {
                    let name = caps
                        .get(1)
                        .or_else(|| caps.get(2))
                        .map_or(raw, |m| m.as_str());
                    Segment::Placeholder(name.to_string())
                }
                None => Segment::Literal(raw.to_string()),
            })
            .collect();
        Self { segments }
    }

    /// Returns the parsed segments in order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of literal (non-placeholder) segments.
    #[must_use]
    pub fn literal_count(&self) -> usize {
        self.segments.iter().filter(|s| !s.is_placeholder()).count()
    }

    /// Returns `true` if any segment is a placeholder.
    #[must_use]
    pub fn has_placeholders(&self) -> bool {
        self.segments.iter().any(Segment::is_placeholder)
    }

    /// Placeholder names in path order.
    #[must_use]
    pub fn placeholders(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Placeholder(name) => Some(name.as_str()),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// Renders the path with each placeholder replaced by `resolve(name)`.
    ///
    /// Literal segments are kept verbatim; substituted values are
    /// percent-encoded. Returns the first placeholder name `resolve` could
    /// not fill.
    ///
    /// # Errors
    ///
    /// Returns the name of the first unresolved placeholder.
    ///
    /// # Examples
    ///
    /// ```
    /// use toolkit_engine_core::PathTemplate;
    ///
    /// let template = PathTemplate::parse("/persons/{id}");
    /// let path = template
    ///     .render(|name| (name == "id").then(|| "a b".to_string()))
    ///     .unwrap();
    /// assert_eq!(path, "/persons/a%20b");
    /// ```
    pub fn render<F>(&self, mut resolve: F) -> Result<String, String>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut out = String::new();
        for segment in &self.segments {
            out.push('/');
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => {
                    let value = resolve(name).ok_or_else(|| name.clone())?;
                    out.push_str(&urlencoding::encode(&value));
                }
            }
        }
        if out.is_empty() {
            out.push('/');
        }
        Ok(out)
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => write!(f, "/{text}")?,
                Segment::Placeholder(name) => write!(f, "/{{{name}}}")?,
            }
        }
        Ok(())
    }
}
