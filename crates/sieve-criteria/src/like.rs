//! LIKE expression builder.
//!
//! A [`Like`] wraps a search term and renders it either as a SQL `LIKE`
//! pattern or as an anchored, case-insensitive regular expression for
//! document backends.
//!
//! ```
//! use sieve_criteria::Like;
//!
//! let like = Like::new("50%_off").escape().starts_with();
//! assert_eq!(like.sql_pattern(), r"50\%\_off%");
//! assert_eq!(like.regex_pattern(), "^50%_off.*$");
//! ```

/// Where the search term must appear in the matched text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LikeKind {
    /// The term is used as-is; wildcards inside it are honoured.
    #[default]
    Raw,
    /// Text starts with the term.
    StartsWith,
    /// Text ends with the term.
    EndsWith,
    /// Text contains the term.
    Contains,
}

/// A LIKE pattern value object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Like {
    value: String,
    kind: LikeKind,
    escape: bool,
}

impl Like {
    /// Creates a raw pattern from a search term.
    pub fn new(value: impl Into<String>) -> Self {
        Like {
            value: value.into(),
            kind: LikeKind::Raw,
            escape: false,
        }
    }

    /// Escapes `%`, `_` and `\` in the term so they match literally.
    pub fn escape(mut self) -> Self {
        self.escape = true;
        self
    }

    /// Sets whether the term is escaped.
    pub fn escaped(mut self, escape: bool) -> Self {
        self.escape = escape;
        self
    }

    /// Matches text starting with the term.
    pub fn starts_with(mut self) -> Self {
        self.kind = LikeKind::StartsWith;
        self
    }

    /// Matches text ending with the term.
    pub fn ends_with(mut self) -> Self {
        self.kind = LikeKind::EndsWith;
        self
    }

    /// Matches text containing the term.
    pub fn contains(mut self) -> Self {
        self.kind = LikeKind::Contains;
        self
    }

    /// The unescaped search term.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The pattern kind.
    pub fn kind(&self) -> LikeKind {
        self.kind
    }

    /// Whether the term is escaped.
    pub fn is_escaped(&self) -> bool {
        self.escape
    }

    /// Renders the SQL `LIKE` pattern.
    pub fn sql_pattern(&self) -> String {
        let term = if self.escape {
            let mut out = String::with_capacity(self.value.len());
            for c in self.value.chars() {
                if matches!(c, '\\' | '%' | '_') {
                    out.push('\\');
                }
                out.push(c);
            }
            out
        } else {
            self.value.clone()
        };

        match self.kind {
            LikeKind::Raw => term,
            LikeKind::StartsWith => format!("{}%", term),
            LikeKind::EndsWith => format!("%{}", term),
            LikeKind::Contains => format!("%{}%", term),
        }
    }

    /// Renders an anchored regular expression equivalent to the pattern.
    ///
    /// Escaped terms are quoted entirely; unescaped terms keep `%` and `_`
    /// as wildcards.
    pub fn regex_pattern(&self) -> String {
        let term = if self.escape {
            regex::escape(&self.value)
        } else {
            wildcards_to_regex(&self.value)
        };

        match self.kind {
            LikeKind::Raw => format!("^{}$", term),
            LikeKind::StartsWith => format!("^{}.*$", term),
            LikeKind::EndsWith => format!("^.*{}$", term),
            LikeKind::Contains => format!("^.*{}.*$", term),
        }
    }
}

fn wildcards_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut literal = String::new();
    for c in pattern.chars() {
        match c {
            '%' | '_' => {
                out.push_str(&regex::escape(&literal));
                literal.clear();
                out.push_str(if c == '%' { ".*" } else { "." });
            }
            other => literal.push(other),
        }
    }
    out.push_str(&regex::escape(&literal));
    out
}
