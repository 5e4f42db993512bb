//! JSON path parsing
//!
//! Paths use the dot/bracket notation produced by the preview tree:
//!
//! - `$` - the document root (optional prefix)
//! - `.name` or a leading `name` - object member
//! - `['odd key']` / `["odd key"]` - quoted object member
//! - `[3]` - array element
//! - `.*` / `[*]` - every member or element

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A single step in a [`JsonPath`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathSegment {
    Key(String),
    Index(usize),
    Wildcard,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JsonPathError {
    #[error("Empty path")]
    Empty,

    #[error("Unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("Empty member name at position {0}")]
    EmptyMember(usize),

    #[error("Unterminated bracket starting at position {0}")]
    UnterminatedBracket(usize),

    #[error("Unterminated quoted member starting at position {0}")]
    UnterminatedQuote(usize),

    #[error("Invalid array index '{0}'")]
    InvalidIndex(String),
}

/// Parsed JSON path. An empty segment list addresses the root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct JsonPath {
    segments: Vec<PathSegment>,
}

type Chars<'a> = std::iter::Peekable<std::str::CharIndices<'a>>;

impl JsonPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn parse(input: &str) -> Result<Self, JsonPathError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(JsonPathError::Empty);
        }

        let mut chars = input.char_indices().peekable();
        let mut segments = Vec::new();

        // Without a `$` prefix the first member may appear bare ("items.name")
        let mut bare_allowed = true;
        if let Some(&(_, '$')) = chars.peek() {
            chars.next();
            bare_allowed = false;
        }

        while let Some(&(pos, ch)) = chars.peek() {
            match ch {
                '.' => {
                    chars.next();
                    segments.push(Self::parse_member(&mut chars, pos + 1)?);
                }
                '[' => {
                    chars.next();
                    segments.push(Self::parse_bracket(&mut chars, pos)?);
                }
                _ if bare_allowed => segments.push(Self::parse_member(&mut chars, pos)?),
                _ => return Err(JsonPathError::UnexpectedChar { ch, pos }),
            }
            bare_allowed = false;
        }

        Ok(Self { segments })
    }

    fn parse_member(chars: &mut Chars<'_>, start: usize) -> Result<PathSegment, JsonPathError> {
        let mut name = String::new();
        while let Some(&(_, c)) = chars.peek() {
            if c == '.' || c == '[' {
                break;
            }
            name.push(c);
            chars.next();
        }

        match name.as_str() {
            "" => Err(JsonPathError::EmptyMember(start)),
            "*" => Ok(PathSegment::Wildcard),
            _ => Ok(PathSegment::Key(name)),
        }
    }

    fn parse_bracket(chars: &mut Chars<'_>, open: usize) -> Result<PathSegment, JsonPathError> {
        let segment = match chars.peek().map(|&(_, c)| c) {
            None => return Err(JsonPathError::UnterminatedBracket(open)),
            Some(quote @ ('\'' | '"')) => {
                chars.next();
                let mut key = String::new();
                loop {
                    match chars.next() {
                        None => return Err(JsonPathError::UnterminatedQuote(open)),
                        Some((_, '\\')) => match chars.next() {
                            Some((_, escaped)) => key.push(escaped),
                            None => return Err(JsonPathError::UnterminatedQuote(open)),
                        },
                        Some((_, c)) if c == quote => break,
                        Some((_, c)) => key.push(c),
                    }
                }
                PathSegment::Key(key)
            }
            Some('*') => {
                chars.next();
                PathSegment::Wildcard
            }
            Some(_) => {
                let mut digits = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if c == ']' {
                        break;
                    }
                    digits.push(c);
                    chars.next();
                }
                if chars.peek().is_none() {
                    return Err(JsonPathError::UnterminatedBracket(open));
                }
                let trimmed = digits.trim();
                if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(JsonPathError::InvalidIndex(digits));
                }
                trimmed
                    .parse::<usize>()
                    .map(PathSegment::Index)
                    .map_err(|_| JsonPathError::InvalidIndex(digits))?
            }
        };

        match chars.next() {
            Some((_, ']')) => Ok(segment),
            Some((pos, ch)) => Err(JsonPathError::UnexpectedChar { ch, pos }),
            None => Err(JsonPathError::UnterminatedBracket(open)),
        }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments below the root
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Extend the path by an object member, e.g. when a tree node is picked
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.segments.push(PathSegment::Key(key.into()));
        self
    }

    /// Extend the path by an array element
    pub fn index(mut self, index: usize) -> Self {
        self.segments.push(PathSegment::Index(index));
        self
    }

    pub fn wildcard(mut self) -> Self {
        self.segments.push(PathSegment::Wildcard);
        self
    }
}

impl FromStr for JsonPath {
    type Err = JsonPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn is_plain_member(key: &str) -> bool {
    !key.is_empty()
        && key != "*"
        && key.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.segments {
            match segment {
                PathSegment::Key(key) if is_plain_member(key) => write!(f, ".{}", key)?,
                PathSegment::Key(key) => {
                    let escaped = key.replace('\\', "\\\\").replace('\'', "\\'");
                    write!(f, "['{}']", escaped)?
                }
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
                PathSegment::Wildcard => f.write_str("[*]")?,
            }
        }
        Ok(())
    }
}
