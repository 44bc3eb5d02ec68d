//! # Pagination Cursor
//!
//! Paginated collaborators hand out opaque cursors of the form
//! `offset:<N>` and accept them back on the next call. The dispatcher never
//! looks inside; this module only pins down the token format so every
//! collaborator reads and writes it the same way.
//!
//! A missing or malformed cursor is treated as the start of the sequence.

use crate::result::Arguments;
use std::fmt;
use std::str::FromStr;

/// Prefix of every cursor token.
pub const CURSOR_PREFIX: &str = "offset:";

/// Argument key collaborators read the cursor from.
pub const CURSOR_ARG: &str = "cursor";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CursorError {
    #[error("cursor '{0}' does not start with 'offset:'")]
    MissingPrefix(String),
    #[error("cursor '{0}' does not carry a non-negative integer offset")]
    InvalidOffset(String),
}

/// Position in a paginated result sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cursor {
    offset: usize,
}

impl Cursor {
    pub const START: Cursor = Cursor { offset: 0 };

    pub fn new(offset: usize) -> Self {
        Self { offset }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Lenient parse: absent or invalid tokens resolve to [`Cursor::START`].
    pub fn parse(token: Option<&str>) -> Self {
        token
            .and_then(|raw| raw.parse::<Cursor>().ok())
            .unwrap_or(Self::START)
    }

    /// Read the `cursor` argument, tolerating absence and non-string values.
    pub fn from_args(args: &Arguments) -> Self {
        Self::parse(args.get(CURSOR_ARG).and_then(|value| value.as_str()))
    }

    /// Cursor positioned `count` items further along.
    pub fn advance(self, count: usize) -> Self {
        Self {
            offset: self.offset.saturating_add(count),
        }
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{CURSOR_PREFIX}{}", self.offset)
    }
}

impl FromStr for Cursor {
    type Err = CursorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix(CURSOR_PREFIX)
            .ok_or_else(|| CursorError::MissingPrefix(s.to_string()))?;
        // usize::from_str accepts a leading '+', the token format does not
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CursorError::InvalidOffset(s.to_string()));
        }
        digits
            .parse::<usize>()
            .map(Cursor::new)
            .map_err(|_| CursorError::InvalidOffset(s.to_string()))
    }
}

/// One page of a sequence plus the cursor for the next page, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<Cursor>,
}

/// Slice `items` starting at `cursor`, returning at most `limit` entries.
pub fn paginate<T: Clone>(items: &[T], cursor: Cursor, limit: usize) -> Page<T> {
    let start = cursor.offset().min(items.len());
    let end = start.saturating_add(limit).min(items.len());
    let next_cursor = (end < items.len()).then(|| Cursor::new(end));
    Page {
        items: items[start..end].to_vec(),
        next_cursor,
    }
}
