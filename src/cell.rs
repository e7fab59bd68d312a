use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// A single table cell.
///
/// Scraped metadata mixes scalars, missing markers and list-valued fields
/// (genres, producers, studios), so the cell type carries all of them as
/// explicit variants instead of relying on runtime type inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    /// Missing value
    Na,
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Text value
    Str(String),
    /// List of category labels
    List(Vec<String>),
}

impl Cell {
    /// Whether the cell is missing. A NaN float counts as missing.
    pub fn is_na(&self) -> bool {
        match self {
            Cell::Na => true,
            Cell::Float(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Numeric view of the cell, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(v) => Some(*v as f64),
            Cell::Float(v) if !v.is_nan() => Some(*v),
            _ => None,
        }
    }

    /// Normalize the cell to its list of category labels.
    ///
    /// Rules, in order: a list cell yields its labels as-is; a missing cell
    /// yields no labels; a text cell is parsed as a list literal and yields
    /// no labels when the parse fails; every other cell yields no labels.
    /// Malformed source data therefore degrades to "no labels" instead of
    /// failing the pipeline.
    pub fn labels(&self) -> Vec<String> {
        match self {
            Cell::List(items) => items.clone(),
            Cell::Na => Vec::new(),
            Cell::Str(text) => parse_list_literal(text).unwrap_or_default(),
            Cell::Int(_) | Cell::Float(_) => Vec::new(),
        }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Na => Ok(()),
            Cell::Int(v) => write!(f, "{}", v),
            Cell::Float(v) => write!(f, "{}", v),
            Cell::Str(s) => write!(f, "{}", s),
            Cell::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "'{}'", item.replace('\\', "\\\\").replace('\'', "\\'"))?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Parse a textual list literal such as `['Action', 'Comedy']`.
///
/// Accepts single- or double-quoted items (with backslash escapes) and bare
/// numeric items; anything else, including nested lists, fails the parse.
/// Returns `None` on any malformed input so callers can degrade to an empty
/// label list.
pub fn parse_list_literal(text: &str) -> Option<Vec<String>> {
    let trimmed = text.trim();
    let inner = trimmed.strip_prefix('[')?.strip_suffix(']')?;

    let mut items = Vec::new();
    let mut chars = inner.chars().peekable();

    loop {
        // Skip whitespace before an item
        while matches!(chars.peek(), Some(c) if c.is_whitespace()) {
            chars.next();
        }

        match chars.peek() {
            None => break,
            Some(&quote) if quote == '\'' || quote == '"' => {
                chars.next();
                let mut item = String::new();
                loop {
                    match chars.next()? {
                        '\\' => item.push(chars.next()?),
                        c if c == quote => break,
                        c => item.push(c),
                    }
                }
                items.push(item);
            }
            Some(_) => {
                let mut token = String::new();
                while let Some(&c) = chars.peek() {
                    if c == ',' {
                        break;
                    }
                    token.push(c);
                    chars.next();
                }
                let token = token.trim();
                // Bare items must be numeric literals
                if token.parse::<i64>().is_err() && token.parse::<f64>().is_err() {
                    return None;
                }
                items.push(token.to_string());
            }
        }

        // Skip whitespace after the item, then expect a comma or the end
        while matches!(chars.peek(), Some(c) if c.is_whitespace()) {
            chars.next();
        }
        match chars.next() {
            None => break,
            Some(',') => continue,
            Some(_) => return None,
        }
    }

    Some(items)
}
