//! `KEY=VALUE` configuration text and the ordered `ConfigMap`.
//!
//! Parsing accepts the usual `.env` dialect: blank lines and `#` comments
//! are skipped, an `export ` prefix is tolerated, and values may be wrapped
//! in single or double quotes.  Serialization is deterministic and always
//! parses back to the same map.

use std::fmt;

use zeroize::Zeroize;

use crate::errors::{Result, VaultError};

/// Ordered key → value configuration with unique keys.
///
/// Keys keep the position where they were first inserted; inserting an
/// existing key replaces its value in place.  All strings are wiped from
/// memory when the map is dropped.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ConfigMap {
    entries: Vec<(String, String)>,
}

impl ConfigMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value. Returns the previous value, if any.
    ///
    /// Any key is accepted here; `serialize` refuses keys that would not
    /// read back unchanged (see [`is_valid_key`]).
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        let (mut k, v) = self.entries.remove(idx);
        k.zeroize();
        Some(v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in map order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl Drop for ConfigMap {
    fn drop(&mut self) {
        for (k, v) in &mut self.entries {
            k.zeroize();
            v.zeroize();
        }
    }
}

// Values are secrets; only keys are ever printed.
impl fmt::Debug for ConfigMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.keys()).finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ConfigMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ConfigMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// Whether `key` survives a `serialize` → `parse` round trip.
///
/// Rejected: empty keys, surrounding whitespace, `=`, line breaks, a
/// leading `#` (read as a comment) and a leading `export ` (stripped).
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key.trim() == key
        && !key.contains(['=', '\n', '\r'])
        && !key.starts_with('#')
        && !key.starts_with("export ")
}

/// Parse a single line into a (key, value) pair.
///
/// Returns `None` for blank lines, comments, lines without `=`, and lines
/// whose key is not valid.
pub fn parse_line(line: &str) -> Option<(&str, String)> {
    let trimmed = line.trim();

    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);

    let (key, value) = trimmed.split_once('=')?;
    let key = key.trim();
    if !is_valid_key(key) {
        return None;
    }

    Some((key, unquote(value.trim())))
}

/// Whether a raw value opens a quote it never closes, e.g. the first line
/// of a multi-line value.
fn has_unterminated_quote(raw: &str) -> bool {
    let quote = match raw.chars().next() {
        Some(q @ ('"' | '\'')) => q,
        _ => return false,
    };
    if raw.len() < 2 || !raw.ends_with(quote) {
        return true;
    }
    // `"abc\"` ends in an escaped quote.
    quote == '"'
        && raw[1..raw.len() - 1]
            .chars()
            .rev()
            .take_while(|c| *c == '\\')
            .count()
            % 2
            == 1
}

/// Strip matching surrounding quotes. Double quotes support `\\`, `\"`,
/// `\n` and `\r` escapes; single quotes are literal.
fn unquote(value: &str) -> String {
    if let Some(inner) = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .filter(|_| value.len() >= 2)
    {
        let mut out = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            if c != '\\' {
                out.push(c);
                continue;
            }
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        }
        return out;
    }

    if let Some(inner) = value
        .strip_prefix('\'')
        .and_then(|v| v.strip_suffix('\''))
        .filter(|_| value.len() >= 2)
    {
        return inner.to_string();
    }

    value.to_string()
}

/// Lines of a text that did not make it into the map intact.
///
/// Line numbers are 1-based. Contents are never kept, since they may
/// hold secrets.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Skipped {
    /// Non-blank, non-comment lines that produced no entry.
    pub unparsed: Vec<usize>,
    /// Entries whose value opens a quote and never closes it.
    pub unterminated: Vec<usize>,
    /// Comment lines.
    pub comments: usize,
}

impl Skipped {
    /// Whether anything other than comments and blank lines was lost.
    pub fn loses_data(&self) -> bool {
        !self.unparsed.is_empty() || !self.unterminated.is_empty()
    }

    /// e.g. `line 3 (unterminated quote), line 4 (not KEY=VALUE)`.
    pub fn describe(&self) -> String {
        let mut lines: Vec<(usize, &str)> = self
            .unterminated
            .iter()
            .map(|n| (*n, "unterminated quote"))
            .chain(self.unparsed.iter().map(|n| (*n, "not KEY=VALUE")))
            .collect();
        lines.sort_unstable();
        lines
            .iter()
            .map(|(n, why)| format!("line {n} ({why})"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Parse configuration text into a `ConfigMap`.
///
/// Duplicate keys: the last assignment wins, as in shell-style env files.
pub fn parse(text: &str) -> ConfigMap {
    parse_reporting(text).0
}

/// Like [`parse`], also reporting what was left out.
pub fn parse_reporting(text: &str) -> (ConfigMap, Skipped) {
    let mut map = ConfigMap::new();
    let mut skipped = Skipped::default();

    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.starts_with('#') {
            skipped.comments += 1;
            continue;
        }
        match parse_line(line) {
            Some((key, value)) => {
                let raw = line.split_once('=').map_or("", |(_, v)| v.trim());
                if has_unterminated_quote(raw) {
                    skipped.unterminated.push(idx + 1);
                }
                map.insert(key, value);
            }
            None => skipped.unparsed.push(idx + 1),
        }
    }

    (map, skipped)
}

/// Serialize a `ConfigMap` into `KEY=VALUE` lines, one per entry.
///
/// Fails with `InvalidKey` for a key that would not parse back as itself.
pub fn serialize(map: &ConfigMap) -> Result<String> {
    let mut out = String::new();
    for (key, value) in map.iter() {
        if !is_valid_key(key) {
            out.zeroize();
            return Err(VaultError::InvalidKey(key.to_string()));
        }
        out.push_str(key);
        out.push('=');
        if needs_quotes(value) {
            out.push('"');
            for c in value.chars() {
                match c {
                    '\\' => out.push_str("\\\\"),
                    '"' => out.push_str("\\\""),
                    '\n' => out.push_str("\\n"),
                    '\r' => out.push_str("\\r"),
                    other => out.push(other),
                }
            }
            out.push('"');
        } else {
            out.push_str(value);
        }
        out.push('\n');
    }
    Ok(out)
}

fn needs_quotes(value: &str) -> bool {
    value.trim() != value
        || value.starts_with('"')
        || value.starts_with('\'')
        || value.contains(['#', '\n', '\r'])
}
