use std::borrow::Cow;
use std::fmt;

/// The two color-bearing presentation attributes that get themed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PaintKind {
    Fill,
    Stroke,
}

impl PaintKind {
    /// Processing order; also the order classes are appended and rules are emitted.
    pub const ALL: [PaintKind; 2] = [PaintKind::Fill, PaintKind::Stroke];

    /// Attribute name on the element, which is also the CSS property name.
    pub fn as_str(self) -> &'static str {
        match self {
            PaintKind::Fill => "fill",
            PaintKind::Stroke => "stroke",
        }
    }
}

impl fmt::Display for PaintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized color value used for equality comparison.
///
/// Hex colors are lowercase, unprefixed and 6-digit expanded. Anything else (named colors,
/// `rgb(...)`, `currentcolor`) is an opaque lowercase key with canonical spacing. The literal
/// `none` is kept as a sentinel that never produces a class or rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColorKey(String);

impl ColorKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_none_sentinel(&self) -> bool {
        self.0 == "none"
    }

    pub fn is_hex(&self) -> bool {
        matches!(self.0.len(), 3 | 4 | 6 | 8) && self.0.bytes().all(|b| b.is_ascii_hexdigit())
    }

    /// The value written into a generated CSS declaration.
    pub fn css_value(&self) -> Cow<'_, str> {
        if self.is_hex() {
            Cow::Owned(format!("#{}", self.0))
        } else {
            Cow::Borrowed(&self.0)
        }
    }

    /// Suffix used in generated class names; a class must stay a single token.
    ///
    /// Keys only ever contain single spaces, which become `_`, so distinct keys keep distinct
    /// suffixes.
    pub fn class_suffix(&self) -> Cow<'_, str> {
        if self.0.contains(' ') {
            Cow::Owned(self.0.replace(' ', "_"))
        } else {
            Cow::Borrowed(&self.0)
        }
    }
}

impl fmt::Display for ColorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Collapses whitespace runs to one space and drops spaces next to `(`, `)`, `,` and `/`, so
/// `rgb(1, 2, 3)` and `rgb(1,2,3)` compare equal. `trimmed` has no outer whitespace.
fn canonical_spacing(trimmed: &str) -> String {
    let is_sep = |c: char| matches!(c, '(' | ')' | ',' | '/');
    let mut out = String::with_capacity(trimmed.len());
    let mut gap = false;
    for ch in trimmed.chars() {
        if ch.is_whitespace() {
            gap = true;
            continue;
        }
        if gap && !is_sep(ch) && !out.ends_with(is_sep) {
            out.push(' ');
        }
        gap = false;
        out.push(ch);
    }
    out
}

/// Canonicalizes a raw `fill`/`stroke` value.
///
/// Absent, blank, or bare `#` input yields `None`.
pub fn normalize(raw: Option<&str>) -> Option<ColorKey> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    let lower = canonical_spacing(raw).to_lowercase();
    let key = lower.strip_prefix('#').unwrap_or(&lower);
    if key.is_empty() {
        return None;
    }
    if key.len() == 3 && key.bytes().all(|b| b.is_ascii_hexdigit()) {
        let mut expanded = String::with_capacity(6);
        for c in key.chars() {
            expanded.push(c);
            expanded.push(c);
        }
        return Some(ColorKey(expanded));
    }
    Some(ColorKey(key.to_string()))
}

#[cfg(test)]
pub(crate) fn key(raw: &str) -> ColorKey {
    normalize(Some(raw)).unwrap()
}
