//! Stylesheet Generator: one conditional block of dark-mode overrides.

use crate::classes::class_name;
use crate::color::{ColorKey, PaintKind};
use indexmap::IndexSet;
use std::fmt::Write as _;

pub const DEFAULT_MEDIA_QUERY: &str = "(prefers-color-scheme: dark)";

/// Every (kind, dark color) pair used as a class anywhere in the document, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedClassSet {
    fill: IndexSet<ColorKey>,
    stroke: IndexSet<ColorKey>,
}

impl GeneratedClassSet {
    /// Registers a dark color. The `none` sentinel is never registered.
    pub fn insert(&mut self, kind: PaintKind, key: ColorKey) -> bool {
        if key.is_none_sentinel() {
            return false;
        }
        match kind {
            PaintKind::Fill => self.fill.insert(key),
            PaintKind::Stroke => self.stroke.insert(key),
        }
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, kind: PaintKind, key: &ColorKey) -> bool {
        match kind {
            PaintKind::Fill => self.fill.contains(key),
            PaintKind::Stroke => self.stroke.contains(key),
        }
    }

    pub fn len(&self) -> usize {
        self.fill.len() + self.stroke.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fill.is_empty() && self.stroke.is_empty()
    }

    /// All fill rules first, then stroke rules; each in first-discovered order.
    pub fn rules(&self) -> impl Iterator<Item = (PaintKind, &ColorKey)> {
        self.fill
            .iter()
            .map(|k| (PaintKind::Fill, k))
            .chain(self.stroke.iter().map(|k| (PaintKind::Stroke, k)))
    }
}

/// Escapes a class name for use in a CSS class selector.
fn escape_css_ident(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || !ch.is_ascii() {
            out.push(ch);
        } else {
            out.push('\\');
            out.push(ch);
        }
    }
    out
}

/// Renders the conditional block for `classes`.
///
/// The block is emitted even when there are no rules, so every merge produces exactly one.
pub fn render_stylesheet(classes: &GeneratedClassSet, media_query: &str) -> String {
    let mut css = String::new();
    let _ = writeln!(css);
    let _ = writeln!(css, "@media {media_query} {{");
    for (kind, key) in classes.rules() {
        let _ = writeln!(
            css,
            "  .{} {{ {kind}: {}; }}",
            escape_css_ident(&class_name(kind, key)),
            key.css_value()
        );
    }
    css.push_str("}\n");
    css
}
