//! Class Annotator: merges generated class names into `class` attributes.

use crate::color::{ColorKey, PaintKind};
use crate::dom::Element;
use indexmap::IndexSet;

/// Deterministic class name for a dark color: `fill-<key>` / `stroke-<key>`.
pub fn class_name(kind: PaintKind, key: &ColorKey) -> String {
    format!("{kind}-{}", key.class_suffix())
}

/// The tokens of a `class` attribute, with set semantics and stable insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList(IndexSet<String>);

impl ClassList {
    pub fn parse(raw: &str) -> Self {
        Self(raw.split_whitespace().map(str::to_string).collect())
    }

    /// Returns `true` when the token was not already present.
    pub fn insert(&mut self, token: impl Into<String>) -> bool {
        self.0.insert(token.into())
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, token: &str) -> bool {
        self.0.contains(token)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn to_attr_value(&self) -> String {
        self.iter().collect::<Vec<_>>().join(" ")
    }
}

/// Dark colors decided for one light element, at most one per paint kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingClasses {
    fill: Option<ColorKey>,
    stroke: Option<ColorKey>,
}

impl PendingClasses {
    pub fn get(&self, kind: PaintKind) -> Option<&ColorKey> {
        match kind {
            PaintKind::Fill => self.fill.as_ref(),
            PaintKind::Stroke => self.stroke.as_ref(),
        }
    }

    pub fn set(&mut self, kind: PaintKind, key: ColorKey) {
        match kind {
            PaintKind::Fill => self.fill = Some(key),
            PaintKind::Stroke => self.stroke = Some(key),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fill.is_none() && self.stroke.is_none()
    }

    /// Class names in fill-before-stroke order.
    pub fn class_names(&self) -> impl Iterator<Item = String> + '_ {
        PaintKind::ALL
            .into_iter()
            .filter_map(|kind| self.get(kind).map(|key| class_name(kind, key)))
    }
}

/// Adds class tokens to `el`, keeping existing tokens and their order.
///
/// The attribute is left untouched when every token is already present. Returns whether the
/// element changed.
pub fn add_classes<I>(el: &mut Element, names: I) -> bool
where
    I: IntoIterator<Item = String>,
{
    let mut list = el.attr("class").map(ClassList::parse).unwrap_or_default();
    let mut changed = false;
    for name in names {
        changed |= list.insert(name);
    }
    if changed {
        el.set_attr("class", list.to_attr_value());
    }
    changed
}

/// Applies `pending` to the descendants of `root` in pre-order.
///
/// `pending[i]` belongs to the i-th element below the root, the same order the aligner
/// produces. Returns the number of elements whose `class` attribute changed.
pub fn apply_pending(root: &mut Element, pending: &[PendingClasses]) -> usize {
    fn walk<'p>(
        el: &mut Element,
        pending: &mut impl Iterator<Item = &'p PendingClasses>,
        changed: &mut usize,
    ) {
        for child in el.element_children_mut() {
            let Some(classes) = pending.next() else {
                return;
            };
            if !classes.is_empty() && add_classes(child, classes.class_names()) {
                *changed += 1;
            }
            walk(child, pending, changed);
        }
    }

    let mut changed = 0usize;
    walk(root, &mut pending.iter(), &mut changed);
    changed
}
