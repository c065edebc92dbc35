//! Difference Extractor: direct light/dark color differences for aligned pairs.

use crate::align::AlignedPair;
use crate::classes::PendingClasses;
use crate::color::{ColorKey, PaintKind, normalize};
use crate::dom::Element;
use crate::stylesheet::GeneratedClassSet;
use indexmap::IndexMap;

/// Light color → dark color tables learned from direct differences, one per paint kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorMapping {
    fill: IndexMap<ColorKey, ColorKey>,
    stroke: IndexMap<ColorKey, ColorKey>,
}

impl ColorMapping {
    fn table(&self, kind: PaintKind) -> &IndexMap<ColorKey, ColorKey> {
        match kind {
            PaintKind::Fill => &self.fill,
            PaintKind::Stroke => &self.stroke,
        }
    }

    fn table_mut(&mut self, kind: PaintKind) -> &mut IndexMap<ColorKey, ColorKey> {
        match kind {
            PaintKind::Fill => &mut self.fill,
            PaintKind::Stroke => &mut self.stroke,
        }
    }

    pub fn get(&self, kind: PaintKind, light: &ColorKey) -> Option<&ColorKey> {
        self.table(kind).get(light)
    }

    /// Records `light → dark`. A later mapping for the same light color replaces the earlier
    /// one. A light `none` is learned like any other key; `dark` is never `none`.
    pub fn record(&mut self, kind: PaintKind, light: ColorKey, dark: ColorKey) {
        if let Some(previous) = self.table(kind).get(&light) {
            if *previous != dark {
                tracing::warn!(
                    %kind,
                    light = %light,
                    previous = %previous,
                    dark = %dark,
                    "conflicting dark colors for the same light color; keeping the later one"
                );
            }
        }
        self.table_mut(kind).insert(light, dark);
    }

    pub fn len(&self, kind: PaintKind) -> usize {
        self.table(kind).len()
    }

    pub fn is_empty(&self) -> bool {
        self.fill.is_empty() && self.stroke.is_empty()
    }
}

/// A direct difference for one paint kind: the light key (if any) and the dark key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaintDifference {
    pub light: Option<ColorKey>,
    pub dark: ColorKey,
}

/// Compares one paint kind of an aligned pair.
///
/// A difference exists when the dark side has a color that is not `none` and does not equal
/// the light side; a missing light color counts as unequal.
pub fn paint_difference(
    light: &Element,
    dark: Option<&Element>,
    kind: PaintKind,
) -> Option<PaintDifference> {
    let dark = normalize(dark?.attr(kind.as_str()))?;
    if dark.is_none_sentinel() {
        return None;
    }
    let light = normalize(light.attr(kind.as_str()));
    if light.as_ref() == Some(&dark) {
        return None;
    }
    Some(PaintDifference { light, dark })
}

/// Result of the forward pass over all aligned pairs.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// One entry per aligned pair, same order.
    pub pending: Vec<PendingClasses>,
    /// Indices of pairs with no dark counterpart or no direct difference.
    pub unmatched: Vec<usize>,
    pub mapping: ColorMapping,
    pub fill_differences: usize,
    pub stroke_differences: usize,
}

/// Runs the Difference Extractor over every aligned pair, registering dark colors in
/// `classes` and learning the light → dark mapping.
pub fn extract_differences(
    pairs: &[AlignedPair<'_>],
    classes: &mut GeneratedClassSet,
) -> Extraction {
    let mut out = Extraction {
        pending: Vec::with_capacity(pairs.len()),
        ..Default::default()
    };

    for (idx, pair) in pairs.iter().enumerate() {
        let mut pending = PendingClasses::default();
        for kind in PaintKind::ALL {
            let Some(diff) = paint_difference(pair.light, pair.dark, kind) else {
                continue;
            };
            tracing::debug!(
                element = pair.light.name.as_str(),
                index = idx,
                %kind,
                light = ?diff.light.as_ref().map(ColorKey::as_str),
                dark = %diff.dark,
                "color difference"
            );
            match kind {
                PaintKind::Fill => out.fill_differences += 1,
                PaintKind::Stroke => out.stroke_differences += 1,
            }
            classes.insert(kind, diff.dark.clone());
            if let Some(light) = diff.light {
                out.mapping.record(kind, light, diff.dark.clone());
            }
            pending.set(kind, diff.dark);
        }
        if pending.is_empty() {
            out.unmatched.push(idx);
        }
        out.pending.push(pending);
    }

    out
}
