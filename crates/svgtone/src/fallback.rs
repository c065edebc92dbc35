//! Fallback Resolver: reuse color intent learned elsewhere in the same document.
//!
//! Runs strictly after the Difference Extractor has seen every pair. It only looks up the
//! finished [`ColorMapping`](crate::diff::ColorMapping) and never learns, so the order of
//! unmatched elements is irrelevant.

use crate::align::AlignedPair;
use crate::color::{PaintKind, normalize};
use crate::diff::Extraction;
use crate::stylesheet::GeneratedClassSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FallbackHits {
    pub fill: usize,
    pub stroke: usize,
}

/// Resolves every unmatched pair in `extraction` against its learned mapping.
pub fn resolve_fallbacks(
    pairs: &[AlignedPair<'_>],
    extraction: &mut Extraction,
    classes: &mut GeneratedClassSet,
) -> FallbackHits {
    let Extraction {
        pending,
        unmatched,
        mapping,
        ..
    } = extraction;
    let mut hits = FallbackHits::default();
    if mapping.is_empty() {
        return hits;
    }

    for &idx in unmatched.iter() {
        let light = pairs[idx].light;
        for kind in PaintKind::ALL {
            let Some(light_key) = normalize(light.attr(kind.as_str())) else {
                continue;
            };
            let Some(dark_key) = mapping.get(kind, &light_key) else {
                continue;
            };
            tracing::debug!(
                element = light.name.as_str(),
                index = idx,
                %kind,
                light = %light_key,
                dark = %dark_key,
                "fallback color"
            );
            classes.insert(kind, dark_key.clone());
            pending[idx].set(kind, dark_key.clone());
            match kind {
                PaintKind::Fill => hits.fill += 1,
                PaintKind::Stroke => hits.stroke += 1,
            }
        }
    }

    hits
}
