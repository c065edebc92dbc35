//! The merge pipeline and the stylesheet injector.

use crate::align::align;
use crate::color::PaintKind;
use crate::classes::apply_pending;
use crate::diff::extract_differences;
use crate::dom::{Document, Element, Node};
use crate::error::{DocumentRole, Error, Result};
use crate::fallback::resolve_fallbacks;
use crate::files::{InputPaths, read_inputs, write_output};
use crate::stylesheet::{DEFAULT_MEDIA_QUERY, GeneratedClassSet, render_stylesheet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOptions {
    /// Condition for the generated block, e.g. `(prefers-color-scheme: dark)`.
    pub media_query: String,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            media_query: DEFAULT_MEDIA_QUERY.to_string(),
        }
    }
}

/// Counters describing one merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct MergeStats {
    /// Light elements below the root (one aligned pair each).
    pub aligned: usize,
    /// Light elements with no dark element at the same position.
    pub without_counterpart: usize,
    pub direct_fill: usize,
    pub direct_stroke: usize,
    pub fallback_fill: usize,
    pub fallback_stroke: usize,
    /// Elements whose `class` attribute changed.
    pub annotated: usize,
    /// Rules in the generated block.
    pub rules: usize,
}

#[derive(Debug, Clone)]
pub struct MergeOutput {
    pub svg: String,
    pub stats: MergeStats,
}

/// Merges two SVG sources. The light document is the base of the result.
pub fn merge_svg(light: &str, dark: &str, options: &MergeOptions) -> Result<MergeOutput> {
    let mut light_doc = Document::parse(light).map_err(|source| Error::Parse {
        document: DocumentRole::Light,
        source,
    })?;
    let dark_doc = Document::parse(dark).map_err(|source| Error::Parse {
        document: DocumentRole::Dark,
        source,
    })?;

    let stats = merge_documents(&mut light_doc, &dark_doc, options);
    Ok(MergeOutput {
        svg: light_doc.to_svg_string(),
        stats,
    })
}

/// Annotates `light` in place with dark-mode classes and appends the generated stylesheet.
pub fn merge_documents(light: &mut Document, dark: &Document, options: &MergeOptions) -> MergeStats {
    let mut stats = MergeStats::default();

    let (pending, classes) = {
        let pairs = align(&light.root, &dark.root);
        let mut classes = GeneratedClassSet::default();
        let mut extraction = extract_differences(&pairs, &mut classes);
        tracing::debug!(
            fill = extraction.mapping.len(PaintKind::Fill),
            stroke = extraction.mapping.len(PaintKind::Stroke),
            "learned light to dark mappings"
        );
        let hits = resolve_fallbacks(&pairs, &mut extraction, &mut classes);

        stats.aligned = pairs.len();
        stats.without_counterpart = pairs.iter().filter(|p| p.dark.is_none()).count();
        stats.direct_fill = extraction.fill_differences;
        stats.direct_stroke = extraction.stroke_differences;
        stats.fallback_fill = hits.fill;
        stats.fallback_stroke = hits.stroke;
        (extraction.pending, classes)
    };

    stats.annotated = apply_pending(&mut light.root, &pending);
    stats.rules = classes.len();
    if classes.is_empty() {
        tracing::debug!("no color differences; emitting an empty block");
    }
    inject_stylesheet(
        &mut light.root,
        &render_stylesheet(&classes, &options.media_query),
    );

    tracing::info!(
        aligned = stats.aligned,
        without_counterpart = stats.without_counterpart,
        direct_fill = stats.direct_fill,
        direct_stroke = stats.direct_stroke,
        fallback_fill = stats.fallback_fill,
        fallback_stroke = stats.fallback_stroke,
        rules = stats.rules,
        "merged light/dark SVG"
    );
    stats
}

/// Appends `css` to the root's `<style>` child, creating an empty one as the first child when
/// there is none. Existing style content is kept.
///
/// A created element reuses the root's namespace prefix, so `<svg:svg>` gets `<svg:style>`.
pub fn inject_stylesheet(root: &mut Element, css: &str) {
    let existing = root
        .children
        .iter()
        .position(|c| matches!(c, Node::Element(el) if el.local_name() == "style"));
    let idx = match existing {
        Some(idx) => idx,
        None => {
            let tag = match root.name.split_once(':') {
                Some((prefix, _)) => format!("{prefix}:style"),
                None => "style".to_string(),
            };
            root.children.insert(0, Node::Element(Element::new(tag)));
            0
        }
    };
    if let Node::Element(style) = &mut root.children[idx] {
        style.push_text(css);
    }
}

/// Reads the inputs named by `paths`, merges them, and writes the result to `paths.output`.
///
/// Nothing is written unless both inputs were read and merged successfully.
pub fn merge_files(paths: &InputPaths, options: &MergeOptions) -> Result<MergeStats> {
    let (light, dark) = read_inputs(paths)?;
    let merged = merge_svg(&light, &dark, options)?;
    write_output(&paths.output, &merged.svg)?;
    Ok(merged.stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_style_as_first_child() {
        let mut doc = Document::parse(r#"<svg><rect/></svg>"#).unwrap();
        inject_stylesheet(&mut doc.root, ".a{}");
        assert_eq!(doc.to_svg_string(), "<svg><style>.a{}</style><rect/></svg>");
    }

    #[test]
    fn appends_to_existing_style() {
        let mut doc =
            Document::parse(r#"<svg><rect/><style>.keep { fill: red; }</style></svg>"#).unwrap();
        inject_stylesheet(&mut doc.root, "\n.a{}");
        assert_eq!(
            doc.to_svg_string(),
            "<svg><rect/><style>.keep { fill: red; }\n.a{}</style></svg>"
        );
    }

    #[test]
    fn created_style_uses_root_prefix() {
        let mut doc = Document::parse(
            r#"<svg:svg xmlns:svg="http://www.w3.org/2000/svg"><svg:rect/></svg:svg>"#,
        )
        .unwrap();
        inject_stylesheet(&mut doc.root, ".a{}");
        let out = doc.to_svg_string();
        assert_eq!(
            out,
            r#"<svg:svg xmlns:svg="http://www.w3.org/2000/svg"><svg:style>.a{}</svg:style><svg:rect/></svg:svg>"#
        );

        let reparsed = roxmltree::Document::parse(&out).unwrap();
        let style = reparsed.root_element().first_element_child().unwrap();
        assert!(style.has_tag_name(("http://www.w3.org/2000/svg", "style")));
    }

    #[test]
    fn nested_style_does_not_count_as_root_style() {
        let mut doc = Document::parse(r#"<svg><defs><style>.x{}</style></defs></svg>"#).unwrap();
        inject_stylesheet(&mut doc.root, ".a{}");
        assert_eq!(
            doc.to_svg_string(),
            "<svg><style>.a{}</style><defs><style>.x{}</style></defs></svg>"
        );
    }

    #[test]
    fn parse_errors_name_the_failing_document() {
        let err = merge_svg("<svg/>", "<svg>", &MergeOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::Parse {
                document: DocumentRole::Dark,
                ..
            }
        ));
        assert!(err.to_string().starts_with("failed to parse dark SVG: "));
    }

    #[test]
    fn stats_count_direct_and_fallback_hits() {
        let out = merge_svg(
            r##"<svg><rect fill="#fff"/><rect fill="#fff" stroke="#000"/><rect stroke="#000"/></svg>"##,
            r##"<svg><rect fill="#000"/><rect fill="#fff" stroke="#eee"/></svg>"##,
            &MergeOptions::default(),
        )
        .unwrap();
        assert_eq!(
            out.stats,
            MergeStats {
                aligned: 3,
                without_counterpart: 1,
                direct_fill: 1,
                direct_stroke: 1,
                fallback_fill: 0,
                fallback_stroke: 1,
                annotated: 3,
                rules: 2,
            }
        );
    }
}
