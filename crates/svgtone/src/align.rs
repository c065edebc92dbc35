//! Lock-step structural alignment of the light and dark trees.
//!
//! Children are paired by position among element siblings, never by tag or id. Both
//! variants come out of the same design tool, so position is the correspondence key; id-based
//! matching would silently misalign when ids differ between exports.

use crate::dom::Element;

/// A light element and the dark element at the same tree position, if the dark tree has one.
#[derive(Debug, Clone, Copy)]
pub struct AlignedPair<'a> {
    pub light: &'a Element,
    pub dark: Option<&'a Element>,
}

/// Pairs every descendant of `light` with its positional counterpart under `dark`.
///
/// The result covers each light element below the root exactly once, in pre-order. The roots
/// themselves are not paired. Dark children beyond the light child count are ignored; light
/// children beyond the dark child count are paired with `None`, and so are their descendants.
pub fn align<'a>(light: &'a Element, dark: &'a Element) -> Vec<AlignedPair<'a>> {
    let mut out = Vec::new();
    align_children(light, Some(dark), &mut out);
    out
}

fn align_children<'a>(
    light: &'a Element,
    dark: Option<&'a Element>,
    out: &mut Vec<AlignedPair<'a>>,
) {
    let mut dark_children = dark.into_iter().flat_map(Element::element_children);
    for light_child in light.element_children() {
        let dark_child = dark_children.next();
        out.push(AlignedPair {
            light: light_child,
            dark: dark_child,
        });
        align_children(light_child, dark_child, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    fn ids(pairs: &[AlignedPair<'_>]) -> Vec<(String, Option<String>)> {
        pairs
            .iter()
            .map(|p| {
                (
                    p.light.attr("id").unwrap_or("?").to_string(),
                    p.dark.map(|d| d.attr("id").unwrap_or("?").to_string()),
                )
            })
            .collect()
    }

    fn pair(l: &str, d: Option<&str>) -> (String, Option<String>) {
        (l.to_string(), d.map(str::to_string))
    }

    #[test]
    fn pairs_by_position_in_pre_order() {
        let light = Document::parse(
            r#"<svg><g id="g"><rect id="r1"/><rect id="r2"/></g><path id="p"/></svg>"#,
        )
        .unwrap();
        let dark = Document::parse(
            r#"<svg><g id="G"><rect id="R1"/><rect id="R2"/></g><path id="P"/></svg>"#,
        )
        .unwrap();

        let pairs = align(&light.root, &dark.root);
        assert_eq!(
            ids(&pairs),
            vec![
                pair("g", Some("G")),
                pair("r1", Some("R1")),
                pair("r2", Some("R2")),
                pair("p", Some("P")),
            ]
        );
    }

    #[test]
    fn missing_dark_siblings_pair_with_none_including_descendants() {
        let light = Document::parse(
            r#"<svg><rect id="a"/><rect id="b"/><g id="c"><circle id="d"/></g></svg>"#,
        )
        .unwrap();
        let dark = Document::parse(r#"<svg><rect id="A"/><rect id="B"/></svg>"#).unwrap();

        let pairs = align(&light.root, &dark.root);
        assert_eq!(
            ids(&pairs),
            vec![
                pair("a", Some("A")),
                pair("b", Some("B")),
                pair("c", None),
                pair("d", None),
            ]
        );
    }

    #[test]
    fn extra_dark_children_are_ignored() {
        let light = Document::parse(r#"<svg><g id="g"><rect id="a"/></g></svg>"#).unwrap();
        let dark = Document::parse(
            r#"<svg><g id="G"><rect id="A"/><rect id="B"/></g><rect id="C"/></svg>"#,
        )
        .unwrap();

        let pairs = align(&light.root, &dark.root);
        assert_eq!(
            ids(&pairs),
            vec![pair("g", Some("G")), pair("a", Some("A"))]
        );
    }

    #[test]
    fn subtree_mismatch_does_not_shift_later_siblings() {
        let light = Document::parse(
            r#"<svg><g id="g1"><rect id="a"/><rect id="b"/></g><g id="g2"><rect id="c"/></g></svg>"#,
        )
        .unwrap();
        let dark = Document::parse(
            r#"<svg><g id="G1"><rect id="A"/></g><g id="G2"><rect id="C"/></g></svg>"#,
        )
        .unwrap();

        let pairs = align(&light.root, &dark.root);
        assert_eq!(
            ids(&pairs),
            vec![
                pair("g1", Some("G1")),
                pair("a", Some("A")),
                pair("b", None),
                pair("g2", Some("G2")),
                pair("c", Some("C")),
            ]
        );
    }

    #[test]
    fn text_and_comment_nodes_do_not_count_as_siblings() {
        let light =
            Document::parse("<svg>\n  <!-- x -->\n  <rect id=\"a\"/>\n</svg>").unwrap();
        let dark = Document::parse("<svg><rect id=\"A\"/></svg>").unwrap();

        let pairs = align(&light.root, &dark.root);
        assert_eq!(ids(&pairs), vec![pair("a", Some("A"))]);
    }
}
