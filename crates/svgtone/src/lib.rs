#![forbid(unsafe_code)]

//! Merge a light and a dark variant of the same SVG artwork into one SVG that follows the
//! viewer's color scheme.
//!
//! Both variants are walked in lock-step by tree position. Wherever the dark variant uses a
//! different `fill` or `stroke`, the light element gets a `fill-<color>`/`stroke-<color>` class
//! and a `@media (prefers-color-scheme: dark)` block maps each class to its dark color.
//!
//! ```
//! let light = r##"<svg xmlns="http://www.w3.org/2000/svg"><rect fill="#fff"/></svg>"##;
//! let dark = r##"<svg xmlns="http://www.w3.org/2000/svg"><rect fill="#000"/></svg>"##;
//! let merged = svgtone::merge_svg(light, dark, &svgtone::MergeOptions::default()).unwrap();
//! assert!(merged.svg.contains(r#"class="fill-000000""#));
//! assert!(merged.svg.contains(".fill-000000 { fill: #000000; }"));
//! ```

pub mod align;
pub mod classes;
pub mod color;
pub mod diff;
pub mod dom;
pub mod error;
pub mod fallback;
pub mod files;
pub mod merge;
pub mod stylesheet;

pub use color::{ColorKey, PaintKind, normalize};
pub use dom::{Document, Element, Node};
pub use error::{DocumentRole, Error, Result};
pub use files::{InputPaths, Suffixes, read_inputs, write_output};
pub use merge::{MergeOptions, MergeOutput, MergeStats, merge_documents, merge_files, merge_svg};
