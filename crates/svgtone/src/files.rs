//! Input/output path conventions and file access around a merge.

use crate::error::{Error, ReadFailure, Result};
use std::path::{Path, PathBuf};

pub const DEFAULT_LIGHT_SUFFIX: &str = "-LIGHT.svg";
pub const DEFAULT_DARK_SUFFIX: &str = "-DARK.svg";
pub const OUTPUT_SUFFIX: &str = ".svg";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suffixes {
    pub light: String,
    pub dark: String,
}

impl Default for Suffixes {
    fn default() -> Self {
        Self {
            light: DEFAULT_LIGHT_SUFFIX.to_string(),
            dark: DEFAULT_DARK_SUFFIX.to_string(),
        }
    }
}

/// The two inputs and the output derived from one base identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPaths {
    pub light: PathBuf,
    pub dark: PathBuf,
    pub output: PathBuf,
}

impl InputPaths {
    /// Derives paths from `base`.
    ///
    /// `icons/star` → `icons/star-LIGHT.svg`, `icons/star-DARK.svg`, `icons/star.svg`.
    /// A base ending in a path separator names a directory that holds files named after
    /// itself: `icons/star/` → `icons/star/star-LIGHT.svg`, ….
    pub fn from_base(base: &str, suffixes: &Suffixes) -> Result<Self> {
        let invalid = || Error::InvalidBase {
            base: base.to_string(),
        };

        let is_dir = base.ends_with('/') || base.ends_with(std::path::MAIN_SEPARATOR);
        let path = Path::new(base);
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .ok_or_else(invalid)?;
        let dir = if is_dir {
            path.to_path_buf()
        } else {
            path.parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."))
        };

        Ok(Self {
            light: dir.join(format!("{name}{}", suffixes.light)),
            dark: dir.join(format!("{name}{}", suffixes.dark)),
            output: dir.join(format!("{name}{OUTPUT_SUFFIX}")),
        })
    }
}

/// Reads both inputs in parallel. Every unreadable path is reported, not just the first.
pub fn read_inputs(paths: &InputPaths) -> Result<(String, String)> {
    let (light, dark) = std::thread::scope(|s| {
        let dark = s.spawn(|| std::fs::read_to_string(&paths.dark));
        let light = std::fs::read_to_string(&paths.light);
        let dark = dark
            .join()
            .unwrap_or_else(|_| Err(std::io::Error::other("reader thread panicked")));
        (light, dark)
    });

    match (light, dark) {
        (Ok(light), Ok(dark)) => Ok((light, dark)),
        (light, dark) => {
            let failures = [(&paths.light, light.err()), (&paths.dark, dark.err())]
                .into_iter()
                .filter_map(|(path, err)| {
                    err.map(|source| ReadFailure {
                        path: path.clone(),
                        source,
                    })
                })
                .collect();
            Err(Error::ReadInput { failures })
        }
    }
}

pub fn write_output(path: &Path, svg: &str) -> Result<()> {
    std::fs::write(path, svg).map_err(|source| Error::WriteOutput {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_paths_next_to_base() {
        let p = InputPaths::from_base("icons/star", &Suffixes::default()).unwrap();
        assert_eq!(p.light, Path::new("icons/star-LIGHT.svg"));
        assert_eq!(p.dark, Path::new("icons/star-DARK.svg"));
        assert_eq!(p.output, Path::new("icons/star.svg"));
    }

    #[test]
    fn bare_name_resolves_in_current_dir() {
        let p = InputPaths::from_base("logo", &Suffixes::default()).unwrap();
        assert_eq!(p.light, Path::new("./logo-LIGHT.svg"));
        assert_eq!(p.output, Path::new("./logo.svg"));
    }

    #[test]
    fn trailing_separator_names_a_directory() {
        let p = InputPaths::from_base("icons/star/", &Suffixes::default()).unwrap();
        assert_eq!(p.light, Path::new("icons/star/star-LIGHT.svg"));
        assert_eq!(p.dark, Path::new("icons/star/star-DARK.svg"));
        assert_eq!(p.output, Path::new("icons/star/star.svg"));
    }

    #[test]
    fn custom_suffixes() {
        let suffixes = Suffixes {
            light: ".light.svg".to_string(),
            dark: ".dark.svg".to_string(),
        };
        let p = InputPaths::from_base("a/b", &suffixes).unwrap();
        assert_eq!(p.light, Path::new("a/b.light.svg"));
        assert_eq!(p.dark, Path::new("a/b.dark.svg"));
    }

    #[test]
    fn rejects_bases_without_a_name() {
        for base in ["", "/", ".."] {
            assert!(
                matches!(
                    InputPaths::from_base(base, &Suffixes::default()),
                    Err(Error::InvalidBase { .. })
                ),
                "{base}"
            );
        }
    }

    #[test]
    fn reports_every_missing_input() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path().join("missing");
        let paths = InputPaths::from_base(base.to_str().unwrap(), &Suffixes::default()).unwrap();

        let Err(Error::ReadInput { failures }) = read_inputs(&paths) else {
            panic!("expected ReadInput error");
        };
        let failed: Vec<_> = failures.iter().map(|f| f.path.clone()).collect();
        assert_eq!(failed, [paths.light.clone(), paths.dark.clone()]);
    }

    #[test]
    fn reports_only_the_missing_input() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path().join("half");
        let paths = InputPaths::from_base(base.to_str().unwrap(), &Suffixes::default()).unwrap();
        std::fs::write(&paths.light, "<svg/>").unwrap();

        let err = read_inputs(&paths).unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("missing input files:"), "{msg}");
        assert!(msg.contains(&paths.dark.display().to_string()), "{msg}");
        assert!(!msg.contains(&paths.light.display().to_string()), "{msg}");
    }

    #[test]
    fn reads_both_inputs() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path().join("ok");
        let paths = InputPaths::from_base(base.to_str().unwrap(), &Suffixes::default()).unwrap();
        std::fs::write(&paths.light, "<svg id=\"l\"/>").unwrap();
        std::fs::write(&paths.dark, "<svg id=\"d\"/>").unwrap();

        let (light, dark) = read_inputs(&paths).unwrap();
        assert_eq!(light, "<svg id=\"l\"/>");
        assert_eq!(dark, "<svg id=\"d\"/>");
    }
}
