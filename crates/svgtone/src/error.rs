use crate::dom::DomError;
use std::fmt;
use std::path::PathBuf;

/// Which of the two inputs an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentRole {
    Light,
    Dark,
}

impl fmt::Display for DocumentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentRole::Light => f.write_str("light"),
            DocumentRole::Dark => f.write_str("dark"),
        }
    }
}

#[derive(Debug)]
pub struct ReadFailure {
    pub path: PathBuf,
    pub source: std::io::Error,
}

fn list_failures(failures: &[ReadFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("\n  {} ({})", f.path.display(), f.source))
        .collect()
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid base path `{base}`: expected a file name or a directory")]
    InvalidBase { base: String },

    #[error("missing input files:{}", list_failures(.failures))]
    ReadInput { failures: Vec<ReadFailure> },

    #[error("failed to parse {document} SVG: {source}")]
    Parse {
        document: DocumentRole,
        #[source]
        source: DomError,
    },

    #[error("failed to write {path}: {source}", path = .path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
