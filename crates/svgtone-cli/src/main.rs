use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use svgtone::{InputPaths, MergeOptions, MergeStats, Suffixes};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Merge(svgtone::Error),
    Json(serde_json::Error),
    Batch { failed: usize, total: usize },
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Merge(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Batch { failed, total } => write!(f, "{failed} of {total} merges failed"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<svgtone::Error> for CliError {
    fn from(value: svgtone::Error) -> Self {
        Self::Merge(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Default)]
struct Args {
    bases: Vec<String>,
    out: Option<String>,
    light_suffix: Option<String>,
    dark_suffix: Option<String>,
    media_query: Option<String>,
    json: bool,
    verbose: bool,
}

#[derive(Serialize)]
struct ReportOut<'a> {
    base: &'a str,
    output: Option<&'a Path>,
    stats: &'a MergeStats,
}

fn usage() -> &'static str {
    "svgtone\n\
\n\
Merge <base>-LIGHT.svg and <base>-DARK.svg into <base>.svg, which follows the viewer's\n\
color scheme via a prefers-color-scheme stylesheet.\n\
\n\
USAGE:\n\
  svgtone [--out <path>|-] [--light-suffix <s>] [--dark-suffix <s>] [--media <query>] [--json] [--verbose] <base>...\n\
\n\
NOTES:\n\
  - A <base> ending in '/' names a directory holding <dir>/<name>-LIGHT.svg etc.\n\
  - --out overrides the output path (single <base> only); '-' writes the SVG to stdout.\n\
  - Several <base> arguments are merged independently; the exit status is non-zero if any fails.\n\
  - --json prints one JSON report per merge instead of the output path.\n\
  - Set RUST_LOG (e.g. RUST_LOG=debug) to control diagnostics on stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "--json" => args.json = true,
            "--verbose" | "-v" => args.verbose = true,
            "--out" | "-o" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "--light-suffix" => {
                let Some(s) = it.next().filter(|s| !s.is_empty()) else {
                    return Err(CliError::Usage(usage()));
                };
                args.light_suffix = Some(s.clone());
            }
            "--dark-suffix" => {
                let Some(s) = it.next().filter(|s| !s.is_empty()) else {
                    return Err(CliError::Usage(usage()));
                };
                args.dark_suffix = Some(s.clone());
            }
            "--media" => {
                let Some(q) = it.next().filter(|q| !q.trim().is_empty()) else {
                    return Err(CliError::Usage(usage()));
                };
                args.media_query = Some(q.trim().to_string());
            }
            "--" => args.bases.extend(it.by_ref().cloned()),
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            base => args.bases.push(base.to_string()),
        }
    }

    if args.bases.is_empty() || (args.out.is_some() && args.bases.len() > 1) {
        return Err(CliError::Usage(usage()));
    }
    Ok(args)
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Where one merge wrote its result. `None` means the SVG went to stdout.
struct Merged {
    output: Option<PathBuf>,
    stats: MergeStats,
}

fn merge_one(base: &str, args: &Args, options: &MergeOptions) -> Result<Merged, CliError> {
    let mut suffixes = Suffixes::default();
    if let Some(s) = &args.light_suffix {
        suffixes.light = s.clone();
    }
    if let Some(s) = &args.dark_suffix {
        suffixes.dark = s.clone();
    }
    let paths = InputPaths::from_base(base, &suffixes)?;
    tracing::debug!(
        light = %paths.light.display(),
        dark = %paths.dark.display(),
        "resolved inputs"
    );

    match args.out.as_deref() {
        None => {
            let stats = svgtone::merge_files(&paths, options)?;
            Ok(Merged {
                output: Some(paths.output),
                stats,
            })
        }
        Some("-") => {
            let (light, dark) = svgtone::read_inputs(&paths)?;
            let merged = svgtone::merge_svg(&light, &dark, options)?;
            std::io::stdout().lock().write_all(merged.svg.as_bytes())?;
            Ok(Merged {
                output: None,
                stats: merged.stats,
            })
        }
        Some(out) => {
            let (light, dark) = svgtone::read_inputs(&paths)?;
            let merged = svgtone::merge_svg(&light, &dark, options)?;
            let out = PathBuf::from(out);
            svgtone::write_output(&out, &merged.svg)?;
            Ok(Merged {
                output: Some(out),
                stats: merged.stats,
            })
        }
    }
}

fn report(base: &str, merged: &Merged, json: bool) -> Result<(), CliError> {
    if json {
        let out = ReportOut {
            base,
            output: merged.output.as_deref(),
            stats: &merged.stats,
        };
        let mut stdout = std::io::stdout().lock();
        serde_json::to_writer(&mut stdout, &out)?;
        writeln!(stdout)?;
    } else if let Some(path) = &merged.output {
        println!("{}", path.display());
    }
    Ok(())
}

fn run(args: Args) -> Result<(), CliError> {
    let mut options = MergeOptions::default();
    if let Some(q) = &args.media_query {
        options.media_query = q.clone();
    }

    if let [base] = args.bases.as_slice() {
        let merged = merge_one(base, &args, &options)?;
        return report(base, &merged, args.json);
    }

    // Each base is an independent merge; run them side by side and report in argument order.
    let (shared_args, shared_options) = (&args, &options);
    let results: Vec<Result<Merged, CliError>> = std::thread::scope(|s| {
        let handles: Vec<_> = shared_args
            .bases
            .iter()
            .map(|base| s.spawn(move || merge_one(base, shared_args, shared_options)))
            .collect();
        handles
            .into_iter()
            .map(|h| {
                h.join().unwrap_or_else(|_| {
                    Err(CliError::Io(std::io::Error::other("merge thread panicked")))
                })
            })
            .collect()
    });

    let mut failed = 0usize;
    for (base, result) in args.bases.iter().zip(results) {
        match result {
            Ok(merged) => report(base, &merged, args.json)?,
            Err(err) => {
                failed += 1;
                eprintln!("{base}: {err}");
            }
        }
    }

    if failed > 0 {
        return Err(CliError::Batch {
            failed,
            total: args.bases.len(),
        });
    }
    Ok(())
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    init_tracing(args.verbose);

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
