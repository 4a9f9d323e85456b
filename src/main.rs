//! f90ops - Checker for legacy Fortran relational operators

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::fs::File;
use std::io::{self, Cursor, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use f90ops::format::{write_findings, write_warnings};
use f90ops::process::{check_file, config_for_source, fix_file};
use f90ops::{build_cli, parse_args, CliArgs, Config, Result, ScanReport};
use glob::Pattern;
use rayon::prelude::*;
use tracing::{debug, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

/// Fortran file extensions to process
const FORTRAN_EXTENSIONS: &[&str] = &[
    "f90", "f95", "f03", "f08", "f18", "F90", "F95", "F03", "F08", "F18",
];

/// Default maximum file size in bytes (100 MB)
/// Files larger than this are skipped to prevent memory exhaustion
const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Name used for stdin in reports
const STDIN_NAME: &str = "<stdin>";

/// Result of processing one input
enum Outcome {
    /// The input was checked or fixed
    Done {
        report: ScanReport,
        /// Whether the reported operators were rewritten
        fix: bool,
        /// Fixed text to print when fixing with `--stdout`
        fixed: Option<Vec<u8>>,
    },
    /// The input was skipped, with the reason
    Skipped(String),
}

/// Totals for the closing summary and the exit code
#[derive(Debug, Default)]
struct Summary {
    files: usize,
    findings: usize,
    fixed: usize,
    errors: usize,
}

impl Summary {
    /// 2 on any error, 1 when unfixed findings remain, 0 otherwise
    fn exit_status(&self) -> u8 {
        if self.errors > 0 {
            2
        } else if self.findings > 0 {
            1
        } else {
            0
        }
    }
}

fn main() -> ExitCode {
    let args = parse_args();
    init_logging(args.debug);

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}

/// Install the tracing subscriber
///
/// `RUST_LOG` wins when set; otherwise `--debug` selects the `debug` level.
fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .init();
}

fn run(args: &CliArgs) -> Result<ExitCode> {
    // Check if we should read from stdin
    let use_stdin =
        args.inputs.is_empty() || (args.inputs.len() == 1 && args.inputs[0].as_os_str() == "-");

    // If no inputs and running interactively, print usage; otherwise read from stdin
    if args.inputs.is_empty() && io::stdin().is_terminal() {
        build_cli().print_help()?;
        println!();
        return Ok(ExitCode::SUCCESS);
    }

    if use_stdin {
        // Use current directory for config discovery
        let config = build_config(args, None)?;
        return process_stdin(&config, args);
    }

    // An explicit config file applies to every input; otherwise each file
    // discovers its own
    let base_config = if args.config.is_some() {
        Some(build_config(args, None)?)
    } else {
        None
    };

    // Configure thread pool if --jobs specified
    if let Some(jobs) = args.jobs {
        if jobs > 0 {
            if let Err(e) = rayon::ThreadPoolBuilder::new()
                .num_threads(jobs)
                .build_global()
            {
                warn!("failed to configure thread pool: {e}");
            }
        }
    }

    let files = collect_files(args);
    if files.is_empty() {
        if !args.silent {
            eprintln!("No Fortran files found to check.");
        }
        return Ok(ExitCode::SUCCESS);
    }

    let process = |path: &PathBuf| -> Result<Outcome> {
        match base_config.as_ref() {
            Some(config) => process_single_file(path, config, args),
            None => build_config(args, Some(path.as_path()))
                .and_then(|config| process_single_file(path, &config, args)),
        }
    };

    // Reports are printed in input order, whichever way the files were processed
    let outcomes: Vec<Result<Outcome>> = if args.jobs == Some(1) {
        files.iter().map(process).collect()
    } else {
        files.par_iter().map(process).collect()
    };

    let mut summary = Summary::default();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (path, outcome) in files.iter().zip(outcomes) {
        let name = path.display().to_string();
        match outcome {
            Ok(outcome) => print_outcome(&mut out, &name, outcome, args, &mut summary)?,
            Err(e) => {
                summary.errors += 1;
                eprintln!("Error checking {name}: {e:#}");
            }
        }
    }
    out.flush()?;

    if !args.silent {
        print_summary(&summary);
    }

    Ok(ExitCode::from(summary.exit_status()))
}

/// Build configuration from CLI args and optional config file
///
/// If `for_path` is provided and no explicit config file is specified,
/// uses auto-discovery to find config files in parent directories.
fn build_config(args: &CliArgs, for_path: Option<&Path>) -> Result<Config> {
    let mut config = if let Some(config_path) = &args.config {
        debug!(path = %config_path.display(), "using explicit config file");
        Config::from_toml_file(config_path)
            .with_context(|| format!("failed to load config {}", config_path.display()))?
    } else {
        let start = match for_path {
            Some(path) => path.to_path_buf(),
            None => std::env::current_dir().unwrap_or_default(),
        };
        let discovered = Config::discover_config_files(&start);
        if discovered.is_empty() {
            debug!(path = %start.display(), "no config files discovered");
        } else {
            debug!(path = %start.display(), files = ?discovered, "discovered config files");
        }
        Config::from_discovered_files(&start)
    };

    // Override with CLI arguments
    if let Some(operators) = args.operators {
        config.set_operators(operators);
    }
    if args.fix {
        config.fix = true;
    }
    if args.no_warnings {
        config.warnings = false;
    }

    debug!(?config, "configuration");

    if let Some(error) = config.validate() {
        anyhow::bail!("Invalid configuration: {error}");
    }

    Ok(config)
}

/// Collect all files to process, handling directories and recursive flag
fn collect_files(args: &CliArgs) -> Vec<PathBuf> {
    let exclude_patterns: Vec<Pattern> = args
        .exclude
        .iter()
        .filter_map(|p| match Pattern::new(p) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                warn!("ignoring invalid exclude pattern '{p}': {e}");
                None
            }
        })
        .collect();

    let custom_extensions = &args.fortran_extensions;

    let mut files = Vec::new();

    for input in &args.inputs {
        if input.is_file() {
            if !is_excluded(input, &exclude_patterns) {
                files.push(input.clone());
            }
        } else if input.is_dir() {
            if args.recursive {
                // WalkDir reports symlink loops as errors, which are skipped
                for entry in WalkDir::new(input)
                    .follow_links(true)
                    .max_depth(256)
                    .sort_by_file_name()
                    .into_iter()
                    .filter_map(std::result::Result::ok)
                {
                    let path = entry.path();
                    if path.is_file()
                        && is_fortran_file(path, custom_extensions)
                        && !is_excluded(path, &exclude_patterns)
                    {
                        files.push(path.to_path_buf());
                    }
                }
            } else if let Ok(entries) = std::fs::read_dir(input) {
                // Non-recursive: only direct children
                let mut children: Vec<PathBuf> = entries
                    .filter_map(std::result::Result::ok)
                    .map(|entry| entry.path())
                    .filter(|path| {
                        path.is_file()
                            && is_fortran_file(path, custom_extensions)
                            && !is_excluded(path, &exclude_patterns)
                    })
                    .collect();
                children.sort();
                files.extend(children);
            }
        } else {
            // Missing inputs surface as read errors
            files.push(input.clone());
        }
    }

    files
}

/// Check if a path matches any exclusion pattern
fn is_excluded(path: &Path, patterns: &[Pattern]) -> bool {
    if patterns.is_empty() {
        return false;
    }

    let path_str = path.to_string_lossy();

    for pattern in patterns {
        // Match against full path
        if pattern.matches(&path_str) {
            return true;
        }

        // Match against each path component (file name and directories)
        for component in path.components() {
            if let std::path::Component::Normal(c) = component {
                if pattern.matches(&c.to_string_lossy()) {
                    return true;
                }
            }
        }
    }

    false
}

/// Count the number of lines in a byte buffer
#[allow(clippy::naive_bytecount)]
fn count_lines(contents: &[u8]) -> usize {
    let newlines = contents.iter().filter(|&&b| b == b'\n').count();
    if contents.is_empty() {
        0
    } else if contents.last() == Some(&b'\n') {
        newlines
    } else {
        newlines + 1
    }
}

/// Check if a file has a Fortran extension
/// Checks against both default extensions and any custom extensions provided
fn is_fortran_file(path: &Path, custom_extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            FORTRAN_EXTENSIONS.contains(&ext)
                || custom_extensions
                    .iter()
                    .any(|custom| custom.strip_prefix('.').unwrap_or(custom) == ext)
        })
}

/// Check or fix one file
fn process_single_file(path: &Path, config: &Config, args: &CliArgs) -> Result<Outcome> {
    // Check file size BEFORE reading to prevent memory exhaustion
    let metadata =
        std::fs::metadata(path).with_context(|| format!("failed to read {}", path.display()))?;
    let file_size = metadata.len();
    if file_size > DEFAULT_MAX_FILE_SIZE {
        return Ok(Outcome::Skipped(format!(
            "{} MB exceeds limit of {} MB",
            file_size / (1024 * 1024),
            DEFAULT_MAX_FILE_SIZE / (1024 * 1024)
        )));
    }

    let mut contents = Vec::new();
    File::open(path)
        .and_then(|mut file| file.read_to_end(&mut contents))
        .with_context(|| format!("failed to read {}", path.display()))?;

    if let Some(max_lines) = args.exclude_max_lines {
        let line_count = count_lines(&contents);
        if line_count > max_lines {
            return Ok(Outcome::Skipped(format!(
                "{line_count} lines exceeds limit of {max_lines}"
            )));
        }
    }

    let name = path.display().to_string();
    let file_config = config_for_source(config, &contents, &name);

    if file_config.fix {
        let mut output = Vec::new();
        let report = fix_file(Cursor::new(&contents), &mut output, &file_config, &name)?;
        if args.stdout {
            return Ok(Outcome::Done {
                report,
                fix: true,
                fixed: Some(output),
            });
        }
        if !report.findings.is_empty() {
            std::fs::write(path, &output)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        Ok(Outcome::Done {
            report,
            fix: true,
            fixed: None,
        })
    } else {
        let report = check_file(Cursor::new(&contents), &file_config, &name)?;
        Ok(Outcome::Done {
            report,
            fix: false,
            fixed: None,
        })
    }
}

/// Print one processed input and add it to the summary
///
/// When fixing, findings are not printed (they were rewritten) and the fixed
/// text is printed instead if requested.
fn print_outcome<W: Write>(
    out: &mut W,
    name: &str,
    outcome: Outcome,
    args: &CliArgs,
    summary: &mut Summary,
) -> Result<()> {
    match outcome {
        Outcome::Skipped(reason) => {
            if !args.silent {
                eprintln!("Skipping {name} ({reason})");
            }
        }
        Outcome::Done { report, fix, fixed } => {
            summary.files += 1;
            if fix {
                summary.fixed += report.findings.len();
            } else {
                summary.findings += report.findings.len();
            }
            if let Some(text) = fixed {
                out.write_all(&text)?;
            } else if !fix {
                write_findings(out, name, &report)?;
            } else if !args.silent && !report.findings.is_empty() {
                eprintln!("Fixed {} operators in {name}", report.findings.len());
            }
            write_warnings(&mut io::stderr().lock(), name, &report)?;
        }
    }
    Ok(())
}

fn print_summary(summary: &Summary) {
    if summary.fixed > 0 {
        eprintln!(
            "Fixed {} legacy operators in {} files, {} errors.",
            summary.fixed, summary.files, summary.errors
        );
    } else {
        eprintln!(
            "Found {} legacy operators in {} files, {} errors.",
            summary.findings, summary.files, summary.errors
        );
    }
}

/// Process input from stdin
///
/// Findings go to stdout; when fixing, the fixed text goes to stdout instead.
fn process_stdin(config: &Config, args: &CliArgs) -> Result<ExitCode> {
    let mut contents = Vec::new();
    io::stdin()
        .read_to_end(&mut contents)
        .context("failed to read stdin")?;

    let stdin_size = u64::try_from(contents.len()).unwrap_or(u64::MAX);
    if stdin_size > DEFAULT_MAX_FILE_SIZE {
        anyhow::bail!(
            "stdin input too large ({} MB exceeds limit of {} MB)",
            stdin_size / (1024 * 1024),
            DEFAULT_MAX_FILE_SIZE / (1024 * 1024)
        );
    }

    let file_config = config_for_source(config, &contents, STDIN_NAME);
    let outcome = if file_config.fix {
        let mut output = Vec::new();
        let report = fix_file(Cursor::new(&contents), &mut output, &file_config, STDIN_NAME)?;
        Outcome::Done {
            report,
            fix: true,
            fixed: Some(output),
        }
    } else {
        let report = check_file(Cursor::new(&contents), &file_config, STDIN_NAME)?;
        Outcome::Done {
            report,
            fix: false,
            fixed: None,
        }
    };

    let mut summary = Summary::default();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    print_outcome(&mut out, STDIN_NAME, outcome, args, &mut summary)?;
    out.flush()?;

    Ok(ExitCode::from(summary.exit_status()))
}
