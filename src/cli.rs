//! Argument handling shared by the `huff` and `puff` drivers.

use std::fmt::Display;
use std::io::{self, Write};
use std::path::PathBuf;

use log::trace;

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Suppress the banner, progress and reports.
    pub quiet: bool,
    /// Also print the per-byte code table.
    pub verbose: bool,
}

/// What the driver should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(Opts),
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CliError {
    #[error("Wrong number of arguments.")]
    WrongArgumentCount,
    #[error("unknown flag '{0}'")]
    UnknownFlag(String),
}

/// Parse the arguments that follow the program name.
///
/// Exactly two positional arguments are required: input then output.
/// Short flags may be combined (`-qv`). A lone `-` is taken as a path.
pub fn parse_args<I>(args: I) -> Result<Command, CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut quiet = false;
    let mut verbose = false;
    let mut paths = Vec::new();

    for arg in args {
        match arg.as_str() {
            "-q" | "--quiet" => quiet = true,
            "-v" | "--verbose" => verbose = true,
            "-h" | "--help" => return Ok(Command::Help),
            s if s.starts_with("--") => return Err(CliError::UnknownFlag(s.to_string())),
            // Handle combined short flags like -qv
            s if s.starts_with('-') && s.len() > 1 => {
                for ch in s[1..].chars() {
                    match ch {
                        'q' => quiet = true,
                        'v' => verbose = true,
                        'h' => return Ok(Command::Help),
                        _ => return Err(CliError::UnknownFlag(format!("-{ch}"))),
                    }
                }
            }
            s => paths.push(PathBuf::from(s)),
        }
    }

    let [input, output]: [PathBuf; 2] = paths
        .try_into()
        .map_err(|_| CliError::WrongArgumentCount)?;
    Ok(Command::Run(Opts {
        input,
        output,
        quiet,
        verbose,
    }))
}

/// First line printed by both drivers.
pub fn banner(program: &str) -> String {
    format!(
        "{}  (Version {})  order-0 Huffman {}",
        program.to_uppercase(),
        env!("CARGO_PKG_VERSION"),
        if program == "puff" { "decompressor" } else { "compressor" }
    )
}

pub fn usage(program: &str) -> String {
    format!(
        "USAGE: {program} [OPTIONS] infile outfile\n\
         \n\
         Options:\n\
         \x20 -q, --quiet        No banner, progress or statistics\n\
         \x20 -v, --verbose      Print the code of every byte that occurs\n\
         \x20 -h, --help         Show this help"
    )
}

/// Console output that honors `--quiet`.
#[derive(Debug, Clone, Copy)]
pub struct Console {
    pub quiet: bool,
}

impl Console {
    pub fn say(&self, msg: impl Display) {
        if !self.quiet {
            println!("{msg}");
        }
    }

    /// Progress callback that overwrites one line with `label: NK`.
    pub fn progress(&self, label: &'static str) -> impl FnMut(u64) {
        let quiet = self.quiet;
        move |bytes| {
            if quiet {
                return;
            }
            // Progress output is best-effort.
            if let Err(e) = write_progress(&mut io::stdout().lock(), label, bytes) {
                trace!("progress output failed: {e}");
            }
        }
    }

    /// Terminate a progress line with its final figure.
    pub fn done(&self, msg: impl Display) {
        self.say(format_args!("\r{msg}"));
    }
}

/// Overwrite the current line with `label: NK` and flush it.
fn write_progress(out: &mut impl Write, label: &str, bytes: u64) -> io::Result<()> {
    write!(out, "\r{label}: {}K", bytes / 1024)?;
    out.flush()
}
