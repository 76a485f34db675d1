//! Command-line argument definitions for the tikzcd CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the input and output encodings, the
//! files to read and write, configuration file selection, and logging
//! verbosity.

use clap::{Parser, ValueEnum};

/// Encodings a diagram can be read from.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// `tikzcd` markup
    Tex,
    /// Compact diagram JSON
    Json,
    /// Base64-encoded diagram JSON
    Base64,
    /// lz-string compressed diagram JSON
    Compressed,
    /// Editor permalink, or a bare payload in either encoding
    Link,
}

/// Encodings a diagram can be written to.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// `tikzcd` markup
    Tex,
    /// Compact diagram JSON
    Json,
    /// Base64-encoded diagram JSON
    Base64,
    /// lz-string compressed diagram JSON
    Compressed,
    /// Editor permalink
    Link,
}

/// Command-line arguments for the tikzcd converter
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input file, or `-` for standard input
    #[arg(help = "Path to the input file, or `-` for standard input")]
    pub input: String,

    /// Path to the output file; standard output when omitted
    #[arg(short, long)]
    pub output: Option<String>,

    /// Encoding of the input
    #[arg(long, value_enum, default_value_t = InputFormat::Tex)]
    pub from: InputFormat,

    /// Encoding of the output
    #[arg(long, value_enum, default_value_t = OutputFormat::Tex)]
    pub to: OutputFormat,

    /// Pad markup columns to a common width
    #[arg(long, overrides_with = "no_align")]
    pub align: bool,

    /// Do not pad markup columns
    #[arg(long, overrides_with = "align")]
    pub no_align: bool,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Alignment requested on the command line, if any.
    pub fn align_override(&self) -> Option<bool> {
        match (self.align, self.no_align) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}
