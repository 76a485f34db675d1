//! tikzcd CLI library
//!
//! This module contains the core CLI logic for the tikzcd converter: read a
//! diagram in one encoding, write it in another.

pub mod error_adapter;

mod args;
mod config;
mod error;

pub use args::{Args, InputFormat, OutputFormat};
pub use config::ConfigError;
pub use error::CliError;

use std::{
    fs,
    io::{self, Read as _},
};

use log::{debug, info};

use tikzcd::{
    Converter, codec,
    config::{AppConfig, RenderConfig},
    identifier::SequentialIds,
    semantic::Diagram,
};

/// Read the whole input, from standard input when the path is `-`.
fn read_input(path: &str) -> io::Result<String> {
    if path == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        fs::read_to_string(path)
    }
}

/// Applies the command-line alignment switch on top of the loaded config.
fn effective_config(config: AppConfig, args: &Args) -> AppConfig {
    match args.align_override() {
        Some(align) => AppConfig::new(RenderConfig::new(align), config.permalink().clone()),
        None => config,
    }
}

fn decode(converter: &Converter, format: InputFormat, input: &str) -> Result<Diagram, CliError> {
    let mut ids = SequentialIds::default();
    let diagram = match format {
        InputFormat::Tex => converter.parse_with_ids(input, &mut ids)?,
        InputFormat::Json => codec::from_json(input, &mut ids)?,
        InputFormat::Base64 => codec::from_base64(input, &mut ids)?,
        InputFormat::Compressed => codec::from_compressed(input, &mut ids)?,
        InputFormat::Link => converter.from_permalink(input)?,
    };
    Ok(diagram)
}

fn encode(converter: &Converter, format: OutputFormat, diagram: &Diagram) -> Result<String, CliError> {
    let output = match format {
        OutputFormat::Tex => converter.render_with_permalink(diagram)?,
        OutputFormat::Json => codec::to_json(diagram)?,
        OutputFormat::Base64 => codec::to_base64(diagram)?,
        OutputFormat::Compressed => codec::to_compressed(diagram)?,
        OutputFormat::Link => converter.to_permalink(diagram)?,
    };
    Ok(output)
}

/// Run the tikzcd CLI application
///
/// Reads the input, decodes it according to `--from`, encodes the diagram
/// according to `--to` and writes the result to the output file or to
/// standard output.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `CliError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Markup parse errors
/// - Payload decoding errors
pub fn run(args: &Args) -> Result<(), CliError> {
    info!(
        input_path = args.input.as_str(),
        from:? = args.from,
        to:? = args.to;
        "Converting diagram"
    );

    let app_config = effective_config(config::load_config(args.config.as_ref())?, args);
    debug!(config:? = app_config; "Effective configuration");

    let input = read_input(&args.input)?;

    let converter = Converter::new(app_config);
    let diagram = decode(&converter, args.from, &input)?;
    let output = encode(&converter, args.to, &diagram)?;

    match &args.output {
        Some(path) => {
            fs::write(path, format!("{output}\n"))?;
            info!(output_file = path.as_str(); "Diagram written");
        }
        None => println!("{output}"),
    }

    Ok(())
}
