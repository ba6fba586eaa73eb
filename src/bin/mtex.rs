//! Command-line front end for the mtex converter.

use clap::{Arg, ArgAction, Command};
use mtex::render::RenderOptions;
use mtex::{has_fatal, pipeline, OutputFormat, PipelineError};
use std::fs;
use std::process;

fn main() {
    let matches = Command::new("mtex")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Converts lightweight plain-text markup into LaTeX")
        .arg(
            Arg::new("source")
                .help("Path to the markup source file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("dest")
                .help("Path to write the output to (stdout when omitted)")
                .index(2),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .value_name("FORMAT")
                .default_value("latex")
                .help("Output format: latex, tokens-json or ast-json"),
        )
        .arg(
            Arg::new("standalone")
                .long("standalone")
                .action(ArgAction::SetTrue)
                .help("Wrap LaTeX output in a standalone document preamble"),
        )
        .get_matches();

    let Some(source_path) = matches.get_one::<String>("source") else {
        eprintln!("error: no source path given");
        process::exit(1);
    };
    let Some(format_name) = matches.get_one::<String>("format") else {
        eprintln!("error: no output format given");
        process::exit(1);
    };
    let Some(format) = OutputFormat::from_name(format_name) else {
        eprintln!("error: {}", PipelineError::UnknownFormat(format_name.clone()));
        process::exit(1);
    };
    let options = RenderOptions {
        standalone: matches.get_flag("standalone"),
    };

    let source = match fs::read_to_string(source_path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: failed to read {source_path}: {err}");
            process::exit(1);
        }
    };

    let output = match pipeline::process(&source, format, &options) {
        Ok(output) => output,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(1);
        }
    };

    for diagnostic in &output.diagnostics {
        eprintln!("{source_path}: {diagnostic}");
    }
    if has_fatal(&output.diagnostics) {
        eprintln!("error: fatal problems in {source_path}, no output written");
        process::exit(1);
    }

    match matches.get_one::<String>("dest") {
        Some(dest_path) => {
            if let Err(err) = fs::write(dest_path, &output.text) {
                eprintln!("error: failed to write {dest_path}: {err}");
                process::exit(1);
            }
        }
        None => print!("{}", output.text),
    }
}
