//! Conversion command handlers.

use isaconv::ConvertOptions;
use isaconv::convert::{isatab2json, json2isatab};
use isaconv::{Error, Result};
use std::fs::File;
use std::io::{self, BufWriter, Read};
use std::path::Path;

/// Executes the `isatab2json` command.
pub fn cmd_isatab2json(
    bundle: &Path,
    output: Option<&Path>,
    options: &ConvertOptions,
    pretty: bool,
) -> Result<()> {
    let document = isatab2json::convert(bundle, options)?;

    match output {
        Some(path) => {
            let file = File::create(path).map_err(|e| Error::io("create_output", path, &e))?;
            document.write_to(BufWriter::new(file), pretty)?;
            eprintln!("Wrote {}", path.display());
        },
        None => document.write_to(io::stdout().lock(), pretty)?,
    }
    Ok(())
}

/// Executes the `json2isatab` command. `-` reads stdin.
pub fn cmd_json2isatab(input: &Path, dest: &Path, options: &ConvertOptions) -> Result<()> {
    let source: Box<dyn Read> = if input.as_os_str() == "-" {
        Box::new(io::stdin().lock())
    } else {
        Box::new(File::open(input).map_err(|e| Error::io("open_input", input, &e))?)
    };

    let written = json2isatab::convert(source, dest, options)?;
    for path in &written {
        println!("{}", path.display());
    }
    Ok(())
}
