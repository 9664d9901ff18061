//! esparse: Parse JavaScript files and print their syntax tree as JSON.
//!
//! Usage:
//!   esparse [options] <file...>
//!
//! Files are parsed in parallel; trees are printed in argument order.
//! Syntax errors are rendered against the source and make the process
//! exit with status 1.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use clap::{Parser as ClapParser, ValueEnum};
use esfront_ast::SourceType;
use esfront_parser::{normalize_line_endings, ParseOptions, Plugin};
use miette::{IntoDiagnostic, NamedSource, Report, WrapErr};
use rayon::prelude::*;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser, Debug)]
#[command(name = "esparse", about = "Parse ES2015+ (with Flow and JSX) into a JSON syntax tree")]
struct Cli {
    /// JavaScript files to parse.
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,

    /// Parse as a script or as a module.
    #[arg(long = "source-type", value_enum)]
    source_type: Option<SourceTypeArg>,

    /// Grammar plugins to enable, comma separated (`flow`, `jsx`).
    #[arg(long, value_delimiter = ',')]
    plugins: Vec<String>,

    /// Read parse options from a JSON file. Flags override its fields.
    #[arg(long, value_name = "JSON")]
    options: Option<PathBuf>,

    /// Include the token list in the output.
    #[arg(long)]
    tokens: bool,

    /// Print JSON without indentation.
    #[arg(long)]
    compact: bool,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SourceTypeArg {
    Script,
    Module,
}

impl From<SourceTypeArg> for SourceType {
    fn from(arg: SourceTypeArg) -> Self {
        match arg {
            SourceTypeArg::Script => SourceType::Script,
            SourceTypeArg::Module => SourceType::Module,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = match build_options(&cli) {
        Ok(options) => options,
        Err(report) => {
            eprintln!("{:?}", report);
            process::exit(2);
        }
    };

    let start = Instant::now();
    let outcomes: Vec<miette::Result<String>> =
        cli.files.par_iter().map(|path| parse_file(path, &options, &cli)).collect();
    debug!(files = cli.files.len(), elapsed = ?start.elapsed(), "all files parsed");

    let mut failed = false;
    for outcome in outcomes {
        match outcome {
            Ok(json) => println!("{}", json),
            Err(report) => {
                eprintln!("{:?}", report);
                failed = true;
            }
        }
    }
    process::exit(if failed { 1 } else { 0 });
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).with_writer(std::io::stderr).init();
}

/// Options from `--options`, then overridden by the individual flags.
fn build_options(cli: &Cli) -> miette::Result<ParseOptions> {
    let mut options = match &cli.options {
        Some(path) => {
            let text = fs::read_to_string(path)
                .into_diagnostic()
                .wrap_err_with(|| format!("reading options from {}", path.display()))?;
            serde_json::from_str(&text)
                .into_diagnostic()
                .wrap_err_with(|| format!("invalid options in {}", path.display()))?
        }
        None => ParseOptions::default(),
    };

    if let Some(source_type) = cli.source_type {
        options.source_type = source_type.into();
    }
    for name in &cli.plugins {
        match Plugin::from_name(name) {
            Some(plugin) => options = options.with_plugin(plugin),
            None => warn!(plugin = %name, "ignoring unknown plugin"),
        }
    }
    Ok(options)
}

fn parse_file(path: &Path, options: &ParseOptions, cli: &Cli) -> miette::Result<String> {
    let source = fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("reading {}", path.display()))?;

    let file = esfront_parser::parse(&source, options).map_err(|err| {
        // Error offsets refer to the normalized text.
        let normalized = normalize_line_endings(&source).into_owned();
        Report::new(err).with_source_code(NamedSource::new(path.display().to_string(), normalized))
    })?;
    debug!(path = %path.display(), statements = file.body().len(), "parsed");

    let mut value = serde_json::to_value(&file).into_diagnostic()?;
    if !cli.tokens {
        if let Some(object) = value.as_object_mut() {
            object.remove("tokens");
        }
    }
    let json = if cli.compact { serde_json::to_string(&value) } else { serde_json::to_string_pretty(&value) };
    json.into_diagnostic()
}
