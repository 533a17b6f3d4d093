use clap::Parser;
use serde_json::Value;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use json_template_resolution::context::ResolveOptions;
use json_template_resolution::errors::{InputError, Result};
use json_template_resolution::Resolver;

/// Resolve `{$...}` templates in a JSON document against a job context.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Input JSON, inline or `@path/to/file.json`
    input: String,
    /// Job context JSON, inline or `@path/to/file.json`
    #[arg(long)]
    context: Option<String>,
    /// Options document, e.g. '{"omitNoValueForExactTemplates": true}'
    #[arg(long)]
    options: Option<String>,
    /// Drop unresolved exact templates instead of writing "{No Value}"
    #[arg(long)]
    omit_no_value: bool,
    /// Do not merge `sgnl.time.now` into the context
    #[arg(long)]
    no_namespace: bool,
    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    // Parse CLI arguments.
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<()> {
    // Build options: document first, then flags on top.
    let mut opts = match args.options.as_deref() {
        Some(doc) => serde_json::from_str::<ResolveOptions>(doc)
            .map_err(|source| InputError::Json { what: "options", source })?,
        None => ResolveOptions::default(),
    };
    if args.omit_no_value {
        opts = opts.omit_no_value(true);
    }
    if args.no_namespace {
        opts = opts.inject_namespace(false);
    }
    debug!(?opts, "resolve options");

    let input = load_json("input", &args.input)?;
    let context = args
        .context
        .as_deref()
        .map(|c| load_json("context", c))
        .transpose()?;

    let resolution = Resolver::new(opts).resolve(&input, context.as_ref());

    // Resolution errors are findings, not failures: warn and print what we have.
    for err in &resolution.errors {
        warn!("{err}");
    }

    let rendered = serde_json::to_string_pretty(&resolution.value)
        .map_err(|source| InputError::Json { what: "output", source })?;
    println!("{rendered}");
    Ok(())
}

/// Inline JSON, or the contents of a file when prefixed with `@`.
fn load_json(what: &'static str, arg: &str) -> Result<Value> {
    let text = match arg.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path).map_err(|source| InputError::Io {
            path: path.to_string(),
            source,
        })?,
        None => arg.to_string(),
    };
    serde_json::from_str(&text).map_err(|source| InputError::Json { what, source })
}
