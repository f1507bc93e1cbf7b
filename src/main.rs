//! vartools CLI
//!
//! Entry point for the `vartools` command-line tool.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;
use vartools::output::explain_report;
use vartools::{
    lookup, run_request, Error, ListMerge, LookupOutput, MergeOptions, NamespaceSet, RequestFile,
    Templating,
};

#[derive(Parser)]
#[command(name = "vartools")]
#[command(about = "Find variables matching regex patterns, sort them and merge them recursively", version)]
struct Cli {
    /// Log engine decisions to stderr (same as RUST_LOG=debug)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge the variables matching the given patterns
    Merge {
        /// Regex patterns, searched in variable names
        patterns: Vec<String>,

        #[command(flatten)]
        namespaces: NamespaceArgs,

        #[command(flatten)]
        options: OptionArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },

    /// Run a lookup described by a request file (.toml or .json)
    Request {
        /// Path to the request file
        file: PathBuf,

        /// Extra base namespace files or directories, loaded after the request's own
        #[arg(long = "vars", short = 'n')]
        vars: Vec<PathBuf>,

        /// Extra context namespace files or directories
        #[arg(long, short = 'c')]
        context: Vec<PathBuf>,

        /// Merge values as written, without expanding {{ references }}
        #[arg(long)]
        no_templates: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },

    /// Show which variables each pattern selects, without merging
    Explain {
        /// Regex patterns, searched in variable names
        patterns: Vec<String>,

        #[command(flatten)]
        namespaces: NamespaceArgs,

        /// Prepend patterns for the legacy prefix scheme
        #[arg(long)]
        legacy: Option<String>,

        /// Prepend patterns for the default suffix scheme
        #[arg(long = "default")]
        default_scheme: Option<String>,
    },
}

#[derive(Args)]
struct NamespaceArgs {
    /// Base namespace files or directories, in precedence order
    #[arg(long = "vars", short = 'n')]
    vars: Vec<PathBuf>,

    /// Context namespace files or directories, consulted before the base
    #[arg(long, short = 'c')]
    context: Vec<PathBuf>,
}

#[derive(Args)]
struct OptionArgs {
    /// How lists under the same key are combined
    #[arg(long, value_enum, default_value_t = ListPolicy::Replace)]
    list_merge: ListPolicy,

    /// Replace nested mappings instead of merging them
    #[arg(long)]
    no_recursive: bool,

    /// Prepend patterns for the legacy prefix scheme
    #[arg(long)]
    legacy: Option<String>,

    /// Prepend patterns for the default suffix scheme
    #[arg(long = "default")]
    default_scheme: Option<String>,

    /// Merge values as written, without expanding {{ references }}
    #[arg(long)]
    no_templates: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ListPolicy {
    Replace,
    Keep,
    Append,
    Prepend,
    #[value(name = "append_rp")]
    AppendRp,
    #[value(name = "prepend_rp")]
    PrependRp,
}

impl From<ListPolicy> for ListMerge {
    fn from(policy: ListPolicy) -> Self {
        match policy {
            ListPolicy::Replace => ListMerge::Replace,
            ListPolicy::Keep => ListMerge::Keep,
            ListPolicy::Append => ListMerge::Append,
            ListPolicy::Prepend => ListMerge::Prepend,
            ListPolicy::AppendRp => ListMerge::AppendRp,
            ListPolicy::PrependRp => ListMerge::PrependRp,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// Envelope with merged value, match report and sources
    Json,
    /// `[merged, report]` pair
    Pair,
    /// Merged mapping only
    Merged,
    /// Human-readable explanation
    Human,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Merge {
            patterns,
            namespaces,
            options,
            format,
        } => run_merge(&patterns, &namespaces, &options, format),
        Commands::Request {
            file,
            vars,
            context,
            no_templates,
            format,
        } => run_request_file(&file, vars, context, no_templates, format),
        Commands::Explain {
            patterns,
            namespaces,
            legacy,
            default_scheme,
        } => run_explain(&patterns, &namespaces, legacy, default_scheme),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_merge(
    patterns: &[String],
    namespaces: &NamespaceArgs,
    args: &OptionArgs,
    format: Format,
) -> Result<(), Error> {
    let set = NamespaceSet::build(&namespaces.vars, &namespaces.context)?;

    let mut options = MergeOptions::default()
        .with_list_merge(args.list_merge.into())
        .with_recursive(!args.no_recursive);
    options.legacy = args.legacy.clone();
    options.default = args.default_scheme.clone();

    let output = lookup(&set, patterns, &options, templating(args.no_templates))?;
    print_output(&output, format)
}

fn run_request_file(
    file: &Path,
    vars: Vec<PathBuf>,
    context: Vec<PathBuf>,
    no_templates: bool,
    format: Format,
) -> Result<(), Error> {
    let mut request = RequestFile::from_file(file)?;
    request.vars.extend(vars);
    request.context.extend(context);

    let set = NamespaceSet::build(&request.vars, &request.context)?;
    let output = run_request(&set, &request.request, templating(no_templates))?;
    print_output(&output, format)
}

fn run_explain(
    patterns: &[String],
    namespaces: &NamespaceArgs,
    legacy: Option<String>,
    default_scheme: Option<String>,
) -> Result<(), Error> {
    let set = NamespaceSet::build(&namespaces.vars, &namespaces.context)?;

    let mut options = MergeOptions::default();
    options.legacy = legacy;
    options.default = default_scheme;

    // only the report is printed, so templates are left alone
    let output = lookup(&set, patterns, &options, Templating::Off)?;
    println!("{}", explain_report(&output.report).join("\n"));
    Ok(())
}

fn templating(disabled: bool) -> Templating {
    if disabled {
        Templating::Off
    } else {
        Templating::Strict
    }
}

fn print_output(output: &LookupOutput, format: Format) -> Result<(), Error> {
    let rendered = match format {
        Format::Json => output.to_json(),
        Format::Pair => output.pair_json(),
        Format::Merged => output.merged_json(),
        Format::Human => Ok(output.to_human()),
    };

    println!("{}", rendered?);
    Ok(())
}
