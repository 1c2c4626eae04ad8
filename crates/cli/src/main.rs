use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use modlink_protocol::PackageType;
use std::path::PathBuf;
use std::process::ExitCode;

mod command;
mod engine;
mod host;
mod report;

#[derive(Parser)]
#[command(name = "modlink")]
#[command(about = "Module reference links, go-to-definition and scaffolding for JavaScript", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for results)
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve every module reference in a file and list links and missing modules
    Links(LinksArgs),

    /// Print the file a module reference at a position points to
    Definition(DefinitionArgs),

    /// Create a missing module next to a file
    Create(CreateArgs),

    /// Keep a file's links up to date as it changes on disk
    Watch(WatchArgs),
}

#[derive(Args)]
struct LinksArgs {
    /// JavaScript file to inspect
    file: PathBuf,

    /// Emit a JSON report
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct DefinitionArgs {
    /// JavaScript file to inspect
    file: PathBuf,

    /// Byte offset into the file
    #[arg(long, conflicts_with = "at", required_unless_present = "at")]
    offset: Option<usize>,

    /// 1-based LINE:COLUMN position
    #[arg(long)]
    at: Option<String>,
}

#[derive(Args)]
struct CreateArgs {
    /// Module name as it would be required; prompted for when omitted
    name: Option<String>,

    /// File the module is created for; its directory is the base directory
    #[arg(long)]
    from: PathBuf,

    /// How dependency packages are laid out (overrides settings)
    #[arg(long = "type", value_parser = parse_package_type)]
    package_type: Option<PackageType>,

    /// Settings file (default: nearest .modlink.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Open created files in $VISUAL / $EDITOR
    #[arg(long)]
    open: bool,
}

#[derive(Args)]
struct WatchArgs {
    /// JavaScript file to watch
    file: PathBuf,

    /// Quiet period after the last change before links are refreshed
    #[arg(long, default_value_t = 200)]
    debounce_ms: u64,
}

fn parse_package_type(raw: &str) -> std::result::Result<PackageType, String> {
    PackageType::parse(raw).ok_or_else(|| format!("expected one of ask, file, index, package; got {raw:?}"))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Links(args) => command::links::run(args).await,
        Commands::Definition(args) => command::definition::run(args).await,
        Commands::Create(args) => command::create::run(args).await,
        Commands::Watch(args) => command::watch::run(args).await,
    }
}
