use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use fs_err as fs;
use linkstack_core::{
    LinkResolution, ResolveError, archive_records, build_report, link_directives, resolve, scan,
};
use linkstack_types::report::ToolInfo;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "linkstack",
    version,
    about = "Resolve static archive link order and emit cargo directives."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List discovered archives with their symbol counts.
    Symbols(SymbolsArgs),
    /// Resolve the dependency-respecting link order.
    Order(OrderArgs),
    /// Print cargo build-script link directives in resolved order.
    Emit(EmitArgs),
}

#[derive(Debug, Parser)]
struct SymbolsArgs {
    /// Directory to scan for static archives (default: current directory).
    #[arg(long, default_value = ".")]
    search_dir: Utf8PathBuf,
}

#[derive(Debug, Parser)]
struct OrderArgs {
    /// Directory to scan for static archives (default: current directory).
    #[arg(long, default_value = ".")]
    search_dir: Utf8PathBuf,

    /// Write a report.json artifact into this directory.
    #[arg(long)]
    out_dir: Option<Utf8PathBuf>,

    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Parser)]
struct EmitArgs {
    /// Directory to scan for static archives (default: current directory).
    #[arg(long, default_value = ".")]
    search_dir: Utf8PathBuf,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match real_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:?}", e);
            let code = e
                .downcast_ref::<ResolveError>()
                .map_or(1, ResolveError::exit_code);
            ExitCode::from(code)
        }
    }
}

fn real_main() -> anyhow::Result<()> {
    let _engine = linkstack_client::new_client();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Symbols(args) => cmd_symbols(args),
        Command::Order(args) => cmd_order(args),
        Command::Emit(args) => cmd_emit(args),
    }
}

fn cmd_symbols(args: SymbolsArgs) -> anyhow::Result<()> {
    let outcome = scan(&args.search_dir)?;
    if outcome.archives.is_empty() {
        println!("no static archives under {}", args.search_dir);
        return Ok(());
    }

    for record in archive_records(&outcome.archives, &outcome.tables) {
        println!(
            "{}  defined={} undefined={}",
            record.name, record.defined, record.undefined
        );
    }
    Ok(())
}

fn cmd_order(args: OrderArgs) -> anyhow::Result<()> {
    let resolution = resolve(&args.search_dir)?;
    let report = build_report(&resolution, &args.search_dir, tool_info());

    match args.format {
        OutputFormat::Text => print_order(&args.search_dir, &resolution),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report).context("serialize report")?);
        }
    }

    if let Some(out_dir) = args.out_dir {
        fs::create_dir_all(&out_dir).with_context(|| format!("create {}", out_dir))?;
        write_json(&out_dir.join("report.json"), &report)?;
        info!("wrote report to {}", out_dir);
    }
    Ok(())
}

fn print_order(search_dir: &Utf8Path, resolution: &LinkResolution) {
    if resolution.ordered.is_empty() {
        println!("no static archives under {}", search_dir);
        return;
    }
    for (i, archive) in resolution.ordered.iter().enumerate() {
        println!("{:>3}. {}", i + 1, archive.name);
    }
}

fn cmd_emit(args: EmitArgs) -> anyhow::Result<()> {
    let resolution = resolve(&args.search_dir)?;
    for directive in link_directives(&resolution.ordered) {
        println!("{directive}");
    }
    Ok(())
}

fn tool_info() -> ToolInfo {
    ToolInfo {
        name: "linkstack".to_string(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    }
}

fn write_json<T: serde::Serialize>(path: &Utf8Path, v: &T) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(v).context("serialize json")?;
    fs::write(path, s).with_context(|| format!("write {}", path))?;
    Ok(())
}
