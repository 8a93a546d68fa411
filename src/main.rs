use anyhow::{Context, Result};
use bunpo_xref::config::DEFAULT_DATA_DIR;
use bunpo_xref::content::normalize_document;
use bunpo_xref::crossref::crossreference;
use bunpo_xref::dictionary::Dictionary;
use bunpo_xref::export::{self, Column, TablePlan};
use bunpo_xref::models::{Book, Entry, Volume, VolumeFilter};
use bunpo_xref::sources::{self, SourceConfig};
use bunpo_xref::stats::ExportStats;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "bunpo-xref")]
#[command(about = "Cross-reference Japanese grammar reference indexes")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write one cross-referenced CSV table per book
    Export(ExportArgs),
    /// List every entry, in every book, that answers to a form
    Lookup(LookupArgs),
    /// List the entries on a page and their cross-references
    Page(PageArgs),
}

#[derive(Args)]
struct SourceArgs {
    /// Directory holding dojg.html, hjgp.html and dojp.csv
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    data: PathBuf,

    /// Path to the dojg index (overrides --data)
    #[arg(long)]
    dojg: Option<PathBuf>,

    /// Path to the hjgp index (overrides --data)
    #[arg(long)]
    hjgp: Option<PathBuf>,

    /// Path to the dojp CSV (overrides --data)
    #[arg(long)]
    dojp: Option<PathBuf>,

    /// dojg volume to include: basic, intermediate or advanced (repeatable, default basic)
    #[arg(long = "volume", value_name = "VOLUME")]
    volumes: Vec<Volume>,

    /// Include every dojg volume
    #[arg(long, conflicts_with = "volumes")]
    all_volumes: bool,
}

impl SourceArgs {
    fn into_config(self) -> SourceConfig {
        let mut config = SourceConfig::in_dir(&self.data);
        if let Some(path) = self.dojg {
            config.dojg = path;
        }
        if let Some(path) = self.hjgp {
            config.hjgp = path;
        }
        if let Some(path) = self.dojp {
            config.dojp = path;
        }
        config.volumes = if self.all_volumes {
            VolumeFilter::all()
        } else if self.volumes.is_empty() {
            VolumeFilter::default()
        } else {
            VolumeFilter::only(self.volumes)
        };
        config
    }
}

#[derive(Args)]
struct ExportArgs {
    /// Output directory for the generated CSV files
    #[arg(short, long)]
    output: PathBuf,

    /// Columns for every table, e.g. concept,sub_entry,page,forms (defaults differ per book)
    #[arg(long, value_delimiter = ',')]
    columns: Option<Vec<Column>>,

    /// Append the expanded lookup forms as a column
    #[arg(long)]
    forms: bool,

    /// Only export this book (repeatable)
    #[arg(long = "book", value_name = "BOOK")]
    books: Vec<Book>,

    #[command(flatten)]
    sources: SourceArgs,
}

#[derive(Args)]
struct LookupArgs {
    /// Form to look up, e.g. あいだ
    form: String,

    /// Print matches as JSON
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    sources: SourceArgs,
}

#[derive(Args)]
struct PageArgs {
    /// Book the page belongs to (dojg, hjgp or dojp)
    book: Book,

    /// Page label exactly as printed in the index, e.g. "B. 67" or "7"
    page: String,

    #[command(flatten)]
    sources: SourceArgs,
}

fn run_export(args: ExportArgs) -> Result<()> {
    let config = args.sources.into_config();

    let start_loading = Instant::now();
    let dictionaries = sources::load_all(&config)?;
    let loading_duration = start_loading.elapsed();

    let books = if args.books.is_empty() {
        Book::ALL.to_vec()
    } else {
        args.books
    };
    let plans: Vec<TablePlan> = books
        .into_iter()
        .map(|book| TablePlan::new(book, args.columns.as_deref(), args.forms))
        .collect();

    info!(tables = plans.len(), output = %args.output.display(), "Starting export");
    let stats = ExportStats::new();
    let start_exporting = Instant::now();
    let paths = export::export_tables(&dictionaries, &plans, &args.output, &stats)?;
    let exporting_duration = start_exporting.elapsed();

    println!();
    println!("=== Summary ===");
    for dictionary in &dictionaries {
        println!(
            "{:<20}{}",
            format!("{} entries:", dictionary.name()),
            dictionary.len()
        );
    }
    println!("Loading time:       {:.2}s", loading_duration.as_secs_f64());
    println!("Export time:        {:.2}s", exporting_duration.as_secs_f64());
    println!();
    println!("Tables written:     {}", stats.tables());
    println!("Rows written:       {}", stats.rows());
    println!("References found:   {}", stats.references());
    println!("Unreferenced rows:  {}", stats.unreferenced());
    for path in paths {
        println!("  {}", path.display());
    }

    Ok(())
}

fn run_lookup(args: LookupArgs) -> Result<()> {
    let dictionaries = sources::load_all(&args.sources.into_config())?;

    // Queries typed with full-width characters must match the normalized sources.
    let form = normalize_document(args.form.trim());
    let found: Vec<&Entry> = dictionaries.iter().flat_map(|d| d.find(&form)).collect();
    info!(form = %form, matches = found.len(), "Lookup complete");

    if args.json {
        let json = serde_json::to_string_pretty(&found).context("Failed to serialize entries")?;
        println!("{}", json);
    } else if found.is_empty() {
        println!("No entries for {}", form);
    } else {
        for entry in found {
            println!("{}", describe(entry));
        }
    }
    Ok(())
}

fn run_page(args: PageArgs) -> Result<()> {
    let dictionaries = sources::load_all(&args.sources.into_config())?;
    let target: &Dictionary = dictionaries
        .iter()
        .find(|d| d.book() == args.book)
        .with_context(|| format!("No dictionary loaded for {}", args.book))?;

    let entries = target.on_page(&args.page);
    if entries.is_empty() {
        warn!(book = %args.book, page = %args.page, "No entries on page");
        println!("No entries on {} page {}", args.book, args.page);
        return Ok(());
    }

    for entry in entries {
        println!("{}", describe(entry));
        let references = crossreference(entry, &dictionaries);
        if references.is_empty() {
            println!("    (no cross-references)");
        }
        for reference in references {
            println!("    -> {}", describe(reference));
        }
    }
    Ok(())
}

fn describe(entry: &Entry) -> String {
    let sub_entry = entry
        .sub_entry
        .map(|n| format!(" ({})", n))
        .unwrap_or_default();
    format!(
        "{} {:<8} {}{}  [{}]",
        entry.book,
        entry.page,
        entry.concept,
        sub_entry,
        entry.all_forms.join(", ")
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    let result = match cli.command {
        Commands::Export(args) => run_export(args),
        Commands::Lookup(args) => run_lookup(args),
        Commands::Page(args) => run_page(args),
    };

    match result {
        Ok(()) => {
            info!("Completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Error: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
