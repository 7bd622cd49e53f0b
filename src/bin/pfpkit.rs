use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "pfpkit", version)]
struct Cli {
    /// Log per-stage diagnostics to stderr.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Flatten a composition into `re-protocol-pfp.png`.
    Export(ExportArgs),
    /// Render the on-screen preview as a PNG.
    Preview(PreviewArgs),
    /// List the accessory catalog.
    Catalog(CatalogArgs),
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Input composition JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Directory the PNG is written into.
    #[arg(long)]
    out_dir: PathBuf,

    /// Root for accessory images; defaults to the composition's directory.
    #[arg(long)]
    assets: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Input composition JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Preview edge length in pixels; defaults to the document's `preview_size`.
    #[arg(long)]
    size: Option<u32>,

    /// Root for accessory images; defaults to the composition's directory.
    #[arg(long)]
    assets: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct CatalogArgs {
    /// Catalog JSON; the built-in catalog is listed when absent.
    #[arg(long)]
    catalog: Option<PathBuf>,
}

const DEFAULT_PREVIEW_SIZE: u32 = 448;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Export(args) => cmd_export(args),
        Command::Preview(args) => cmd_preview(args),
        Command::Catalog(args) => cmd_catalog(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .try_init();
}

fn doc_root(in_path: &Path) -> PathBuf {
    in_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf()
}

fn load_store(in_path: &Path) -> anyhow::Result<(pfpkit::CompositionDoc, pfpkit::CompositionStore)> {
    let doc = pfpkit::CompositionDoc::load(in_path)
        .with_context(|| format!("load composition '{}'", in_path.display()))?;
    let root = doc_root(in_path);
    let catalog = doc.catalog(&root)?;
    let mut store = pfpkit::CompositionStore::new();
    doc.apply(&root, &catalog, &mut store)?;
    Ok((doc, store))
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let (doc, store) = load_store(&args.in_path)?;
    let assets = pfpkit::DirAssetSource::new(args.assets.unwrap_or_else(|| doc_root(&args.in_path)));

    let exporter = pfpkit::Exporter::new(pfpkit::ExportOptions {
        photo_fit: doc.photo_fit,
        ..pfpkit::ExportOptions::default()
    });
    let mut sink = pfpkit::FileSink::new(&args.out_dir);

    match exporter.export(&store.snapshot(), doc.preview(), &assets, &mut sink) {
        Ok(out) => {
            for layer in &out.skipped {
                eprintln!("skipped {layer:?}");
            }
            if let Some(path) = sink.last_path() {
                eprintln!("wrote {}", path.display());
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e.user_message());
            Err(e.into())
        }
    }
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let (doc, store) = load_store(&args.in_path)?;
    let assets = pfpkit::DirAssetSource::new(args.assets.unwrap_or_else(|| doc_root(&args.in_path)));

    let size = match args.size {
        Some(s) => s,
        None => doc
            .preview_size
            .map(|w| w.round() as u32)
            .unwrap_or(DEFAULT_PREVIEW_SIZE),
    };

    let frame = pfpkit::render_preview(&store.snapshot(), &assets, size)?;
    let png = pfpkit::encode_png(&frame)?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_catalog(args: CatalogArgs) -> anyhow::Result<()> {
    let catalog = match &args.catalog {
        Some(path) => pfpkit::AccessoryCatalog::load(path)?,
        None => pfpkit::AccessoryCatalog::builtin(),
    };
    for def in catalog.iter() {
        println!("{}\t{}\t{}", def.id.0, def.name, def.image);
    }
    Ok(())
}
