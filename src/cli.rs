use crate::analysis::{analyze_files, validate_pdf};
use crate::config::load_config;
use crate::ir::TopicTree;
use crate::layout::compute_layout;
use crate::layout_dump::write_layout_dump;
use crate::render::{OutputFormat, render_svg, write_output};
use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "pdfmm",
    version,
    about = "Convert PDF files into a radial mind-map PDF"
)]
pub struct Args {
    /// Input PDF files
    pub input_files: Vec<PathBuf>,

    /// Output file
    #[arg(short = 'o', long = "output", default_value = "mindmap_output.pdf")]
    pub output: PathBuf,

    /// Topic tree JSON to render instead of analyzing PDFs, or '-' for stdin
    #[arg(short = 't', long = "tree", conflicts_with = "input_files")]
    pub tree: Option<PathBuf>,

    /// Config JSON file (layout and page overrides)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Output format. Inferred from the output extension when omitted.
    #[arg(short = 'e', long = "outputFormat", value_enum)]
    pub output_format: Option<OutputFormat>,

    /// Overlay page border, anchor points and index labels
    #[arg(long = "debug")]
    pub debug: bool,

    /// Also write the computed placements as JSON
    #[arg(long = "dump-layout")]
    pub dump_layout: Option<PathBuf>,

    /// Also write the analyzed topic tree as JSON
    #[arg(long = "dump-tree")]
    pub dump_tree: Option<PathBuf>,

    /// More log output (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = load_config(args.config.as_deref())?;
    if args.debug {
        config.render.debug = true;
    }

    let tree = load_tree(&args)?;
    if let Some(path) = args.dump_tree.as_deref() {
        std::fs::write(path, tree.to_json()?)
            .with_context(|| format!("failed to write topic tree {}", path.display()))?;
    }

    let format = args
        .output_format
        .unwrap_or_else(|| infer_format(&args.output));
    tracing::info!(
        main_topics = tree.main_topics().len(),
        nodes = tree.node_count(),
        "generating mind map"
    );
    let layout = compute_layout(&tree, &config.layout, config.render.width, config.render.height);
    if let Some(path) = args.dump_layout.as_deref() {
        write_layout_dump(path, &layout, &tree)?;
    }
    let svg = render_svg(&layout, &config.render);
    write_output(&svg, &args.output, format, &config.render)
        .with_context(|| format!("failed to write mind map to {}", args.output.display()))?;

    eprintln!("Mind map {} created: {}", format.extension().to_uppercase(), args.output.display());
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn load_tree(args: &Args) -> Result<TopicTree> {
    if let Some(path) = args.tree.as_deref() {
        let json = read_tree_input(path)?;
        return TopicTree::from_json(&json)
            .with_context(|| format!("failed to parse topic tree {}", path.display()));
    }
    if args.input_files.is_empty() {
        anyhow::bail!("No input files given (pass PDF files or --tree)");
    }
    validate_inputs(&args.input_files)?;
    Ok(analyze_files(&args.input_files)?)
}

fn read_tree_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn validate_inputs(paths: &[PathBuf]) -> Result<()> {
    for path in paths {
        if !path.exists() {
            anyhow::bail!("File not found - {}", path.display());
        }
        if !validate_pdf(path) {
            anyhow::bail!("Not a PDF file - {}", path.display());
        }
    }
    Ok(())
}

fn infer_format(output: &Path) -> OutputFormat {
    let ext = output
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("svg") => OutputFormat::Svg,
        Some("png") => OutputFormat::Png,
        _ => OutputFormat::Pdf,
    }
}
