//! docx-bookmarks - Fill bookmark placeholders in DOCX templates

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use docx_bookmarks::{FillOptions, Generator, Names, Package, bookmark_text};

#[derive(Parser)]
#[command(name = "docx-bookmarks")]
#[command(version, about = "Fill bookmark placeholders in DOCX templates", long_about = None)]
#[command(after_help = "EXAMPLES:
    docx-bookmarks fill letter.docx data.xml -o out.docx    Fill a template
    docx-bookmarks list letter.docx                        List bookmarks
    docx-bookmarks text letter.docx Customer               Show bookmark text")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log progress (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Fill a template with bookmark data
    Fill {
        /// Template document
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        /// Bookmark data XML (<bookmark name="...">value</bookmark> elements)
        #[arg(value_name = "DATA")]
        data: PathBuf,

        /// Output document
        #[arg(short, long, value_name = "OUTPUT")]
        output: PathBuf,

        /// Working copy location (default: next to the output)
        #[arg(long, value_name = "PATH")]
        temp: Option<PathBuf>,

        /// Values starting with this are embedded as HTML
        #[arg(long, value_name = "PREFIX", default_value = "<html>")]
        html_prefix: String,

        /// Print a JSON summary
        #[arg(long)]
        json: bool,
    },
    /// List the bookmarks of a template
    List {
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the text of one bookmark
    Text {
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        #[arg(value_name = "NAME")]
        name: String,
    },
}

#[derive(Serialize)]
struct FillSummary<'a> {
    output: &'a str,
    substituted: usize,
    html_chunks: usize,
    bytes: usize,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Fill {
            template,
            data,
            output,
            temp,
            html_prefix,
            json,
        } => fill(template, data, output, temp, html_prefix, json),
        Command::List { template, json } => list(template, json),
        Command::Text { template, name } => text(template, &name),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .init();
}

fn fill(
    template: PathBuf,
    data: PathBuf,
    output: PathBuf,
    temp: Option<PathBuf>,
    html_prefix: String,
    json: bool,
) -> Result<(), String> {
    let bookmark_xml = std::fs::read_to_string(&data).map_err(|e| format!("{}: {e}", data.display()))?;
    let temp = temp.unwrap_or_else(|| {
        let mut name = output.file_name().unwrap_or_default().to_os_string();
        name.push(".work");
        output.with_file_name(name)
    });

    let generator = Generator::with_options(FillOptions::default().with_html_prefix(html_prefix));
    let outcome = generator
        .fill(&template, &bookmark_xml, &temp)
        .map_err(|e| e.to_string())?;
    std::fs::write(&output, &outcome.bytes).map_err(|e| format!("{}: {e}", output.display()))?;

    if json {
        let output = output.display().to_string();
        let summary = FillSummary {
            output: &output,
            substituted: outcome.substituted,
            html_chunks: outcome.html_chunks,
            bytes: outcome.bytes.len(),
        };
        let rendered = serde_json::to_string_pretty(&summary).map_err(|e| e.to_string())?;
        println!("{rendered}");
    } else {
        println!(
            "Wrote {} ({} bookmarks, {} HTML chunks)",
            output.display(),
            outcome.substituted,
            outcome.html_chunks
        );
    }
    Ok(())
}

fn list(template: PathBuf, json: bool) -> Result<(), String> {
    let package = Package::open(&template).map_err(|e| e.to_string())?;
    let names = Generator::new()
        .template_bookmarks(&package)
        .map_err(|e| e.to_string())?;

    if json {
        let rendered = serde_json::to_string_pretty(&names).map_err(|e| e.to_string())?;
        println!("{rendered}");
    } else {
        for name in names {
            println!("{name}");
        }
    }
    Ok(())
}

fn text(template: PathBuf, name: &str) -> Result<(), String> {
    let package = Package::open(&template).map_err(|e| e.to_string())?;
    let main = package.main_document_part().map_err(|e| e.to_string())?;
    let tree = package.part_xml(&main).map_err(|e| e.to_string())?;
    let text = bookmark_text(&tree, &Names::new(), name).map_err(|e| e.to_string())?;
    println!("{text}");
    Ok(())
}
