use clap::{Parser, Subcommand};
use folio::{compose, flatten_tags, Document, DocumentIndex, Unit};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shows counts for an imported document
    Stats {
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Lists span ids with their owning sections
    Spans {
        file: PathBuf,
        /// Only spans owned by this section
        #[arg(long)]
        section: Option<String>,
    },
    /// Prints the section tree
    Outline { file: PathBuf },
    /// Renders one span's composition as text
    Compose { file: PathBuf, span_id: String },
}

fn main() {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Stats { file, json } => stats_command(file, *json),
        Commands::Spans { file, section } => spans_command(file, section.as_deref()),
        Commands::Outline { file } => outline_command(file),
        Commands::Compose { file, span_id } => compose_command(file, span_id),
    }
}

fn load_document(file: &PathBuf) -> Document {
    let raw = match std::fs::read_to_string(file) {
        Ok(raw) => raw,
        Err(err) => {
            eprintln!("Error reading {}: {err}", file.display());
            std::process::exit(1);
        }
    };
    match Document::from_json(&raw) {
        Ok(doc) => doc,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}

fn stats_command(file: &PathBuf, json: bool) {
    let doc = load_document(file);
    let index = DocumentIndex::build(&doc);
    if json {
        let output = serde_json::json!({
            "sections": index.section_count(),
            "spans": index.span_count(),
            "references": doc.references.len(),
            "footnotes": doc.footnotes.len(),
            "concepts": doc.concepts.len(),
        });
        match serde_json::to_string_pretty(&output) {
            Ok(pretty) => println!("{pretty}"),
            Err(err) => {
                eprintln!("Error: {err}");
                std::process::exit(1);
            }
        }
    } else {
        println!("Sections:   {}", index.section_count());
        println!("Spans:      {}", index.span_count());
        println!("References: {}", doc.references.len());
        println!("Footnotes:  {}", doc.footnotes.len());
        println!("Concepts:   {}", doc.concepts.len());
    }
}

fn spans_command(file: &PathBuf, section: Option<&str>) {
    let doc = load_document(file);
    let index = DocumentIndex::build(&doc);
    let mut ids: Vec<&str> = index.span_ids().collect();
    ids.sort_unstable();
    for id in ids {
        let owner = index.section_for_span(id).map(|s| s.id.as_str());
        if let Some(wanted) = section
            && owner != Some(wanted)
        {
            continue;
        }
        println!("{id}\t{}", owner.unwrap_or("-"));
    }
}

fn outline_command(file: &PathBuf) {
    let doc = load_document(file);
    for section in &doc.sections {
        print_section(section, 0);
    }
}

fn print_section(section: &folio::Section, depth: usize) {
    println!(
        "{}{} {}",
        "  ".repeat(depth),
        section.id,
        section.heading.text
    );
    for sub in &section.sub_sections {
        print_section(sub, depth + 1);
    }
}

fn compose_command(file: &PathBuf, span_id: &str) {
    let doc = load_document(file);
    let index = DocumentIndex::build(&doc);
    let Some(span) = index.span(span_id) else {
        eprintln!("Error: span not found: {span_id}");
        std::process::exit(1);
    };
    let tags = flatten_tags(&span.inner_tags);
    let composition = compose(&span.text, &tags, &[]);
    let mut line = String::new();
    for unit in &composition.units {
        match unit {
            Unit::Marker { tag } => {
                line.push('[');
                line.push_str(&tag.id);
                line.push(']');
            }
            Unit::Glyph { text, .. } => line.push_str(text),
            Unit::Equation { text, display, .. } => {
                let fence = if *display { "$$" } else { "$" };
                line.push_str(fence);
                line.push_str(text);
                line.push_str(fence);
            }
        }
    }
    println!("{line}");
}
