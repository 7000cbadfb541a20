//! Outline printer.
//!
//! Scans one source file and prints its classes, functions, sections, ... as an indented outline
//! (or as JSON with `--json`).
//!
//! # Usage
//!
//! ```bash
//! cargo run -p codetags-cli -- src/widget.py
//! cargo run -p codetags-cli -- --language tcl --json build.script
//! CODETAGS_LOG=debug cargo run -p codetags-cli -- module.sv
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use codetags::{DocumentOutline, OutlineGroup};
use codetags_lang::Language;
use tracing_subscriber::EnvFilter;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "codetags")]
#[command(about = "Print the source structure outline of a file")]
struct Args {
    /// File to scan
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Language id or alias; detected from the file extension when omitted
    #[arg(short, long, env = "CODETAGS_LANGUAGE")]
    language: Option<Language>,

    /// Print the outline as JSON
    #[arg(long, env = "CODETAGS_JSON")]
    json: bool,

    /// Log filter directive (e.g. `debug`, `codetags_scan=trace`); defaults to `RUST_LOG`, then `warn`
    #[arg(long, value_name = "FILTER", env = "CODETAGS_LOG")]
    log: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log.as_deref())?;

    let language = match args.language {
        Some(language) => language,
        None => Language::from_path(&args.file)?,
    };
    let bytes = std::fs::read(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let text = String::from_utf8_lossy(&bytes);

    let outline = codetags_scan::generate_tags_for_text(language, &text).to_outline();
    tracing::info!(
        file = %args.file.display(),
        language = language.id(),
        top_level = outline.top_level_count(),
        "scanned"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outline)?);
    } else {
        print!("{}", render_outline(&outline));
    }
    Ok(())
}

fn init_tracing(directive: Option<&str>) -> Result<()> {
    let filter = match directive {
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("invalid log filter '{directive}'"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

/// Plain-text outline: one label line per group, items indented below it with 1-based lines.
fn render_outline(outline: &DocumentOutline) -> String {
    let mut out = String::new();
    render_groups(&mut out, &outline.groups, 0);
    out
}

fn render_groups(out: &mut String, groups: &[OutlineGroup], depth: usize) {
    let indent = "    ".repeat(depth);
    for group in groups {
        out.push_str(&format!("{indent}{}\n", group.label()));
        for item in &group.items {
            out.push_str(&format!("{indent}  {} (line {})\n", item.name, item.line + 1));
            render_groups(out, &item.groups, depth + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_outline() {
        let doc = codetags_scan::generate_tags(
            Language::Python,
            &["class Foo:", "    def bar(self):", "        pass", "def baz():", "    pass"],
        );
        assert_eq!(
            render_outline(&doc.to_outline()),
            "Class Definitions\n  Foo (line 1)\n    Methods\n      bar (line 2)\nFunction Definitions\n  baz (line 4)\n"
        );
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from(["codetags", "--language", "sv", "--json", "top.txt"])
            .expect("valid arguments");
        assert_eq!(args.language, Some(Language::SystemVerilog));
        assert!(args.json);
        assert_eq!(args.file, PathBuf::from("top.txt"));

        assert!(Args::try_parse_from(["codetags", "--language", "cobol", "a.cob"]).is_err());
    }
}
