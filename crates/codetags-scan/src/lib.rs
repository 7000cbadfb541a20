#![warn(missing_docs)]
//! `codetags-scan` - lightweight per-language source structure scanners.
//!
//! Every scanner turns the lines of one file into a [`codetags::Document`] (classes, functions,
//! variables, sections, macros, ...). Scanning is heuristic and tolerant: malformed, truncated
//! or binary input yields a smaller outline, never an error.
//!
//! ```rust
//! use codetags::Kind;
//! use codetags_lang::Language;
//!
//! let doc = codetags_scan::generate_tags_for_text(
//!     Language::Python,
//!     "class Foo:\n    def bar(self):\n        pass\ndef baz():\n    pass\n",
//! );
//! assert_eq!(doc.classes()[0].methods()[0].name(), "bar");
//! assert_eq!(doc.get(&Kind::Function)[0].line(), 3);
//! ```
//!
//! # Module Description
//!
//! - [`scanners`] - one module per language family
//! - [`generate_tags`] - dispatch from a [`Language`] to its scanner

use codetags::Document;
use codetags_lang::Language;

pub mod scanners;

/// Scan `lines` with the scanner registered for `language`.
pub fn generate_tags<S: AsRef<str>>(language: Language, lines: &[S]) -> Document {
    let doc = match language {
        Language::Python => scanners::python::generate_tags(lines),
        Language::C | Language::Cpp => scanners::c::generate_tags(lines),
        Language::Php => scanners::php::generate_tags(lines),
        Language::Perl => scanners::perl::generate_tags(lines),
        Language::Shell => scanners::shell::generate_tags(lines),
        Language::Tcl => scanners::tcl::generate_tags(lines),
        Language::Nsis => scanners::nsis::generate_tags(lines),
        Language::Verilog | Language::SystemVerilog => scanners::verilog::generate_tags(lines),
        Language::Css => scanners::css::generate_tags(lines),
        Language::Ess => scanners::ess::generate_tags(lines),
        Language::Ini => scanners::ini::generate_tags(lines),
        Language::Batch => scanners::batch::generate_tags(lines),
        Language::Lua => scanners::lua::generate_tags(lines),
        Language::Latex => scanners::latex::generate_tags(lines),
    };
    tracing::debug!(
        language = language.id(),
        lines = lines.len(),
        elements = doc.len(),
        "generated tags"
    );
    doc
}

/// Scan a whole buffer. Lines are split on `\n`; a trailing `\r` is dropped.
pub fn generate_tags_for_text(language: Language, text: &str) -> Document {
    let lines: Vec<&str> = text.lines().collect();
    generate_tags(language, &lines)
}
