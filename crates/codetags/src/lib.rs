#![warn(missing_docs)]
//! `codetags` - scoped tag tree model for lightweight source outline scanners.
//!
//! # Overview
//!
//! A scanner turns the lines of one source file into a [`Document`]: a root [`Scope`] holding
//! [`CodeElement`]s (functions, classes, variables, macros, sections, ...) grouped by [`Kind`].
//! Hosts walk the document directly or convert it into a structural [`DocumentOutline`] for a
//! code browser.
//!
//! ```rust
//! use codetags::{Class, Document, Kind, Tag};
//!
//! let mut doc = Document::new();
//! doc.set_description(Kind::Function, "Function Definitions");
//! doc.add_function(Tag::function("main", 12));
//!
//! let mut class = Class::new("Parser", 0);
//! class.add_method(Tag::method("parse", 3));
//! doc.add_class(class);
//!
//! assert_eq!(doc.functions()[0].name(), "main");
//! assert_eq!(doc.classes()[0].methods()[0].line(), 3);
//! ```
//!
//! # Module Description
//!
//! - [`model`] - tag tree types ([`Document`], [`Scope`], [`Class`], [`Tag`])
//! - [`parselib`] - identifier and token-boundary helpers
//! - [`cursor`] - bounds-checked per-line cursor used by character-level scanners
//! - [`outline`] - structural, serializable outline export

pub mod cursor;
pub mod model;
pub mod outline;
pub mod parselib;

pub use cursor::LineCursor;
pub use model::{Class, CodeElement, Document, Kind, Scope, Tag};
pub use outline::{DocumentOutline, OutlineGroup, OutlineNode};
pub use parselib::{
    get_first_identifier, is_good_name, is_identifier, is_identifier_char, is_token,
    leading_indent, strip_keyword,
};
