//! # html-pluck
//!
//! jQuery-like HTML querying and text extraction over html5ever trees.
//!
//! The crate parses HTML into a shared-ownership DOM and builds its API from
//! three composable pieces: [`Selection`], an ordered sequence of nodes under
//! query; [`Selector`], a predicate algebra matching nodes by tag, attribute
//! and structure; and [`Formatter`], a per-node callback that decides what
//! text a node contributes and whether extraction descends into its children.
//! [`Table`] extraction is layered on top of all three.
//!
//! ## Quick Start
//!
//! ```rust
//! use html_pluck::{default_formatter, parse, selector};
//!
//! let html = r#"<html><body>
//! <div class="menu"><p>navigation</p></div>
//! <div class="content"><p>First.</p><p>Second.</p></div>
//! </body></html>"#;
//!
//! let doc = parse(html);
//! let content = doc.find(&selector::class("content"));
//! let paragraphs = content.find_all(&selector::elem("p"));
//!
//! assert_eq!(paragraphs.len(), 2);
//! assert_eq!(paragraphs.text(&default_formatter).as_ref(), "First.Second.");
//! ```
//!
//! ## Features
//!
//! - **Selections**: ordered node sequences with jQuery-style traversal
//!   (`find`, `find_all`, `filter`, `children`, `parents`)
//! - **Selector algebra**: tag, attribute, class and id tests composed with
//!   `and`/`or`/`not`, ancestor chains and sibling context
//! - **Formatter-driven text**: the caller decides per node what text is
//!   emitted and whether children are visited
//! - **Tables**: harvest `<table>` cell text into rows of strings, and build
//!   row data back into a renderable table node
//! - **Tree editing**: append and insert splicing that moves nodes, plus
//!   fragment parsing for grafting new markup into a document

mod error;

/// Parsing entry points, node construction, attribute access and tree
/// relinking over the shared DOM.
pub mod dom;

/// Character encoding detection and transcoding.
pub mod encoding;

/// Text extraction contract deciding node text and descent.
pub mod formatter;

/// Ordered node sequences with traversal, extraction and editing.
pub mod selection;

/// Selector predicate algebra for matching nodes.
pub mod selector;

/// Table extraction and its inverse.
pub mod table;

// Public API - re-exports
pub use dom::{parse, parse_bytes, parse_fragment, parse_fragment_reader, parse_reader};
pub use error::{Error, Result};
pub use formatter::{default_formatter, Formatter};
pub use selection::Selection;
pub use selector::Selector;
pub use table::{parse_tables, Table};
