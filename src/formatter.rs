//! Per-node text extraction policy.
//!
//! A [`Formatter`] decides, node by node, what text the node contributes to
//! [`Selection::text`](crate::Selection::text) and whether the walk descends
//! into its children. Returning `descend = false` is a hard stop for the
//! whole subtree, even when the substitute text is non-empty.

use tendril::StrTendril;

use crate::dom::{self, Handle};

/// Per-node text extraction policy.
///
/// Any `Fn(&Handle) -> (StrTendril, bool)` is a formatter, so plain
/// functions and closures work without a wrapper type. Dialect-specific
/// policies (markdown-ish link text, image substitution, table pruning)
/// live with their callers; the crate ships only [`default_formatter`].
pub trait Formatter {
    /// Text this node contributes, and whether to descend into children.
    fn format(&self, node: &Handle) -> (StrTendril, bool);
}

impl<F> Formatter for F
where
    F: Fn(&Handle) -> (StrTendril, bool),
{
    fn format(&self, node: &Handle) -> (StrTendril, bool) {
        self(node)
    }
}

/// Default extraction policy: text nodes contribute their payload, every
/// other kind contributes nothing, and the walk always descends.
///
/// # Example
///
/// ```
/// use html_pluck::{default_formatter, parse, selector};
///
/// let doc = parse("<p>A<span>B</span></p>");
/// let p = doc.find(&selector::elem("p"));
/// assert_eq!(&*p.text(&default_formatter), "AB");
/// ```
#[must_use]
pub fn default_formatter(node: &Handle) -> (StrTendril, bool) {
    match dom::own_text(node) {
        Some(text) => (text, true),
        None => (StrTendril::new(), true),
    }
}
