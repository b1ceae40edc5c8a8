//! Ordered node sequences and traversal.
//!
//! [`Selection`] is the query surface of the crate: an ordered sequence of
//! node handles, narrowed by search operations and drained by extraction.
//! A selection is a view, not a copy. The handles alias the underlying
//! tree, so relinking a node is visible through every selection holding it.

use std::fmt;
use std::io;

use tendril::StrTendril;

use crate::dom::{self, Handle};
use crate::error::Result;
use crate::formatter::Formatter;
use crate::selector::Selector;

/// An ordered sequence of node handles.
///
/// Order is caller-meaningful: parse entry points and search operations
/// produce document order, and every operation preserves the order it is
/// given. Selections make no uniqueness guarantees; overlapping inputs can
/// repeat handles.
///
/// Cloning a selection clones handles, never nodes.
#[derive(Clone, Default)]
pub struct Selection {
    nodes: Vec<Handle>,
}

impl Selection {
    /// Selection over the given nodes, in the given order.
    #[must_use]
    pub fn new(nodes: Vec<Handle>) -> Self {
        Selection { nodes }
    }

    /// The underlying handles, in order.
    #[must_use]
    pub fn nodes(&self) -> &[Handle] {
        &self.nodes
    }

    /// Number of nodes held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when no nodes are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Single-node sub-selections, in order.
    pub fn iter(&self) -> impl Iterator<Item = Selection> + '_ {
        self.nodes.iter().map(|node| Selection::from(node.clone()))
    }

    // === Traversal ===

    /// Immediate children of every node, flattened in order.
    ///
    /// All node kinds are included; whitespace between tags shows up as
    /// text-node children.
    #[must_use]
    pub fn children(&self) -> Selection {
        self.nodes.iter().flat_map(dom::child_nodes).collect()
    }

    /// Parents of the nodes, in order, one entry per node that has one.
    ///
    /// Detached nodes and document roots contribute nothing, so the result
    /// can be shorter than the input. No deduplication: sibling inputs
    /// repeat their shared parent here.
    #[must_use]
    pub fn parents(&self) -> Selection {
        self.nodes.iter().filter_map(dom::parent).collect()
    }

    // === Search ===

    /// The first node matching the selector, searching this selection's
    /// nodes and their descendants depth-first in pre-order. The
    /// selection's own nodes are candidates too. Empty when nothing
    /// matches.
    #[must_use]
    pub fn find(&self, selector: &Selector) -> Selection {
        for node in &self.nodes {
            if let Some(found) = find_node(node, selector) {
                return Selection::from(found);
            }
        }
        Selection::default()
    }

    /// Every node matching the selector, in the order [`Selection::find`]
    /// visits them: depth-first pre-order, a parent before its children.
    /// Matching is not exclusive; a matching node's descendants are still
    /// searched.
    #[must_use]
    pub fn find_all(&self, selector: &Selector) -> Selection {
        let mut matches = Vec::new();
        for node in &self.nodes {
            find_all_node(node, selector, &mut matches);
        }
        Selection::new(matches)
    }

    /// True when [`Selection::find`] would return a node.
    #[must_use]
    pub fn contains(&self, selector: &Selector) -> bool {
        !self.find(selector).is_empty()
    }

    /// Narrow to the nodes matching the selector, preserving order.
    ///
    /// No descent: only the selection's own nodes are tested. Filtering an
    /// already-filtered selection with the same selector changes nothing.
    #[must_use]
    pub fn filter(&self, selector: &Selector) -> Selection {
        self.nodes
            .iter()
            .filter(|node| selector.matches(node))
            .cloned()
            .collect()
    }

    // === Indexing ===

    /// Sub-selection holding just the node at `index`; empty when out of
    /// range.
    #[must_use]
    pub fn get(&self, index: usize) -> Selection {
        self.nodes.get(index).cloned().into_iter().collect()
    }

    /// Sub-selection holding just the first node; empty stays empty.
    #[must_use]
    pub fn first(&self) -> Selection {
        self.get(0)
    }

    /// Sub-selection holding just the last node; empty stays empty.
    #[must_use]
    pub fn last(&self) -> Selection {
        match self.nodes.last() {
            Some(node) => Selection::from(node.clone()),
            None => Selection::default(),
        }
    }

    // === Iteration with caller errors ===

    /// Visit each node as a single-node selection, in order, stopping at
    /// the first error and returning it unchanged.
    pub fn each<E, F>(&self, mut f: F) -> std::result::Result<(), E>
    where
        F: FnMut(Selection) -> std::result::Result<(), E>,
    {
        for node in &self.nodes {
            f(Selection::from(node.clone()))?;
        }
        Ok(())
    }

    /// Map each node, as a single-node selection, to a value.
    ///
    /// Fails fast: the first error comes back unchanged and partial
    /// results are dropped.
    pub fn map<T, E, F>(&self, mut f: F) -> std::result::Result<Vec<T>, E>
    where
        F: FnMut(Selection) -> std::result::Result<T, E>,
    {
        self.nodes
            .iter()
            .map(|node| f(Selection::from(node.clone())))
            .collect()
    }

    // === Extraction ===

    /// Extract text under the formatter's policy.
    ///
    /// Nodes are visited in selection order. For each node the formatter's
    /// text is appended, then the node's children are visited only when the
    /// formatter said to descend; a `false` prunes the whole subtree
    /// regardless of the text returned. The walk visits no node twice.
    /// Formatters must not relink the tree mid-walk.
    #[must_use]
    pub fn text<F>(&self, formatter: &F) -> StrTendril
    where
        F: Formatter + ?Sized,
    {
        let mut out = StrTendril::new();
        for node in &self.nodes {
            text_node(node, formatter, &mut out);
        }
        out
    }

    // === Splicing ===

    /// Append the other selection's nodes, in order, as the last children
    /// of this selection's first node. No-op on an empty selection.
    ///
    /// Splicing relinks shared handles in place: each spliced node is
    /// detached from any previous parent first, and the change is visible
    /// through every selection aliasing it. A node whose subtree contains
    /// the target is skipped rather than relinked, so splicing can never
    /// cycle the parent chain (this holds for all three splice methods).
    pub fn append_child(&self, other: &Selection) {
        let Some(parent) = self.nodes.first() else {
            return;
        };
        for node in &other.nodes {
            dom::append_child(parent, node);
        }
    }

    /// Insert the other selection's nodes, in order, immediately before
    /// this selection's first node. No-op when this selection is empty or
    /// its first node is detached.
    pub fn insert_before(&self, other: &Selection) {
        let Some(reference) = self.nodes.first() else {
            return;
        };
        for node in &other.nodes {
            dom::insert_before(reference, node);
        }
    }

    /// Insert the other selection's nodes, in order, immediately after
    /// this selection's first node. No-op when this selection is empty or
    /// its first node is detached.
    pub fn insert_after(&self, other: &Selection) {
        let Some(reference) = self.nodes.first() else {
            return;
        };
        let mut reference = reference.clone();
        for node in &other.nodes {
            dom::insert_after(&reference, node);
            reference = node.clone();
        }
    }

    // === Rendering ===

    /// Serialize every node, in order, to the writer, stopping at and
    /// propagating the first sink error.
    pub fn render<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        for node in &self.nodes {
            dom::render_node(writer, node)?;
        }
        Ok(())
    }

    /// Serialize to a string.
    #[must_use]
    pub fn html(&self) -> StrTendril {
        let mut buf = Vec::new();
        // writing to a Vec cannot fail
        let _ = self.render(&mut buf);
        let text = String::from_utf8_lossy(&buf);
        StrTendril::from(text.as_ref())
    }
}

impl From<Handle> for Selection {
    fn from(node: Handle) -> Self {
        Selection { nodes: vec![node] }
    }
}

impl FromIterator<Handle> for Selection {
    fn from_iter<I: IntoIterator<Item = Handle>>(iter: I) -> Self {
        Selection {
            nodes: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.html())
    }
}

// the node type keeps no Debug impl, so summarize by kind and tag
impl fmt::Debug for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Selection(")?;
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match dom::tag_name(node) {
                Some(tag) => write!(f, "<{tag}>")?,
                None if dom::is_text(node) => write!(f, "#text")?,
                None if dom::is_document(node) => write!(f, "#document")?,
                None => write!(f, "#node")?,
            }
        }
        write!(f, ")")
    }
}

// === Node-level walkers ===
//
// Search and extraction recurse on handles and fold into a Selection once
// at the surface, instead of re-wrapping every visited node.

/// Depth-first pre-order search for the first match, `node` included.
fn find_node(node: &Handle, selector: &Selector) -> Option<Handle> {
    if selector.matches(node) {
        return Some(node.clone());
    }
    let children = node.children.borrow();
    for child in children.iter() {
        if let Some(found) = find_node(child, selector) {
            return Some(found);
        }
    }
    None
}

/// Depth-first pre-order collection of every match, `node` included.
fn find_all_node(node: &Handle, selector: &Selector, matches: &mut Vec<Handle>) {
    if selector.matches(node) {
        matches.push(node.clone());
    }
    let children = node.children.borrow();
    for child in children.iter() {
        find_all_node(child, selector, matches);
    }
}

/// Append the formatter's text for `node`, then its children's, unless the
/// formatter pruned the subtree.
fn text_node<F>(node: &Handle, formatter: &F, out: &mut StrTendril)
where
    F: Formatter + ?Sized,
{
    let (text, descend) = formatter.format(node);
    out.push_tendril(&text);
    if !descend {
        return;
    }
    let children = node.children.borrow();
    for child in children.iter() {
        text_node(child, formatter, out);
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::dom::{new_element, parse};
    use crate::formatter::default_formatter;
    use crate::selector::{self, elem, id};

    #[test]
    fn test_children_includes_every_node_kind() {
        let doc = parse("<div>a<span>b</span></div>");
        let div = doc.find(&elem("div"));

        let children = div.children();
        assert_eq!(children.len(), 2);
        assert!(dom::is_text(&children.nodes()[0]));
        assert_eq!(dom::tag_name(&children.nodes()[1]), Some("span".into()));
    }

    #[test]
    fn test_parents_skips_rootless_and_keeps_repeats() {
        let doc = parse("<ul><li>1</li><li>2</li></ul>");

        // the document root has no parent and contributes nothing
        assert!(doc.parents().is_empty());

        let items = doc.find_all(&elem("li"));
        let parents = items.parents();
        assert_eq!(parents.len(), 2);
        assert!(Rc::ptr_eq(&parents.nodes()[0], &parents.nodes()[1]));
    }

    #[test]
    fn test_find_returns_first_in_document_order() {
        let doc = parse(r#"<div><p id="a">1</p></div><p id="b">2</p>"#);

        let first = doc.find(&elem("p"));
        assert_eq!(first.len(), 1);
        assert_eq!(dom::get_attribute(&first.nodes()[0], "id"), Some("a".into()));
    }

    #[test]
    fn test_find_considers_the_selections_own_nodes() {
        let doc = parse("<div>x</div>");
        let div = doc.find(&elem("div"));

        let again = div.find(&elem("div"));
        assert_eq!(again.len(), 1);
        assert!(Rc::ptr_eq(&again.nodes()[0], &div.nodes()[0]));
    }

    #[test]
    fn test_find_misses_yield_empty() {
        let doc = parse("<p>x</p>");
        assert!(doc.find(&elem("video")).is_empty());
        assert!(!doc.contains(&elem("video")));
        assert!(doc.contains(&elem("p")));
    }

    #[test]
    fn test_find_all_parent_before_child_and_not_exclusive() {
        let doc = parse(r#"<div id="outer"><div id="inner">x</div></div>"#);

        let divs = doc.find_all(&elem("div"));
        assert_eq!(divs.len(), 2);
        assert_eq!(dom::get_attribute(&divs.nodes()[0], "id"), Some("outer".into()));
        assert_eq!(dom::get_attribute(&divs.nodes()[1], "id"), Some("inner".into()));
    }

    #[test]
    fn test_filter_narrows_without_descent() {
        let doc = parse(r#"<div class="x"><p class="x">in</p></div><p>out</p>"#);
        let tops = doc.find(&elem("body")).children();
        assert_eq!(tops.len(), 2);

        // the nested p.x is not among the filtered nodes
        let marked = tops.filter(&selector::class("x"));
        assert_eq!(marked.len(), 1);
        assert_eq!(dom::tag_name(&marked.nodes()[0]), Some("div".into()));

        // idempotent
        let again = marked.filter(&selector::class("x"));
        assert_eq!(again.len(), marked.len());
    }

    #[test]
    fn test_get_first_last_bounds() {
        let doc = parse("<p>1</p><p>2</p><p>3</p>");
        let ps = doc.find_all(&elem("p"));

        assert_eq!(ps.get(0).len(), 1);
        assert_eq!(ps.get(2).len(), 1);
        assert!(ps.get(3).is_empty());

        assert!(Rc::ptr_eq(&ps.first().nodes()[0], &ps.nodes()[0]));
        assert!(Rc::ptr_eq(&ps.last().nodes()[0], &ps.nodes()[2]));

        let empty = Selection::default();
        assert!(empty.first().is_empty());
        assert!(empty.last().is_empty());
    }

    #[test]
    fn test_each_visits_in_order_and_fails_fast() {
        let doc = parse("<p>1</p><p>2</p><p>3</p>");
        let ps = doc.find_all(&elem("p"));

        let mut seen = Vec::new();
        let result = ps.each(|p| {
            let text = p.text(&default_formatter).to_string();
            if text == "3" {
                return Err("stop");
            }
            seen.push(text);
            Ok(())
        });

        assert_eq!(result, Err("stop"));
        assert_eq!(seen, ["1", "2"]);
    }

    #[test]
    fn test_map_collects_typed_values() {
        let doc = parse("<p>10</p><p>20</p>");
        let ps = doc.find_all(&elem("p"));

        let values: Vec<u32> = ps
            .map(|p| p.text(&default_formatter).parse::<u32>())
            .unwrap();
        assert_eq!(values, [10, 20]);

        let doc = parse("<p>10</p><p>oops</p>");
        let ps = doc.find_all(&elem("p"));
        assert!(ps.map(|p| p.text(&default_formatter).parse::<u32>()).is_err());
    }

    #[test]
    fn test_iter_yields_single_node_selections() {
        let doc = parse("<p>1</p><p>2</p>");
        let ps = doc.find_all(&elem("p"));

        let texts: Vec<String> = ps
            .iter()
            .map(|p| p.text(&default_formatter).to_string())
            .collect();
        assert_eq!(texts, ["1", "2"]);
    }

    #[test]
    fn test_text_concatenates_in_tree_order() {
        let doc = parse("<p>A<span>B</span>C</p>");
        let p = doc.find(&elem("p"));
        assert_eq!(&*p.text(&default_formatter), "ABC");
    }

    #[test]
    fn test_text_descend_false_prunes_subtree() {
        let doc = parse("<div>keep<table><tr><td>drop</td></tr></table>tail</div>");
        let div = doc.find(&elem("div"));

        let table_pruner = |node: &Handle| {
            if dom::tag_name(node) == Some("table".into()) {
                return ("[table]".into(), false);
            }
            default_formatter(node)
        };
        assert_eq!(&*div.text(&table_pruner), "keep[table]tail");
    }

    #[test]
    fn test_append_child_relinks_shared_handles() {
        let doc = parse(r#"<div id="a"><span>x</span></div><div id="b"></div>"#);
        let span = doc.find(&elem("span"));
        let target = doc.find(&id("b"));

        target.append_child(&span);

        // the move is visible through the original selection
        assert!(Rc::ptr_eq(
            &dom::parent(&span.nodes()[0]).unwrap(),
            &target.nodes()[0]
        ));
        assert!(doc.find(&id("a")).children().is_empty());
    }

    #[test]
    fn test_insert_before_and_after_keep_argument_order() {
        let doc = parse("<ul><li>m</li></ul>");
        let anchor = doc.find(&elem("li"));

        let leading = Selection::new(vec![new_element("i"), new_element("b")]);
        let trailing = Selection::new(vec![new_element("u"), new_element("s")]);

        anchor.insert_before(&leading);
        anchor.insert_after(&trailing);

        let ul = doc.find(&elem("ul"));
        let tags: Vec<String> = ul
            .children()
            .nodes()
            .iter()
            .map(|n| dom::tag_name(n).map_or_else(String::new, |t| t.to_string()))
            .collect();
        assert_eq!(tags, ["i", "b", "li", "u", "s"]);
    }

    #[test]
    fn test_splicing_moves_rather_than_copies() {
        let doc = parse("<ul><li>m</li></ul>");
        let anchor = doc.find(&elem("li"));
        let node = Selection::from(new_element("i"));

        anchor.insert_before(&node);
        anchor.insert_after(&node);

        // the same handle was moved, not duplicated
        let ul = doc.find(&elem("ul"));
        assert_eq!(ul.children().len(), 2);
        assert_eq!(&*ul.html(), "<ul><li>m</li><i></i></ul>");
    }

    #[test]
    fn test_splice_under_own_descendant_is_refused() {
        let doc = parse(r#"<div id="outer"><span id="inner">x</span></div>"#);
        let outer = doc.find(&id("outer"));
        let inner = doc.find(&id("inner"));

        inner.append_child(&outer);

        // the tree is unchanged and traversal still terminates
        assert!(Rc::ptr_eq(
            &dom::parent(&inner.nodes()[0]).unwrap(),
            &outer.nodes()[0]
        ));
        assert_eq!(&*doc.text(&default_formatter), "x");
        assert_eq!(doc.find_all(&elem("span")).len(), 1);
    }

    #[test]
    fn test_splice_on_empty_selection_is_noop() {
        let doc = parse("<p>x</p>");
        let empty = Selection::default();
        let p = doc.find(&elem("p"));

        empty.append_child(&p);
        empty.insert_before(&p);
        empty.insert_after(&p);

        // p stayed where it was
        assert_eq!(dom::tag_name(&dom::parent(&p.nodes()[0]).unwrap()), Some("body".into()));
    }

    #[test]
    fn test_render_and_display_write_every_node() {
        let doc = parse("<p>1</p><p>2</p>");
        let ps = doc.find_all(&elem("p"));

        let mut buf = Vec::new();
        ps.render(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "<p>1</p><p>2</p>");
        assert_eq!(ps.to_string(), "<p>1</p><p>2</p>");
        assert_eq!(&*ps.html(), "<p>1</p><p>2</p>");
    }

    #[test]
    fn test_debug_summarizes_kinds() {
        let doc = parse("<p>x</p>");
        let p = doc.find(&elem("p"));
        assert_eq!(format!("{p:?}"), "Selection(<p>)");
        assert_eq!(format!("{doc:?}"), "Selection(#document)");
    }
}
