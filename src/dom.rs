//! DOM operations adapter.
//!
//! Parse entry points, node constructors, accessors and relinking
//! primitives over the `html5ever`/`markup5ever_rcdom` pair. This is the
//! seam through which the crate parses, links and renders nodes; traversal
//! elsewhere works on the re-exported [`Handle`] directly.

use std::cell::RefCell;
use std::io;
use std::rc::{Rc, Weak};

use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use html5ever::tendril::TendrilSink;
use html5ever::{local_name, namespace_url, ns, Attribute, LocalName, ParseOpts, QualName};
use markup5ever_rcdom::{Node, RcDom, SerializableHandle};

use crate::encoding;
use crate::error::{Error, Result};
use crate::selection::Selection;

// Re-export core node types for external use
pub use markup5ever_rcdom::{Handle, NodeData};
pub use tendril::StrTendril;

// === Parsing ===

/// Parse a complete HTML document.
///
/// The returned selection holds the document root. The parser always
/// supplies the `html`/`head`/`body` scaffolding, so searches from the
/// root reach every node regardless of how partial the input was.
#[must_use]
pub fn parse(html: &str) -> Selection {
    let dom = html5ever::parse_document(RcDom::default(), ParseOpts::default()).one(html);
    Selection::from(dom.document)
}

/// Parse a complete HTML document from a reader.
///
/// Input is decoded as UTF-8 with invalid sequences replaced. Read
/// failures surface as [`Error::Parse`].
pub fn parse_reader<R: io::Read>(reader: &mut R) -> Result<Selection> {
    let dom = html5ever::parse_document(RcDom::default(), ParseOpts::default())
        .from_utf8()
        .read_from(reader)
        .map_err(|e| Error::Parse(e.to_string()))?;
    Ok(Selection::from(dom.document))
}

/// Parse a complete HTML document from raw bytes.
///
/// The charset is sniffed from the document head (see [`crate::encoding`])
/// and the bytes are transcoded to UTF-8 before parsing.
#[must_use]
pub fn parse_bytes(html: &[u8]) -> Selection {
    parse(&encoding::decode_html(html))
}

/// Parse an HTML fragment as if it appeared inside `context`.
///
/// The context element's tag drives the parsing rules: `"<td>x</td>"`
/// parsed in a `tr` context yields a `td` element, while the same input in
/// a `body` context yields only the text, because a stray cell tag is
/// ignored there. Context elements come from [`new_element`] /
/// [`new_element_atom`] or from an existing tree; a non-element context
/// falls back to `body`.
///
/// The returned nodes are detached: each has no parent until the caller
/// splices it somewhere.
#[must_use]
pub fn parse_fragment(html: &str, context: &Handle) -> Selection {
    let (name, attrs) = fragment_context(context);
    let dom =
        html5ever::parse_fragment(RcDom::default(), ParseOpts::default(), name, attrs).one(html);
    fragment_nodes(&dom)
}

/// Reader form of [`parse_fragment`], decoding UTF-8 lossily.
pub fn parse_fragment_reader<R: io::Read>(reader: &mut R, context: &Handle) -> Result<Selection> {
    let (name, attrs) = fragment_context(context);
    let dom = html5ever::parse_fragment(RcDom::default(), ParseOpts::default(), name, attrs)
        .from_utf8()
        .read_from(reader)
        .map_err(|e| Error::Parse(e.to_string()))?;
    Ok(fragment_nodes(&dom))
}

fn fragment_context(context: &Handle) -> (QualName, Vec<Attribute>) {
    match &context.data {
        NodeData::Element { name, attrs, .. } => (name.clone(), attrs.borrow().clone()),
        _ => (QualName::new(None, ns!(html), local_name!("body")), Vec::new()),
    }
}

/// The fragment algorithm wraps its output in a document holding a lone
/// `html` element. Unwrap that scaffolding and detach the parsed nodes so
/// callers receive parentless roots in input order.
fn fragment_nodes(dom: &RcDom) -> Selection {
    let root = dom.document.children.borrow().first().cloned();
    let mut nodes = Vec::new();
    if let Some(root) = root {
        let children: Vec<Handle> = root.children.borrow().clone();
        for child in children {
            detach(&child);
            nodes.push(child);
        }
    }
    Selection::new(nodes)
}

// === Node Construction ===

/// Create a fresh, unattached element.
///
/// The tag is lowercased, matching what the parser does to HTML tags.
#[must_use]
pub fn new_element(tag: &str) -> Handle {
    new_element_atom(LocalName::from(tag.to_ascii_lowercase().as_str()))
}

/// Create a fresh, unattached element from a well-known tag atom.
///
/// Useful when the tag is known at compile time, e.g.
/// `new_element_atom(local_name!("table"))`.
#[must_use]
pub fn new_element_atom(tag: LocalName) -> Handle {
    Node::new(NodeData::Element {
        name: QualName::new(None, ns!(html), tag),
        attrs: RefCell::new(Vec::new()),
        template_contents: RefCell::new(None),
        mathml_annotation_xml_integration_point: false,
    })
}

/// Create a fresh, unattached text node.
#[must_use]
pub fn new_text(text: &str) -> Handle {
    Node::new(NodeData::Text {
        contents: RefCell::new(StrTendril::from(text)),
    })
}

// === Attribute Operations ===

/// Get an attribute value.
///
/// Duplicate attribute names resolve to the first occurrence in source
/// order. Returns `StrTendril` for zero-copy passing; use `.to_string()`
/// only when you need owned storage.
#[must_use]
pub fn get_attribute(node: &Handle, name: &str) -> Option<StrTendril> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| attr.name.local.as_ref() == name)
            .map(|attr| attr.value.clone()),
        _ => None,
    }
}

/// Check if an attribute exists.
#[must_use]
pub fn has_attribute(node: &Handle, name: &str) -> bool {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .any(|attr| attr.name.local.as_ref() == name),
        _ => false,
    }
}

/// Set an attribute value, replacing the first existing occurrence.
///
/// No-op on non-element nodes.
pub fn set_attribute(node: &Handle, name: &str, value: &str) {
    if let NodeData::Element { attrs, .. } = &node.data {
        let mut attrs = attrs.borrow_mut();
        let local = LocalName::from(name);
        if let Some(existing) = attrs.iter_mut().find(|attr| attr.name.local == local) {
            existing.value = StrTendril::from(value);
        } else {
            attrs.push(Attribute {
                name: QualName::new(None, ns!(), local),
                value: StrTendril::from(value),
            });
        }
    }
}

// === Tag/Node Information ===

/// Tag name of an element node (lowercase for HTML elements).
#[must_use]
pub fn tag_name(node: &Handle) -> Option<LocalName> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.clone()),
        _ => None,
    }
}

/// Check if node is an element.
#[inline]
#[must_use]
pub fn is_element(node: &Handle) -> bool {
    matches!(node.data, NodeData::Element { .. })
}

/// Check if node is a text node.
#[inline]
#[must_use]
pub fn is_text(node: &Handle) -> bool {
    matches!(node.data, NodeData::Text { .. })
}

/// Check if node is the document root.
#[inline]
#[must_use]
pub fn is_document(node: &Handle) -> bool {
    matches!(node.data, NodeData::Document)
}

/// Text payload of a text node; `None` for every other node kind.
///
/// Returns `StrTendril` for zero-copy passing.
#[must_use]
pub fn own_text(node: &Handle) -> Option<StrTendril> {
    match &node.data {
        NodeData::Text { contents } => Some(contents.borrow().clone()),
        _ => None,
    }
}

// === Tree Navigation ===

/// Parent node, or `None` for a detached node or the document root.
#[must_use]
pub fn parent(node: &Handle) -> Option<Handle> {
    let weak = node.parent.take();
    let parent = weak.as_ref().and_then(Weak::upgrade);
    node.parent.set(weak);
    parent
}

/// All child nodes (elements, text, comments, ...) in tree order.
#[must_use]
pub fn child_nodes(node: &Handle) -> Vec<Handle> {
    node.children.borrow().clone()
}

/// First child node of any kind.
#[must_use]
pub fn first_child(node: &Handle) -> Option<Handle> {
    node.children.borrow().first().cloned()
}

/// Next sibling of any kind.
#[must_use]
pub fn next_sibling(node: &Handle) -> Option<Handle> {
    let parent = parent(node)?;
    let siblings = parent.children.borrow();
    let index = position(&siblings, node)?;
    siblings.get(index + 1).cloned()
}

/// Previous sibling of any kind.
#[must_use]
pub fn prev_sibling(node: &Handle) -> Option<Handle> {
    let parent = parent(node)?;
    let siblings = parent.children.borrow();
    let index = position(&siblings, node)?;
    index.checked_sub(1).and_then(|i| siblings.get(i).cloned())
}

/// Index of a node within a sibling list, by pointer identity.
///
/// The tree keeps no sibling links, so adjacency is recovered by scanning
/// the parent's children.
fn position(siblings: &[Handle], node: &Handle) -> Option<usize> {
    siblings.iter().position(|s| Rc::ptr_eq(s, node))
}

// === Tree Manipulation ===

/// True when `node` is `start` or one of its ancestors.
///
/// Relinking must refuse to attach a node below its own subtree; a
/// parent-chain cycle would make every later traversal recurse forever.
fn in_ancestor_chain(node: &Handle, start: &Handle) -> bool {
    let mut current = Some(start.clone());
    while let Some(candidate) = current {
        if Rc::ptr_eq(&candidate, node) {
            return true;
        }
        current = parent(&candidate);
    }
    false
}

/// Unlink a node from its parent. No-op when already detached.
pub fn detach(node: &Handle) {
    if let Some(parent) = node.parent.take().and_then(|weak| weak.upgrade()) {
        let mut siblings = parent.children.borrow_mut();
        if let Some(index) = position(&siblings, node) {
            siblings.remove(index);
        }
    }
}

/// Append a child as the parent's last child.
///
/// The child is detached from any previous parent first; the relink is
/// visible through every handle sharing the node. Appending a node to
/// itself or to one of its own descendants is a no-op: that relink would
/// cycle the parent chain.
pub fn append_child(parent: &Handle, child: &Handle) {
    if in_ancestor_chain(child, parent) {
        return;
    }
    detach(child);
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().push(child.clone());
}

/// Insert a node immediately before a sibling. No-op when the sibling is
/// detached, when both arguments are the same node, or when the insertion
/// point sits inside the node's own subtree.
pub fn insert_before(sibling: &Handle, node: &Handle) {
    if Rc::ptr_eq(sibling, node) {
        return;
    }
    let Some(parent) = parent(sibling) else {
        return;
    };
    if in_ancestor_chain(node, &parent) {
        return;
    }
    detach(node);
    let mut siblings = parent.children.borrow_mut();
    if let Some(index) = position(&siblings, sibling) {
        node.parent.set(Some(Rc::downgrade(&parent)));
        siblings.insert(index, node.clone());
    }
}

/// Insert a node immediately after a sibling. No-op when the sibling is
/// detached, when both arguments are the same node, or when the insertion
/// point sits inside the node's own subtree.
pub fn insert_after(sibling: &Handle, node: &Handle) {
    if Rc::ptr_eq(sibling, node) {
        return;
    }
    let Some(parent) = parent(sibling) else {
        return;
    };
    if in_ancestor_chain(node, &parent) {
        return;
    }
    detach(node);
    let mut siblings = parent.children.borrow_mut();
    if let Some(index) = position(&siblings, sibling) {
        node.parent.set(Some(Rc::downgrade(&parent)));
        siblings.insert(index + 1, node.clone());
    }
}

// === Rendering ===

/// Serialize a node and its subtree to the writer.
///
/// A document node cannot be serialized itself; its children are written
/// instead. Text escaping is the serializer's contract, so cell strings
/// and attribute values round-trip safely.
pub fn render_node<W: io::Write>(writer: &mut W, node: &Handle) -> Result<()> {
    let traversal_scope = if is_document(node) {
        TraversalScope::ChildrenOnly(None)
    } else {
        TraversalScope::IncludeNode
    };
    let opts = SerializeOpts {
        traversal_scope,
        ..SerializeOpts::default()
    };
    serialize(writer, &SerializableHandle::from(node.clone()), opts)?;
    Ok(())
}
