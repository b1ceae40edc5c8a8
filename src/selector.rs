//! Selector predicate algebra.
//!
//! A [`Selector`] is a reusable predicate over a single node. Leaf
//! constructors test tag names and attributes; combinators build structural
//! conditions (ancestor chains, sibling context) out of existing selectors.
//! Selections apply selectors through `find`, `find_all` and `filter`.
//!
//! Selectors never error and never relink the tree. An absent parent or
//! sibling simply fails to match: structural combinators resolve the
//! relationship first and treat "no such node" as false, so a selector body
//! always receives a real node.

use std::fmt;
use std::rc::Rc;

use html5ever::LocalName;

use crate::dom::{self, Handle};

/// A predicate over a single node.
///
/// Cheaply cloneable and immutable once built; one selector can drive any
/// number of searches over any number of trees.
///
/// # Example
///
/// ```
/// use html_pluck::{parse, selector};
///
/// let doc = parse(r#"<div class="menu"><p>nav</p></div><p>body text</p>"#);
/// let nav_text = selector::tree(vec![selector::class("menu"), selector::elem("p")]);
/// assert_eq!(doc.find_all(&nav_text).len(), 1);
/// ```
#[derive(Clone)]
pub struct Selector(Rc<dyn Fn(&Handle) -> bool>);

impl Selector {
    /// Wrap an arbitrary predicate.
    ///
    /// The escape hatch for conditions the built-in constructors don't
    /// cover, including stateful ones such as a visit budget that cuts a
    /// search short.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&Handle) -> bool + 'static,
    {
        Selector(Rc::new(predicate))
    }

    /// Evaluate the selector against a node.
    #[must_use]
    pub fn matches(&self, node: &Handle) -> bool {
        (self.0)(node)
    }

    /// Both this selector and `other` match.
    #[must_use]
    pub fn and(&self, other: &Selector) -> Selector {
        let (a, b) = (self.clone(), other.clone());
        Selector::new(move |node| a.matches(node) && b.matches(node))
    }

    /// Either this selector or `other` matches.
    #[must_use]
    pub fn or(&self, other: &Selector) -> Selector {
        let (a, b) = (self.clone(), other.clone());
        Selector::new(move |node| a.matches(node) || b.matches(node))
    }

    /// This selector does not match.
    #[must_use]
    pub fn not(&self) -> Selector {
        let inner = self.clone();
        Selector::new(move |node| !inner.matches(node))
    }

    /// Matches nodes whose parent matches this selector.
    ///
    /// Lifts a selector over containers into one over their children; a
    /// detached node or document root never matches.
    #[must_use]
    pub fn first_child(&self) -> Selector {
        let inner = self.clone();
        Selector::new(move |node| dom::parent(node).is_some_and(|parent| inner.matches(&parent)))
    }

    /// Matches nodes whose next sibling matches this selector, i.e. nodes
    /// sitting immediately before a match. A last child never matches.
    #[must_use]
    pub fn before(&self) -> Selector {
        let inner = self.clone();
        Selector::new(move |node| {
            dom::next_sibling(node).is_some_and(|sibling| inner.matches(&sibling))
        })
    }

    /// Matches nodes whose previous sibling matches this selector, i.e.
    /// nodes sitting immediately after a match. A first child never matches.
    #[must_use]
    pub fn after(&self) -> Selector {
        let inner = self.clone();
        Selector::new(move |node| {
            dom::prev_sibling(node).is_some_and(|sibling| inner.matches(&sibling))
        })
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Selector(..)")
    }
}

// === Combinators ===

/// All selectors match. An empty list is vacuously true.
#[must_use]
pub fn and(selectors: Vec<Selector>) -> Selector {
    Selector::new(move |node| selectors.iter().all(|s| s.matches(node)))
}

/// At least one selector matches. An empty list never matches.
#[must_use]
pub fn or(selectors: Vec<Selector>) -> Selector {
    Selector::new(move |node| selectors.iter().any(|s| s.matches(node)))
}

/// The selector does not match.
#[must_use]
pub fn not(selector: Selector) -> Selector {
    Selector::new(move |node| !selector.matches(node))
}

/// Rigid ancestor chain.
///
/// The last selector applies to the node itself, the one before it to the
/// node's parent, and so on up the tree. The chain fails as soon as a
/// selector mismatches or the walk runs out of parents. An empty chain is
/// vacuously true.
///
/// `tree(vec![elem("tr"), elem("td")])` matches a `td` directly inside a
/// `tr`; a chain written `table`, `tr` will not survive the `tbody` the
/// parser inserts between them. Use [`includes`] when gaps are allowed.
#[must_use]
pub fn tree(selectors: Vec<Selector>) -> Selector {
    Selector::new(move |node| {
        let mut current = Some(node.clone());
        for selector in selectors.iter().rev() {
            let Some(candidate) = current else {
                return false;
            };
            if !selector.matches(&candidate) {
                return false;
            }
            current = dom::parent(&candidate);
        }
        true
    })
}

/// Flexible ancestor chain.
///
/// The last selector applies to the node itself; each earlier selector is
/// satisfied by the nearest ancestor matching it, skipping ancestors that
/// don't. Running out of ancestors fails the chain. After the first parent
/// step, consecutive selectors may be satisfied by the same ancestor. An
/// empty chain is vacuously true.
#[must_use]
pub fn includes(selectors: Vec<Selector>) -> Selector {
    Selector::new(move |node| {
        let mut chain = selectors.iter().rev();
        let Some(last) = chain.next() else {
            return true;
        };
        if !last.matches(node) {
            return false;
        }

        let mut current = dom::parent(node);
        for selector in chain {
            loop {
                let Some(candidate) = current.clone() else {
                    return false;
                };
                if selector.matches(&candidate) {
                    break;
                }
                current = dom::parent(&candidate);
            }
        }
        true
    })
}

// === Leaves ===

/// Element with the given tag name, compared case-insensitively.
#[must_use]
pub fn elem(tag: &str) -> Selector {
    let tag = tag.to_ascii_lowercase();
    Selector::new(move |node| dom::tag_name(node).is_some_and(|local| local.as_ref() == tag))
}

/// Element with the given well-known tag atom.
///
/// Skips the string comparison of [`elem`]: interned atoms compare by
/// pointer. `atom(local_name!("table"))` is the hot-path spelling.
#[must_use]
pub fn atom(tag: LocalName) -> Selector {
    Selector::new(move |node| dom::tag_name(node).is_some_and(|local| local == tag))
}

/// Node carrying the attribute, with any value.
#[must_use]
pub fn has_attr(name: &str) -> Selector {
    let name = name.to_string();
    Selector::new(move |node| dom::has_attribute(node, &name))
}

/// Node whose attribute has exactly this value.
#[must_use]
pub fn attr(name: &str, value: &str) -> Selector {
    let (name, value) = (name.to_string(), value.to_string());
    Selector::new(move |node| {
        dom::get_attribute(node, &name).is_some_and(|found| found.as_ref() == value)
    })
}

/// Node with this exact `id` attribute.
#[must_use]
pub fn id(id: &str) -> Selector {
    attr("id", id)
}

/// Node whose `class` attribute contains this class as a whole
/// whitespace-delimited token. `class("nav")` matches `class="nav menu"`
/// but not `class="navbar"`.
#[must_use]
pub fn class(name: &str) -> Selector {
    let name = name.to_string();
    Selector::new(move |node| {
        dom::get_attribute(node, "class")
            .is_some_and(|classes| classes.split_whitespace().any(|token| token == name))
    })
}
