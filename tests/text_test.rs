use html_pluck::{default_formatter, dom, parse, selector, Formatter};
use tendril::StrTendril;

#[test]
fn default_formatter_concatenates_text_in_document_order() {
    let doc = parse("<div><p>A</p><p>B</p></div>");
    let div = doc.find(&selector::elem("div"));

    assert_eq!(div.text(&default_formatter).as_ref(), "AB");
}

#[test]
fn structure_is_invisible_under_the_default_formatter() {
    let doc = parse(
        "<section>one <em>two</em> three<ul><li>four</li><li>five</li></ul>six</section>",
    );
    let section = doc.find(&selector::elem("section"));

    assert_eq!(
        section.text(&default_formatter).as_ref(),
        "one two threefourfivesix"
    );
}

#[test]
fn descend_false_excludes_every_descendant_even_with_substitute_text() {
    let doc = parse(
        r#"<div>visible<aside class="meta">hidden<span>deeper</span></aside>after</div>"#,
    );
    let div = doc.find(&selector::elem("div"));

    let hide_meta = |node: &dom::Handle| {
        if selector::class("meta").matches(node) {
            (StrTendril::from("[meta]"), false)
        } else {
            default_formatter(node)
        }
    };

    let text = div.text(&hide_meta);
    assert_eq!(text.as_ref(), "visible[meta]after");
    assert!(!text.contains("hidden"));
    assert!(!text.contains("deeper"));
}

#[test]
fn formatter_substitutes_line_breaks_for_br_elements() {
    let doc = parse("<p>Line 1<br>Line 2</p>");
    let p = doc.find(&selector::elem("p"));

    let with_breaks = |node: &dom::Handle| {
        if dom::tag_name(node) == Some("br".into()) {
            (StrTendril::from("\n"), true)
        } else {
            default_formatter(node)
        }
    };

    assert_eq!(p.text(&with_breaks).as_ref(), "Line 1\nLine 2");
}

#[test]
fn parent_text_precedes_child_contributions() {
    let doc = parse(r#"<a href="https://example.com">link text</a>"#);
    let a = doc.find(&selector::elem("a"));

    // prefix every anchor with a marker, still descending for its text
    let marked = |node: &dom::Handle| {
        if dom::tag_name(node) == Some("a".into()) {
            (StrTendril::from("> "), true)
        } else {
            default_formatter(node)
        }
    };

    assert_eq!(a.text(&marked).as_ref(), "> link text");
}

#[test]
fn multi_node_selections_extract_in_selection_order() {
    let doc = parse("<p>B</p><p>A</p>");
    let ps = doc.find_all(&selector::elem("p"));

    assert_eq!(ps.text(&default_formatter).as_ref(), "BA");

    // reversed selection order reverses the output
    let reversed = html_pluck::Selection::new(vec![
        ps.nodes()[1].clone(),
        ps.nodes()[0].clone(),
    ]);
    assert_eq!(reversed.text(&default_formatter).as_ref(), "AB");
}

#[test]
fn trait_objects_and_closures_both_serve_as_formatters() {
    let doc = parse("<p>x</p>");
    let p = doc.find(&selector::elem("p"));

    let closure = |node: &dom::Handle| default_formatter(node);
    assert_eq!(p.text(&closure).as_ref(), "x");

    let boxed: &dyn Formatter = &default_formatter;
    assert_eq!(p.text(boxed).as_ref(), "x");
}
