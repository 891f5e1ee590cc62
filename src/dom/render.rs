//! HTML serialisation of a document subtree.

use super::document::{Document, NodeId};

const VOID_ELEMENTS: &[&str] = &["input", "br", "img", "hr", "meta", "link"];

/// Serialise `id` and everything below it.
pub fn to_html(doc: &Document, id: NodeId) -> String {
    let mut out = String::new();
    write_node(doc, id, &mut out);
    out
}

/// Serialise only the children of `id`, like `innerHTML`.
pub fn inner_html(doc: &Document, id: NodeId) -> String {
    let mut out = String::new();
    for child in doc.children(id) {
        write_node(doc, *child, &mut out);
    }
    out
}

fn write_node(doc: &Document, id: NodeId, out: &mut String) {
    if let Some(text) = doc.text(id) {
        out.push_str(&escape_text(text));
        return;
    }
    let Some(tag) = doc.tag(id) else {
        return;
    };
    out.push('<');
    out.push_str(tag);
    for (name, value) in doc.attrs(id) {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_attr(value));
        out.push('"');
    }
    out.push('>');
    if VOID_ELEMENTS.contains(&tag) {
        return;
    }
    for child in doc.children(id) {
        write_node(doc, *child, out);
    }
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_void_and_nested() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        doc.set_attr(div, "class", "form-id");
        let input = doc.create_element("input");
        doc.set_attr(input, "type", "hidden");
        doc.set_attr(input, "name", "geo[]");
        doc.append_child(div, input);
        assert_eq!(
            to_html(&doc, div),
            r#"<div class="form-id"><input type="hidden" name="geo[]"></div>"#
        );
    }

    #[test]
    fn test_escaping() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        doc.set_attr(div, "title", r#"a "quoted" <b>"#);
        let t = doc.create_text("Fish & Chips <3");
        doc.append_child(div, t);
        assert_eq!(
            to_html(&doc, div),
            r#"<div title="a &quot;quoted&quot; &lt;b&gt;">Fish &amp; Chips &lt;3</div>"#
        );
        assert_eq!(inner_html(&doc, div), "Fish &amp; Chips &lt;3");
    }
}
