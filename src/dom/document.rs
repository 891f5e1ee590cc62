//! Arena-backed element tree.
//!
//! Removing a node only detaches it: the subtree stays addressable by
//! `NodeId` and can be re-inserted. `free` drops a subtree for good and
//! recycles its slots. Every slot carries a generation, so an id that
//! outlived its node reads as a detached, empty node instead of aliasing
//! whatever reused the slot.

/// Handle to a node inside one `Document`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

#[derive(Debug, Clone)]
enum NodeKind {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// A page: one root `body` element and everything attached below it.
#[derive(Debug, Clone)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<usize>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut doc = Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId {
                index: 0,
                generation: 0,
            },
        };
        doc.root = doc.create_element("body");
        doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    /// False once `id` has been freed.
    pub fn is_live(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Nodes currently allocated, attached or not.
    pub fn node_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    // ─── Construction ────────────────────────────────────────────

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
        })
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Text(text.to_string()))
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let node = Node {
            kind,
            parent: None,
            children: Vec::new(),
        };
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.node = Some(node);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId {
                    index: self.slots.len() - 1,
                    generation: 0,
                }
            }
        }
    }

    /// Append `child` as the last child of `parent`, detaching it first if
    /// it already has a parent. Ignored when `parent` lies inside `child`'s
    /// subtree (including `child` itself) or either node is gone.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.is_live(parent) || !self.is_live(child) || self.contains(child, parent) {
            return;
        }
        self.remove(child);
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
    }

    /// Detach `id` from its parent. No-op for detached nodes and the root.
    pub fn remove(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(node) = self.node_mut(parent) {
            node.children.retain(|c| *c != id);
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = None;
        }
    }

    /// Detach `id` and release it with its whole subtree. The root is kept.
    pub fn free(&mut self, id: NodeId) {
        if id == self.root || !self.is_live(id) {
            return;
        }
        self.remove(id);
        let mut doomed = self.descendants(id);
        doomed.push(id);
        for n in doomed {
            let slot = &mut self.slots[n.index];
            slot.node = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(n.index);
        }
    }

    /// Free every child of `id`, like assigning an empty `innerHTML`.
    pub fn clear_children(&mut self, id: NodeId) {
        for child in self.children(id).to_vec() {
            self.free(child);
        }
    }

    // ─── Structure ───────────────────────────────────────────────

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn is_attached(&self, id: NodeId) -> bool {
        self.contains(self.root, id)
    }

    /// True if `node` is `ancestor` or lies anywhere below it.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        if !self.is_live(node) {
            return false;
        }
        let mut current = Some(node);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.parent(c);
        }
        false
    }

    /// All nodes below `id` in document (pre-)order, `id` excluded.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    // ─── Element data ────────────────────────────────────────────

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.node(id)?.kind {
            NodeKind::Element { tag, .. } => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.node(id)?.kind {
            NodeKind::Text(t) => Some(t),
            NodeKind::Element { .. } => None,
        }
    }

    pub fn attrs(&self, id: NodeId) -> &[(String, String)] {
        match self.node(id).map(|n| &n.kind) {
            Some(NodeKind::Element { attrs, .. }) => attrs,
            _ => &[],
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attrs(id)
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, keeping its original position when it already exists.
    /// Ignored on text nodes and freed nodes.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(NodeKind::Element { attrs, .. }) = self.node_mut(id).map(|n| &mut n.kind) {
            match attrs.iter_mut().find(|(k, _)| k == name) {
                Some(slot) => slot.1 = value.to_string(),
                None => attrs.push((name.to_string(), value.to_string())),
            }
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let Some(NodeKind::Element { attrs, .. }) = self.node_mut(id).map(|n| &mut n.kind) {
            attrs.retain(|(k, _)| k != name);
        }
    }

    pub fn element_id(&self, id: NodeId) -> Option<&str> {
        self.attr(id, "id")
    }

    pub fn set_element_id(&mut self, id: NodeId, value: &str) {
        self.set_attr(id, "id", value);
    }

    /// Current value of a form control. Missing attribute reads as empty.
    pub fn value(&self, id: NodeId) -> &str {
        self.attr(id, "value").unwrap_or("")
    }

    pub fn set_value(&mut self, id: NodeId, value: &str) {
        self.set_attr(id, "value", value);
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.attr(id, "class")
            .map(|c| c.split_whitespace().any(|x| x == class))
            .unwrap_or(false)
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if self.has_class(id, class) {
            return;
        }
        let joined = match self.attr(id, "class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {}", existing.trim(), class),
            _ => class.to_string(),
        };
        self.set_attr(id, "class", &joined);
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        let Some(existing) = self.attr(id, "class") else {
            return;
        };
        let kept: Vec<&str> = existing.split_whitespace().filter(|c| *c != class).collect();
        let joined = kept.join(" ");
        if joined.is_empty() {
            self.remove_attr(id, "class");
        } else {
            self.set_attr(id, "class", &joined);
        }
    }

    /// Concatenated text of every text node below `id`.
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(t) = self.text(id) {
            return t.to_string();
        }
        self.descendants(id)
            .into_iter()
            .filter_map(|n| self.text(n))
            .collect()
    }

    // ─── Queries ─────────────────────────────────────────────────

    /// First attached element carrying `id="<element_id>"`.
    pub fn get_element_by_id(&self, element_id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|n| self.element_id(*n) == Some(element_id))
    }

    /// Elements below `scope` carrying `class`, in document order.
    pub fn query_class(&self, scope: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|n| self.has_class(*n, class))
            .collect()
    }

    /// First `<tag>` below `scope`.
    pub fn query_tag(&self, scope: NodeId, tag: &str) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|n| self.tag(*n) == Some(tag))
    }

    /// Equivalent of `scope.querySelector('input[name="<name>"]')`.
    pub fn query_input(&self, scope: NodeId, name: &str) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|n| self.tag(*n) == Some("input") && self.attr(*n, "name") == Some(name))
    }

    /// `id` itself or its nearest ancestor carrying `class`.
    pub fn closest_class(&self, id: NodeId, class: &str) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(c) = current {
            if self.has_class(c, class) {
                return Some(c);
            }
            current = self.parent(c);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_with_input(doc: &mut Document) -> (NodeId, NodeId) {
        let div = doc.create_element("div");
        doc.set_attr(div, "class", "form-id");
        doc.set_element_id(div, "form-id_0");
        let input = doc.create_element("input");
        doc.set_attr(input, "name", "geo[]");
        doc.append_child(div, input);
        let root = doc.root();
        doc.append_child(root, div);
        (div, input)
    }

    #[test]
    fn test_lookup_by_id_only_sees_attached() {
        let mut doc = Document::new();
        let (div, _) = form_with_input(&mut doc);
        assert_eq!(doc.get_element_by_id("form-id_0"), Some(div));
        doc.remove(div);
        assert_eq!(doc.get_element_by_id("form-id_0"), None);
        assert!(!doc.is_attached(div));
    }

    #[test]
    fn test_closest_and_query_input() {
        let mut doc = Document::new();
        let (div, input) = form_with_input(&mut doc);
        assert_eq!(doc.closest_class(input, "form-id"), Some(div));
        assert_eq!(doc.query_input(div, "geo[]"), Some(input));
        assert_eq!(doc.query_input(div, "date[]"), None);
    }

    #[test]
    fn test_class_manipulation() {
        let mut doc = Document::new();
        let el = doc.create_element("div");
        doc.add_class(el, "a");
        doc.add_class(el, "b");
        doc.add_class(el, "a");
        assert_eq!(doc.attr(el, "class"), Some("a b"));
        doc.remove_class(el, "a");
        assert_eq!(doc.attr(el, "class"), Some("b"));
        doc.remove_class(el, "b");
        assert_eq!(doc.attr(el, "class"), None);
    }

    #[test]
    fn test_append_moves_node() {
        let mut doc = Document::new();
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        let c = doc.create_element("span");
        doc.append_child(a, c);
        doc.append_child(b, c);
        assert!(doc.children(a).is_empty());
        assert_eq!(doc.children(b), &[c]);
        assert_eq!(doc.parent(c), Some(b));
    }

    #[test]
    fn test_descendants_document_order() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.create_element("div");
        let a1 = doc.create_element("div");
        let b = doc.create_element("div");
        doc.append_child(root, a);
        doc.append_child(a, a1);
        doc.append_child(root, b);
        assert_eq!(doc.descendants(root), vec![a, a1, b]);
        assert!(doc.contains(a, a1));
        assert!(!doc.contains(b, a1));
    }

    #[test]
    fn test_text_content() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        let t1 = doc.create_text("Par");
        let t2 = doc.create_text("is");
        doc.append_child(div, t1);
        doc.append_child(div, t2);
        assert_eq!(doc.text_content(div), "Paris");
    }

    #[test]
    fn test_append_under_own_descendant_is_ignored() {
        let mut doc = Document::new();
        let (div, input) = form_with_input(&mut doc);
        doc.append_child(input, div);
        doc.append_child(div, div);
        assert_eq!(doc.parent(div), Some(doc.root()));
        assert_eq!(doc.children(input), &[] as &[NodeId]);
        assert!(doc.is_attached(input));
        assert_eq!(doc.closest_class(input, "form-id"), Some(div));
    }

    #[test]
    fn test_free_recycles_slots() {
        let mut doc = Document::new();
        let (div, input) = form_with_input(&mut doc);
        let before = doc.node_count();

        doc.free(div);
        assert_eq!(doc.node_count(), before - 2);
        assert!(!doc.is_live(div));
        assert!(!doc.is_live(input));
        assert!(doc.children(doc.root()).is_empty());

        let reused = doc.create_element("span");
        assert_ne!(reused, div);
        assert_ne!(reused, input);
        assert!(!doc.is_attached(input));
        assert_eq!(doc.tag(input), None);
        assert_eq!(doc.attr(div, "class"), None);

        doc.set_attr(div, "class", "stale");
        assert_eq!(doc.attr(reused, "class"), None);
    }

    #[test]
    fn test_clear_children_frees() {
        let mut doc = Document::new();
        let root = doc.root();
        form_with_input(&mut doc);
        form_with_input(&mut doc);
        doc.clear_children(root);
        assert_eq!(doc.node_count(), 1);
        doc.free(root);
        assert!(doc.is_live(root));
    }
}
