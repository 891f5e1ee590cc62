//! The rendered suggestion list and its keyboard focus cursor.

use crate::dom::{Document, NodeId};
use crate::places::Place;

pub const LIST_CLASS: &str = "autocomplete-items";
pub const ACTIVE_CLASS: &str = "autocomplete-active";

/// Keys the widget reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Down,
    Up,
    Enter,
    Other,
}

impl Key {
    /// Map a legacy DOM `keyCode`.
    pub fn from_key_code(code: u32) -> Self {
        match code {
            40 => Key::Down,
            38 => Key::Up,
            13 => Key::Enter,
            _ => Key::Other,
        }
    }

    /// Map a DOM `KeyboardEvent.key` name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowDown" | "Down" => Key::Down,
            "ArrowUp" | "Up" => Key::Up,
            "Enter" => Key::Enter,
            _ => Key::Other,
        }
    }
}

/// Next focus position moving down through `len` entries, wrapping past the end.
pub fn focus_down(current: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    match current {
        Some(i) if i + 1 < len => Some(i + 1),
        Some(_) => Some(0),
        None => Some(0),
    }
}

/// Next focus position moving up, wrapping before the start. From unfocused
/// the cursor lands on the last entry.
pub fn focus_up(current: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    match current {
        Some(0) | None => Some(len - 1),
        Some(i) => Some(i - 1),
    }
}

/// One response worth of candidates, as rendered below the input.
#[derive(Debug, Clone)]
pub struct SuggestionList {
    places: Vec<Place>,
    container: NodeId,
    items: Vec<NodeId>,
    focus: Option<usize>,
}

impl SuggestionList {
    /// Build the list element for `places` and append it to `parent`.
    pub fn render(doc: &mut Document, parent: NodeId, input_id: &str, places: Vec<Place>) -> Self {
        let container = doc.create_element("div");
        doc.set_element_id(container, &format!("{}autocomplete-list", input_id));
        doc.set_attr(container, "class", LIST_CLASS);

        let mut items = Vec::with_capacity(places.len());
        for place in &places {
            let item = doc.create_element("div");
            let label = doc.create_text(&place.title);
            doc.append_child(item, label);
            doc.append_child(container, item);
            items.push(item);
        }
        doc.append_child(parent, container);

        Self {
            places,
            container,
            items,
            focus: None,
        }
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn focus(&self) -> Option<usize> {
        self.focus
    }

    /// Position of the entry containing `node`, if any.
    pub fn item_at(&self, doc: &Document, node: NodeId) -> Option<usize> {
        self.items.iter().position(|item| doc.contains(*item, node))
    }

    pub fn contains(&self, doc: &Document, node: NodeId) -> bool {
        doc.contains(self.container, node)
    }

    pub fn move_down(&mut self, doc: &mut Document) {
        self.set_focus(doc, focus_down(self.focus, self.len()));
    }

    pub fn move_up(&mut self, doc: &mut Document) {
        self.set_focus(doc, focus_up(self.focus, self.len()));
    }

    fn set_focus(&mut self, doc: &mut Document, focus: Option<usize>) {
        for item in &self.items {
            doc.remove_class(*item, ACTIVE_CLASS);
        }
        if let Some(item) = focus.and_then(|i| self.items.get(i)) {
            doc.add_class(*item, ACTIVE_CLASS);
        }
        self.focus = focus;
    }

    /// Take the list out of the page and release its nodes.
    pub fn discard(self, doc: &mut Document) {
        doc.free(self.container);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three() -> Vec<Place> {
        vec![
            Place::new("Paris", 48.85, 2.35),
            Place::new("Paris, Texas", 33.66, -95.56),
            Place::new("Paris, Ontario", 43.19, -80.38),
        ]
    }

    #[test]
    fn test_down_from_unfocused_then_wraps() {
        let mut focus = focus_down(None, 3);
        assert_eq!(focus, Some(0));
        for _ in 0..3 {
            focus = focus_down(focus, 3);
        }
        assert_eq!(focus, Some(0));
    }

    #[test]
    fn test_up_wraps_to_last() {
        assert_eq!(focus_up(None, 3), Some(2));
        assert_eq!(focus_up(Some(0), 3), Some(2));
        assert_eq!(focus_up(Some(2), 3), Some(1));
        assert_eq!(focus_up(None, 0), None);
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(Key::from_key_code(40), Key::Down);
        assert_eq!(Key::from_key_code(38), Key::Up);
        assert_eq!(Key::from_key_code(13), Key::Enter);
        assert_eq!(Key::from_key_code(65), Key::Other);
        assert_eq!(Key::from_name("ArrowDown"), Key::Down);
        assert_eq!(Key::from_name("Tab"), Key::Other);
    }

    #[test]
    fn test_render_and_active_class() {
        let mut doc = Document::new();
        let root = doc.root();
        let mut list = SuggestionList::render(&mut doc, root, "origin_0", three());

        assert_eq!(doc.get_element_by_id("origin_0autocomplete-list"), Some(list.container()));
        assert_eq!(doc.text_content(list.container()), "ParisParis, TexasParis, Ontario");

        list.move_down(&mut doc);
        list.move_down(&mut doc);
        assert_eq!(list.focus(), Some(1));
        let active = doc.query_class(list.container(), ACTIVE_CLASS);
        assert_eq!(active.len(), 1);
        assert_eq!(doc.text_content(active[0]), "Paris, Texas");

        list.discard(&mut doc);
        assert!(doc.get_element_by_id("origin_0autocomplete-list").is_none());
    }
}
