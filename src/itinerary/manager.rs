//! Itinerary field manager.
//!
//! Owns the leg groups inside the travel container and the autocomplete bound
//! to each group's location input. The leg count is always read from the page;
//! nothing here keeps a counter that could drift from what is rendered.

use super::types::{
    datetime_id, geo_id, leg_id, origin_id, parse_remove_handler, remove_handler, TripLeg, TripRecord,
    DATE_FIELD, GEO_FIELD, LEG_CLASS, LOCATION_FIELD, TRAVEL_FORM_ID,
};
use crate::autocomplete::PlaceAutocomplete;
use crate::dom::{Document, NodeId};
use std::collections::BTreeMap;

const DATE_INPUT_CLASS: &str = "form-control mb-2";
const LOCATION_WRAP_CLASS: &str = "autocomplete d-flex align-items-center gap-2";
const LOCATION_INPUT_CLASS: &str = "form-control";
const REMOVE_BUTTON_CLASS: &str = "btn btn-outline-danger btn-sm rounded-circle p-1";
const REMOVE_BUTTON_STYLE: &str = "width: 32px; height: 32px; padding: 0 !important;";

pub struct FieldManager {
    container: NodeId,
    /// Keyed by leg group node, which survives re-indexing.
    widgets: BTreeMap<NodeId, PlaceAutocomplete>,
}

impl FieldManager {
    /// Manage the legs inside an existing container.
    pub fn new(container: NodeId) -> Self {
        Self {
            container,
            widgets: BTreeMap::new(),
        }
    }

    /// Create an empty `<div id="travel_form">` at the end of the page and
    /// manage it.
    pub fn mount(doc: &mut Document) -> Self {
        let container = doc.create_element("div");
        doc.set_element_id(container, TRAVEL_FORM_ID);
        let root = doc.root();
        doc.append_child(root, container);
        Self::new(container)
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    fn container_present(&self, doc: &Document, op: &str) -> bool {
        if doc.is_attached(self.container) {
            return true;
        }
        tracing::error!(op, "travel form container is not in the page");
        false
    }

    /// Leg group elements in document order.
    pub fn leg_groups(&self, doc: &Document) -> Vec<NodeId> {
        doc.query_class(self.container, LEG_CLASS)
    }

    pub fn len(&self, doc: &Document) -> usize {
        self.leg_groups(doc).len()
    }

    pub fn is_empty(&self, doc: &Document) -> bool {
        self.len(doc) == 0
    }

    /// Current values of every leg.
    pub fn legs(&self, doc: &Document) -> Vec<TripLeg> {
        self.leg_groups(doc)
            .into_iter()
            .enumerate()
            .map(|(index, group)| {
                let read = |name: &str| {
                    doc.query_input(group, name)
                        .map(|n| doc.value(n).to_string())
                        .unwrap_or_default()
                };
                TripLeg {
                    index,
                    coordinate: read(GEO_FIELD),
                    location_name: read(LOCATION_FIELD),
                    departure_time: read(DATE_FIELD),
                }
            })
            .collect()
    }

    // ─── Operations ──────────────────────────────────────────────

    /// Append a blank leg at the next index and bind an autocomplete to its
    /// location input. Returns the new leg's index.
    pub fn add_leg(&mut self, doc: &mut Document) -> Option<usize> {
        if !self.container_present(doc, "add_leg") {
            return None;
        }
        let index = self.len(doc);

        let group = doc.create_element("div");
        doc.set_attr(group, "class", LEG_CLASS);
        doc.set_element_id(group, &leg_id(index));

        let geo = doc.create_element("input");
        doc.set_attr(geo, "type", "hidden");
        doc.set_element_id(geo, &geo_id(index));
        doc.set_attr(geo, "name", GEO_FIELD);
        doc.set_value(geo, "");

        let date = doc.create_element("input");
        doc.set_attr(date, "type", "datetime-local");
        doc.set_attr(date, "class", DATE_INPUT_CLASS);
        doc.set_element_id(date, &datetime_id(index));
        doc.set_attr(date, "name", DATE_FIELD);

        let wrap = doc.create_element("div");
        doc.set_attr(wrap, "class", LOCATION_WRAP_CLASS);
        doc.set_attr(wrap, "style", "width: 100%;");

        let location = doc.create_element("input");
        doc.set_attr(location, "type", "text");
        doc.set_attr(location, "class", LOCATION_INPUT_CLASS);
        doc.set_element_id(location, &origin_id(index));
        doc.set_attr(location, "name", LOCATION_FIELD);
        doc.set_attr(location, "placeholder", "Location");

        let remove = doc.create_element("button");
        doc.set_attr(remove, "type", "button");
        doc.set_attr(remove, "class", REMOVE_BUTTON_CLASS);
        doc.set_attr(remove, "onclick", &remove_handler(index));
        doc.set_attr(remove, "style", REMOVE_BUTTON_STYLE);
        let icon = doc.create_element("i");
        doc.set_attr(icon, "class", "fa fa-minus");
        doc.append_child(remove, icon);

        doc.append_child(wrap, location);
        doc.append_child(wrap, remove);
        doc.append_child(group, geo);
        doc.append_child(group, date);
        doc.append_child(group, wrap);
        doc.append_child(self.container, group);

        self.widgets.insert(group, PlaceAutocomplete::bind(location));
        tracing::debug!(index, "added leg");
        Some(index)
    }

    /// Remove the leg at `index` and re-index the rest. Returns false, with no
    /// change, when no such leg is showing.
    pub fn remove_leg(&mut self, doc: &mut Document, index: usize) -> bool {
        let target = leg_id(index);
        let Some(group) = self
            .leg_groups(doc)
            .into_iter()
            .find(|g| doc.element_id(*g) == Some(target.as_str()))
        else {
            tracing::debug!(index, "remove_leg: no such leg");
            return false;
        };

        if let Some(mut widget) = self.widgets.remove(&group) {
            widget.close(doc);
        }
        doc.free(group);
        let remaining = self.reindex(doc);
        tracing::debug!(index, remaining, "removed leg");
        true
    }

    /// Rewrite every leg's identifiers to match its document position:
    /// group id, the three input ids and the remove button's bound index.
    /// Returns the leg count. Running it on a consistent form changes nothing.
    pub fn reindex(&self, doc: &mut Document) -> usize {
        let groups = self.leg_groups(doc);
        for (n, group) in groups.iter().copied().enumerate() {
            doc.set_element_id(group, &leg_id(n));
            if let Some(geo) = doc.query_input(group, GEO_FIELD) {
                doc.set_element_id(geo, &geo_id(n));
            }
            if let Some(date) = doc.query_input(group, DATE_FIELD) {
                doc.set_element_id(date, &datetime_id(n));
            }
            if let Some(location) = doc.query_input(group, LOCATION_FIELD) {
                doc.set_element_id(location, &origin_id(n));
            }
            if let Some(button) = doc.query_tag(group, "button") {
                doc.set_attr(button, "onclick", &remove_handler(n));
            }
        }
        groups.len()
    }

    /// Replace all legs with the non-blank `trips`, in order.
    pub fn initialize_from_existing(&mut self, doc: &mut Document, trips: &[TripRecord]) {
        if !self.container_present(doc, "initialize_from_existing") {
            return;
        }
        for (_, mut widget) in std::mem::take(&mut self.widgets) {
            widget.close(doc);
        }
        doc.clear_children(self.container);

        for trip in trips.iter().filter(|t| !t.is_blank()) {
            let Some(index) = self.add_leg(doc) else {
                return;
            };

            let origin = doc.get_element_by_id(&origin_id(index));
            let geo = doc.get_element_by_id(&geo_id(index));
            let date = doc.get_element_by_id(&datetime_id(index));
            let (Some(origin), Some(geo), Some(date)) = (origin, geo, date) else {
                tracing::error!(index, "could not find all inputs for trip");
                continue;
            };

            doc.set_value(origin, &trip.location_name);
            doc.set_value(geo, &trip.location);
            doc.set_value(date, &trip.date);

            if let Some(group) = doc.closest_class(origin, LEG_CLASS) {
                self.widgets.insert(group, PlaceAutocomplete::bind(origin));
            }
        }
    }

    /// Page-load setup: pre-fill from saved trips when there are any,
    /// otherwise start with a single blank leg.
    pub fn bootstrap(&mut self, doc: &mut Document, trips: Option<&[TripRecord]>) {
        match trips {
            Some(trips) if !trips.is_empty() => self.initialize_from_existing(doc, trips),
            _ => {
                self.initialize_from_existing(doc, &[]);
                self.add_leg(doc);
            }
        }
    }

    // ─── Event routing ───────────────────────────────────────────

    pub fn widget(&self, doc: &Document, index: usize) -> Option<&PlaceAutocomplete> {
        let group = *self.leg_groups(doc).get(index)?;
        self.widgets.get(&group)
    }

    pub fn widget_mut(&mut self, doc: &Document, index: usize) -> Option<&mut PlaceAutocomplete> {
        let group = *self.leg_groups(doc).get(index)?;
        self.widgets.get_mut(&group)
    }

    /// The page-wide click listener: a click on a remove button removes its
    /// leg; every open suggestion list sees the click.
    pub fn on_document_click(&mut self, doc: &mut Document, target: NodeId) {
        for widget in self.widgets.values_mut() {
            widget.on_document_click(doc, target);
        }

        let button = self
            .leg_groups(doc)
            .into_iter()
            .filter_map(|g| doc.query_tag(g, "button"))
            .find(|b| doc.contains(*b, target));
        let index = button
            .and_then(|b| doc.attr(b, "onclick"))
            .and_then(parse_remove_handler);
        if let Some(index) = index {
            self.remove_leg(doc, index);
        }
    }
}
