//! Place autocomplete bound to one location input.
//!
//! A query is split in two halves so callers can complete them in any order:
//! `on_input` issues a `QueryTicket`, `apply_response` lands the result. Each
//! issued ticket (and each clear) advances the widget's epoch; only a response
//! carrying the latest epoch is rendered.

use super::suggestions::{Key, SuggestionList};
use crate::dom::{Document, NodeId};
use crate::itinerary::types::{GEO_FIELD, LEG_CLASS};
use crate::places::{Place, PlaceError, PlaceSearch};

/// A query the caller should run against a place service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket {
    epoch: u64,
    text: String,
}

impl QueryTicket {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// What `apply_response` did with a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// A list with this many entries is showing (0: nothing to show).
    Rendered(usize),
    /// A newer query was issued since this ticket; result dropped.
    Stale,
    /// The service failed; no list is showing.
    Failed,
    /// The bound input is no longer in the page.
    Detached,
}

/// Result of a key press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyOutcome {
    /// The event's default action (form submission on Enter) must be suppressed.
    pub prevent_default: bool,
    /// A suggestion was chosen.
    pub selected: bool,
}

#[derive(Debug, Clone)]
pub struct PlaceAutocomplete {
    input: NodeId,
    list: Option<SuggestionList>,
    epoch: u64,
}

impl PlaceAutocomplete {
    pub fn bind(input: NodeId) -> Self {
        Self {
            input,
            list: None,
            epoch: 0,
        }
    }

    pub fn input(&self) -> NodeId {
        self.input
    }

    pub fn is_open(&self) -> bool {
        self.list.is_some()
    }

    pub fn suggestions(&self) -> &[Place] {
        self.list.as_ref().map(|l| l.places()).unwrap_or(&[])
    }

    pub fn focus(&self) -> Option<usize> {
        self.list.as_ref().and_then(|l| l.focus())
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn close(&mut self, doc: &mut Document) {
        if let Some(list) = self.list.take() {
            list.discard(doc);
        }
    }

    /// The input's text changed to `value`.
    pub fn on_input(&mut self, doc: &mut Document, value: &str) -> Option<QueryTicket> {
        doc.set_value(self.input, value);
        self.epoch += 1;
        if value.is_empty() {
            self.close(doc);
            return None;
        }
        Some(QueryTicket {
            epoch: self.epoch,
            text: value.to_string(),
        })
    }

    /// Land the result of a ticket issued by `on_input`.
    pub fn apply_response(
        &mut self,
        doc: &mut Document,
        ticket: &QueryTicket,
        result: Result<Vec<Place>, PlaceError>,
    ) -> Applied {
        if ticket.epoch != self.epoch {
            tracing::debug!(
                ticket = ticket.epoch,
                latest = self.epoch,
                query = %ticket.text,
                "dropping stale place response"
            );
            return Applied::Stale;
        }

        self.close(doc);

        let places = match result {
            Ok(places) => places,
            Err(e) => {
                tracing::warn!(query = %ticket.text, error = %e, "place search failed");
                return Applied::Failed;
            }
        };

        if !doc.is_attached(self.input) {
            tracing::error!(query = %ticket.text, "autocomplete input is no longer in the page");
            return Applied::Detached;
        }
        if places.is_empty() {
            return Applied::Rendered(0);
        }
        let Some(parent) = doc.parent(self.input) else {
            tracing::error!("autocomplete input has no parent to hold suggestions");
            return Applied::Detached;
        };

        let input_id = doc.element_id(self.input).unwrap_or_default().to_string();
        let list = SuggestionList::render(doc, parent, &input_id, places);
        let count = list.len();
        self.list = Some(list);
        Applied::Rendered(count)
    }

    /// Issue a query, run it on `search`, and land the result.
    pub fn run_query<S: PlaceSearch + ?Sized>(
        &mut self,
        doc: &mut Document,
        value: &str,
        search: &S,
    ) -> Option<Applied> {
        let ticket = self.on_input(doc, value)?;
        let result = search.search(ticket.text());
        Some(self.apply_response(doc, &ticket, result))
    }

    /// Choose the suggestion at `position`: the title goes into the input and
    /// the coordinate into the leg group's hidden `geo[]` field.
    pub fn select(&mut self, doc: &mut Document, position: usize) -> bool {
        let Some(place) = self.list.as_ref().and_then(|l| l.places().get(position)).cloned() else {
            return false;
        };

        doc.set_value(self.input, &place.title);

        match doc.closest_class(self.input, LEG_CLASS) {
            None => tracing::error!(place = %place.title, "could not find enclosing leg group"),
            Some(group) => match doc.query_input(group, GEO_FIELD) {
                None => tracing::error!(place = %place.title, "could not find geo input in leg group"),
                Some(geo) => {
                    let value = place.geo();
                    tracing::debug!(geo = %value, "set geo value");
                    doc.set_value(geo, &value);
                }
            },
        }

        self.close(doc);
        true
    }

    pub fn on_key(&mut self, doc: &mut Document, key: Key) -> KeyOutcome {
        match key {
            Key::Down => {
                if let Some(list) = self.list.as_mut() {
                    list.move_down(doc);
                }
                KeyOutcome::default()
            }
            Key::Up => {
                if let Some(list) = self.list.as_mut() {
                    list.move_up(doc);
                }
                KeyOutcome::default()
            }
            Key::Enter => {
                let selected = match self.focus() {
                    Some(i) => self.select(doc, i),
                    None => false,
                };
                KeyOutcome {
                    prevent_default: true,
                    selected,
                }
            }
            Key::Other => KeyOutcome::default(),
        }
    }

    /// A click anywhere in the page. A click on an entry selects it; a click
    /// outside both the input and the list closes the list.
    pub fn on_document_click(&mut self, doc: &mut Document, target: NodeId) {
        let Some(list) = self.list.as_ref() else {
            return;
        };
        if let Some(position) = list.item_at(doc, target) {
            self.select(doc, position);
            return;
        }
        if target == self.input || list.contains(doc, target) {
            return;
        }
        self.close(doc);
    }
}
