//! Location-input autocomplete backed by a place-search service.

pub mod suggestions;
pub mod widget;

pub use suggestions::{Key, SuggestionList};
pub use widget::{Applied, KeyOutcome, PlaceAutocomplete, QueryTicket};
