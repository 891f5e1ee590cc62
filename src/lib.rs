//! Travel itinerary form components for a personal publishing site.
//!
//! * [`itinerary`] manages the leg groups of the travel form.
//! * [`autocomplete`] drives the location input of each leg.
//! * [`places`] answers place searches and reverse lookups.
//! * [`server`] exposes the suggestion endpoint and form helpers over HTTP.

pub mod autocomplete;
pub mod config;
pub mod dom;
pub mod geo;
pub mod itinerary;
pub mod places;
pub mod server;
pub mod telemetry;
pub mod validation;
