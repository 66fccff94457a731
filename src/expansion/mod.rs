//! Tour-to-path expansion.
//!
//! - [`expand_tour`] — maps a solved visitation order back onto the
//!   concrete sequence of network nodes, for rendering and export
//! - [`ExpandedTour`] / [`TourLeg`] — the expanded result

mod expand;

pub use expand::{expand_tour, ExpandError, ExpandedTour, TourLeg};
