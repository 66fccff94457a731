//! Point-of-interest integration.
//!
//! - [`Integrator`] — projects POI coordinates onto the nearest edge and
//!   materializes them as network nodes (splitting edges as needed)
//! - [`PoiBinding`] — the resulting POI-to-node association
//! - [`verify_bindings`] — post-integration connectivity validation

mod integrator;

pub use integrator::{verify_bindings, IntegrationError, Integrator, PoiBinding};
