// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

//! API boundary for the shift hold workflow.
//!
//! Translates the wire contract into lease store operations and store
//! failures into [`ApiError`]s. Nothing from the core or domain error types
//! crosses this boundary.

mod catalog;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use catalog::{InMemoryShiftCatalog, ShiftCatalog};
pub use error::{ApiError, CatalogError, ErrorKind, translate_core_error, translate_domain_error};
pub use handlers::{
    ApiResult, AvailabilityChange, add_preference, confirm_lease, create_lease,
    get_audit_timeline, get_lease, list_preferences, list_shifts, release_lease, retarget_lease,
    sweep_expired,
};
pub use request_response::{
    AddPreferenceRequest, AuditTimelineResponse, ConfirmLeaseResponse, CreateLeaseRequest,
    ErrorResponse, HolderRequest, LeaseResponse, LeaseView, ListShiftsResponse,
    PreferencesResponse, ReleaseLeaseResponse, RetargetLeaseRequest,
};
