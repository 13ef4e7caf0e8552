// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API operations over the lease store and the shift catalog.
//!
//! Each operation translates request DTOs into domain types, runs the
//! store transition, and translates the outcome back. Callers own the
//! store and are responsible for serializing access to it.

use crate::catalog::{InMemoryShiftCatalog, ShiftCatalog};
use crate::error::{ApiError, translate_core_error, translate_domain_error};
use crate::request_response::{
    AddPreferenceRequest, AuditTimelineResponse, ConfirmLeaseResponse, CreateLeaseRequest,
    HolderRequest, LeaseResponse, LeaseView, ListShiftsResponse, PreferencesResponse,
    ReleaseLeaseResponse, RetargetLeaseRequest,
};
use shift_hold::{LeaseStore, Transition, TransitionResult};
use shift_hold_audit::{AuditEvent, Cause};
use shift_hold_domain::{
    DomainError, HolderId, Lease, LeaseId, Preference, ShiftId, ShiftListing,
    count_matching_preferences, validate_holder,
};
use std::cmp::Reverse;
use time::OffsetDateTime;

/// A change in which shifts are claimable, for other sessions to observe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityChange {
    /// A shift became held by a pending lease.
    Held {
        /// The shift.
        shift_id: String,
        /// The lease holding it.
        lease_id: i64,
    },
    /// A shift went back to the pool.
    Released {
        /// The shift.
        shift_id: String,
        /// The lease that held it.
        lease_id: i64,
    },
    /// A shift was reserved for good.
    Reserved {
        /// The shift.
        shift_id: String,
        /// The confirmed lease.
        lease_id: i64,
    },
}

/// The result of an API operation that includes both the response and the audit event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResult<T> {
    /// The API response.
    pub response: T,
    /// The audit event generated by this operation, absent for no-ops.
    pub audit_event: Option<AuditEvent>,
    /// Availability changes caused by this operation.
    pub changes: Vec<AvailabilityChange>,
}

/// Claims a shift for a holder.
///
/// # Errors
///
/// Returns an error if:
/// - The holder or shift id is invalid
/// - The shift is not in the catalog
/// - The shift is already held (`Conflict`)
pub fn create_lease<C: ShiftCatalog>(
    store: &mut LeaseStore,
    catalog: &C,
    request: &CreateLeaseRequest,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<ApiResult<LeaseResponse>, ApiError> {
    let holder: HolderId = parse_holder(&request.holder)?;
    let shift_id: ShiftId = parse_catalog_shift(catalog, &request.shift_id)?;

    let result: TransitionResult = store
        .create(shift_id, holder, cause, now)
        .map_err(translate_core_error)?;

    Ok(ApiResult {
        response: lease_response(&result.lease),
        changes: availability_changes(&result),
        audit_event: result.audit_event,
    })
}

/// Moves a pending lease to another shift.
///
/// # Errors
///
/// Returns an error if:
/// - The holder or shift id is invalid, or the shift is not in the catalog
/// - The lease does not exist or belongs to someone else
/// - The lease is no longer pending (`Expired`, `InvalidState`)
/// - The new shift is already held (`Conflict`)
pub fn retarget_lease<C: ShiftCatalog>(
    store: &mut LeaseStore,
    catalog: &C,
    lease_id: i64,
    request: &RetargetLeaseRequest,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<ApiResult<LeaseResponse>, ApiError> {
    let holder: HolderId = parse_holder(&request.holder)?;
    let shift_id: ShiftId = parse_catalog_shift(catalog, &request.shift_id)?;

    let result: TransitionResult = store
        .retarget(LeaseId::new(lease_id), &holder, shift_id, cause, now)
        .map_err(translate_core_error)?;

    Ok(ApiResult {
        response: lease_response(&result.lease),
        changes: availability_changes(&result),
        audit_event: result.audit_event,
    })
}

/// Confirms a pending lease.
///
/// Repeated confirmation by the holder succeeds without effect.
///
/// # Errors
///
/// Returns an error if:
/// - The holder is invalid
/// - The lease does not exist or belongs to someone else
/// - The hold window has elapsed (`Expired`)
/// - The lease was released (`InvalidState`)
pub fn confirm_lease(
    store: &mut LeaseStore,
    lease_id: i64,
    request: &HolderRequest,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<ApiResult<ConfirmLeaseResponse>, ApiError> {
    let holder: HolderId = parse_holder(&request.holder)?;

    let result: TransitionResult = store
        .confirm(LeaseId::new(lease_id), &holder, cause, now)
        .map_err(translate_core_error)?;

    let confirmed_at: OffsetDateTime =
        result.lease.confirmed_at.ok_or_else(|| ApiError::Internal {
            message: format!("Confirmed lease {lease_id} has no confirmation time"),
        })?;

    Ok(ApiResult {
        response: ConfirmLeaseResponse {
            lease_id,
            confirmed_at,
        },
        changes: availability_changes(&result),
        audit_event: result.audit_event,
    })
}

/// Releases a pending lease.
///
/// # Errors
///
/// Returns an error if:
/// - The holder is invalid
/// - The lease does not exist or belongs to someone else
/// - The lease is confirmed or expired (`InvalidState`)
pub fn release_lease(
    store: &mut LeaseStore,
    lease_id: i64,
    request: &HolderRequest,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<ApiResult<ReleaseLeaseResponse>, ApiError> {
    let holder: HolderId = parse_holder(&request.holder)?;

    let result: TransitionResult = store
        .release(LeaseId::new(lease_id), &holder, cause, now)
        .map_err(translate_core_error)?;

    Ok(ApiResult {
        response: ReleaseLeaseResponse { lease_id },
        changes: availability_changes(&result),
        audit_event: result.audit_event,
    })
}

/// Runs the expiry pass and reports the shifts it freed.
pub fn sweep_expired(store: &mut LeaseStore, now: OffsetDateTime) -> Vec<AvailabilityChange> {
    store.expire_sweep(now).iter().map(released).collect()
}

/// Returns one lease as seen at `now`.
///
/// # Errors
///
/// Returns an error if the lease does not exist.
pub fn get_lease(
    store: &LeaseStore,
    lease_id: i64,
    now: OffsetDateTime,
) -> Result<LeaseView, ApiError> {
    store
        .get(LeaseId::new(lease_id))
        .map(|lease| LeaseView::from_lease(lease, now))
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Lease"),
            message: format!("Lease {lease_id} does not exist"),
        })
}

/// Lists every shift for `holder`, best preference match first.
///
/// Ties are broken by start time, then shift id.
///
/// # Errors
///
/// Returns an error if the holder is invalid.
pub fn list_shifts<C: ShiftCatalog>(
    catalog: &C,
    store: &LeaseStore,
    holder: &str,
    now: OffsetDateTime,
) -> Result<ListShiftsResponse, ApiError> {
    let holder: HolderId = parse_holder(holder)?;
    let preferences: Vec<Preference> = catalog.preferences_for(&holder);

    let mut shifts: Vec<ShiftListing> = catalog
        .shifts()
        .iter()
        .map(|shift| ShiftListing {
            matching_preferences: count_matching_preferences(shift, &preferences),
            available: store.is_available(&shift.shift_id, &holder, now),
            shift: shift.clone(),
        })
        .collect();

    shifts.sort_by(|a, b| {
        Reverse(a.matching_preferences)
            .cmp(&Reverse(b.matching_preferences))
            .then_with(|| a.shift.start_time.cmp(&b.shift.start_time))
            .then_with(|| a.shift.shift_id.cmp(&b.shift.shift_id))
    });

    Ok(ListShiftsResponse {
        holder: holder.value().to_string(),
        shifts,
    })
}

/// Records a preference and returns the holder's full list.
///
/// # Errors
///
/// Returns an error if the holder is invalid or the preference is empty.
pub fn add_preference(
    catalog: &mut InMemoryShiftCatalog,
    request: AddPreferenceRequest,
) -> Result<PreferencesResponse, ApiError> {
    let holder: HolderId = parse_holder(&request.holder)?;
    catalog.add_preference(&holder, request.preference)?;
    Ok(PreferencesResponse {
        preferences: catalog.preferences_for(&holder),
        holder: holder.value().to_string(),
    })
}

/// Lists a holder's preferences.
///
/// # Errors
///
/// Returns an error if the holder is invalid.
pub fn list_preferences<C: ShiftCatalog>(
    catalog: &C,
    holder: &str,
) -> Result<PreferencesResponse, ApiError> {
    let holder: HolderId = parse_holder(holder)?;
    Ok(PreferencesResponse {
        preferences: catalog.preferences_for(&holder),
        holder: holder.value().to_string(),
    })
}

/// Returns the full audit timeline.
#[must_use]
pub fn get_audit_timeline(store: &LeaseStore) -> AuditTimelineResponse {
    AuditTimelineResponse {
        events: store.audit_timeline().to_vec(),
    }
}

fn parse_holder(raw: &str) -> Result<HolderId, ApiError> {
    let holder: HolderId = HolderId::new(raw);
    validate_holder(&holder).map_err(translate_domain_error)?;
    Ok(holder)
}

fn parse_catalog_shift<C: ShiftCatalog>(catalog: &C, raw: &str) -> Result<ShiftId, ApiError> {
    let shift_id: ShiftId = ShiftId::new(raw);
    if shift_id.value().is_empty() {
        return Err(translate_domain_error(DomainError::InvalidShiftId(
            String::from("Shift id cannot be empty"),
        )));
    }
    if catalog.shift(&shift_id).is_none() {
        return Err(translate_domain_error(DomainError::ShiftNotFound(
            shift_id.value().to_string(),
        )));
    }
    Ok(shift_id)
}

fn lease_response(lease: &Lease) -> LeaseResponse {
    LeaseResponse {
        lease_id: lease.lease_id.value(),
        shift_id: lease.shift_id.value().to_string(),
        expires_at: lease.expires_at,
    }
}

fn released(lease: &Lease) -> AvailabilityChange {
    AvailabilityChange::Released {
        shift_id: lease.shift_id.value().to_string(),
        lease_id: lease.lease_id.value(),
    }
}

fn availability_changes(result: &TransitionResult) -> Vec<AvailabilityChange> {
    let mut changes: Vec<AvailabilityChange> = result.expired.iter().map(released).collect();
    let lease_id: i64 = result.lease.lease_id.value();
    let shift_id: String = result.lease.shift_id.value().to_string();

    match &result.transition {
        Transition::Created => changes.push(AvailabilityChange::Held { shift_id, lease_id }),
        Transition::Retargeted { from } => {
            changes.push(AvailabilityChange::Released {
                shift_id: from.value().to_string(),
                lease_id,
            });
            changes.push(AvailabilityChange::Held { shift_id, lease_id });
        }
        Transition::Confirmed => {
            changes.push(AvailabilityChange::Reserved { shift_id, lease_id });
        }
        Transition::Released => changes.push(released(&result.lease)),
        Transition::Unchanged => {}
    }
    changes
}
