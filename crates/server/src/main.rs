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
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod live;

use axum::{
    Json, Router,
    extract::{FromRef, Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use live::{LiveEventBroadcaster, live_events_handler};
use serde::Deserialize;
use shift_hold::{Clock, LeaseStore, SystemClock};
use shift_hold_api::{
    AddPreferenceRequest, ApiError, ApiResult, AuditTimelineResponse, ConfirmLeaseResponse,
    CreateLeaseRequest, ErrorKind, ErrorResponse, HolderRequest, InMemoryShiftCatalog,
    LeaseResponse, LeaseView, ListShiftsResponse, PreferencesResponse, ReleaseLeaseResponse,
    RetargetLeaseRequest, add_preference, confirm_lease, create_lease, get_audit_timeline,
    get_lease, list_preferences, list_shifts, release_lease, retarget_lease, sweep_expired,
};
use shift_hold_audit::Cause;
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// Shift Hold Server - lease backend for the charging shift hold workflow
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: IpAddr,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// JSON seed for the shift catalog. If not provided, the catalog is empty.
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Seconds between background expiry sweeps
    #[arg(long, default_value_t = 1)]
    sweep_interval_secs: u64,
}

/// Application state shared across handlers.
///
/// Handlers that need both locks take `catalog` before `store`. Mutating
/// lease handlers run the expiry pass first so the shifts it frees are
/// broadcast even when the operation itself is rejected.
#[derive(Clone)]
struct AppState {
    /// The authoritative lease store.
    store: Arc<Mutex<LeaseStore>>,
    /// Bookable shifts and holder preferences.
    catalog: Arc<Mutex<InMemoryShiftCatalog>>,
    /// Source of "now" for every lease operation.
    clock: Arc<dyn Clock>,
    /// Fan-out of availability changes to `/live` subscribers.
    live_events: Arc<LiveEventBroadcaster>,
    /// Sequence for audit cause ids.
    next_request_id: Arc<AtomicU64>,
}

impl AppState {
    fn new(catalog: InMemoryShiftCatalog, clock: Arc<dyn Clock>) -> Self {
        Self {
            store: Arc::new(Mutex::new(LeaseStore::new())),
            catalog: Arc::new(Mutex::new(catalog)),
            clock,
            live_events: Arc::new(LiveEventBroadcaster::new()),
            next_request_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Builds the audit cause for one HTTP request.
    fn cause(&self, description: &str) -> Cause {
        let id: u64 = self.next_request_id.fetch_add(1, Ordering::Relaxed);
        Cause::new(format!("http-{id}"), description.to_string())
    }

    /// Broadcasts the changes carried by an operation result.
    fn publish<T>(&self, result: &ApiResult<T>) {
        self.live_events.publish(&result.changes);
    }
}

impl FromRef<AppState> for Arc<LiveEventBroadcaster> {
    fn from_ref(app_state: &AppState) -> Self {
        Arc::clone(&app_state.live_events)
    }
}

/// Query parameters naming a holder.
#[derive(Debug, Deserialize)]
struct HolderQuery {
    /// The holder.
    holder: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
#[derive(Debug)]
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The machine-readable category.
    kind: ErrorKind,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            kind: self.kind,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err.kind() {
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound | ErrorKind::UnknownShift => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Expired => StatusCode::GONE,
            ErrorKind::InvalidState => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::NotHolder => StatusCode::FORBIDDEN,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %err, "Internal error");
        } else {
            warn!(kind = %err.kind(), error = %err, "Request rejected");
        }
        Self {
            status,
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Handler for POST `/leases`.
///
/// Claims a shift with a new pending lease.
async fn handle_create_lease(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateLeaseRequest>,
) -> Result<Json<LeaseResponse>, HttpError> {
    info!(
        shift_id = %req.shift_id,
        holder = %req.holder,
        "Handling create_lease request"
    );

    let cause: Cause = app_state.cause("Select shift");
    let catalog = app_state.catalog.lock().await;
    let mut store = app_state.store.lock().await;
    let now: OffsetDateTime = app_state.clock.now();
    app_state.live_events.publish(&sweep_expired(&mut store, now));
    let result = create_lease(&mut store, &*catalog, &req, cause, now);
    drop(store);
    drop(catalog);

    let result: ApiResult<LeaseResponse> = result?;
    app_state.publish(&result);
    Ok(Json(result.response))
}

/// Handler for POST `/leases/{lease_id}/retarget`.
///
/// Moves a pending lease to another shift.
async fn handle_retarget_lease(
    AxumState(app_state): AxumState<AppState>,
    Path(lease_id): Path<i64>,
    Json(req): Json<RetargetLeaseRequest>,
) -> Result<Json<LeaseResponse>, HttpError> {
    info!(
        lease_id = lease_id,
        shift_id = %req.shift_id,
        holder = %req.holder,
        "Handling retarget_lease request"
    );

    let cause: Cause = app_state.cause("Select another shift");
    let catalog = app_state.catalog.lock().await;
    let mut store = app_state.store.lock().await;
    let now: OffsetDateTime = app_state.clock.now();
    app_state.live_events.publish(&sweep_expired(&mut store, now));
    let result = retarget_lease(&mut store, &*catalog, lease_id, &req, cause, now);
    drop(store);
    drop(catalog);

    let result: ApiResult<LeaseResponse> = result?;
    app_state.publish(&result);
    Ok(Json(result.response))
}

/// Handler for POST `/leases/{lease_id}/confirm`.
///
/// Turns a pending lease into a reservation.
async fn handle_confirm_lease(
    AxumState(app_state): AxumState<AppState>,
    Path(lease_id): Path<i64>,
    Json(req): Json<HolderRequest>,
) -> Result<Json<ConfirmLeaseResponse>, HttpError> {
    info!(lease_id = lease_id, holder = %req.holder, "Handling confirm_lease request");

    let cause: Cause = app_state.cause("Confirm reservation");
    let mut store = app_state.store.lock().await;
    let now: OffsetDateTime = app_state.clock.now();
    app_state.live_events.publish(&sweep_expired(&mut store, now));
    let result = confirm_lease(&mut store, lease_id, &req, cause, now);
    drop(store);

    let result: ApiResult<ConfirmLeaseResponse> = result?;
    app_state.publish(&result);
    Ok(Json(result.response))
}

/// Handler for POST `/leases/{lease_id}/release`.
///
/// Releases a pending lease before its window closes.
async fn handle_release_lease(
    AxumState(app_state): AxumState<AppState>,
    Path(lease_id): Path<i64>,
    Json(req): Json<HolderRequest>,
) -> Result<Json<ReleaseLeaseResponse>, HttpError> {
    info!(lease_id = lease_id, holder = %req.holder, "Handling release_lease request");

    let cause: Cause = app_state.cause("Release hold");
    let mut store = app_state.store.lock().await;
    let now: OffsetDateTime = app_state.clock.now();
    app_state.live_events.publish(&sweep_expired(&mut store, now));
    let result = release_lease(&mut store, lease_id, &req, cause, now);
    drop(store);

    let result: ApiResult<ReleaseLeaseResponse> = result?;
    app_state.publish(&result);
    Ok(Json(result.response))
}

/// Handler for GET `/leases/{lease_id}`.
async fn handle_get_lease(
    AxumState(app_state): AxumState<AppState>,
    Path(lease_id): Path<i64>,
) -> Result<Json<LeaseView>, HttpError> {
    info!(lease_id = lease_id, "Handling get_lease request");

    let store = app_state.store.lock().await;
    let view: LeaseView = get_lease(&store, lease_id, app_state.clock.now())?;
    drop(store);

    Ok(Json(view))
}

/// Handler for GET `/shifts?holder=`.
///
/// Lists every shift with its preference match count and availability.
async fn handle_list_shifts(
    AxumState(app_state): AxumState<AppState>,
    Query(params): Query<HolderQuery>,
) -> Result<Json<ListShiftsResponse>, HttpError> {
    info!(holder = %params.holder, "Handling list_shifts request");

    let catalog = app_state.catalog.lock().await;
    let store = app_state.store.lock().await;
    let response: ListShiftsResponse =
        list_shifts(&*catalog, &store, &params.holder, app_state.clock.now())?;
    drop(store);
    drop(catalog);

    Ok(Json(response))
}

/// Handler for POST `/preferences`.
async fn handle_add_preference(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<AddPreferenceRequest>,
) -> Result<Json<PreferencesResponse>, HttpError> {
    info!(holder = %req.holder, "Handling add_preference request");

    let mut catalog = app_state.catalog.lock().await;
    let response: PreferencesResponse = add_preference(&mut catalog, req)?;
    drop(catalog);

    Ok(Json(response))
}

/// Handler for GET `/preferences?holder=`.
async fn handle_list_preferences(
    AxumState(app_state): AxumState<AppState>,
    Query(params): Query<HolderQuery>,
) -> Result<Json<PreferencesResponse>, HttpError> {
    info!(holder = %params.holder, "Handling list_preferences request");

    let catalog = app_state.catalog.lock().await;
    let response: PreferencesResponse = list_preferences(&*catalog, &params.holder)?;
    drop(catalog);

    Ok(Json(response))
}

/// Handler for GET `/audit/timeline`.
///
/// Returns every recorded lease transition in order.
async fn handle_get_audit_timeline(
    AxumState(app_state): AxumState<AppState>,
) -> Json<AuditTimelineResponse> {
    info!("Handling get_audit_timeline request");

    let store = app_state.store.lock().await;
    let response: AuditTimelineResponse = get_audit_timeline(&store);
    drop(store);

    Json(response)
}

/// Handler for GET `/health`.
#[allow(clippy::unused_async)]
async fn handle_health() -> &'static str {
    "ok"
}

/// Runs one expiry pass and broadcasts the shifts it freed.
async fn sweep_once(app_state: &AppState) {
    let mut store = app_state.store.lock().await;
    let changes = sweep_expired(&mut store, app_state.clock.now());
    drop(store);

    if changes.is_empty() {
        return;
    }
    debug!(expired = changes.len(), "Expiry sweep freed shifts");
    app_state.live_events.publish(&changes);
}

/// Spawns the background expiry sweeper.
///
/// Expiry does not depend on this task for correctness (every lease
/// operation sweeps first); it keeps shift availability and live
/// subscribers current while the store is idle.
fn spawn_expiry_sweeper(app_state: AppState, every: std::time::Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            sweep_once(&app_state).await;
        }
    })
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/leases", post(handle_create_lease))
        .route("/leases/{lease_id}", get(handle_get_lease))
        .route("/leases/{lease_id}/retarget", post(handle_retarget_lease))
        .route("/leases/{lease_id}/confirm", post(handle_confirm_lease))
        .route("/leases/{lease_id}/release", post(handle_release_lease))
        .route("/shifts", get(handle_list_shifts))
        .route("/preferences", post(handle_add_preference))
        .route("/preferences", get(handle_list_preferences))
        .route("/audit/timeline", get(handle_get_audit_timeline))
        .route("/live", get(live_events_handler))
        .route("/health", get(handle_health))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Shift Hold Server");

    let catalog: InMemoryShiftCatalog = if let Some(path) = &args.catalog {
        InMemoryShiftCatalog::load(path)?
    } else {
        info!("No catalog provided, starting with an empty catalog");
        InMemoryShiftCatalog::default()
    };

    let app_state: AppState = AppState::new(catalog, Arc::new(SystemClock));

    let sweep_every = std::time::Duration::from_secs(args.sweep_interval_secs.max(1));
    info!(
        interval_secs = sweep_every.as_secs(),
        "Starting expiry sweeper"
    );
    let _sweeper: JoinHandle<()> = spawn_expiry_sweeper(app_state.clone(), sweep_every);

    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = std::net::SocketAddr::new(args.bind, args.port);
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests;
