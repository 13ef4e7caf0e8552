// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ways of executing a [`LeaseRequest`] against a lease backend.

use crate::error::TransportError;
use crate::protocol::{LeaseOperation, LeaseReply, LeaseRequest};
use shift_hold::{Clock, LeaseStore};
use shift_hold_api::{
    ApiError, ConfirmLeaseResponse, CreateLeaseRequest, ErrorResponse, HolderRequest,
    InMemoryShiftCatalog, LeaseResponse, RetargetLeaseRequest, confirm_lease, create_lease,
    retarget_lease,
};
use shift_hold_audit::Cause;
use shift_hold_domain::{LeaseId, ShiftId};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Default per-request timeout for [`HttpLeaseClient`].
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

/// Executes lease requests.
///
/// Implementations never fail: anything that prevents a verdict is
/// reported as [`LeaseReply::Transient`].
pub trait LeaseClient: Send + Sync {
    /// Runs one request and returns the backend's verdict.
    fn execute(&self, request: &LeaseRequest) -> impl Future<Output = LeaseReply> + Send;
}

/// Talks to the lease server over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpLeaseClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpLeaseClient {
    /// Creates a client for the server at `base_url` (e.g. `http://127.0.0.1:3000`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        let http: reqwest::Client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Wraps an existing `reqwest` client.
    #[must_use]
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn send(&self, request: &LeaseRequest) -> Result<LeaseReply, TransportError> {
        let holder: String = request.holder.value().to_string();
        let response: reqwest::Response = match &request.operation {
            LeaseOperation::Create { shift_id } => {
                self.http
                    .post(format!("{}/leases", self.base_url))
                    .json(&CreateLeaseRequest {
                        shift_id: shift_id.value().to_string(),
                        holder,
                    })
                    .send()
                    .await?
            }
            LeaseOperation::Retarget { lease_id, shift_id } => {
                self.http
                    .post(format!("{}/leases/{lease_id}/retarget", self.base_url))
                    .json(&RetargetLeaseRequest {
                        holder,
                        shift_id: shift_id.value().to_string(),
                    })
                    .send()
                    .await?
            }
            LeaseOperation::Confirm { lease_id } => {
                self.http
                    .post(format!("{}/leases/{lease_id}/confirm", self.base_url))
                    .json(&HolderRequest { holder })
                    .send()
                    .await?
            }
        };

        let status: reqwest::StatusCode = response.status();
        let body: String = response.text().await?;

        if status.is_success() {
            return decode_success(&request.operation, status, &body);
        }
        match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(error) => Ok(LeaseReply::from(&error)),
            Err(_) => Err(TransportError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            }),
        }
    }
}

impl LeaseClient for HttpLeaseClient {
    async fn execute(&self, request: &LeaseRequest) -> LeaseReply {
        match self.send(request).await {
            Ok(reply) => {
                debug!(ticket = %request.ticket, ?reply, "Lease request answered");
                reply
            }
            Err(e) => {
                warn!(
                    ticket = %request.ticket,
                    operation = request.operation.name(),
                    error = %e,
                    "Lease request failed"
                );
                LeaseReply::Transient(e.to_string())
            }
        }
    }
}

fn decode_success(
    operation: &LeaseOperation,
    status: reqwest::StatusCode,
    body: &str,
) -> Result<LeaseReply, TransportError> {
    let unexpected = || TransportError::UnexpectedStatus {
        status: status.as_u16(),
        body: body.to_string(),
    };
    match operation {
        LeaseOperation::Create { .. } | LeaseOperation::Retarget { .. } => {
            let granted: LeaseResponse = serde_json::from_str(body).map_err(|_| unexpected())?;
            Ok(granted_reply(&granted))
        }
        LeaseOperation::Confirm { .. } => {
            let confirmed: ConfirmLeaseResponse =
                serde_json::from_str(body).map_err(|_| unexpected())?;
            Ok(LeaseReply::Confirmed {
                lease_id: LeaseId::new(confirmed.lease_id),
                confirmed_at: confirmed.confirmed_at,
            })
        }
    }
}

fn granted_reply(response: &LeaseResponse) -> LeaseReply {
    LeaseReply::Granted {
        lease_id: LeaseId::new(response.lease_id),
        shift_id: ShiftId::new(&response.shift_id),
        expires_at: response.expires_at,
    }
}

/// Runs requests directly against a [`LeaseStore`] in the same process.
///
/// Goes through the same API operations as the server, including the
/// expiry pass, so replies match what the HTTP backend would return.
#[derive(Clone)]
pub struct InProcessLeaseClient {
    store: Arc<Mutex<LeaseStore>>,
    catalog: Arc<InMemoryShiftCatalog>,
    clock: Arc<dyn Clock>,
    next_request_id: Arc<AtomicU64>,
}

impl InProcessLeaseClient {
    /// Creates a client sharing `store` with any other callers.
    #[must_use]
    pub fn new(
        store: Arc<Mutex<LeaseStore>>,
        catalog: Arc<InMemoryShiftCatalog>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            catalog,
            clock,
            next_request_id: Arc::new(AtomicU64::new(1)),
        }
    }

    fn cause(&self, request: &LeaseRequest) -> Cause {
        let id: u64 = self.next_request_id.fetch_add(1, Ordering::Relaxed);
        Cause::new(
            format!("in-process-{id}"),
            format!("Hold coordinator {}", request.operation.name()),
        )
    }
}

impl LeaseClient for InProcessLeaseClient {
    async fn execute(&self, request: &LeaseRequest) -> LeaseReply {
        let cause: Cause = self.cause(request);
        let holder: String = request.holder.value().to_string();
        let mut store = self.store.lock().await;
        let now = self.clock.now();

        let result: Result<LeaseReply, ApiError> = match &request.operation {
            LeaseOperation::Create { shift_id } => create_lease(
                &mut store,
                &*self.catalog,
                &CreateLeaseRequest {
                    shift_id: shift_id.value().to_string(),
                    holder,
                },
                cause,
                now,
            )
            .map(|r| granted_reply(&r.response)),
            LeaseOperation::Retarget { lease_id, shift_id } => retarget_lease(
                &mut store,
                &*self.catalog,
                lease_id.value(),
                &RetargetLeaseRequest {
                    holder,
                    shift_id: shift_id.value().to_string(),
                },
                cause,
                now,
            )
            .map(|r| granted_reply(&r.response)),
            LeaseOperation::Confirm { lease_id } => confirm_lease(
                &mut store,
                lease_id.value(),
                &HolderRequest { holder },
                cause,
                now,
            )
            .map(|r| LeaseReply::Confirmed {
                lease_id: *lease_id,
                confirmed_at: r.response.confirmed_at,
            }),
        };
        drop(store);

        result.unwrap_or_else(|err| LeaseReply::from(&ErrorResponse::from(&err)))
    }
}

impl std::fmt::Debug for InProcessLeaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InProcessLeaseClient")
            .field("catalog", &self.catalog)
            .finish_non_exhaustive()
    }
}
