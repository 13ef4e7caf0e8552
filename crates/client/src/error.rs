// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::protocol::Ticket;
use thiserror::Error;

/// A coordinator call refused before any request was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldError {
    /// Another request is still waiting for its reply.
    RequestInFlight {
        /// The outstanding request.
        ticket: Ticket,
    },
    /// `confirm` was called with no lease held.
    NotHolding,
}

impl std::fmt::Display for HoldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RequestInFlight { ticket } => {
                write!(f, "Request {ticket} is still in flight")
            }
            Self::NotHolding => write!(f, "No shift is currently held"),
        }
    }
}

impl std::error::Error for HoldError {}

/// Failure to get a usable answer out of the lease backend.
///
/// Every variant is retryable from the coordinator's point of view.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP exchange itself failed.
    #[error("lease backend request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend answered with a status and body we do not understand.
    #[error("lease backend returned unexpected status {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },
}
