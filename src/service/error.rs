// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Service failure classification.
//!
//! Errors raised by the background service are carried inside broadcast
//! payloads back to the UI thread, so the variants keep owned, clonable data
//! rather than borrowing from the source error.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub(crate) enum ServiceError {
    #[error("authentication failed for '{login}'")]
    AuthFailed { login: String },

    #[error("session expired")]
    SessionExpired,

    #[error("not signed in")]
    NotLoggedIn,

    #[error("unknown dialog {0}")]
    UnknownDialog(i64),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<rusqlite::Error> for ServiceError {
    fn from(e: rusqlite::Error) -> Self {
        ServiceError::Storage(e.to_string())
    }
}
