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

//! Database row mapping for domain models.
//!
//! This module provides the conversion logic between raw SQLite result rows
//! and high-level domain models, ensuring type-safe extraction of model
//! attributes from database queries.

use rusqlite::Row;

use crate::model::{ChatMessage, Dialog};

impl Dialog {
    /// Maps an SQLite row to a [`Dialog`] instance.
    ///
    /// Occupants are stored newline-separated in a single column; unread
    /// counts are UI-side state and start at zero.
    ///
    /// # Errors
    ///
    /// Returns a [`rusqlite::Error`] if the row does not contain enough
    /// columns or a column cannot be converted to the required Rust type.
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let occupants: String = row.get(2)?;
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            occupants: occupants.split('\n').map(str::to_string).collect(),
            last_message: row.get(3)?,
            last_activity: row.get(4)?,
            unread_count: 0,
        })
    }
}

impl ChatMessage {
    /// Maps an SQLite row to a [`ChatMessage`] instance.
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            dialog_id: row.get(1)?,
            sender: row.get(2)?,
            body: row.get(3)?,
            sent_at: row.get(4)?,
            incoming: row.get(5)?,
        })
    }
}
