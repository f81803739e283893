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

//! Domain models and core data structures.
//!
//! This module defines the central entities of the application—users,
//! dialogs and chat messages—shared between the UI surfaces, the background
//! service worker and the message store.

use xxhash_rust::xxh3::xxh3_64;

#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub id: i64,
    pub login: String,
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dialog {
    pub id: i64,
    pub name: String,
    pub occupants: Vec<String>,
    pub last_message: Option<String>,
    pub last_activity: i64,
    pub unread_count: u32,
}

impl Dialog {
    /// Derives a durable identifier for a dialog from its occupant set.
    ///
    /// The id is stable across sessions and independent of the order the
    /// occupants are listed in, so the same conversation always maps to the
    /// same history rows.
    pub fn durable_id(occupants: &[String]) -> i64 {
        let mut names: Vec<&str> = occupants.iter().map(String::as_str).collect();
        names.sort_unstable();
        xxh3_64(names.join("\n").as_bytes()) as i64
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: i64,
    pub dialog_id: i64,
    pub sender: String,
    pub body: String,
    pub sent_at: i64,
    pub incoming: bool,
}
