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

//! Data access layer.
//!
//! This module handles all interactions with the SQLite message store:
//! schema creation, dialog upserts and message history. It uses cached
//! statements to optimize frequently executed queries.
//!
//! # Tables
//!
//! * `dialogs` - Conversations, keyed by a durable id derived from the
//!   occupant set.
//! * `messages` - Individual chat messages, linked to dialogs.

mod model;

use anyhow::Result;
use rusqlite::{Connection, params};

use crate::model::{ChatMessage, Dialog};

/// Opens a connection to the SQLite store and configures it.
///
/// Enables WAL mode, relaxes synchronous writes, enforces foreign keys and
/// ensures the schema exists.
///
/// # Errors
///
/// Returns an error if the database file cannot be opened, the PRAGMA
/// configuration fails, or the schema initialization fails.
pub(crate) fn init_db(path: &str) -> Result<Connection> {
    let conn = Connection::open(path)?;

    let journal_mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |r| r.get(0))?;
    if journal_mode != "wal" {
        anyhow::bail!(
            "Failed to switch to WAL mode. Current mode: {}",
            journal_mode
        );
    }

    conn.execute_batch(
        "
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
    ",
    )?;

    conn.set_prepared_statement_cache_capacity(100);

    create_schema(&conn)?;

    Ok(conn)
}

/// Create the message store schema.
///
/// Dialogs are keyed by their durable id so the same conversation maps to
/// the same row across sessions; deleting a dialog cascades to its messages.
/// The whole operation runs in a single transaction.
///
/// # Errors
///
/// Returns an error if the transaction fails or the SQL is rejected.
pub(crate) fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "BEGIN;

        CREATE TABLE IF NOT EXISTS dialogs (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            occupants TEXT NOT NULL,
            last_message TEXT,
            last_activity INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS messages (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            dialog_id INTEGER NOT NULL,
            sender TEXT NOT NULL,
            body TEXT NOT NULL,
            sent_at INTEGER NOT NULL,
            incoming INTEGER NOT NULL,
            FOREIGN KEY (dialog_id) REFERENCES dialogs (id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_messages_dialog
            ON messages (dialog_id, sent_at);

        COMMIT;",
    )?;

    Ok(())
}

/// Inserts a dialog, or refreshes its name and occupants if it exists.
pub(crate) fn upsert_dialog(conn: &Connection, dialog: &Dialog) -> Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO dialogs (id, name, occupants, last_message, last_activity)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT (id) DO UPDATE SET name = ?2, occupants = ?3",
    )?;
    stmt.execute(params![
        dialog.id,
        dialog.name,
        dialog.occupants.join("\n"),
        dialog.last_message,
        dialog.last_activity,
    ])?;
    Ok(())
}

/// Fetches all known dialogs, most recently active first.
pub(crate) fn fetch_dialogs(conn: &Connection) -> Result<Vec<Dialog>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, name, occupants, last_message, last_activity
         FROM dialogs
         ORDER BY last_activity DESC, name ASC",
    )?;
    let dialogs = stmt
        .query_map([], Dialog::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(dialogs)
}

/// Appends a message and rolls the owning dialog's activity forward.
pub(crate) fn append_message(conn: &Connection, message: &ChatMessage) -> Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO messages (dialog_id, sender, body, sent_at, incoming)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    stmt.execute(params![
        message.dialog_id,
        message.sender,
        message.body,
        message.sent_at,
        message.incoming,
    ])?;

    let mut stmt = conn.prepare_cached(
        "UPDATE dialogs SET last_message = ?2, last_activity = ?3 WHERE id = ?1",
    )?;
    stmt.execute(params![message.dialog_id, message.body, message.sent_at])?;

    Ok(())
}

/// Fetches a dialog's history, oldest first, capped at `limit` most recent
/// messages.
pub(crate) fn fetch_history(
    conn: &Connection,
    dialog_id: i64,
    limit: usize,
) -> Result<Vec<ChatMessage>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, dialog_id, sender, body, sent_at, incoming
         FROM (
             SELECT id, dialog_id, sender, body, sent_at, incoming
             FROM messages
             WHERE dialog_id = ?1
             ORDER BY sent_at DESC, id DESC
             LIMIT ?2
         )
         ORDER BY sent_at ASC, id ASC",
    )?;
    let messages = stmt
        .query_map(params![dialog_id, limit as i64], ChatMessage::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        create_schema(&conn).unwrap();
        conn
    }

    fn dialog() -> Dialog {
        let occupants = vec!["alice".to_string(), "bob".to_string()];
        Dialog {
            id: Dialog::durable_id(&occupants),
            name: "bob".into(),
            occupants,
            last_message: None,
            last_activity: 0,
            unread_count: 0,
        }
    }

    fn message(dialog_id: i64, body: &str, sent_at: i64, incoming: bool) -> ChatMessage {
        ChatMessage {
            id: 0,
            dialog_id,
            sender: if incoming { "bob" } else { "alice" }.into(),
            body: body.into(),
            sent_at,
            incoming,
        }
    }

    #[test]
    fn upsert_is_stable_for_the_same_dialog() {
        let conn = test_conn();
        let mut d = dialog();
        upsert_dialog(&conn, &d).unwrap();
        d.name = "robert".into();
        upsert_dialog(&conn, &d).unwrap();

        let dialogs = fetch_dialogs(&conn).unwrap();
        assert_eq!(dialogs.len(), 1);
        assert_eq!(dialogs[0].name, "robert");
        assert_eq!(dialogs[0].occupants, vec!["alice", "bob"]);
    }

    #[test]
    fn history_is_returned_oldest_first() {
        let conn = test_conn();
        let d = dialog();
        upsert_dialog(&conn, &d).unwrap();

        append_message(&conn, &message(d.id, "one", 100, false)).unwrap();
        append_message(&conn, &message(d.id, "two", 200, true)).unwrap();
        append_message(&conn, &message(d.id, "three", 300, false)).unwrap();

        let history = fetch_history(&conn, d.id, 50).unwrap();
        let bodies: Vec<&str> = history.iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, vec!["one", "two", "three"]);
        assert!(history[1].incoming);
    }

    #[test]
    fn history_limit_keeps_the_most_recent_messages() {
        let conn = test_conn();
        let d = dialog();
        upsert_dialog(&conn, &d).unwrap();
        for i in 0..10 {
            append_message(&conn, &message(d.id, &format!("m{i}"), i, false)).unwrap();
        }

        let history = fetch_history(&conn, d.id, 3).unwrap();
        let bodies: Vec<&str> = history.iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, vec!["m7", "m8", "m9"]);
    }

    #[test]
    fn appending_rolls_dialog_activity_forward() {
        let conn = test_conn();
        let d = dialog();
        upsert_dialog(&conn, &d).unwrap();
        append_message(&conn, &message(d.id, "latest", 500, true)).unwrap();

        let dialogs = fetch_dialogs(&conn).unwrap();
        assert_eq!(dialogs[0].last_message.as_deref(), Some("latest"));
        assert_eq!(dialogs[0].last_activity, 500);
    }

    #[test]
    fn dialogs_order_by_most_recent_activity() {
        let conn = test_conn();
        let occupants_a = vec!["alice".to_string(), "bob".to_string()];
        let occupants_b = vec!["alice".to_string(), "carol".to_string()];
        let a = Dialog {
            id: Dialog::durable_id(&occupants_a),
            name: "bob".into(),
            occupants: occupants_a,
            last_message: None,
            last_activity: 0,
            unread_count: 0,
        };
        let b = Dialog {
            id: Dialog::durable_id(&occupants_b),
            name: "carol".into(),
            occupants: occupants_b,
            last_message: None,
            last_activity: 0,
            unread_count: 0,
        };
        upsert_dialog(&conn, &a).unwrap();
        upsert_dialog(&conn, &b).unwrap();

        append_message(&conn, &message(a.id, "old", 100, true)).unwrap();
        append_message(&conn, &message(b.id, "new", 200, true)).unwrap();

        let dialogs = fetch_dialogs(&conn).unwrap();
        assert_eq!(dialogs[0].name, "carol");
        assert_eq!(dialogs[1].name, "bob");
    }
}
