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

//! Terminal environment and styling utilities.
//!
//! Functions to manipulate the terminal emulator's own properties via OSC
//! (Operating System Command) escape sequences. Most modern terminals
//! (XTerm, iTerm2, Alacritty, Kitty) support these sequences.

use std::io::{self, Write};

/// Sets the terminal background color using an OSC 11 escape sequence.
///
/// `stdout` is flushed immediately so the change applies without delay.
pub(crate) fn set_terminal_bg(hex_color: &str) {
    print!("\x1b]11;{}\x07", hex_color);
    let _ = io::stdout().flush();
}

/// Resets the terminal background to its default color (OSC 111).
///
/// Called during application cleanup to restore the user's terminal state.
pub(crate) fn reset_terminal_bg() {
    print!("\x1b]111\x07");
    let _ = io::stdout().flush();
}
