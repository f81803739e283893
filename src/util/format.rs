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

/// Formats a unix timestamp as a `HH:MM` clock reading (UTC).
///
/// This is used for the timestamp column in conversation views, where the
/// day is obvious from context and a full date would only add noise.
pub(crate) fn format_clock(unix_secs: i64) -> String {
    let secs_of_day = unix_secs.rem_euclid(86_400);
    let hours = secs_of_day / 3600;
    let mins = (secs_of_day % 3600) / 60;
    format!("{:02}:{:02}", hours, mins)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_midnight_and_midday() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(12 * 3600 + 34 * 60), "12:34");
    }

    #[test]
    fn ignores_whole_days() {
        assert_eq!(format_clock(3 * 86_400 + 61), "00:01");
    }
}
