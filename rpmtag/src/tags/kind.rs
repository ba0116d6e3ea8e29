// This file is part of the product rpmtag.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Monthly,
    HalfMonthly,
}

impl TagKind {
    pub const ALL: [TagKind; 2] = [TagKind::Monthly, TagKind::HalfMonthly];

    /// Accepts only the exact literals `monthly` and `half-monthly`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "monthly" => Some(TagKind::Monthly),
            "half-monthly" => Some(TagKind::HalfMonthly),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TagKind::Monthly => "monthly",
            TagKind::HalfMonthly => "half-monthly",
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTagKind(pub String);

impl fmt::Display for InvalidTagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid tag kind '{}'", self.0)
    }
}

impl std::error::Error for InvalidTagKind {}

impl FromStr for TagKind {
    type Err = InvalidTagKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        TagKind::parse(value).ok_or_else(|| InvalidTagKind(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_literals_only() {
        assert_eq!(TagKind::parse("monthly"), Some(TagKind::Monthly));
        assert_eq!(TagKind::parse("half-monthly"), Some(TagKind::HalfMonthly));
        for value in ["", "Monthly", "weekly", "half_monthly", " monthly"] {
            assert_eq!(TagKind::parse(value), None, "{:?}", value);
        }
    }

    #[test]
    fn literal_round_trips_through_display() {
        for kind in TagKind::ALL {
            assert_eq!(kind.to_string().parse::<TagKind>(), Ok(kind));
        }
        assert!("yearly".parse::<TagKind>().is_err());
    }
}
