//! Pipe-delimited narration convention.
//!
//! The upstream narration generator writes remarks as
//!
//! ```text
//! LOAN_ACCOUNT | REFERENCE | MEMBER | GROUP | DESCRIPTION...
//! ```
//!
//! [`Narration`] is the typed form of that record; [`parse_remark`] reads an
//! existing string back by slot position and never fails.

use serde::{Deserialize, Serialize};

const SEPARATOR: char = '|';

/// Display fields recovered from a remark string
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParsedRemark {
    pub loan_account_no: String,
    pub member_name: String,
    pub group_name: String,
    pub description: String,
}

/// Typed narration written at the producing boundary
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Narration {
    pub loan_account_no: String,
    pub reference: String,
    pub member_name: String,
    pub group_name: String,
    pub description: String,
}

impl Narration {
    /// Render in the pipe-delimited convention
    pub fn to_remark(&self) -> String {
        [
            self.loan_account_no.as_str(),
            self.reference.as_str(),
            self.member_name.as_str(),
            self.group_name.as_str(),
            self.description.as_str(),
        ]
        .iter()
        .map(|s| s.replace(SEPARATOR, "/"))
        .collect::<Vec<_>>()
        .join("|")
    }

    /// Compatibility shim for remarks that were stored as plain strings
    pub fn from_remark(remark: &str) -> Self {
        let segments = segments(remark);
        let parsed = parsed_from_segments(&segments);
        Self {
            loan_account_no: parsed.loan_account_no,
            reference: slot(&segments, 1),
            member_name: parsed.member_name,
            group_name: parsed.group_name,
            description: parsed.description,
        }
    }
}

/// Split a remark into its positional slots.
///
/// Slots are counted over the raw split so an empty reference slot does not
/// shift the member and group columns. Empty trailing segments are dropped
/// from the description.
pub fn parse_remark(remark: &str) -> ParsedRemark {
    parsed_from_segments(&segments(remark))
}

fn segments(remark: &str) -> Vec<&str> {
    if remark.trim().is_empty() {
        return Vec::new();
    }
    remark.split(SEPARATOR).map(str::trim).collect()
}

fn parsed_from_segments(segments: &[&str]) -> ParsedRemark {
    let description = segments
        .iter()
        .skip(4)
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("|");

    ParsedRemark {
        loan_account_no: slot(segments, 0),
        member_name: slot(segments, 2),
        group_name: slot(segments, 3),
        description,
    }
}

fn slot(segments: &[&str], idx: usize) -> String {
    segments.get(idx).map(|s| s.to_string()).unwrap_or_default()
}
