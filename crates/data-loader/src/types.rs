//! Core domain types for the trust network and rating dataset.
//!
//! The input is the Epinions dump: one file mixing two row shapes, told
//! apart only by how many tab-separated fields a line has.
//! - Rating rows (8 fields): `objectId, userId, rating, status, createdAt,
//!   lastModAt, type, status2`
//! - Trust rows (4 fields): `trusterId, trusteeId, value, createdAt`

use crate::error::RowError;
use serde::{Deserialize, Serialize};

// =============================================================================
// Type Aliases
// =============================================================================

/// Identifier of a user in the trust network
pub type UserId = String;

/// Identifier of a rated item (an Epinions "object")
pub type ItemId = String;

// =============================================================================
// Records
// =============================================================================

/// One user's rating of one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingRecord {
    pub item_id: ItemId,
    pub user_id: UserId,
    /// Rating value from 1 to 5
    pub rating: u8,
    /// True when the row's status field is `1`
    pub visible: bool,
}

/// A directed trust (or distrust) statement between two users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustEdge {
    pub truster: UserId,
    pub trustee: UserId,
    /// +1 for trust, -1 for distrust
    pub value: i8,
}

impl TrustEdge {
    /// Only positive edges take part in recommendations
    pub fn is_positive(&self) -> bool {
        self.value > 0
    }
}

/// A classified input row.
///
/// Produced by [`crate::parser::parse_line`]; every consumer dispatches on
/// this instead of on raw field counts.
#[derive(Debug, Clone, PartialEq)]
pub enum InputRecord {
    Rating(RatingRecord),
    Trust(TrustEdge),
    Malformed(RowError),
}
