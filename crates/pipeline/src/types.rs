//! Records flowing between pipeline stages.

use data_loader::{ItemId, UserId};
use serde::{Deserialize, Serialize};

/// Tagged value sharing a join key (the trusted user).
///
/// Either someone who trusts the key user, or one rating the key user gave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Contribution {
    Truster(UserId),
    Rating { item_id: ItemId, rating: u8 },
}

/// One rating seen through one trust edge.
///
/// `truster` trusts the user who gave `rating` to `item_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinedContribution {
    pub truster: UserId,
    pub item_id: ItemId,
    pub rating: u8,
}

/// Smoothed score of one item for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem {
    pub truster: UserId,
    pub item_id: ItemId,
    pub score: f64,
}

/// One entry of a ranked recommendation list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedItem {
    pub item_id: ItemId,
    pub score: f64,
}

/// Final output for one user: at most K items, best first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub user_id: UserId,
    pub items: Vec<RankedItem>,
}
