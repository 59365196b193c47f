use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::dto::PublicUser;
use crate::weights::repo::WeightEntry;
use crate::weights::summary::WeightSummary;

/// Request body for submitting an entry. Both fields are required;
/// `Option` here is what turns an absent field into `MissingField`
/// instead of a deserialization error.
#[derive(Debug, Deserialize)]
pub struct NewEntryRequest {
    pub weight: Option<i32>,
    pub satisfaction: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub id: Uuid,
    pub weight: i32,
    pub satisfaction: i32,
    pub created_at: OffsetDateTime,
}

impl From<WeightEntry> for EntryResponse {
    fn from(e: WeightEntry) -> Self {
        Self {
            id: e.id,
            weight: e.weight,
            satisfaction: e.satisfaction,
            created_at: e.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub lowest_weight: EntryResponse,
    pub highest_weight: EntryResponse,
    pub average_satisfaction: f64,
}

impl From<WeightSummary> for SummaryResponse {
    fn from(s: WeightSummary) -> Self {
        Self {
            lowest_weight: s.lowest_weight.into(),
            highest_weight: s.highest_weight.into(),
            average_satisfaction: s.average_satisfaction,
        }
    }
}

/// The account view: history newest first, summary only when there is
/// history to summarize.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub user: PublicUser,
    pub entries: Vec<EntryResponse>,
    pub summary: Option<SummaryResponse>,
}
