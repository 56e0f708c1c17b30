//! DTO describing what a delete removed.

use serde::{Deserialize, Serialize};

use crate::domain::relationships::CascadeDeletion;

#[derive(Debug, Serialize, Deserialize)]
pub struct DeletionResponse {
    pub kind: String,
    pub id: i64,
    pub deleted_cars: Vec<i64>,
    pub deleted_requests: Vec<i64>,
}

impl From<CascadeDeletion> for DeletionResponse {
    fn from(plan: CascadeDeletion) -> Self {
        DeletionResponse {
            kind: plan.root.kind().to_string(),
            id: plan.root.id(),
            deleted_cars: plan.car_ids(),
            deleted_requests: plan.request_ids(),
        }
    }
}
