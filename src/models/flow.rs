use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::enums::RequestStatus;
use super::user::User;

/// One status change of a test request. `from_status` is `None` for creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRequestFlow {
    pub id: i64,
    pub request_id: i64,
    pub from_status: Option<RequestStatus>,
    pub to_status: RequestStatus,
    pub changed_by: User,
    pub happened_on: NaiveDateTime,
}
