use serde::Serialize;
use sqlx::prelude::FromRow;

use crate::modules::care_request::schema::{CareRequestEntity, CareRequestStatus};

pub const LATEST_REQUESTS: i64 = 5;
pub const ANALYTICS_MONTHS: u32 = 6;

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub pets: i64,
    pub open_requests: i64,
    /// Active assignments where the caller sits, not yet over.
    pub sitter_assignments: i64,
    pub friends_open_requests: i64,
    pub pending_approvals: i64,
    pub latest_requests: Vec<CareRequestEntity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct StatusCount {
    pub status: CareRequestStatus,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthBucket<T> {
    /// `YYYY-MM`
    pub month: String,
    pub value: T,
}

#[derive(Debug, Serialize)]
pub struct Analytics {
    pub requests_by_status: Vec<StatusCount>,
    pub requests_per_month: Vec<MonthBucket<i64>>,
    pub sitter_hours_per_month: Vec<MonthBucket<f64>>,
}
