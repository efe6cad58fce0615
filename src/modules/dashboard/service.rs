use std::{collections::BTreeMap, sync::Arc};

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        assignment::schema::{AssignmentEntity, AssignmentStatus},
        care_request::schema::CareRequestStatus,
        dashboard::{
            model::{ANALYTICS_MONTHS, Analytics, DashboardStats, LATEST_REQUESTS, MonthBucket},
            repository::DashboardRepository,
        },
        friend::{repository::FriendshipRepository, service::friend_ids},
    },
};

pub fn month_key(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m").to_string()
}

/// `(year, month)` of the `n` months ending with the month of `now`, oldest
/// first.
pub fn last_n_months(now: &DateTime<Utc>, n: u32) -> Vec<(i32, u32)> {
    let current = now.year() * 12 + now.month0() as i32;
    (0..n as i32)
        .rev()
        .map(|back| {
            let index = current - back;
            (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
        })
        .collect()
}

fn month_label((year, month): (i32, u32)) -> String {
    format!("{year:04}-{month:02}")
}

fn month_start((year, month): (i32, u32)) -> Result<DateTime<Utc>, error::SystemError> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
        .ok_or_else(|| error::SystemError::InternalError("month out of range".into()))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Zero-filled counts of `starts` per month label.
pub fn requests_per_month(labels: &[String], starts: &[DateTime<Utc>]) -> Vec<MonthBucket<i64>> {
    let mut buckets: BTreeMap<&str, i64> = labels.iter().map(|m| (m.as_str(), 0)).collect();
    for start in starts {
        if let Some(count) = buckets.get_mut(month_key(start).as_str()) {
            *count += 1;
        }
    }
    labels
        .iter()
        .map(|m| MonthBucket { month: m.clone(), value: buckets[m.as_str()] })
        .collect()
}

/// Hours per month of the month each assignment starts in. Each assignment is
/// rounded to 2 decimals before summing.
pub fn sitter_hours_per_month(
    labels: &[String],
    assignments: &[AssignmentEntity],
) -> Vec<MonthBucket<f64>> {
    let mut buckets: BTreeMap<&str, f64> = labels.iter().map(|m| (m.as_str(), 0.0)).collect();
    for a in assignments {
        let hours = (a.end_at - a.start_at).num_seconds() as f64 / 3600.0;
        if hours <= 0.0 {
            continue;
        }
        if let Some(total) = buckets.get_mut(month_key(&a.start_at).as_str()) {
            *total += round2(hours);
        }
    }
    labels
        .iter()
        .map(|m| MonthBucket { month: m.clone(), value: round2(buckets[m.as_str()]) })
        .collect()
}

pub trait DashboardRepo: DashboardRepository + FriendshipRepository {}

impl<T> DashboardRepo for T where T: DashboardRepository + FriendshipRepository {}

#[derive(Clone)]
pub struct DashboardService<R>
where
    R: DashboardRepo,
{
    repo: Arc<R>,
}

impl<R> DashboardService<R>
where
    R: DashboardRepo,
{
    pub fn with_dependencies(repo: Arc<R>) -> Self {
        DashboardService { repo }
    }

    pub async fn stats(
        &self,
        caller: Uuid,
        now: DateTime<Utc>,
    ) -> Result<DashboardStats, error::SystemError> {
        let mut tx = self.repo.begin().await?;

        let friends = friend_ids(self.repo.as_ref(), &caller, &mut tx).await?;
        let friends_open_requests = if friends.is_empty() {
            0
        } else {
            self.repo.count_open_requests_of(&friends, &mut tx).await?
        };

        let stats = DashboardStats {
            pets: self.repo.count_pets(&caller, &mut tx).await?,
            open_requests: self
                .repo
                .count_requests_with_status(&caller, CareRequestStatus::Open, &mut tx)
                .await?,
            sitter_assignments: self
                .repo
                .count_active_sitter_assignments(&caller, now, &mut tx)
                .await?,
            friends_open_requests,
            pending_approvals: self.repo.count_pending_applications(&caller, &mut tx).await?,
            latest_requests: self.repo.latest_requests(&caller, LATEST_REQUESTS, &mut tx).await?,
        };

        self.repo.commit(tx).await?;
        Ok(stats)
    }

    pub async fn analytics(
        &self,
        caller: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Analytics, error::SystemError> {
        let months = last_n_months(&now, ANALYTICS_MONTHS);
        let labels: Vec<String> = months.iter().copied().map(month_label).collect();
        let since = match months.first() {
            Some(first) => month_start(*first)?,
            None => now,
        };

        let mut tx = self.repo.begin().await?;
        let requests_by_status = self.repo.count_requests_by_status(&caller, &mut tx).await?;
        let starts = self.repo.request_starts_since(&caller, since, &mut tx).await?;
        let statuses = [AssignmentStatus::Pending, AssignmentStatus::Active, AssignmentStatus::Done];
        let sittings = self.repo.sitter_assignments_since(&caller, &statuses, since, &mut tx).await?;
        self.repo.commit(tx).await?;

        Ok(Analytics {
            requests_by_status,
            requests_per_month: requests_per_month(&labels, &starts),
            sitter_hours_per_month: sitter_hours_per_month(&labels, &sittings),
        })
    }
}
