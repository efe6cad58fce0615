use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    api::error,
    modules::{care_request::schema::CareRequestEntity, friend::model::FriendResponse},
    utils::Window,
};

pub const PER_PAGE: i64 = 10;

/// Body for both creating and editing a request; edits replace every field.
#[derive(Deserialize, Validate)]
pub struct CareRequestModel {
    pub pet_id: Option<Uuid>,
    pub start_at: chrono::DateTime<chrono::Utc>,
    pub end_at: chrono::DateTime<chrono::Utc>,
    #[validate(length(max = 255, message = "Location must be at most 255 characters long"))]
    pub location_text: Option<String>,
    pub notes: Option<String>,
}

pub struct NewCareRequest {
    pub pet_id: Option<Uuid>,
    pub window: Window,
    pub location_text: Option<String>,
    pub notes: Option<String>,
}

impl TryFrom<CareRequestModel> for NewCareRequest {
    type Error = error::SystemError;

    fn try_from(model: CareRequestModel) -> Result<Self, Self::Error> {
        let window = Window::new(model.start_at, model.end_at)?;
        let location_text = model
            .location_text
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());

        Ok(NewCareRequest { pet_id: model.pet_id, window, location_text, notes: model.notes })
    }
}

#[derive(Deserialize, Validate)]
pub struct OpenRequestsQuery {
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub items: Vec<T>,
    pub page: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T: Serialize> Page<T> {
    pub fn empty(page: i64) -> Self {
        Page { items: Vec::new(), page, has_next: false, has_prev: page > 1 }
    }

    /// `fetched` holds up to `PER_PAGE + 1` rows; the extra one only signals a
    /// next page.
    pub fn from_overfetch(mut fetched: Vec<T>, page: i64) -> Self {
        let has_next = fetched.len() as i64 > PER_PAGE;
        fetched.truncate(PER_PAGE as usize);
        Page { items: fetched, page, has_next, has_prev: page > 1 }
    }
}

#[derive(Debug, Serialize)]
pub struct FriendOpenRequest {
    #[serde(flatten)]
    pub request: CareRequestEntity,
    pub owner: FriendResponse,
    pub pet_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_new_request_trims_location_and_checks_window() {
        let start = Utc::now();
        let model = CareRequestModel {
            pet_id: None,
            start_at: start,
            end_at: start + Duration::hours(2),
            location_text: Some("   ".into()),
            notes: None,
        };
        let new = NewCareRequest::try_from(model).unwrap();
        assert_eq!(new.location_text, None);
        assert_eq!(new.window.hours(), 2.0);

        let reversed = CareRequestModel {
            pet_id: None,
            start_at: start,
            end_at: start,
            location_text: None,
            notes: None,
        };
        assert!(matches!(
            NewCareRequest::try_from(reversed),
            Err(error::SystemError::InvalidInterval)
        ));
    }

    #[test]
    fn test_page_from_overfetch() {
        let page = Page::from_overfetch((0..11).collect::<Vec<i32>>(), 1);
        assert_eq!(page.items.len(), 10);
        assert!(page.has_next);
        assert!(!page.has_prev);

        let last = Page::from_overfetch((0..3).collect::<Vec<i32>>(), 2);
        assert_eq!(last.items.len(), 3);
        assert!(!last.has_next);
        assert!(last.has_prev);
    }
}
