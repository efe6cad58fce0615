use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Deserialize, Validate)]
pub struct CreateOfferModel {
    pub care_request_id: Uuid,
    pub sitter_id: Uuid,
    #[validate(length(max = 2000, message = "Message must be at most 2000 characters long"))]
    pub message: Option<String>,
}
