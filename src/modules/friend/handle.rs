use actix_web::{delete, get, post, web, HttpRequest};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::get_extensions,
    modules::{
        friend::{
            model::{FriendRequestResponse, FriendResponse},
            schema::FriendshipEntity,
            service::FriendService,
        },
        store::repository_pg::PgStore,
    },
    utils::Claims,
};

pub type FriendSvc = FriendService<PgStore>;

#[get("")]
pub async fn list_friends(
    friend_service: web::Data<FriendSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<FriendResponse>>, error::Error> {
    let user_id = get_extensions::<Claims>(&req)?.sub;
    let friends = friend_service.get_friends(user_id).await?;

    Ok(success::Success::ok(Some(friends)).message("Friends retrieved successfully"))
}

#[get("/requests/incoming")]
pub async fn list_incoming_requests(
    friend_service: web::Data<FriendSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<FriendRequestResponse>>, error::Error> {
    let user_id = get_extensions::<Claims>(&req)?.sub;
    let requests = friend_service.get_incoming_requests(user_id).await?;

    Ok(success::Success::ok(Some(requests)).message("Friend requests retrieved successfully"))
}

#[get("/requests/sent")]
pub async fn list_sent_requests(
    friend_service: web::Data<FriendSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<FriendRequestResponse>>, error::Error> {
    let user_id = get_extensions::<Claims>(&req)?.sub;
    let requests = friend_service.get_sent_requests(user_id).await?;

    Ok(success::Success::ok(Some(requests)).message("Sent requests retrieved successfully"))
}

#[post("/requests/{user_id}")]
pub async fn send_friend_request(
    friend_service: web::Data<FriendSvc>,
    receiver_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<FriendshipEntity>, error::Error> {
    let sender_id = get_extensions::<Claims>(&req)?.sub;
    let request = friend_service.send_friend_request(sender_id, *receiver_id).await?;

    Ok(success::Success::created(Some(request)).message("Friend request sent successfully"))
}

#[post("/requests/{user_id}/accept")]
pub async fn accept_friend_request(
    friend_service: web::Data<FriendSvc>,
    requester_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<FriendResponse>, error::Error> {
    let receiver_id = get_extensions::<Claims>(&req)?.sub;
    let response = friend_service.accept_friend_request(receiver_id, *requester_id).await?;

    Ok(success::Success::ok(Some(response)).message("Friend request accepted successfully"))
}

#[post("/requests/{user_id}/decline")]
pub async fn decline_friend_request(
    friend_service: web::Data<FriendSvc>,
    requester_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let receiver_id = get_extensions::<Claims>(&req)?.sub;
    friend_service.decline_friend_request(receiver_id, *requester_id).await?;
    Ok(success::Success::no_content())
}

#[delete("/requests/{user_id}")]
pub async fn cancel_friend_request(
    friend_service: web::Data<FriendSvc>,
    addressee_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let user_id = get_extensions::<Claims>(&req)?.sub;
    friend_service.cancel_friend_request(user_id, *addressee_id).await?;
    Ok(success::Success::no_content())
}
