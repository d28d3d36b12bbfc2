//! Admin user endpoints.

use crate::error::ApiResult;
use crate::model::{UserIdsRequest, UserPage};
use crate::transport::{Transport, encode_error};

use super::query::RequestDescriptor;

const USERS: &str = "/api/Admin/users";

/// GET `/api/Admin/users`
pub async fn list_users(transport: &Transport, query: &RequestDescriptor) -> ApiResult<UserPage> {
    let builder = transport
        .get(USERS)
        .query(query)
        .map_err(|e| encode_error(&e))?;
    transport.send_json(builder).await
}

/// POST `/api/Admin/users/{operation}` with `{ userIds }`.
pub async fn mutate_users(
    transport: &Transport,
    operation: &str,
    user_ids: &[String],
) -> ApiResult<()> {
    let request = UserIdsRequest {
        user_ids: user_ids.to_vec(),
    };
    let builder = transport
        .post(&format!("{USERS}/{operation}"))
        .json(&request)
        .map_err(|e| encode_error(&e))?;
    transport.send_ack(builder).await
}

/// DELETE `/api/Admin/users/unverified`
pub async fn delete_unverified(transport: &Transport) -> ApiResult<()> {
    transport
        .send_ack(transport.delete(&format!("{USERS}/unverified")))
        .await
}
