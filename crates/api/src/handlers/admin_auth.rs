//! Admin identity endpoint.
//!
//! Tokens are minted by the external identity provider; this service only
//! validates them. The one endpoint here lets the dashboard confirm whose
//! token it is holding.

use axum::Json;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::admin::AdminUser;
use crate::response::DataResponse;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    pub email: String,
    pub name: String,
}

/// `GET /api/v1/auth/me` — the authenticated admin's identity.
pub async fn me(admin: AdminUser) -> AppResult<Json<DataResponse<AdminProfile>>> {
    Ok(Json(DataResponse {
        data: AdminProfile {
            email: admin.email,
            name: admin.name,
        },
    }))
}
