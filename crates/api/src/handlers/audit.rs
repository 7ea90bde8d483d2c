//! Admin audit trail queries.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use newhire_core::error::CoreError;
use newhire_db::models::audit::{AuditLogPage, AuditLogQuery, SortDir};
use newhire_db::repositories::audit_log_repo::{AuditLogRepo, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use newhire_db::repositories::OnboardingRepo;

use crate::error::AppResult;
use crate::middleware::admin::AdminUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Raw query parameters; dates arrive as RFC 3339 strings.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditListParams {
    pub from: Option<String>,
    pub to: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub sort: Option<String>,
}

impl AuditListParams {
    fn into_query(self) -> Result<AuditLogQuery, CoreError> {
        let from = self.from.as_deref().map(parse_rfc3339).transpose()?;
        let to = self.to.as_deref().map(parse_rfc3339).transpose()?;
        if let (Some(f), Some(t)) = (from, to) {
            if f > t {
                return Err(CoreError::Validation(
                    "'from' must not be after 'to'".to_string(),
                ));
            }
        }
        let sort = match self.sort.as_deref() {
            None => SortDir::default(),
            Some("asc") => SortDir::Asc,
            Some("desc") => SortDir::Desc,
            Some(other) => {
                return Err(CoreError::Validation(format!(
                    "Invalid sort direction: {other} (expected asc or desc)"
                )))
            }
        };
        Ok(AuditLogQuery {
            from,
            to,
            page: self.page,
            page_size: self.page_size,
            sort,
        })
    }
}

fn parse_rfc3339(s: &str) -> Result<newhire_core::types::Timestamp, CoreError> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .map_err(|_| CoreError::Validation(format!("Invalid RFC 3339 timestamp: {s}")))
}

/// `GET /api/v1/onboardings/{id}/audit-logs` — one onboarding's trail,
/// date-filterable and paginated, newest first by default.
pub async fn list(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Query(params): Query<AuditListParams>,
) -> AppResult<Json<DataResponse<AuditLogPage>>> {
    if OnboardingRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(CoreError::NotFound {
            entity: "Onboarding",
            id: id.to_string(),
        }
        .into());
    }

    let query = params.into_query()?;
    let page = query.page.unwrap_or(1).max(1);
    let page_size = query
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let items = AuditLogRepo::list_by_onboarding(&state.pool, id, &query).await?;
    let total = AuditLogRepo::count_by_onboarding(&state.pool, id, &query).await?;

    Ok(Json(DataResponse {
        data: AuditLogPage {
            items,
            total,
            page,
            page_size,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_date_range_and_sort() {
        let params = AuditListParams {
            from: Some("2026-01-01T00:00:00Z".into()),
            to: Some("2026-02-01T00:00:00Z".into()),
            sort: Some("asc".into()),
            ..Default::default()
        };
        let query = params.into_query().unwrap();
        assert!(query.from.unwrap() < query.to.unwrap());
        assert_eq!(query.sort, SortDir::Asc);
    }

    #[test]
    fn rejects_inverted_range() {
        let params = AuditListParams {
            from: Some("2026-02-01T00:00:00Z".into()),
            to: Some("2026-01-01T00:00:00Z".into()),
            ..Default::default()
        };
        assert!(params.into_query().is_err());
    }

    #[test]
    fn rejects_garbage_dates_and_sorts() {
        let bad_date = AuditListParams {
            from: Some("yesterday".into()),
            ..Default::default()
        };
        assert!(bad_date.into_query().is_err());

        let bad_sort = AuditListParams {
            sort: Some("sideways".into()),
            ..Default::default()
        };
        assert!(bad_sort.into_query().is_err());
    }

    #[test]
    fn defaults_to_descending() {
        let query = AuditListParams::default().into_query().unwrap();
        assert_eq!(query.sort, SortDir::Desc);
    }
}
