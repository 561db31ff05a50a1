use axum::extract::{Query, State};
use axum::Json;
use souq_db::models::admin_log::{AdminLog, AdminLogFilter};
use souq_db::repositories::AdminLogRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/logs?entity_type=&entity_id=&limit=&offset=
pub async fn list_admin_logs(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(filter): Query<AdminLogFilter>,
) -> AppResult<Json<DataResponse<Vec<AdminLog>>>> {
    let logs = AdminLogRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: logs }))
}
