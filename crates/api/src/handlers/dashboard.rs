//! Dealer dashboard.

use axum::extract::State;
use axum::Json;
use souq_core::listing::StatusCounts;
use souq_db::models::dashboard::DealerDashboard;
use souq_db::repositories::{CarRepo, DealershipRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireDealer;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/dealer/dashboard
///
/// The caller's approved dealership, its listings in every status and the
/// per-status counts. The role claim alone is not enough: 403 unless the
/// caller owns an approved dealership.
pub async fn dealer_dashboard(
    RequireDealer(user): RequireDealer,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<DealerDashboard>>> {
    let dealership = DealershipRepo::find_approved_for_user(&state.pool, user.user_id)
        .await?
        .ok_or_else(|| AppError::forbidden("No approved dealership for this account"))?;

    let cars = CarRepo::list_for_dealership(&state.pool, dealership.id).await?;
    let statuses = cars
        .iter()
        .map(|car| car.status().map(|status| (status, car.views)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(DataResponse {
        data: DealerDashboard {
            dealership,
            counts: StatusCounts::tally(statuses),
            cars,
        },
    }))
}
