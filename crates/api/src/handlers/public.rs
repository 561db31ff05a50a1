//! Storefront endpoints. No authentication.
//!
//! Each handler has a country-scoped form (`/public/{country_code}/...`)
//! and an unscoped one (`/public/...`). Every car query goes through the
//! public gate in `souq_db::visibility`.

use axum::extract::{Path, Query, State};
use axum::Json;
use souq_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use souq_core::types::DbId;
use souq_db::models::car::{Car, CarDetail, PublicCarFilter};
use souq_db::models::catalog::{Brand, CarModel};
use souq_db::models::country::{City, Country};
use souq_db::models::dashboard::Showroom;
use souq_db::models::dealership::Dealership;
use souq_db::repositories::{
    CarImageRepo, CarRepo, CatalogRepo, CountryRepo, DealershipRepo,
};
use souq_db::visibility::PublicScope;

use crate::error::{AppError, AppResult};
use crate::query::PaginationParams;
use crate::response::{DataResponse, PageResponse};
use crate::state::AppState;

/// 404 unless `code` names a known country.
async fn require_country(state: &AppState, code: &str) -> AppResult<Country> {
    CountryRepo::find_by_code(&state.pool, code)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Unknown country code '{code}'")))
}

// ---------------------------------------------------------------------------
// Cars
// ---------------------------------------------------------------------------

async fn list_cars(
    state: &AppState,
    country_code: Option<&str>,
    filter: &PublicCarFilter,
) -> AppResult<PageResponse<Car>> {
    let scope = PublicScope {
        country_code,
        ..Default::default()
    };
    let cars = CarRepo::list_public(&state.pool, scope, filter).await?;
    let total = CarRepo::count_public(&state.pool, scope, filter).await?;
    Ok(PageResponse {
        data: cars,
        total,
        limit: clamp_limit(filter.limit, DEFAULT_LIMIT, MAX_LIMIT),
        offset: clamp_offset(filter.offset),
    })
}

/// GET /api/v1/public/cars
pub async fn list_public_cars(
    State(state): State<AppState>,
    Query(filter): Query<PublicCarFilter>,
) -> AppResult<Json<PageResponse<Car>>> {
    Ok(Json(list_cars(&state, None, &filter).await?))
}

/// GET /api/v1/public/{country_code}/cars
pub async fn list_country_cars(
    State(state): State<AppState>,
    Path(country_code): Path<String>,
    Query(filter): Query<PublicCarFilter>,
) -> AppResult<Json<PageResponse<Car>>> {
    require_country(&state, &country_code).await?;
    Ok(Json(list_cars(&state, Some(&country_code), &filter).await?))
}

async fn view_car(
    state: &AppState,
    id: DbId,
    country_code: Option<&str>,
) -> AppResult<DataResponse<CarDetail>> {
    let car = CarRepo::record_public_view(&state.pool, id, country_code)
        .await?
        .ok_or_else(|| AppError::not_found("Car", id))?;
    let images = CarImageRepo::list_for_car(&state.pool, id).await?;
    Ok(DataResponse {
        data: CarDetail { car, images },
    })
}

/// GET /api/v1/public/cars/{id}
///
/// Counts a view.
pub async fn get_public_car(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CarDetail>>> {
    Ok(Json(view_car(&state, id, None).await?))
}

/// GET /api/v1/public/{country_code}/cars/{id}
pub async fn get_country_car(
    State(state): State<AppState>,
    Path((country_code, id)): Path<(String, DbId)>,
) -> AppResult<Json<DataResponse<CarDetail>>> {
    require_country(&state, &country_code).await?;
    Ok(Json(view_car(&state, id, Some(&country_code)).await?))
}

// ---------------------------------------------------------------------------
// Dealerships
// ---------------------------------------------------------------------------

async fn showroom(
    state: &AppState,
    id: DbId,
    country_code: Option<&str>,
    filter: &PublicCarFilter,
) -> AppResult<DataResponse<Showroom>> {
    let dealership = DealershipRepo::find_public(&state.pool, id, country_code)
        .await?
        .ok_or_else(|| AppError::not_found("Dealership", id))?;

    let scope = PublicScope {
        country_code,
        dealership_id: Some(dealership.id),
        car_id: None,
    };
    let cars = CarRepo::list_public(&state.pool, scope, filter).await?;

    Ok(DataResponse {
        data: Showroom { dealership, cars },
    })
}

/// GET /api/v1/public/dealerships/{id}
///
/// 404 unless the dealership is approved.
pub async fn get_showroom(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(filter): Query<PublicCarFilter>,
) -> AppResult<Json<DataResponse<Showroom>>> {
    Ok(Json(showroom(&state, id, None, &filter).await?))
}

/// GET /api/v1/public/{country_code}/dealerships/{id}
pub async fn get_country_showroom(
    State(state): State<AppState>,
    Path((country_code, id)): Path<(String, DbId)>,
    Query(filter): Query<PublicCarFilter>,
) -> AppResult<Json<DataResponse<Showroom>>> {
    require_country(&state, &country_code).await?;
    Ok(Json(showroom(&state, id, Some(&country_code), &filter).await?))
}

/// GET /api/v1/public/dealerships
pub async fn list_public_dealerships(
    State(state): State<AppState>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Dealership>>>> {
    let dealerships =
        DealershipRepo::list_public(&state.pool, None, page.limit, page.offset).await?;
    Ok(Json(DataResponse { data: dealerships }))
}

/// GET /api/v1/public/{country_code}/dealerships
pub async fn list_country_dealerships(
    State(state): State<AppState>,
    Path(country_code): Path<String>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Dealership>>>> {
    require_country(&state, &country_code).await?;
    let dealerships =
        DealershipRepo::list_public(&state.pool, Some(&country_code), page.limit, page.offset)
            .await?;
    Ok(Json(DataResponse { data: dealerships }))
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

/// GET /api/v1/public/countries
pub async fn list_countries(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Country>>>> {
    Ok(Json(DataResponse {
        data: CountryRepo::list(&state.pool).await?,
    }))
}

/// GET /api/v1/public/countries/{country_code}/cities
pub async fn list_cities(
    State(state): State<AppState>,
    Path(country_code): Path<String>,
) -> AppResult<Json<DataResponse<Vec<City>>>> {
    let country = require_country(&state, &country_code).await?;
    Ok(Json(DataResponse {
        data: CountryRepo::list_cities(&state.pool, country.id).await?,
    }))
}

/// GET /api/v1/public/brands
pub async fn list_brands(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Brand>>>> {
    Ok(Json(DataResponse {
        data: CatalogRepo::list_brands(&state.pool).await?,
    }))
}

/// GET /api/v1/public/brands/{id}/models
pub async fn list_models(
    State(state): State<AppState>,
    Path(brand_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<CarModel>>>> {
    Ok(Json(DataResponse {
        data: CatalogRepo::list_models(&state.pool, brand_id).await?,
    }))
}
