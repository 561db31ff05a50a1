//! Admin maintenance of countries, cities, brands and models.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use souq_core::types::DbId;
use souq_core::validation::validate_input;
use souq_db::models::catalog::{Brand, CarModel, CreateBrand, CreateCarModel};
use souq_db::models::country::{City, Country, CreateCity, CreateCountry};
use souq_db::repositories::{CatalogRepo, CountryRepo};

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

type Created<T> = (StatusCode, Json<DataResponse<T>>);

fn created<T: serde::Serialize>(data: T) -> Created<T> {
    (StatusCode::CREATED, Json(DataResponse { data }))
}

/// POST /api/v1/admin/countries
pub async fn create_country(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateCountry>,
) -> AppResult<Created<Country>> {
    validate_input(&input)?;
    let country = CountryRepo::create(&state.pool, &input).await?;
    tracing::info!(country_id = country.id, code = %country.code, admin_id = admin.user_id, "Country created");
    Ok(created(country))
}

/// POST /api/v1/admin/countries/{id}/cities
pub async fn create_city(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(country_id): Path<DbId>,
    Json(input): Json<CreateCity>,
) -> AppResult<Created<City>> {
    validate_input(&input)?;
    let city = CountryRepo::create_city(&state.pool, country_id, &input).await?;
    tracing::info!(city_id = city.id, country_id, admin_id = admin.user_id, "City created");
    Ok(created(city))
}

/// POST /api/v1/admin/brands
pub async fn create_brand(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateBrand>,
) -> AppResult<Created<Brand>> {
    validate_input(&input)?;
    let brand = CatalogRepo::create_brand(&state.pool, &input).await?;
    tracing::info!(brand_id = brand.id, admin_id = admin.user_id, "Brand created");
    Ok(created(brand))
}

/// POST /api/v1/admin/brands/{id}/models
pub async fn create_model(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(brand_id): Path<DbId>,
    Json(input): Json<CreateCarModel>,
) -> AppResult<Created<CarModel>> {
    validate_input(&input)?;
    let model = CatalogRepo::create_model(&state.pool, brand_id, &input).await?;
    tracing::info!(model_id = model.id, brand_id, admin_id = admin.user_id, "Car model created");
    Ok(created(model))
}
