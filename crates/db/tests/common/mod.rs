//! Fixtures shared by the repository integration tests.

#![allow(dead_code)]

use souq_core::dealership::{BusinessType, DealershipType, ReviewDecision};
use souq_core::roles::Role;
use souq_core::types::DbId;
use souq_db::models::car::{Car, CreateCar};
use souq_db::models::catalog::{CreateBrand, CreateCarModel};
use souq_db::models::dealership::{Dealership, SubmitDealership};
use souq_db::models::profile::{CreateProfile, Profile};
use souq_db::repositories::{CarRepo, CatalogRepo, DealershipRepo, ProfileRepo};
use sqlx::PgPool;

pub async fn profile(pool: &PgPool, email: &str, role: Role) -> Profile {
    ProfileRepo::create(
        pool,
        &CreateProfile {
            email: email.to_string(),
            full_name: None,
            phone_number: None,
            role: Some(role),
            country_id: None,
            city_id: None,
        },
    )
    .await
    .unwrap()
}

/// Seed one brand with one model, returning `(brand_id, model_id)`.
pub async fn catalog(pool: &PgPool) -> (DbId, DbId) {
    let brand = CatalogRepo::create_brand(
        pool,
        &CreateBrand {
            name: "Toyota".to_string(),
            name_ar: None,
            logo_url: None,
        },
    )
    .await
    .unwrap();
    let model = CatalogRepo::create_model(
        pool,
        brand.id,
        &CreateCarModel {
            name: "Camry".to_string(),
            name_ar: None,
        },
    )
    .await
    .unwrap();
    (brand.id, model.id)
}

pub fn registration(name: &str) -> SubmitDealership {
    SubmitDealership {
        business_name: name.to_string(),
        business_name_ar: None,
        description: None,
        description_ar: None,
        location: None,
        location_ar: None,
        business_type: BusinessType::Dealership,
        dealership_type: DealershipType::Private,
        logo_url: None,
        country_id: None,
    }
}

/// Submit and approve a dealership for `owner`.
pub async fn approved_dealership(pool: &PgPool, owner: DbId, admin: DbId) -> Dealership {
    let (pending, _) = DealershipRepo::submit(pool, owner, &registration("Desert Motors"))
        .await
        .unwrap();
    DealershipRepo::review(
        pool,
        pending.id,
        admin,
        ReviewDecision::Approve,
        Some("ok"),
        pending.version,
    )
    .await
    .unwrap()
    .dealership
}

pub fn new_car(brand_id: DbId, model_id: DbId, dealership_id: Option<DbId>) -> CreateCar {
    CreateCar {
        dealership_id,
        country_id: None,
        brand_id,
        model_id,
        year: 2022,
        mileage: 15_000,
        price: 95_000,
        fuel_type: Some("petrol".to_string()),
        gearbox_type: Some("automatic".to_string()),
        body_type: Some("sedan".to_string()),
        condition: Some("used".to_string()),
        description: None,
        image_urls: vec![],
    }
}

/// Create a listing and approve it as `admin`.
pub async fn approved_car(
    pool: &PgPool,
    owner: DbId,
    admin: DbId,
    input: &CreateCar,
) -> Car {
    let created = CarRepo::create(pool, owner, input).await.unwrap().car;
    CarRepo::set_status(
        pool,
        created.id,
        souq_core::listing::CarStatus::Approved,
        created.version,
        souq_db::repositories::car_repo::Actor::Admin(admin),
    )
    .await
    .unwrap()
    .car
}
