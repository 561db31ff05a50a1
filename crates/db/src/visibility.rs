//! The public listing gate as SQL.
//!
//! Every storefront query (listing, single car, showroom, country-scoped
//! variants) selects from `cars c` and composes [`public_car_predicate`]
//! into its WHERE clause. This is the SQL form of
//! [`souq_core::listing::is_publicly_visible`]; keep the two in step.

use souq_core::dealership::DealershipStatus;
use souq_core::listing::CarStatus;
use souq_core::types::DbId;

use crate::models::car::PublicCarFilter;

/// Column list for `cars` queries, qualified with the `c` alias.
pub const CAR_COLUMNS_C: &str = "c.id, c.user_id, c.dealership_id, c.country_id, c.brand_id, \
    c.model_id, c.year, c.mileage, c.price, c.fuel_type, c.gearbox_type, c.body_type, \
    c.condition, c.description, c.status, c.is_featured, c.views, c.version, \
    c.created_at, c.updated_at";

/// Featured listings first, then newest.
pub const PUBLIC_ORDER: &str = "ORDER BY c.is_featured DESC, c.created_at DESC, c.id DESC";

/// Predicate over `cars c`: the car is Approved and either has no dealership
/// or its dealership is approved.
pub fn public_car_predicate() -> String {
    format!(
        "c.status = '{car}' AND (c.dealership_id IS NULL OR EXISTS (\
            SELECT 1 FROM dealerships gate \
            WHERE gate.id = c.dealership_id AND gate.status = '{dealership}'))",
        car = CarStatus::Approved.as_str(),
        dealership = DealershipStatus::Approved.as_str(),
    )
}

/// Typed bind value for dynamically-built public queries.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    BigInt(DbId),
    Int(i32),
    Text(String),
    Bool(bool),
}

/// Optional scoping applied on top of the gate.
#[derive(Debug, Clone, Copy, Default)]
pub struct PublicScope<'a> {
    /// ISO alpha-2 country code; matched case-insensitively.
    pub country_code: Option<&'a str>,
    pub dealership_id: Option<DbId>,
    pub car_id: Option<DbId>,
}

/// Build the WHERE clause for a public car query.
///
/// Returns `(where_clause, bind_values, next_bind_index)`. The clause always
/// starts with `WHERE` and always contains the gate.
pub fn build_public_filter(
    scope: PublicScope<'_>,
    filter: &PublicCarFilter,
) -> (String, Vec<BindValue>, u32) {
    let mut conditions = vec![public_car_predicate()];
    let mut bind_values = Vec::new();
    let mut bind_idx = 1u32;

    let mut push = |sql: &str, value: BindValue| {
        conditions.push(sql.replace("{}", &format!("${bind_idx}")));
        bind_values.push(value);
        bind_idx += 1;
    };

    if let Some(code) = scope.country_code {
        push(
            "c.country_id = (SELECT id FROM countries WHERE code = UPPER({}))",
            BindValue::Text(code.to_string()),
        );
    }
    if let Some(id) = scope.dealership_id {
        push("c.dealership_id = {}", BindValue::BigInt(id));
    }
    if let Some(id) = scope.car_id {
        push("c.id = {}", BindValue::BigInt(id));
    }
    if let Some(id) = filter.brand_id {
        push("c.brand_id = {}", BindValue::BigInt(id));
    }
    if let Some(id) = filter.model_id {
        push("c.model_id = {}", BindValue::BigInt(id));
    }
    if let Some(min) = filter.min_price {
        push("c.price >= {}", BindValue::BigInt(min));
    }
    if let Some(max) = filter.max_price {
        push("c.price <= {}", BindValue::BigInt(max));
    }
    if let Some(min) = filter.min_year {
        push("c.year >= {}", BindValue::Int(min));
    }
    if let Some(max) = filter.max_year {
        push("c.year <= {}", BindValue::Int(max));
    }
    if let Some(ref body) = filter.body_type {
        push("c.body_type = {}", BindValue::Text(body.clone()));
    }
    if let Some(ref fuel) = filter.fuel_type {
        push("c.fuel_type = {}", BindValue::Text(fuel.clone()));
    }
    if let Some(featured) = filter.featured {
        push("c.is_featured = {}", BindValue::Bool(featured));
    }

    let where_clause = format!("WHERE {}", conditions.join(" AND "));
    (where_clause, bind_values, bind_idx)
}

/// Bind a slice of [`BindValue`] to a sqlx `QueryAs`.
pub fn bind_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Int(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Bool(v) => q = q.bind(*v),
        }
    }
    q
}

/// Bind a slice of [`BindValue`] to a sqlx `QueryScalar`.
pub fn bind_values_scalar<'q, O>(
    mut q: sqlx::query::QueryScalar<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    values: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Int(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Bool(v) => q = q.bind(*v),
        }
    }
    q
}
