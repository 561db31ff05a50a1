//! Dealer dashboard read model.

use serde::Serialize;
use souq_core::listing::StatusCounts;

use super::car::Car;
use super::dealership::Dealership;

/// Everything the dealer dashboard renders in one payload.
#[derive(Debug, Clone, Serialize)]
pub struct DealerDashboard {
    pub dealership: Dealership,
    pub cars: Vec<Car>,
    pub counts: StatusCounts,
}

/// An approved dealership and its publicly visible stock.
#[derive(Debug, Clone, Serialize)]
pub struct Showroom {
    pub dealership: Dealership,
    pub cars: Vec<Car>,
}
