//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` (or any `PgExecutor` when they must join a caller's
//! transaction) as the first argument.

pub mod admin_log_repo;
pub mod car_image_repo;
pub mod car_repo;
pub mod catalog_repo;
pub mod contact_message_repo;
pub mod country_repo;
pub mod dealership_repo;
pub mod notification_repo;
pub mod profile_repo;

pub use admin_log_repo::AdminLogRepo;
pub use car_image_repo::CarImageRepo;
pub use car_repo::CarRepo;
pub use catalog_repo::CatalogRepo;
pub use contact_message_repo::ContactMessageRepo;
pub use country_repo::CountryRepo;
pub use dealership_repo::DealershipRepo;
pub use notification_repo::NotificationRepo;
pub use profile_repo::ProfileRepo;
