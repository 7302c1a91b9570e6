//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod appointment_repo;
pub mod business_hours_repo;
pub mod business_repo;
pub mod client_repo;
pub mod feedback_repo;
pub mod notification_settings_repo;
pub mod profile_repo;
pub mod service_repo;
pub mod session_repo;
pub mod subscription_repo;
pub mod user_repo;

pub use appointment_repo::AppointmentRepo;
pub use business_hours_repo::BusinessHoursRepo;
pub use business_repo::BusinessRepo;
pub use client_repo::ClientRepo;
pub use feedback_repo::FeedbackRepo;
pub use notification_settings_repo::NotificationSettingsRepo;
pub use profile_repo::ProfileRepo;
pub use service_repo::ServiceRepo;
pub use session_repo::SessionRepo;
pub use subscription_repo::SubscriptionRepo;
pub use user_repo::UserRepo;
