pub mod announcements;
pub mod courses;
pub mod gamification;
pub mod progress;
pub mod quiz_attempts;
pub mod sessions;
pub mod tenants;
pub mod users;
