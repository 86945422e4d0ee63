pub const USERS: &str = "users";
pub const SESSIONS: &str = "sessions";
pub const TENANTS: &str = "tenants";
pub const COURSES: &str = "courses";
pub const PROGRESS: &str = "progress";
pub const QUIZ_ATTEMPTS: &str = "quiz_attempts";
pub const ANNOUNCEMENTS: &str = "announcements";
pub const USER_STATS: &str = "user_stats";
pub const CONFIG_VERSIONS: &str = "config_versions";

// Gamification catalogs, seeded by migration and admin-editable
pub const LEVELS: &str = "levels";
pub const BADGES: &str = "badges";
