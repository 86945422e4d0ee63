/// Points awarded for completing a non-quiz lesson.
pub const POINTS_PER_LESSON: u64 = 10;

/// Bonus points awarded when a course reaches 100% completion.
pub const COURSE_COMPLETION_BONUS: u64 = 50;

/// 每用户最大并发会话数，超出后最旧的会话被清理
pub const MAX_SESSIONS_PER_USER: usize = 10;

/// 连续登录失败达到此次数后锁定账户
pub const MAX_FAILED_LOGIN_ATTEMPTS: u32 = 5;

/// 账户锁定时长（分钟）
pub const LOCKOUT_DURATION_MINUTES: i64 = 15;

/// 列表接口默认分页大小
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// 列表接口最大分页大小
pub const MAX_PAGE_SIZE: u64 = 100;

/// Maximum questions allowed in a single quiz config.
pub const MAX_QUIZ_QUESTIONS: usize = 200;

/// Maximum lessons allowed in a single course (across all sections).
pub const MAX_COURSE_LESSONS: usize = 500;

/// Key probed by the database health check; never a real user id.
pub const HEALTH_CHECK_USER_ID: &str = "__health_check__";
