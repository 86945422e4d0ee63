pub fn user_key(user_id: &str) -> String {
    user_id.to_string()
}

pub fn user_email_index_key(email: &str) -> String {
    format!("email:{}", email.to_lowercase())
}

pub fn session_key(token_hash: &str) -> String {
    token_hash.to_string()
}

pub fn session_user_index_key(user_id: &str, token_hash: &str) -> String {
    format!("user:{}:{}", user_id, token_hash)
}

pub fn session_user_prefix(user_id: &str) -> String {
    format!("user:{}:", user_id)
}

pub fn tenant_key(tenant_id: &str) -> String {
    tenant_id.to_string()
}

pub fn course_key(course_id: &str) -> String {
    course_id.to_string()
}

/// Composite identity: one progress record per (user, course) pair.
pub fn progress_key(user_id: &str, course_id: &str) -> String {
    format!("{}:{}", user_id, course_id)
}

pub fn progress_user_prefix(user_id: &str) -> String {
    format!("{}:", user_id)
}

/// Attempts sort newest-first within a (user, lesson) prefix.
pub fn quiz_attempt_key(user_id: &str, lesson_id: &str, timestamp_ms: i64, attempt_id: &str) -> String {
    let ts = timestamp_ms.max(0) as u64;
    let reverse_ts = u64::MAX - ts;
    format!("{}:{}:{:020}:{}", user_id, lesson_id, reverse_ts, attempt_id)
}

pub fn quiz_attempt_prefix(user_id: &str, lesson_id: &str) -> String {
    format!("{}:{}:", user_id, lesson_id)
}

/// Announcements sort newest-first within a tenant prefix.
pub fn announcement_key(tenant_id: &str, timestamp_ms: i64, announcement_id: &str) -> String {
    let ts = timestamp_ms.max(0) as u64;
    let reverse_ts = u64::MAX - ts;
    format!("{}:{:020}:{}", tenant_id, reverse_ts, announcement_id)
}

pub fn announcement_prefix(tenant_id: &str) -> String {
    format!("{}:", tenant_id)
}

/// Levels sort ascending by level number.
pub fn level_key(level: u32) -> String {
    format!("{:06}", level)
}

pub fn badge_key(badge_id: &str) -> String {
    badge_id.to_string()
}

pub fn user_stats_key(user_id: &str) -> String {
    user_id.to_string()
}
