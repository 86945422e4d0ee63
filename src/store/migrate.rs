use crate::engine::types::{Badge, BadgeRequirementKind, Level};
use crate::store::{Store, StoreError};

const VERSION_KEY: &str = "_meta:version";

type MigrationFn = fn(&Store) -> Result<(), StoreError>;

fn migrations() -> Vec<(&'static str, MigrationFn)> {
    vec![
        ("001_initial", m001_initial),
        ("002_seed_level_catalog", m002_seed_level_catalog),
        ("003_seed_badge_catalog", m003_seed_badge_catalog),
    ]
}

/// 执行所有未应用的数据库迁移。
///
/// 迁移设计原则：
/// - **幂等性要求**：每个迁移函数必须是幂等的，重复执行不产生副作用。
///   迁移可能在 func() 成功但 set_version() 之前因进程崩溃而中断，
///   重启后会重新执行该迁移。
/// - **进度检查点**：版本号在每个迁移成功后立即持久化。
/// - **仅向前**：set_version 拒绝降级。
pub fn run(store: &Store) -> Result<(), StoreError> {
    let current = get_current_version(store)?;
    let all = migrations();

    for (index, (name, func)) in all.iter().enumerate() {
        let version = (index + 1) as u32;
        if version > current {
            tracing::info!(version, name, "Running migration");
            func(store)?;
            set_version(store, version)?;
            tracing::info!(version, name, "Migration complete");
        } else {
            tracing::debug!(version, name, "Migration already applied, skipping");
        }
    }

    Ok(())
}

pub fn get_current_version(store: &Store) -> Result<u32, StoreError> {
    match store.config_versions.get(VERSION_KEY.as_bytes())? {
        Some(raw) => {
            let bytes: [u8; 4] = raw.as_ref().try_into().unwrap_or([0; 4]);
            Ok(u32::from_be_bytes(bytes))
        }
        None => Ok(0),
    }
}

pub fn set_version(store: &Store, version: u32) -> Result<(), StoreError> {
    let current = get_current_version(store)?;
    if version < current {
        return Err(StoreError::Migration {
            version,
            message: format!("Refuse to downgrade from {} to {}", current, version),
        });
    }

    store
        .config_versions
        .insert(VERSION_KEY.as_bytes(), &version.to_be_bytes())?;
    Ok(())
}

fn m001_initial(_store: &Store) -> Result<(), StoreError> {
    Ok(())
}

/// Install the default points ladder. An operator-customized catalog is
/// never touched: the seed only runs against an empty tree.
fn m002_seed_level_catalog(store: &Store) -> Result<(), StoreError> {
    if !store.levels.is_empty() {
        return Ok(());
    }
    let defaults = [
        (1, "Novice", 0),
        (2, "Apprentice", 100),
        (3, "Pro", 500),
        (4, "Expert", 1_500),
        (5, "Master", 4_000),
    ];
    for (level, name, min_points) in defaults {
        store.put_level(&Level {
            level,
            name: name.to_string(),
            min_points,
        })?;
    }
    Ok(())
}

fn m003_seed_badge_catalog(store: &Store) -> Result<(), StoreError> {
    if !store.badges.is_empty() {
        return Ok(());
    }
    let defaults = [
        (
            "first-course",
            "First Course",
            "Complete your first course",
            BadgeRequirementKind::CoursesCompleted,
            1,
        ),
        (
            "course-collector",
            "Course Collector",
            "Complete five courses",
            BadgeRequirementKind::CoursesCompleted,
            5,
        ),
        (
            "week-streak",
            "Week Streak",
            "Learn seven days in a row",
            BadgeRequirementKind::StreakDays,
            7,
        ),
        (
            "month-streak",
            "Month Streak",
            "Learn thirty days in a row",
            BadgeRequirementKind::StreakDays,
            30,
        ),
        (
            "point-hunter",
            "Point Hunter",
            "Earn 1000 points",
            BadgeRequirementKind::PointsEarned,
            1_000,
        ),
        (
            "sharpshooter",
            "Sharpshooter",
            "Score 100% on a quiz",
            BadgeRequirementKind::PerfectScore,
            1,
        ),
        (
            "perfectionist",
            "Perfectionist",
            "Score 100% on ten quizzes",
            BadgeRequirementKind::PerfectScore,
            10,
        ),
    ];
    for (id, name, description, requirement_type, requirement_value) in defaults {
        store.put_badge(&Badge {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            requirement_type,
            requirement_value,
        })?;
    }
    Ok(())
}
