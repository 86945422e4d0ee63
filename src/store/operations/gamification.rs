use crate::engine::types::{Badge, Level, UserStats};
use crate::store::keys;
use crate::store::{Store, StoreError};

impl Store {
    /// The level catalog, ascending by `min_points` (key order). An empty
    /// result is surfaced to callers as a configuration error by the
    /// engine; the store never substitutes defaults.
    pub fn list_levels(&self) -> Result<Vec<Level>, StoreError> {
        let mut levels = Vec::new();
        for item in self.levels.iter() {
            let (_, value) = item?;
            levels.push(Self::deserialize::<Level>(&value)?);
        }
        levels.sort_by_key(|l| l.min_points);
        Ok(levels)
    }

    pub fn put_level(&self, level: &Level) -> Result<(), StoreError> {
        self.levels
            .insert(keys::level_key(level.level).as_bytes(), Self::serialize(level)?)?;
        Ok(())
    }

    pub fn list_badges(&self) -> Result<Vec<Badge>, StoreError> {
        let mut badges = Vec::new();
        for item in self.badges.iter() {
            let (_, value) = item?;
            badges.push(Self::deserialize::<Badge>(&value)?);
        }
        badges.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(badges)
    }

    pub fn put_badge(&self, badge: &Badge) -> Result<(), StoreError> {
        self.badges
            .insert(keys::badge_key(&badge.id).as_bytes(), Self::serialize(badge)?)?;
        Ok(())
    }

    /// Counters default to zero for users with no recorded activity.
    pub fn get_user_stats(&self, user_id: &str) -> Result<UserStats, StoreError> {
        match self.user_stats.get(keys::user_stats_key(user_id).as_bytes())? {
            Some(raw) => Self::deserialize(&raw),
            None => Ok(UserStats::default()),
        }
    }

    pub fn save_user_stats(&self, user_id: &str, stats: &UserStats) -> Result<(), StoreError> {
        self.user_stats
            .insert(keys::user_stats_key(user_id).as_bytes(), Self::serialize(stats)?)?;
        Ok(())
    }
}
