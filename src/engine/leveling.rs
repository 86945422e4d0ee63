//! Leveling: maps cumulative points onto an ordered level catalog.

use crate::engine::types::{Level, LevelInfo};
use crate::engine::EngineError;

/// Resolve the current level, the next level (if any) and the progress
/// through the current level's range for a points total.
///
/// The catalog must be non-empty and strictly ascending by `min_points`;
/// anything else is a configuration error, never silently defaulted.
pub fn level_info(points: u64, levels: &[Level]) -> Result<LevelInfo, EngineError> {
    if levels.is_empty() {
        return Err(EngineError::Configuration(
            "level catalog is empty; at least level 0 must exist".to_string(),
        ));
    }
    for pair in levels.windows(2) {
        if pair[1].min_points <= pair[0].min_points {
            return Err(EngineError::Configuration(format!(
                "level catalog is not strictly ascending at level {}",
                pair[1].level
            )));
        }
    }

    let mut current_index = 0;
    for (i, level) in levels.iter().enumerate() {
        if level.min_points <= points {
            current_index = i;
        } else {
            break;
        }
    }

    let current_level = levels[current_index].clone();
    let next_level = levels.get(current_index + 1).cloned();

    let progress_percent = match &next_level {
        Some(next) => {
            let span = (next.min_points - current_level.min_points) as f64;
            let gained = points.saturating_sub(current_level.min_points) as f64;
            (100.0 * gained / span).clamp(0.0, 100.0)
        }
        // Last level: the range is unbounded above
        None => 100.0,
    };

    Ok(LevelInfo {
        current_level,
        next_level,
        progress_percent,
    })
}
