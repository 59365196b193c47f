use serde::Deserialize;

/// Optional bounds for the satisfaction score. Both default to unset,
/// in which case any integer is accepted.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct SatisfactionBounds {
    pub min: Option<i32>,
    pub max: Option<i32>,
}

impl SatisfactionBounds {
    pub fn contains(&self, value: i32) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    /// 0 means sessions never expire.
    pub session_ttl_minutes: i64,
    pub satisfaction: SatisfactionBounds,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let session_ttl_minutes = std::env::var("SESSION_TTL_MINUTES")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(0);
        let satisfaction = SatisfactionBounds {
            min: std::env::var("SATISFACTION_MIN")
                .ok()
                .and_then(|v| v.parse::<i32>().ok()),
            max: std::env::var("SATISFACTION_MAX")
                .ok()
                .and_then(|v| v.parse::<i32>().ok()),
        };
        Ok(Self {
            database_url,
            session_ttl_minutes,
            satisfaction,
        })
    }

    pub fn session_ttl(&self) -> Option<time::Duration> {
        (self.session_ttl_minutes > 0).then(|| time::Duration::minutes(self.session_ttl_minutes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_bounds_accept_anything() {
        let bounds = SatisfactionBounds::default();
        assert!(bounds.contains(i32::MIN));
        assert!(bounds.contains(0));
        assert!(bounds.contains(i32::MAX));
    }

    #[test]
    fn configured_bounds_are_inclusive() {
        let bounds = SatisfactionBounds {
            min: Some(1),
            max: Some(5),
        };
        assert!(bounds.contains(1));
        assert!(bounds.contains(5));
        assert!(!bounds.contains(0));
        assert!(!bounds.contains(6));
    }
}
