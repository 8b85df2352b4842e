use crate::game::constants::{lobby, rewards, session, tick};

/// Minigame configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinigameConfig {
    /// Milliseconds per world tick
    pub tick_interval_ms: u64,
    /// Ticks a boat waits once enough players are aboard
    pub boat_wait_ticks: u32,
    /// Players needed aboard before the wait counter runs
    pub min_players: usize,
    /// Most players moved onto the island by one launch
    pub max_players_per_launch: usize,
    /// Length of an armed session in ticks
    pub game_duration_ticks: i32,
    /// Damage above which a winner earns the elevated reward
    pub damage_threshold: i64,
    /// Port for the metrics endpoint
    pub metrics_port: u16,
    /// Stop after this many ticks (0 = run until shutdown)
    pub max_ticks: u64,
    /// Simulated players queued on the novice boat at startup
    pub demo_players: usize,
}

impl Default for MinigameConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: tick::TICK_INTERVAL_MS,
            boat_wait_ticks: lobby::DEFAULT_BOAT_WAITING_TICKS,
            min_players: lobby::MIN_PLAYERS,
            max_players_per_launch: lobby::MAX_PLAYERS_PER_LAUNCH,
            game_duration_ticks: session::GAME_DURATION_TICKS,
            damage_threshold: rewards::DAMAGE_THRESHOLD,
            metrics_port: 9090,
            max_ticks: 0,
            demo_players: 0,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!("Invalid {} '{}', using default", key, raw);
            None
        }
    }
}

impl MinigameConfig {
    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        let mut config = Self::default();

        if let Some(ms) = env_parse::<u64>("TICK_INTERVAL_MS") {
            if ms > 0 {
                config.tick_interval_ms = ms;
            } else {
                tracing::warn!("TICK_INTERVAL_MS must be > 0, using default");
            }
        }

        if let Some(ticks) = env_parse::<u32>("BOAT_WAIT_TICKS") {
            if ticks > 0 {
                config.boat_wait_ticks = ticks;
            } else {
                tracing::warn!("BOAT_WAIT_TICKS must be > 0, using default");
            }
        }

        if let Some(min) = env_parse::<usize>("MIN_PLAYERS") {
            if min >= 2 {
                config.min_players = min;
            } else {
                tracing::warn!("MIN_PLAYERS must be at least 2, using default");
            }
        }

        if let Some(max) = env_parse::<usize>("MAX_PLAYERS_PER_LAUNCH") {
            if (1..=100).contains(&max) {
                config.max_players_per_launch = max;
            } else {
                tracing::warn!("MAX_PLAYERS_PER_LAUNCH must be 1-100, using default");
            }
        }

        if let Some(ticks) = env_parse::<i32>("GAME_DURATION_TICKS") {
            if ticks > 0 {
                config.game_duration_ticks = ticks;
            } else {
                tracing::warn!("GAME_DURATION_TICKS must be > 0, using default");
            }
        }

        if let Some(threshold) = env_parse::<i64>("DAMAGE_THRESHOLD") {
            config.damage_threshold = threshold;
        }

        if let Some(port) = env_parse::<u16>("METRICS_PORT") {
            config.metrics_port = port;
        }

        if let Some(max_ticks) = env_parse::<u64>("MAX_TICKS") {
            config.max_ticks = max_ticks;
        }

        if let Some(demo) = env_parse::<usize>("DEMO_PLAYERS") {
            config.demo_players = demo;
        }

        config
    }

    /// Players a boat needs before its counter runs. Never below two.
    pub fn launch_min_players(&self) -> usize {
        self.min_players.max(lobby::MIN_PLAYERS)
    }

    /// Cap on players moved by one launch. Never below one.
    pub fn launch_max_players(&self) -> usize {
        self.max_players_per_launch.max(1)
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), String> {
        if self.tick_interval_ms == 0 {
            return Err("tick_interval_ms must be at least 1".to_string());
        }
        if self.boat_wait_ticks == 0 {
            return Err("boat_wait_ticks must be at least 1".to_string());
        }
        if self.min_players < 2 {
            return Err("min_players must be at least 2".to_string());
        }
        if self.max_players_per_launch == 0 {
            return Err("max_players_per_launch must be at least 1".to_string());
        }
        if self.game_duration_ticks <= 0 {
            return Err("game_duration_ticks must be positive".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MinigameConfig::default();
        assert_eq!(config.boat_wait_ticks, 60);
        assert_eq!(config.min_players, 2);
        assert_eq!(config.max_players_per_launch, 25);
        assert_eq!(config.damage_threshold, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_or_default() {
        let config = MinigameConfig::load_or_default();
        assert!(config.tick_interval_ms > 0);
        assert!(config.min_players >= 2);
    }

    #[test]
    fn test_validate_rejects_solo_launch() {
        let config = MinigameConfig {
            min_players: 1,
            ..MinigameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_launch_limits_clamped() {
        let config = MinigameConfig {
            min_players: 1,
            max_players_per_launch: 0,
            ..MinigameConfig::default()
        };
        assert_eq!(config.launch_min_players(), 2);
        assert_eq!(config.launch_max_players(), 1);

        let config = MinigameConfig {
            min_players: 5,
            ..MinigameConfig::default()
        };
        assert_eq!(config.launch_min_players(), 5);
    }

    #[test]
    fn test_validate_rejects_zero_wait() {
        let config = MinigameConfig {
            boat_wait_ticks: 0,
            ..MinigameConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
