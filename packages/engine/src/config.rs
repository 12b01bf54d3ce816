use serde::Deserialize;

/// Tunables for the economy and contest engine.
#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    /// Entry fee debited on contest registration, in coins. Default: 100.
    #[serde(default = "default_entry_fee")]
    pub entry_fee: i64,
    /// Share of each entry fee retained by the platform. Default: 0.2.
    #[serde(default = "default_platform_commission")]
    pub platform_commission: f64,
    /// Pool size at which prize tiers switch to straight percentages. Default: 5000.
    #[serde(default = "default_target_prize_pool")]
    pub target_prize_pool: i64,
    /// Participant cap applied to newly created contests. Default: 1000.
    #[serde(default = "default_max_participants")]
    pub max_participants: u32,
    /// Length of the registration window for new contests, in days. Default: 7.
    #[serde(default = "default_registration_days")]
    pub registration_days: i64,
}

fn default_entry_fee() -> i64 {
    100
}
fn default_platform_commission() -> f64 {
    0.2
}
fn default_target_prize_pool() -> i64 {
    5000
}
fn default_max_participants() -> u32 {
    1000
}
fn default_registration_days() -> i64 {
    7
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            entry_fee: default_entry_fee(),
            platform_commission: default_platform_commission(),
            target_prize_pool: default_target_prize_pool(),
            max_participants: default_max_participants(),
            registration_days: default_registration_days(),
        }
    }
}
