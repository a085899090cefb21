/// Tree holding every persisted value of the local profile.
pub const APP_STATE_TREE: &str = "app_state";

/// Logged-in identity, `{ "name": ... }`.
pub const USER_KEY: &str = "voca_user";

/// Unit id -> stage flags.
pub const PROGRESS_KEY: &str = "voca_progress";

/// Unit id -> repetition counter.
pub const STATS_KEY: &str = "voca_stats";

pub const HEALTH_PROBE_KEY: &str = "__health_check__";
