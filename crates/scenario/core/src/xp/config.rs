/// Tunables of the experience engine.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct XpConfig {
    /// Report `Deadlock` when an action leads back to a visited state.
    pub deadlock_detection: bool,
    /// Upper bound on actions per training episode.
    pub max_episode_steps: u32,
}

impl XpConfig {
    pub const DEFAULT_MAX_EPISODE_STEPS: u32 = 256;

    pub fn new() -> Self {
        Self {
            deadlock_detection: false,
            max_episode_steps: Self::DEFAULT_MAX_EPISODE_STEPS,
        }
    }

    pub fn with_deadlock_detection(mut self, enabled: bool) -> Self {
        self.deadlock_detection = enabled;
        self
    }

    pub fn with_max_episode_steps(mut self, steps: u32) -> Self {
        self.max_episode_steps = steps;
        self
    }
}

impl Default for XpConfig {
    fn default() -> Self {
        Self::new()
    }
}
