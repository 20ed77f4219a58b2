/// Outcome of taking an action.
///
/// Outcomes are values, not errors: `Denied`, `Deadlock` and `Failed` are
/// expected and feed back into the caller's decision logic.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ActionResult {
    /// The action was applied and the goal is not reached yet.
    InProgress,
    /// The action was applied and no further action is available.
    Failed,
    /// The action was applied and the goal conditions hold.
    Succeeded,
    /// The action led back to a state already visited in this episode.
    Deadlock,
    /// The action is not available in the current state; nothing changed.
    Denied,
}

impl ActionResult {
    /// Whether the episode cannot continue after this outcome.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Failed | Self::Succeeded | Self::Deadlock)
    }

    /// Outcomes that mark an action as one to avoid from its source state.
    pub const fn is_negative(self) -> bool {
        matches!(self, Self::Failed | Self::Deadlock | Self::Denied)
    }
}
