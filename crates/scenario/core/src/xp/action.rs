use core::fmt;

/// Stateless command descriptor: an action identifier and its ordered
/// parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionData {
    pub action_id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub params: Vec<String>,
}

impl ActionData {
    pub fn new<I, S>(action_id: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            action_id: action_id.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for ActionData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.action_id, self.params.join(", "))
    }
}
