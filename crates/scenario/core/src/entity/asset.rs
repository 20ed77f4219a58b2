/// Where an asset's `uri` and `catalog` are resolved.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AssetSourceType {
    /// Content already present in the scene.
    Scene,
    /// Content shipped with the project.
    Project,
    /// Content fetched from outside the project.
    External,
    #[default]
    Undefined,
}

/// Reference to externally stored visual or physical content.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AssetData {
    pub source: AssetSourceType,
    pub catalog: String,
    pub asset_type: String,
    pub uri: String,
    pub part_id: String,
}

impl AssetData {
    pub fn new(source: AssetSourceType, uri: impl Into<String>) -> Self {
        Self {
            source,
            uri: uri.into(),
            ..Self::default()
        }
    }

    pub fn is_defined(&self) -> bool {
        self.source != AssetSourceType::Undefined
    }
}
