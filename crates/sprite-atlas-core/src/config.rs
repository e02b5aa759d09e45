use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// MaxRects placement heuristics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MaxRectsHeuristic {
    BestAreaFit,
    BestShortSideFit,
    BestLongSideFit,
    BottomLeft,
    ContactPoint,
}

impl FromStr for MaxRectsHeuristic {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "baf" | "bestareafit" => Ok(Self::BestAreaFit),
            "bssf" | "bestshortsidefit" => Ok(Self::BestShortSideFit),
            "blsf" | "bestlongsidefit" => Ok(Self::BestLongSideFit),
            "bl" | "bottomleft" => Ok(Self::BottomLeft),
            "cp" | "contactpoint" => Ok(Self::ContactPoint),
            _ => Err(()),
        }
    }
}

/// What to do with a source image that has no opaque pixel when cropping is on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransparentPolicy {
    /// Drop the image from the atlas and log a warning.
    #[default]
    Skip,
    /// Store a single transparent pixel at offset (0,0).
    OneByOne,
    /// Store the image uncropped.
    Keep,
}

impl FromStr for TransparentPolicy {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "one_by_one" | "1x1" => Ok(Self::OneByOne),
            "keep" => Ok(Self::Keep),
            _ => Err(()),
        }
    }
}

/// Metadata flavours understood by `write_outputs`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MetadataFormat {
    /// Apple plist (format 2), `<name>.plist`.
    #[default]
    Plist,
    /// JSON hash with the same keys, `<name>.json`.
    Json,
}

impl MetadataFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Plist => "plist",
            Self::Json => "json",
        }
    }
}

impl FromStr for MetadataFormat {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plist" => Ok(Self::Plist),
            "json" | "json-hash" => Ok(Self::Json),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtlasConfig {
    /// Base name of the output files (`<name>.png`, `<name>.plist`).
    #[serde(default = "default_output_name")]
    pub output_name: String,
    /// Crop transparent borders (alpha == 0) before packing.
    #[serde(default)]
    pub crop: bool,
    /// Allow 90° rotations where the heuristic prefers them.
    #[serde(default = "default_allow_rotation")]
    pub allow_rotation: bool,
    /// First canvas side tried; doubled after every failed attempt.
    #[serde(default = "default_initial_size")]
    pub initial_size: u32,
    /// Largest canvas side allowed. None means growth is unbounded.
    #[serde(default)]
    pub max_size: Option<u32>,
    #[serde(default = "default_heuristic")]
    pub heuristic: MaxRectsHeuristic,
    #[serde(default)]
    pub transparent_policy: TransparentPolicy,
    #[serde(default)]
    pub metadata: MetadataFormat,
    /// Crop images in parallel when feature "parallel" is on.
    #[serde(default)]
    pub parallel: bool,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            output_name: default_output_name(),
            crop: false,
            allow_rotation: default_allow_rotation(),
            initial_size: default_initial_size(),
            max_size: None,
            heuristic: default_heuristic(),
            transparent_policy: TransparentPolicy::default(),
            metadata: MetadataFormat::default(),
            parallel: false,
        }
    }
}

impl AtlasConfig {
    /// Validates the configuration parameters.
    ///
    /// Returns an error if:
    /// - the output name is empty
    /// - `initial_size` is zero or not a power of two
    /// - `max_size` is smaller than `initial_size`
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::AtlasError;

        if self.output_name.trim().is_empty() {
            return Err(AtlasError::InvalidConfig("output_name must not be empty".into()));
        }
        if !self.initial_size.is_power_of_two() {
            return Err(AtlasError::InvalidConfig(format!(
                "initial_size ({}) must be a non-zero power of two",
                self.initial_size
            )));
        }
        if let Some(max) = self.max_size {
            if max < self.initial_size {
                return Err(AtlasError::InvalidConfig(format!(
                    "max_size ({}) is smaller than initial_size ({})",
                    max, self.initial_size
                )));
            }
        }
        Ok(())
    }

    /// Canvas image file name, e.g. `map.png`.
    pub fn texture_file_name(&self) -> String {
        format!("{}.png", self.output_name)
    }

    /// Metadata file name, e.g. `map.plist`.
    pub fn metadata_file_name(&self) -> String {
        format!("{}.{}", self.output_name, self.metadata.extension())
    }

    /// Create a fluent builder for `AtlasConfig`.
    pub fn builder() -> AtlasConfigBuilder {
        AtlasConfigBuilder::new()
    }
}

fn default_output_name() -> String {
    "map".into()
}
fn default_allow_rotation() -> bool {
    true
}
fn default_initial_size() -> u32 {
    2
}
fn default_heuristic() -> MaxRectsHeuristic {
    MaxRectsHeuristic::BestAreaFit
}

/// Builder for `AtlasConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct AtlasConfigBuilder {
    cfg: AtlasConfig,
}

impl AtlasConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: AtlasConfig::default(),
        }
    }
    pub fn output_name(mut self, v: impl Into<String>) -> Self {
        self.cfg.output_name = v.into();
        self
    }
    pub fn crop(mut self, v: bool) -> Self {
        self.cfg.crop = v;
        self
    }
    pub fn allow_rotation(mut self, v: bool) -> Self {
        self.cfg.allow_rotation = v;
        self
    }
    pub fn initial_size(mut self, v: u32) -> Self {
        self.cfg.initial_size = v;
        self
    }
    pub fn max_size(mut self, v: Option<u32>) -> Self {
        self.cfg.max_size = v;
        self
    }
    pub fn heuristic(mut self, v: MaxRectsHeuristic) -> Self {
        self.cfg.heuristic = v;
        self
    }
    pub fn transparent_policy(mut self, v: TransparentPolicy) -> Self {
        self.cfg.transparent_policy = v;
        self
    }
    pub fn metadata(mut self, v: MetadataFormat) -> Self {
        self.cfg.metadata = v;
        self
    }
    pub fn parallel(mut self, v: bool) -> Self {
        self.cfg.parallel = v;
        self
    }
    pub fn build(self) -> AtlasConfig {
        self.cfg
    }
}
