use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tag whose group order applies when no requested tag is configured.
pub const DEFAULT_MENU_TAG: &str = "main-menu";

/// Marker that identifies a playable video asset in `videoUrlHevc`.
pub const VIDEO_FILE_MARKER: &str = ".mp4";

// --- Positions ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionStatus {
    Enabled,
    #[default]
    Disabled,
    /// Any status string this service does not recognise. Never ranked.
    #[serde(other)]
    Unknown,
}

/// A single menu catalog entry.
///
/// Structured catalog metadata (prices, nutrition, modifiers, add-ons,
/// preparation time, availability...) is carried through untouched as JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub group_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub prices: Option<Value>,
    #[serde(default)]
    pub unit_of_measure: Option<String>,
    #[serde(default)]
    pub uses_fractional_quantity: Option<bool>,
    #[serde(default)]
    pub status: PositionStatus,
    #[serde(default)]
    pub content_advisories: Option<Value>,
    #[serde(default)]
    pub spice_level: Option<Value>,
    #[serde(default)]
    pub nutrition_info: Option<Value>,
    #[serde(default)]
    pub image_urls: Option<Value>,
    #[serde(default)]
    pub video_url_hevc: Option<String>,
    #[serde(default)]
    pub url_poster_prev_video: Option<String>,
    #[serde(default)]
    pub modifier_groups: Option<Value>,
    #[serde(default)]
    pub addons: Option<Value>,
    #[serde(default)]
    pub preparation_time: Option<Value>,
    #[serde(default)]
    pub availability: Option<Value>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub dietary_labels: Option<Value>,
    #[serde(default)]
    pub gallery_urls: Option<Vec<Option<String>>>,
}

impl Position {
    pub fn is_enabled(&self) -> bool {
        self.status == PositionStatus::Enabled
    }

    /// True when the video URL points at a playable video file.
    pub fn has_video(&self) -> bool {
        self.video_url_hevc
            .as_deref()
            .is_some_and(|url| url.contains(VIDEO_FILE_MARKER))
    }

    /// True when at least one gallery URL is present and non-empty.
    pub fn has_gallery(&self) -> bool {
        self.gallery_urls
            .as_ref()
            .is_some_and(|urls| urls.iter().flatten().any(|u| !u.is_empty()))
    }

    /// Eligible for the random video discovery strip.
    pub fn has_video_preview(&self) -> bool {
        let non_empty = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        self.is_enabled() && non_empty(&self.video_url_hevc) && non_empty(&self.url_poster_prev_video)
    }

    pub fn has_any_tag(&self, tags: &[String]) -> bool {
        self.tags.iter().any(|t| tags.contains(t))
    }
}

/// Positions sharing a group name, in ranking order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionGroup {
    pub group_name: String,
    pub group_index: usize,
    pub items: Vec<Position>,
}

/// One sampled position for a configured tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomVideoGroup {
    pub tag: String,
    pub item: Position,
}

// --- Group order configuration ---

/// Externally administered display order: tag -> ordered group names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupOrderConfig {
    pub group_order: BTreeMap<String, Vec<String>>,
}

impl GroupOrderConfig {
    pub fn new(group_order: BTreeMap<String, Vec<String>>) -> Self {
        Self { group_order }
    }

    /// Order list for the first tag in `tags` that is configured, falling
    /// back to `main-menu`, then to an empty list.
    pub fn order_for(&self, tags: &[String]) -> &[String] {
        tags.iter()
            .find_map(|tag| self.group_order.get(tag))
            .or_else(|| self.group_order.get(DEFAULT_MENU_TAG))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Configured tags in key order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.group_order.keys().map(String::as_str)
    }
}

impl Default for GroupOrderConfig {
    fn default() -> Self {
        Self::new(BTreeMap::from([(DEFAULT_MENU_TAG.to_string(), Vec::new())]))
    }
}
