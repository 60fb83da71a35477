use async_graphql::{Enum, Json, SimpleObject, ID};
use serde_json::Value;

use videomenu_common::{Position, PositionGroup, PositionStatus, RandomVideoGroup};

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
#[graphql(name = "PositionStatus")]
pub enum GqlPositionStatus {
    Enabled,
    Disabled,
    Unknown,
}

impl From<PositionStatus> for GqlPositionStatus {
    fn from(s: PositionStatus) -> Self {
        match s {
            PositionStatus::Enabled => GqlPositionStatus::Enabled,
            PositionStatus::Disabled => GqlPositionStatus::Disabled,
            PositionStatus::Unknown => GqlPositionStatus::Unknown,
        }
    }
}

#[derive(SimpleObject, Clone)]
#[graphql(name = "Position")]
pub struct GqlPosition {
    pub id: ID,
    pub name: String,
    pub group_name: String,
    pub description: Option<String>,
    pub prices: Option<Json<Value>>,
    pub unit_of_measure: Option<String>,
    pub uses_fractional_quantity: Option<bool>,
    pub status: GqlPositionStatus,
    pub content_advisories: Option<Json<Value>>,
    pub spice_level: Option<Json<Value>>,
    pub nutrition_info: Option<Json<Value>>,
    pub image_urls: Option<Json<Value>>,
    pub video_url_hevc: Option<String>,
    pub url_poster_prev_video: Option<String>,
    pub modifier_groups: Option<Json<Value>>,
    pub addons: Option<Json<Value>>,
    pub preparation_time: Option<Json<Value>>,
    pub availability: Option<Json<Value>>,
    pub tags: Vec<String>,
    pub dietary_labels: Option<Json<Value>>,
    pub gallery_urls: Option<Vec<Option<String>>>,
}

impl From<Position> for GqlPosition {
    fn from(p: Position) -> Self {
        Self {
            id: ID(p.id),
            name: p.name,
            group_name: p.group_name,
            description: p.description,
            prices: p.prices.map(Json),
            unit_of_measure: p.unit_of_measure,
            uses_fractional_quantity: p.uses_fractional_quantity,
            status: p.status.into(),
            content_advisories: p.content_advisories.map(Json),
            spice_level: p.spice_level.map(Json),
            nutrition_info: p.nutrition_info.map(Json),
            image_urls: p.image_urls.map(Json),
            video_url_hevc: p.video_url_hevc,
            url_poster_prev_video: p.url_poster_prev_video,
            modifier_groups: p.modifier_groups.map(Json),
            addons: p.addons.map(Json),
            preparation_time: p.preparation_time.map(Json),
            availability: p.availability.map(Json),
            tags: p.tags,
            dietary_labels: p.dietary_labels.map(Json),
            gallery_urls: p.gallery_urls,
        }
    }
}

#[derive(SimpleObject, Clone)]
#[graphql(name = "PositionGroup")]
pub struct GqlPositionGroup {
    pub group_name: String,
    pub group_index: i32,
    pub items: Vec<GqlPosition>,
}

impl From<PositionGroup> for GqlPositionGroup {
    fn from(g: PositionGroup) -> Self {
        Self {
            group_name: g.group_name,
            // Bounded by the configured group list length.
            group_index: i32::try_from(g.group_index).unwrap_or(i32::MAX),
            items: g.items.into_iter().map(GqlPosition::from).collect(),
        }
    }
}

/// A configured tag with its sampled video position.
#[derive(SimpleObject, Clone)]
#[graphql(name = "RandomVideoGroup")]
pub struct GqlRandomVideoGroup {
    pub tag: String,
    pub items: Vec<GqlPosition>,
}

impl From<RandomVideoGroup> for GqlRandomVideoGroup {
    fn from(g: RandomVideoGroup) -> Self {
        Self {
            tag: g.tag,
            items: vec![GqlPosition::from(g.item)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_index_converts_and_saturates() {
        let group = |group_index| PositionGroup {
            group_name: "mains".to_string(),
            group_index,
            items: vec![Position::default()],
        };
        assert_eq!(GqlPositionGroup::from(group(3)).group_index, 3);
        assert_eq!(GqlPositionGroup::from(group(usize::MAX)).group_index, i32::MAX);
    }
}
