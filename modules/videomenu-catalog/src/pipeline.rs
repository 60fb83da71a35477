//! Ranking pipeline: turns a tag filter and the group order into an ordered
//! list of stages, and evaluates those stages over materialised positions.
//!
//! Ordering contract, ascending and stable:
//! 1. `group_index`: position of the group in the selected order list;
//!    groups missing from the list sort after every listed group
//! 2. `tag_match`: always 0 after the relevance filter, kept in the key
//! 3. `has_video`: 0 when the position has a playable video
//! 4. `has_gallery`: 0 when the position has a non-empty gallery URL
//! 5. `name`: byte-wise lexicographic

use std::cmp::Ordering;

use videomenu_common::{GroupOrderConfig, Position};

/// Sort keys understood by [`Stage::Sort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    GroupIndex,
    TagMatch,
    HasVideo,
    HasGallery,
    Name,
}

/// Full composite key, in priority order.
pub const RANKING_SORT: [SortKey; 5] = [
    SortKey::GroupIndex,
    SortKey::TagMatch,
    SortKey::HasVideo,
    SortKey::HasGallery,
    SortKey::Name,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    /// Keep enabled positions only.
    MatchEnabled,
    /// Compute ranking fields against the selected group order.
    Annotate {
        group_order: Vec<String>,
        tags: Vec<String>,
    },
    /// Keep positions whose `tag_match` is 0.
    MatchTagged,
    /// Stable ascending sort by the keys, highest priority first.
    Sort(Vec<SortKey>),
}

/// Ordering-only fields. Inverted flags (0 = present) so presence sorts first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RankingFields {
    pub group_index: usize,
    pub tag_match: u8,
    pub has_video: u8,
    pub has_gallery: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedPosition {
    pub position: Position,
    pub fields: RankingFields,
}

impl RankedPosition {
    fn unranked(position: Position) -> Self {
        Self {
            position,
            fields: RankingFields::default(),
        }
    }

    fn compare_by(&self, other: &Self, key: SortKey) -> Ordering {
        match key {
            SortKey::GroupIndex => self.fields.group_index.cmp(&other.fields.group_index),
            SortKey::TagMatch => self.fields.tag_match.cmp(&other.fields.tag_match),
            SortKey::HasVideo => self.fields.has_video.cmp(&other.fields.has_video),
            SortKey::HasGallery => self.fields.has_gallery.cmp(&other.fields.has_gallery),
            SortKey::Name => self.position.name.cmp(&other.position.name),
        }
    }

    /// Composite comparison over `keys`, first key wins.
    pub fn compare(&self, other: &Self, keys: &[SortKey]) -> Ordering {
        keys.iter()
            .map(|key| self.compare_by(other, *key))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

/// Per-position ranking fields. Pure; independent of every other position.
pub fn compute_ranking_fields(
    position: &Position,
    tags: &[String],
    group_order: &[String],
) -> RankingFields {
    let group_index = group_order
        .iter()
        .position(|g| *g == position.group_name)
        .unwrap_or(group_order.len());

    RankingFields {
        group_index,
        tag_match: flag(position.has_any_tag(tags)),
        has_video: flag(position.has_video()),
        has_gallery: flag(position.has_gallery()),
    }
}

fn flag(present: bool) -> u8 {
    if present {
        0
    } else {
        1
    }
}

/// An evaluable stage sequence for one tag filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    tags: Vec<String>,
    stages: Vec<Stage>,
}

impl Pipeline {
    /// Build the stage sequence for `tags` against `config`.
    ///
    /// The group order is the list of the first tag in `tags` that has a
    /// configured entry, else `main-menu`, else empty. An empty filter
    /// produces a pipeline that matches nothing.
    pub fn build(tags: &[String], config: &GroupOrderConfig) -> Self {
        let group_order = config.order_for(tags).to_vec();

        Self {
            tags: tags.to_vec(),
            stages: vec![
                Stage::MatchEnabled,
                Stage::Annotate {
                    group_order,
                    tags: tags.to_vec(),
                },
                Stage::MatchTagged,
                Stage::Sort(RANKING_SORT.to_vec()),
            ],
        }
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Evaluate every stage in order over `positions`.
    pub fn apply(&self, positions: Vec<Position>) -> Vec<RankedPosition> {
        let mut ranked: Vec<RankedPosition> =
            positions.into_iter().map(RankedPosition::unranked).collect();

        for stage in &self.stages {
            match stage {
                Stage::MatchEnabled => ranked.retain(|r| r.position.is_enabled()),
                Stage::Annotate { group_order, tags } => {
                    for r in &mut ranked {
                        r.fields = compute_ranking_fields(&r.position, tags, group_order);
                    }
                }
                Stage::MatchTagged => ranked.retain(|r| r.fields.tag_match == 0),
                Stage::Sort(keys) => ranked.sort_by(|a, b| a.compare(b, keys)),
            }
        }

        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use videomenu_common::PositionStatus;

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn position(id: &str, name: &str, group: &str, tag_list: &[&str]) -> Position {
        Position {
            id: id.to_string(),
            name: name.to_string(),
            group_name: group.to_string(),
            status: PositionStatus::Enabled,
            tags: tags(tag_list),
            ..Default::default()
        }
    }

    fn with_video(mut p: Position) -> Position {
        p.video_url_hevc = Some(format!("https://cdn/{}.mp4", p.id));
        p
    }

    fn with_gallery(mut p: Position) -> Position {
        p.gallery_urls = Some(vec![Some(format!("https://cdn/{}.jpg", p.id))]);
        p
    }

    fn config(entries: &[(&str, &[&str])]) -> GroupOrderConfig {
        GroupOrderConfig::new(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), tags(v)))
                .collect::<BTreeMap<_, _>>(),
        )
    }

    fn ids(ranked: &[RankedPosition]) -> Vec<&str> {
        ranked.iter().map(|r| r.position.id.as_str()).collect()
    }

    #[test]
    fn build_emits_stages_in_fixed_order() {
        let cfg = config(&[("promo", &["desserts", "mains"])]);
        let pipeline = Pipeline::build(&tags(&["promo"]), &cfg);
        assert_eq!(
            pipeline.stages(),
            &[
                Stage::MatchEnabled,
                Stage::Annotate {
                    group_order: tags(&["desserts", "mains"]),
                    tags: tags(&["promo"]),
                },
                Stage::MatchTagged,
                Stage::Sort(RANKING_SORT.to_vec()),
            ]
        );
    }

    #[test]
    fn build_selects_first_configured_filter_tag() {
        let cfg = config(&[("a", &["ga"]), ("b", &["gb"]), ("main-menu", &["gm"])]);
        let pipeline = Pipeline::build(&tags(&["x", "b", "a"]), &cfg);
        assert!(matches!(
            &pipeline.stages()[1],
            Stage::Annotate { group_order, .. } if *group_order == tags(&["gb"])
        ));

        let fallback = Pipeline::build(&tags(&["x"]), &cfg);
        assert!(matches!(
            &fallback.stages()[1],
            Stage::Annotate { group_order, .. } if *group_order == tags(&["gm"])
        ));
    }

    #[test]
    fn unlisted_group_index_is_order_length() {
        let p = position("1", "n", "drinks", &["promo"]);
        let fields = compute_ranking_fields(&p, &tags(&["promo"]), &tags(&["desserts", "mains"]));
        assert_eq!(fields.group_index, 2);

        let fields = compute_ranking_fields(&p, &tags(&["promo"]), &[]);
        assert_eq!(fields.group_index, 0);
    }

    #[test]
    fn flags_are_inverted() {
        let p = with_gallery(with_video(position("1", "n", "g", &["promo"])));
        let fields = compute_ranking_fields(&p, &tags(&["promo"]), &[]);
        assert_eq!(
            fields,
            RankingFields {
                group_index: 0,
                tag_match: 0,
                has_video: 0,
                has_gallery: 0
            }
        );

        let bare = position("2", "n", "g", &["other"]);
        let fields = compute_ranking_fields(&bare, &tags(&["promo"]), &[]);
        assert_eq!((fields.tag_match, fields.has_video, fields.has_gallery), (1, 1, 1));
    }

    #[test]
    fn apply_drops_disabled_and_untagged() {
        let mut disabled = position("2", "b", "g", &["promo"]);
        disabled.status = PositionStatus::Disabled;
        let positions = vec![
            position("1", "a", "g", &["promo"]),
            disabled,
            position("3", "c", "g", &["other"]),
        ];
        let pipeline = Pipeline::build(&tags(&["promo"]), &GroupOrderConfig::default());
        assert_eq!(ids(&pipeline.apply(positions)), vec!["1"]);
    }

    #[test]
    fn empty_filter_matches_nothing() {
        let positions = vec![position("1", "a", "g", &["promo"])];
        let pipeline = Pipeline::build(&[], &config(&[("promo", &["g"])]));
        assert!(pipeline.apply(positions).is_empty());
    }

    #[test]
    fn sorts_by_group_then_video_then_gallery_then_name() {
        let cfg = config(&[("promo", &["desserts", "mains"])]);
        let positions = vec![
            position("m-plain-b", "Borscht", "mains", &["promo"]),
            with_video(position("m-video-z", "Zrazy", "mains", &["promo"])),
            with_gallery(position("m-gallery", "Kotleta", "mains", &["promo"])),
            position("m-plain-a", "Alpha", "mains", &["promo"]),
            position("drink", "Uzvar", "drinks", &["promo"]),
            position("dessert", "Syrnyky", "desserts", &["promo"]),
        ];

        let ranked = Pipeline::build(&tags(&["promo"]), &cfg).apply(positions);
        assert_eq!(
            ids(&ranked),
            vec!["dessert", "m-video-z", "m-gallery", "m-plain-a", "m-plain-b", "drink"]
        );

        for pair in ranked.windows(2) {
            assert_ne!(pair[0].compare(&pair[1], &RANKING_SORT), Ordering::Greater);
        }
    }

    #[test]
    fn name_order_is_bytewise() {
        let positions = vec![
            position("lower", "apple", "g", &["t"]),
            position("upper", "Banana", "g", &["t"]),
        ];
        let ranked = Pipeline::build(&tags(&["t"]), &GroupOrderConfig::default()).apply(positions);
        assert_eq!(ids(&ranked), vec!["upper", "lower"]);
    }
}
