// Result shapers over ranked pipeline output.

use videomenu_common::{MenuError, Position, PositionGroup};

use crate::pipeline::RankedPosition;

/// Positions on each side of the target in a slider window.
pub const SLIDER_RADIUS: usize = 2;

/// Split ranked positions into contiguous runs of the same group name.
///
/// Items keep pipeline order; each group keeps the index of its first item.
/// Groups come out by index, ties in first-seen order, so concatenating the
/// groups reproduces the flat order.
pub fn group(ranked: Vec<RankedPosition>) -> Vec<PositionGroup> {
    let mut groups: Vec<PositionGroup> = Vec::new();

    for RankedPosition { position, fields } in ranked {
        if let Some(current) = groups
            .last_mut()
            .filter(|g| g.group_name == position.group_name)
        {
            current.items.push(position);
            continue;
        }
        groups.push(PositionGroup {
            group_name: position.group_name.clone(),
            group_index: fields.group_index,
            items: vec![position],
        });
    }

    groups.sort_by_key(|g| g.group_index);
    groups
}

/// The pipeline's flat order, ranking fields dropped.
pub fn flatten(ranked: Vec<RankedPosition>) -> Vec<Position> {
    ranked.into_iter().map(|r| r.position).collect()
}

/// Up to two positions either side of `target_id`, clamped to the bounds.
pub fn window_around<'a>(flat: &'a [Position], target_id: &str) -> Result<&'a [Position], MenuError> {
    let idx = flat
        .iter()
        .position(|p| p.id == target_id)
        .ok_or_else(|| MenuError::NotFound(target_id.to_string()))?;

    let start = idx.saturating_sub(SLIDER_RADIUS);
    let end = (idx + SLIDER_RADIUS + 1).min(flat.len());
    Ok(&flat[start..end])
}
