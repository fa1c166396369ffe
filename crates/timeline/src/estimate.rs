use wb_dialogue::DialogueItem;

/// Stand-in clip length when neither a probe nor a stored duration is usable.
pub const DEFAULT_CLIP_SECS: f64 = 2.0;

/// Per-line duration estimates, one per item, in item order.
///
/// A probed value wins when it is positive and finite, then the duration
/// recorded at synthesis time, then [`DEFAULT_CLIP_SECS`]. `probed` may be
/// shorter than `items` (or empty while probing is still in flight).
pub fn resolve_estimates(items: &[DialogueItem], probed: &[f64]) -> Vec<f64> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            probed
                .get(i)
                .copied()
                .filter(|secs| secs.is_finite() && *secs > 0.0)
                .or_else(|| item.stored_duration_secs())
                .unwrap_or(DEFAULT_CLIP_SECS)
        })
        .collect()
}
