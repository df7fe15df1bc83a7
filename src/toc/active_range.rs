//! Which headings the reader is currently looking at.

/// Inclusive index range of headings whose sections intersect the visible band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActiveRange {
    pub start_idx: usize,
    pub end_idx: usize,
}

impl ActiveRange {
    pub fn contains(&self, index: usize) -> bool {
        index >= self.start_idx && index <= self.end_idx
    }
}

/// Resolve the active range from heading tops (ascending, same coordinate
/// frame as the band).
///
/// The start is the last heading at or above `visible_top`, so a long section
/// stays active while its heading is scrolled away. The end is the last
/// heading at or above `visible_bottom`. Both fall back to index 0.
pub fn resolve_active_range(tops: &[f32], visible_top: f32, visible_bottom: f32) -> ActiveRange {
    if tops.is_empty() {
        return ActiveRange::default();
    }
    let last = tops.len() - 1;
    let start = tops.partition_point(|t| *t <= visible_top).saturating_sub(1).min(last);
    let end = tops
        .partition_point(|t| *t <= visible_bottom)
        .saturating_sub(1)
        .clamp(start, last);

    ActiveRange {
        start_idx: start,
        end_idx: end,
    }
}
