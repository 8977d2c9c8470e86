//! Painter's-algorithm ordering.
//!
//! Keys are recomputed by the caller every frame and sorted from scratch;
//! nothing is cached between frames, so a drawable can jump anywhere in
//! the order from one frame to the next.

use std::cmp::Ordering;

/// A drawable handle with this frame's key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderEntry<H> {
    pub handle: H,
    /// Ascending key: smaller draws first (further back).
    pub key: f32,
    /// Creation order, used to break ties.
    pub sequence: u64,
}

impl<H> OrderEntry<H> {
    pub fn new(handle: H, key: f32, sequence: u64) -> Self {
        Self { handle, key, sequence }
    }
}

/// Compares by key, then by creation order. NaN keys sort last.
pub fn compare_entries<H>(a: &OrderEntry<H>, b: &OrderEntry<H>) -> Ordering {
    a.key
        .total_cmp(&b.key)
        .then_with(|| a.sequence.cmp(&b.sequence))
}

/// Sorts `entries` in place into back-to-front draw order.
pub fn sort_entries<H>(entries: &mut [OrderEntry<H>]) {
    entries.sort_by(compare_entries);
}

/// Returns handles in back-to-front draw order. O(n log n).
pub fn render_order<H: Copy>(entries: impl IntoIterator<Item = OrderEntry<H>>) -> Vec<H> {
    let mut entries: Vec<OrderEntry<H>> = entries.into_iter().collect();
    sort_entries(&mut entries);
    entries.into_iter().map(|e| e.handle).collect()
}
