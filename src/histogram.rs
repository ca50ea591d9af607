//! Exact-color histogram and bounded top-K selection.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};

use crate::color::pack_rgb;

/// Occurrences of one exact RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorCount {
    pub key: u32,
    pub count: u64,
}

impl ColorCount {
    /// Higher counts rank first; among equal counts the lower key wins.
    fn rank(&self) -> (u64, Reverse<u32>) {
        (self.count, Reverse(self.key))
    }
}

impl Ord for ColorCount {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for ColorCount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Default)]
pub struct ColorHistogram {
    counts: HashMap<u32, u64>,
    considered: u64,
}

impl ColorHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every non-transparent pixel of an RGBA run.
    pub fn record(&mut self, rgba: &[u8]) {
        for px in rgba.chunks_exact(4) {
            if px[3] == 0 {
                continue;
            }
            *self.counts.entry(pack_rgb(px[0], px[1], px[2])).or_insert(0) += 1;
            self.considered += 1;
        }
    }

    /// Non-transparent pixels seen so far.
    pub fn considered(&self) -> u64 {
        self.considered
    }

    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    pub fn count(&self, key: u32) -> u64 {
        self.counts.get(&key).copied().unwrap_or(0)
    }

    /// The `k` most frequent colors, most frequent first.
    pub fn top(self, k: usize) -> Vec<ColorCount> {
        let len = self.counts.len();
        top_k(
            self.counts
                .into_iter()
                .map(|(key, count)| ColorCount { key, count }),
            len,
            k,
        )
    }
}

/// Select the `k` highest-ranked entries out of `len` without sorting them all.
///
/// A min-heap of at most `k` entries holds the current winners; its root is
/// the weakest and is evicted whenever a stronger entry turns up. When `k`
/// covers every entry the heap is skipped and everything is sorted.
pub fn top_k<I>(entries: I, len: usize, k: usize) -> Vec<ColorCount>
where
    I: IntoIterator<Item = ColorCount>,
{
    if k >= len {
        let mut all: Vec<ColorCount> = entries.into_iter().collect();
        all.sort_unstable_by(|a, b| b.cmp(a));
        return all;
    }
    if k == 0 {
        return Vec::new();
    }

    let mut heap: BinaryHeap<Reverse<ColorCount>> = BinaryHeap::with_capacity(k);
    for entry in entries {
        if heap.len() < k {
            heap.push(Reverse(entry));
            continue;
        }
        if let Some(mut weakest) = heap.peek_mut() {
            if entry > weakest.0 {
                *weakest = Reverse(entry);
            }
        }
    }

    // Ascending order of `Reverse<_>` is descending rank.
    heap.into_sorted_vec().into_iter().map(|Reverse(c)| c).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cc(key: u32, count: u64) -> ColorCount {
        ColorCount { key, count }
    }

    #[test]
    fn skips_transparent_pixels() {
        let mut hist = ColorHistogram::new();
        hist.record(&[255, 0, 0, 255, 255, 0, 0, 1, 0, 0, 255, 0, 9, 9, 9, 0]);
        assert_eq!(hist.considered(), 2);
        assert_eq!(hist.distinct(), 1);
        assert_eq!(hist.count(0xff0000), 2);
        assert_eq!(hist.count(0x0000ff), 0);
    }

    #[test]
    fn top_k_keeps_most_frequent() {
        let entries = vec![cc(1, 5), cc(2, 50), cc(3, 1), cc(4, 20), cc(5, 7)];
        let top = top_k(entries, 5, 2);
        assert_eq!(top, vec![cc(2, 50), cc(4, 20)]);
    }

    #[test]
    fn top_k_sorts_everything_when_k_covers_all() {
        let entries = vec![cc(9, 1), cc(3, 4), cc(7, 4)];
        let top = top_k(entries, 3, 10);
        assert_eq!(top, vec![cc(3, 4), cc(7, 4), cc(9, 1)]);
    }

    #[test]
    fn ties_prefer_lower_keys() {
        let entries: Vec<ColorCount> = (0..100u32).rev().map(|k| cc(k, 1)).collect();
        let top = top_k(entries, 100, 5);
        assert_eq!(top.iter().map(|c| c.key).collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn selection_is_independent_of_input_order() {
        let forward: Vec<ColorCount> = (0..500u32).map(|k| cc(k, (k % 17) as u64)).collect();
        let mut backward = forward.clone();
        backward.reverse();
        assert_eq!(top_k(forward, 500, 30), top_k(backward, 500, 30));
    }
}
