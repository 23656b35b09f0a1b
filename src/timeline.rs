//! Proportional stint timeline.
//!
//! Segment widths are normalized against the stints themselves, never the
//! circuit distance, so the bar is always full even when a strategy's laps
//! don't add up to the race length.

use crate::types::{Compound, Stint};

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineSegment {
    pub compound: Compound,
    pub color_class: &'static str,
    pub width_fraction: f64,
    pub laps: u32,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegendEntry {
    pub compound: Compound,
    pub color_class: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimelineView {
    pub segments: Vec<TimelineSegment>,
    pub legend: Vec<LegendEntry>,
    pub caption: Option<String>,
}

/// Fixed reference; not filtered to the compounds actually used.
pub fn legend() -> Vec<LegendEntry> {
    Compound::ALL
        .into_iter()
        .map(|compound| LegendEntry {
            compound,
            color_class: compound.color_class(),
            label: compound.as_str(),
        })
        .collect()
}

pub fn render_timeline(stints: &[Stint], reference_lap_count: Option<u32>) -> TimelineView {
    let total: u64 = stints.iter().map(|s| u64::from(s.length)).sum();
    if stints.is_empty() || total == 0 {
        return TimelineView::default();
    }

    let segments = stints
        .iter()
        .map(|s| TimelineSegment {
            compound: s.compound,
            color_class: s.compound.color_class(),
            width_fraction: f64::from(s.length) / total as f64,
            laps: s.length,
            label: format!("{} ({})", s.compound, s.length),
        })
        .collect();

    let caption = match reference_lap_count {
        Some(reference) => format!("{total} / {reference} laps"),
        None => format!("{total} laps"),
    };

    TimelineView {
        segments,
        legend: legend(),
        caption: Some(caption),
    }
}

impl TimelineView {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn total_laps(&self) -> u32 {
        self.segments.iter().map(|s| s.laps).sum()
    }

    /// Whole character cells per segment for a bar `width` cells wide.
    ///
    /// Every segment gets one cell when the width allows it; the rest is
    /// shared by largest remainder, ties going to the earlier stint. The
    /// result always sums to `width`.
    pub fn cell_widths(&self, width: usize) -> Vec<usize> {
        let n = self.segments.len();
        if n == 0 {
            return Vec::new();
        }

        let base = usize::from(width >= n);
        let spare = (width - base * n) as u64;
        let total = u64::from(self.total_laps());

        let mut cells = Vec::with_capacity(n);
        let mut remainders = Vec::with_capacity(n);
        for seg in &self.segments {
            let share = u64::from(seg.laps) * spare;
            cells.push(base + (share / total) as usize);
            remainders.push(share % total);
        }

        let mut leftover = width - cells.iter().sum::<usize>();
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| remainders[b].cmp(&remainders[a]).then(a.cmp(&b)));
        for i in order {
            if leftover == 0 {
                break;
            }
            cells[i] += 1;
            leftover -= 1;
        }
        cells
    }
}
