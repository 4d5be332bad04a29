//! Width allocator for visible columns.
//!
//! Three passes over the visible columns:
//! 1. explicit widths (user override, then column definition) are honored up
//!    to a share of the container,
//! 2. the rest of the container is split evenly over the remaining columns,
//!    clamped to per-type bounds,
//! 3. if the total still overflows, every width is scaled down proportionally
//!    (never below the floor) and any leftover overflow is trimmed from the
//!    widest columns.

use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

use crate::model::ColumnDef;
use crate::model::ColumnType;

/// Tunable constants for [`WidthAllocator`].
///
/// The defaults were picked empirically for the freight screens; treat them
/// as starting points, not contracts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidthConfig {
    /// Largest share of the container one explicitly sized column may take.
    pub max_share: f64,
    /// Minimum width any column is scaled down to.
    pub floor: u32,
    /// Bounds for badge columns.
    pub badge: (u32, u32),
    /// Bounds for link and date columns.
    pub wide: (u32, u32),
    /// Bounds for numeric and count columns.
    pub numeric: (u32, u32),
    /// Bounds for every other column type.
    pub text: (u32, u32),
}

impl Default for WidthConfig {
    fn default() -> Self {
        Self {
            max_share: 0.4,
            floor: 80,
            badge: (80, 140),
            wide: (140, 260),
            numeric: (80, 160),
            text: (100, 300),
        }
    }
}

impl WidthConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-column share cap (clamped to `0.0..=1.0`).
    pub fn with_max_share(mut self, share: f64) -> Self {
        self.max_share = share.clamp(0.0, 1.0);
        self
    }

    /// Sets the scale-down floor.
    pub fn with_floor(mut self, floor: u32) -> Self {
        self.floor = floor;
        self
    }

    /// Returns the `(min, max)` bounds for a column, honoring its own bounds.
    pub fn bounds_for(&self, column: &ColumnDef) -> (u32, u32) {
        let (min, max) = match column.column_type {
            ColumnType::Badge => self.badge,
            ColumnType::Link
            | ColumnType::DateTime
            | ColumnType::DateTimeRange
            | ColumnType::EditableDate => self.wide,
            ColumnType::Number | ColumnType::EditableNumber | ColumnType::ExpandableCount => {
                self.numeric
            }
            ColumnType::Text | ColumnType::Dropdown | ColumnType::EditableText => self.text,
        };
        let min = column.min_width.unwrap_or(min);
        let max = column.max_width.unwrap_or(max).max(min);
        (min, max)
    }
}

/// A concrete pixel width for one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocatedWidth {
    /// Column key.
    pub key: String,
    /// Width in pixels.
    pub width: u32,
}

/// Distributes container width over the visible columns.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use smartgrid_lib::layout::WidthAllocator;
/// use smartgrid_lib::model::ColumnDef;
///
/// let columns = vec![
///     ColumnDef::new("trip", "Trip").with_width(600),
///     ColumnDef::new("origin", "Origin"),
///     ColumnDef::new("destination", "Destination"),
/// ];
/// let refs: Vec<&ColumnDef> = columns.iter().collect();
///
/// let widths = WidthAllocator::default().allocate(&refs, &HashMap::new(), 1000);
/// assert_eq!(widths[0].width, 400); // capped at 40%
/// assert!(widths.iter().map(|w| w.width).sum::<u32>() <= 1000);
/// ```
#[derive(Debug, Clone, Default)]
pub struct WidthAllocator {
    config: WidthConfig,
}

impl WidthAllocator {
    /// Creates an allocator with the given configuration.
    pub fn new(config: WidthConfig) -> Self {
        Self { config }
    }

    /// Returns the allocator's configuration.
    pub fn config(&self) -> &WidthConfig {
        &self.config
    }

    /// Allocates a width for each column, in the order given.
    ///
    /// `overrides` holds user-preferred widths keyed by column key and takes
    /// precedence over the column definition's width. When the container is
    /// narrower than `columns.len() * floor` every column sits at the floor and
    /// the total exceeds `available`; the host is expected to scroll.
    pub fn allocate(
        &self,
        columns: &[&ColumnDef],
        overrides: &HashMap<String, u32>,
        available: u32,
    ) -> Vec<AllocatedWidth> {
        if columns.is_empty() {
            return Vec::new();
        }

        let cap = (available as f64 * self.config.max_share).floor() as u32;
        let mut widths: Vec<Option<u32>> = columns
            .iter()
            .map(|c| {
                overrides
                    .get(&c.key)
                    .copied()
                    .or(c.width)
                    .map(|w| w.min(cap))
            })
            .collect();

        let explicit_total: u32 = widths.iter().flatten().sum();
        let unconfigured = widths.iter().filter(|w| w.is_none()).count() as u32;
        if unconfigured > 0 {
            let share = available.saturating_sub(explicit_total) / unconfigured;
            for (slot, column) in widths.iter_mut().zip(columns) {
                if slot.is_none() {
                    let (min, max) = self.config.bounds_for(column);
                    *slot = Some(share.clamp(min, max));
                }
            }
        }

        let mut widths: Vec<u32> = widths.into_iter().map(|w| w.unwrap_or(0)).collect();
        self.fit(&mut widths, available);

        log::trace!(
            "allocated {} columns into {}px: {:?}",
            columns.len(),
            available,
            widths
        );

        columns
            .iter()
            .zip(widths)
            .map(|(c, width)| AllocatedWidth {
                key: c.key.clone(),
                width,
            })
            .collect()
    }

    /// Scales `widths` down until they fit, respecting the floor.
    fn fit(&self, widths: &mut [u32], available: u32) {
        let total: u64 = widths.iter().map(|&w| w as u64).sum();
        if total <= available as u64 {
            return;
        }

        let floor = self.config.floor;
        let factor = available as f64 / total as f64;
        for w in widths.iter_mut() {
            let scaled = (*w as f64 * factor).floor() as u32;
            // Columns explicitly narrower than the floor keep their width.
            *w = scaled.max(floor.min(*w));
        }

        // Flooring can leave a remainder; shave it off the widest columns.
        let mut excess = widths
            .iter()
            .map(|&w| w as u64)
            .sum::<u64>()
            .saturating_sub(available as u64);
        if excess == 0 {
            return;
        }
        let mut order: Vec<usize> = (0..widths.len()).collect();
        order.sort_by(|&a, &b| widths[b].cmp(&widths[a]));
        for i in order {
            if excess == 0 {
                break;
            }
            let room = widths[i].saturating_sub(floor) as u64;
            let cut = room.min(excess);
            widths[i] -= cut as u32;
            excess -= cut;
        }
    }
}
