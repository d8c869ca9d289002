use crate::model::{Bar, Region};

/// Number of bar rows shared by `regions`: the longest bar list, at least 1.
pub fn bar_rows<'a>(regions: impl IntoIterator<Item = &'a Region>) -> usize {
    regions
        .into_iter()
        .map(|region| region.bars.len())
        .max()
        .unwrap_or(0)
        .max(1)
}

/// Copy of `region`'s bars extended with placeholders up to `rows`.
pub fn padded_bars(region: &Region, rows: usize) -> Vec<Bar> {
    let mut bars = region.bars.clone();
    if bars.len() < rows {
        bars.resize(rows, Bar::placeholder());
    }
    bars
}

/// Align bar rows across sibling regions.
///
/// Every returned list has the same length, with each region's own bars
/// first and zero-size placeholders after them.
///
/// # Examples
/// ```
/// use memtape_core::{Bar, Region, normalize_bars};
///
/// let regions = vec![
///     Region::new(0, 8, Vec::new()),
///     Region::new(8, 8, Vec::new()).with_bars(vec![Bar::new(8, 2), Bar::new(10, 2)]),
/// ];
/// let rows = normalize_bars(&regions);
/// assert_eq!(rows[0], vec![Bar::placeholder(), Bar::placeholder()]);
/// assert_eq!(rows[1], regions[1].bars);
/// ```
pub fn normalize_bars(regions: &[Region]) -> Vec<Vec<Bar>> {
    let rows = bar_rows(regions);
    regions
        .iter()
        .map(|region| padded_bars(region, rows))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region_with_bars(count: u64) -> Region {
        let bars = (0..count).map(|i| Bar::new(i, 1).with_color("red")).collect();
        Region::new(0, 8, Vec::new()).with_bars(bars)
    }

    #[test]
    fn normalize_pads_to_longest_list() {
        let regions = vec![region_with_bars(0), region_with_bars(3), region_with_bars(1)];
        let rows = normalize_bars(&regions);

        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|bars| bars.len() == 3));
        assert_eq!(rows[1], regions[1].bars);
        assert_eq!(rows[2][0], regions[2].bars[0]);
        assert_eq!(rows[2][1], Bar::placeholder());
        assert_eq!(rows[0], vec![Bar::placeholder(); 3]);
    }

    #[test]
    fn normalize_gives_at_least_one_row() {
        let regions = vec![region_with_bars(0), region_with_bars(0)];
        let rows = normalize_bars(&regions);
        assert_eq!(rows, vec![vec![Bar::placeholder()], vec![Bar::placeholder()]]);
    }

    #[test]
    fn normalize_empty_tape() {
        assert!(normalize_bars(&[]).is_empty());
        assert_eq!(bar_rows(&[]), 1);
    }

    #[test]
    fn normalize_leaves_regions_untouched() {
        let regions = vec![region_with_bars(1), region_with_bars(2)];
        let before = regions.clone();
        let _ = normalize_bars(&regions);
        assert_eq!(regions, before);
    }

    #[test]
    fn padded_bars_never_truncates() {
        let region = region_with_bars(4);
        assert_eq!(padded_bars(&region, 2).len(), 4);
    }
}
