use std::ops::RangeInclusive;

/// Number of page buttons shown at once.
pub const MAX_VISIBLE_PAGES: u32 = 7;

/// Fixed page size for every paginated listing.
pub const PAGE_SIZE: u32 = 20;

/// Contiguous run of page numbers to render around `current`.
///
/// The window is centred on `current` where possible and slides to stay
/// inside `[1, total]` near either edge instead of shrinking. A `total` of
/// zero is treated as a single page.
pub fn page_window(current: u32, total: u32, max_visible: u32) -> RangeInclusive<u32> {
    let total = total.max(1);
    let max_visible = max_visible.max(1);

    let mut start = current.saturating_sub(max_visible / 2).max(1);
    let end = total.min(start + max_visible - 1);
    if end - start + 1 < max_visible {
        start = (end + 1).saturating_sub(max_visible).max(1);
    }
    start..=end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(current: u32, total: u32) -> Vec<u32> {
        page_window(current, total, MAX_VISIBLE_PAGES).collect()
    }

    #[test]
    fn first_page_of_ten() {
        assert_eq!(window(1, 10), (1..=7).collect::<Vec<_>>());
    }

    #[test]
    fn last_page_of_ten() {
        assert_eq!(window(10, 10), (4..=10).collect::<Vec<_>>());
    }

    #[test]
    fn middle_page_of_ten() {
        assert_eq!(window(5, 10), (2..=8).collect::<Vec<_>>());
    }

    #[test]
    fn single_page() {
        assert_eq!(window(1, 1), vec![1]);
    }

    #[test]
    fn zero_total_is_one_page() {
        assert_eq!(window(1, 0), vec![1]);
    }

    #[test]
    fn small_totals_show_everything() {
        for total in 1..=MAX_VISIBLE_PAGES {
            for current in 1..=total {
                assert_eq!(
                    window(current, total),
                    (1..=total).collect::<Vec<_>>(),
                    "current={} total={}",
                    current,
                    total
                );
            }
        }
    }

    #[test]
    fn large_totals_have_full_contiguous_window() {
        for total in (MAX_VISIBLE_PAGES + 1)..=60 {
            for current in 1..=total {
                let w = window(current, total);
                assert_eq!(w.len(), MAX_VISIBLE_PAGES as usize);
                assert!(w[0] >= 1);
                assert!(*w.last().unwrap() <= total);
                assert!(w.windows(2).all(|pair| pair[1] == pair[0] + 1));
                assert!(w.contains(&current), "current={} total={}", current, total);
            }
        }
    }
}
