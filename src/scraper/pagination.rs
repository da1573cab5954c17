use std::ops::RangeInclusive;

/// Number of listing pages needed for `total_found` agents.
pub fn total_pages(total_found: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total_found.div_ceil(u64::from(page_size))
}

/// 1-based page cursors, empty when nothing was found.
pub fn page_cursors(total_found: u64, page_size: u32) -> RangeInclusive<u64> {
    1..=total_pages(total_found, page_size)
}

pub fn page_url(origin: &str, page: u64) -> String {
    format!("{}/pg-{}", origin, page)
}

/// How many cards `page` should hold if the count read up front is accurate.
pub fn expected_cards_on_page(total_found: u64, page: u64, page_size: u32) -> u64 {
    let page_size = u64::from(page_size);
    let before = page.saturating_sub(1).saturating_mul(page_size);
    total_found.saturating_sub(before).min(page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages(0, 20), 0);
        assert_eq!(total_pages(1, 20), 1);
        assert_eq!(total_pages(20, 20), 1);
        assert_eq!(total_pages(21, 20), 2);
        assert_eq!(total_pages(39, 20), 2);
        assert_eq!(total_pages(40, 20), 2);
        assert_eq!(total_pages(41, 20), 3);
        assert_eq!(total_pages(5_000_000_001, 20), 250_000_001);
    }

    #[test]
    fn test_zero_results_has_no_cursors() {
        assert_eq!(page_cursors(0, 20).count(), 0);
        assert_eq!(page_cursors(41, 20).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_page_url_appends_suffix() {
        assert_eq!(page_url("https://example.com/agents", 1), "https://example.com/agents/pg-1");
        assert_eq!(page_url("https://example.com/agents", 12), "https://example.com/agents/pg-12");
    }

    #[test]
    fn test_expected_cards_on_last_page() {
        assert_eq!(expected_cards_on_page(25, 1, 20), 20);
        assert_eq!(expected_cards_on_page(25, 2, 20), 5);
        assert_eq!(expected_cards_on_page(40, 2, 20), 20);
        assert_eq!(expected_cards_on_page(25, 3, 20), 0);
    }
}
