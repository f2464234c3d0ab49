//! Small conversions shared by the Diesel repositories.

use pagination::PageRequest;

/// `(LIMIT, OFFSET)` values for a page request.
pub(crate) fn page_window(page: PageRequest) -> (i64, i64) {
    let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);
    (i64::from(page.limit()), offset)
}

/// Convert a `COUNT(*)` result into the domain's unsigned count.
pub(crate) fn row_count(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 6, (6, 0))]
    #[case(3, 10, (10, 20))]
    fn window_follows_page_and_limit(
        #[case] page: u32,
        #[case] limit: u32,
        #[case] expected: (i64, i64),
    ) {
        let request = PageRequest::new(page, limit).expect("valid page");
        assert_eq!(page_window(request), expected);
    }

    #[rstest]
    #[case(-1, 0)]
    #[case(0, 0)]
    #[case(42, 42)]
    fn negative_counts_clamp_to_zero(#[case] raw: i64, #[case] expected: u64) {
        assert_eq!(row_count(raw), expected);
    }
}
