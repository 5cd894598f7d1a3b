//! Static row partitioning of the product matrix.

use core::ops::Range;

/// Contiguous block of product rows owned by one core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RowRange {
    pub start: usize,
    pub len: usize,
}

impl RowRange {
    #[inline]
    pub const fn end(&self) -> usize {
        self.start + self.len
    }

    #[inline]
    pub const fn contains(&self, row: usize) -> bool {
        row >= self.start && row < self.end()
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn rows(&self) -> Range<usize> {
        self.start..self.end()
    }
}

/// Rows of the product owned by `identity`.
///
/// Every identity gets `mat_size / core_count` rows starting at
/// `identity * len`. When `mat_size` is not a multiple of `core_count` the
/// trailing `mat_size % core_count` rows belong to nobody; a validated
/// [`ClusterConfig`](crate::ClusterConfig) rules that out.
///
/// # Panics
/// Panics if `core_count` is zero.
#[inline]
pub const fn row_range_for(identity: usize, core_count: usize, mat_size: usize) -> RowRange {
    let len = mat_size / core_count;
    RowRange {
        start: identity * len,
        len,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn coverage(core_count: usize, mat_size: usize) -> Vec<u32> {
        let mut hits = vec![0u32; mat_size];
        for id in 0..core_count {
            for row in row_range_for(id, core_count, mat_size).rows() {
                hits[row] += 1;
            }
        }
        hits
    }

    #[test]
    fn test_every_row_owned_exactly_once() {
        for mat_size in 1..=64 {
            for core_count in (1..=mat_size).filter(|c| mat_size % c == 0) {
                let hits = coverage(core_count, mat_size);
                assert!(
                    hits.iter().all(|&h| h == 1),
                    "mat_size={mat_size} core_count={core_count} hits={hits:?}"
                );
            }
        }
    }

    #[test]
    fn test_ranges_are_contiguous_in_identity_order() {
        let mut next = 0;
        for id in 0..8 {
            let range = row_range_for(id, 8, 104);
            assert_eq!(range.start, next);
            assert_eq!(range.len, 13);
            next = range.end();
        }
        assert_eq!(next, 104);
    }

    #[test]
    fn test_single_core_spans_matrix() {
        let range = row_range_for(0, 1, 104);
        assert_eq!(range, RowRange { start: 0, len: 104 });
        assert!(range.contains(0));
        assert!(range.contains(103));
        assert!(!range.contains(104));
    }

    #[test]
    fn test_uneven_split_drops_trailing_rows() {
        // 10 rows over 3 cores: rows 9.. are never computed.
        let hits = coverage(3, 10);
        assert_eq!(&hits[..9], &[1; 9]);
        assert_eq!(hits[9], 0);
    }

    #[test]
    fn test_more_cores_than_rows_gives_empty_ranges() {
        let range = row_range_for(3, 8, 4);
        assert!(range.is_empty());
        assert_eq!(range.rows().count(), 0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_partition_tiles_matrix(core_count in 1usize..=32, rows_each in 1usize..=16) {
            let mat_size = core_count * rows_each;
            let hits = coverage(core_count, mat_size);
            prop_assert!(hits.iter().all(|&h| h == 1));
        }

        #[test]
        fn prop_partition_is_pure(identity in 0usize..64, core_count in 1usize..=64, mat_size in 0usize..4096) {
            let first = row_range_for(identity, core_count, mat_size);
            let second = row_range_for(identity, core_count, mat_size);
            prop_assert_eq!(first, second);
            prop_assert_eq!(first.len, mat_size / core_count);
        }
    }
}
