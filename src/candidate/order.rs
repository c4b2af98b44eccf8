//! Deterministic score ordering.

use crate::util::math::score_cmp_desc;
use crate::util::Element;
use std::cmp::Ordering;

/// Ranks two `(score, index)` entries: higher score first, then lower index.
#[inline]
pub(crate) fn rank_cmp<T: Element>(a: (T, usize), b: (T, usize)) -> Ordering {
    score_cmp_desc(a.0, b.0).then_with(|| a.1.cmp(&b.1))
}

/// Indices of `scores` by descending score; ties keep input order.
pub fn order_desc<T: Element>(scores: &[T]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    // `sort_by` is stable, which is what gives ties their input order.
    order.sort_by(|&a, &b| score_cmp_desc(scores[a], scores[b]));
    order
}

#[cfg(test)]
mod tests {
    use super::{order_desc, rank_cmp};
    use std::cmp::Ordering;

    #[test]
    fn ties_keep_input_order() {
        let scores = [0.5f32, 0.9, 0.5, 0.9, 0.1];
        assert_eq!(order_desc(&scores), vec![1, 3, 0, 2, 4]);
    }

    #[test]
    fn nan_scores_sort_last() {
        let scores = [f64::NAN, 0.2, 0.7];
        assert_eq!(order_desc(&scores), vec![2, 1, 0]);
    }

    #[test]
    fn rank_cmp_breaks_ties_by_index() {
        assert_eq!(rank_cmp((0.4f32, 3), (0.4, 1)), Ordering::Greater);
        assert_eq!(rank_cmp((0.8f32, 3), (0.4, 1)), Ordering::Less);
    }
}
