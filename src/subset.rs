use crate::catalog::Catalog;
use crate::error::{QuizError, Result};
use rand::seq::index;
use rand::Rng;
use tracing::debug;

/// Draws a proportional sample from every category, keeping catalog order
/// within a category and category declaration order overall. The result
/// length tracks `target` but rounding may land a few questions either side.
pub fn select_subset<R: Rng + ?Sized>(
    catalog: &Catalog,
    target: usize,
    rng: &mut R,
) -> Result<Vec<usize>> {
    select_from_partition(&catalog.partition(), catalog.questions.len(), target, rng)
}

pub fn select_from_partition<R: Rng + ?Sized>(
    partition: &[Vec<usize>],
    total: usize,
    target: usize,
    rng: &mut R,
) -> Result<Vec<usize>> {
    if target == 0 || target > total {
        return Err(QuizError::InvalidArgument(format!(
            "quiz length must be between 1 and {total}, got {target}"
        )));
    }

    let mut selection = Vec::with_capacity(target);
    for group in partition.iter().filter(|group| !group.is_empty()) {
        let count = per_category_count(target, group.len(), total);
        let mut picked: Vec<usize> = index::sample(rng, group.len(), count)
            .into_iter()
            .map(|position| group[position])
            .collect();
        picked.sort_unstable();
        selection.extend(picked);
    }

    debug!(target, selected = selection.len(), "question subset selected");
    Ok(selection)
}

fn per_category_count(target: usize, size: usize, total: usize) -> usize {
    let share = (target as f64 * size as f64 / total as f64).round() as usize;
    share.max(1).min(size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn partition() -> (Vec<Vec<usize>>, usize) {
        let groups = vec![
            (0..20).collect::<Vec<_>>(),
            (20..23).collect(),
            vec![23],
            (24..40).collect(),
        ];
        (groups, 40)
    }

    #[test]
    fn per_category_count_rounds_and_caps() {
        assert_eq!(per_category_count(10, 20, 40), 5);
        assert_eq!(per_category_count(10, 3, 40), 1);
        assert_eq!(per_category_count(1, 1, 40), 1);
        assert_eq!(per_category_count(40, 3, 40), 3);
        assert_eq!(per_category_count(30, 3, 40), 2);
    }

    #[test]
    fn subset_respects_bounds_for_every_target() {
        let (groups, total) = partition();
        let mut rng = StdRng::seed_from_u64(7);
        for target in 1..=total {
            let selection =
                select_from_partition(&groups, total, target, &mut rng).expect("valid target");
            assert!(selection.len() >= groups.len());
            assert!(selection.len() <= total);
            for group in &groups {
                let taken = selection.iter().filter(|q| group.contains(q)).count();
                assert!((1..=group.len()).contains(&taken));
            }
        }
    }

    #[test]
    fn subset_preserves_order_without_repeats() {
        let (groups, total) = partition();
        let mut rng = StdRng::seed_from_u64(42);
        let selection = select_from_partition(&groups, total, 12, &mut rng).expect("valid");

        let mut sorted = selection.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted, selection);
    }

    #[test]
    fn full_length_selects_everything() {
        let (groups, total) = partition();
        let mut rng = StdRng::seed_from_u64(1);
        let selection = select_from_partition(&groups, total, total, &mut rng).expect("valid");
        assert_eq!(selection, (0..40).collect::<Vec<_>>());
    }

    #[test]
    fn same_seed_gives_same_subset() {
        let catalog = crate::catalog::load(None).expect("catalog");
        let first = select_subset(&catalog, 25, &mut StdRng::seed_from_u64(9)).expect("first");
        let second = select_subset(&catalog, 25, &mut StdRng::seed_from_u64(9)).expect("second");
        assert_eq!(first, second);
    }

    #[test]
    fn subset_rejects_out_of_range_target() {
        let (groups, total) = partition();
        let mut rng = StdRng::seed_from_u64(3);
        let err = select_from_partition(&groups, total, 0, &mut rng).expect_err("zero length");
        assert!(matches!(err, QuizError::InvalidArgument(_)));
        assert_eq!(
            err.to_string(),
            "invalid argument: quiz length must be between 1 and 40, got 0"
        );

        let err = select_from_partition(&groups, total, 41, &mut rng).expect_err("too long");
        assert!(err.to_string().contains("between 1 and 40, got 41"));
    }
}
