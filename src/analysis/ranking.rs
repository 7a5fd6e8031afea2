use std::cmp::Ordering;
use crate::errors::AssetIntelError;
use crate::models::{AssetRow, Limit};

/// Rank rows by exposure score, highest first.
///
/// The sort is stable: equal scores keep their load order. Rows without a
/// score go last.
pub fn top(rows: &[AssetRow], limit: Limit) -> Result<Vec<AssetRow>, AssetIntelError> {
    if limit == Limit::AtMost(0) {
        return Err(AssetIntelError::InvalidArgument(
            "number of top assets must be positive".into(),
        ));
    }

    let mut ranked = rows.to_vec();
    ranked.sort_by(|a, b| compare_exposure(a.exposure_score, b.exposure_score));
    Ok(limit.apply(ranked))
}

fn compare_exposure(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, score: Option<f64>) -> AssetRow {
        let mut row = AssetRow::with_id(id);
        row.exposure_score = score;
        row
    }

    fn ids(rows: &[AssetRow]) -> Vec<&str> {
        rows.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_tie_keeps_load_order() {
        let rows = vec![row("1", Some(773.0)), row("2", Some(773.0)), row("3", Some(836.0))];
        let ranked = top(&rows, Limit::AtMost(2)).unwrap();
        assert_eq!(ids(&ranked), vec!["3", "1"]);
    }

    #[test]
    fn test_null_scores_sort_last() {
        let rows = vec![row("n1", None), row("low", Some(10.0)), row("n2", None), row("high", Some(900.0))];
        let ranked = top(&rows, Limit::Unbounded).unwrap();
        assert_eq!(ids(&ranked), vec!["high", "low", "n1", "n2"]);
    }

    #[test]
    fn test_ranking_is_idempotent() {
        let rows = vec![
            row("a", Some(500.0)),
            row("b", None),
            row("c", Some(500.0)),
            row("d", Some(999.0)),
            row("e", Some(500.0)),
        ];
        let first = top(&rows, Limit::Unbounded).unwrap();
        let second = top(&rows, Limit::Unbounded).unwrap();
        assert_eq!(first, second);
        assert_eq!(ids(&first), vec!["d", "a", "c", "e", "b"]);
        assert_eq!(top(&first, Limit::Unbounded).unwrap(), first);
    }

    #[test]
    fn test_zero_count_rejected() {
        let rows = vec![row("a", Some(1.0))];
        assert!(matches!(top(&rows, Limit::AtMost(0)), Err(AssetIntelError::InvalidArgument(_))));
    }

    #[test]
    fn test_limit_larger_than_rows() {
        let rows = vec![row("a", Some(1.0))];
        assert_eq!(top(&rows, Limit::AtMost(10)).unwrap().len(), 1);
        assert!(top(&[], Limit::AtMost(5)).unwrap().is_empty());
    }
}
