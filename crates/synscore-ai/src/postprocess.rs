//! Raw model scores → top-K labelled results.

use std::cmp::Ordering;

use synscore_core::ClassificationResult;

use crate::error::RankError;
use crate::labels::LabelTable;

/// Divisor applied to raw scores to produce a confidence.
///
/// The model's outputs are treated as percentages on a 0–100 scale, so a raw
/// score of `92.0` becomes a confidence of `0.92`. A model that already emits
/// [0, 1] probabilities will produce confidences 100× too small.
pub const SCORE_SCALE: f32 = 100.0;

/// Rank `probabilities` and return the top `k` as labelled results.
///
/// Indices are stable-sorted by descending score. Equal scores keep index
/// order, so the lower index always ranks first. NaN scores rank last.
/// Each selected index is looked up in `labels` and its score divided by
/// [`SCORE_SCALE`].
pub fn rank(
    probabilities: &[f32],
    labels: &LabelTable,
    k: usize,
) -> Result<Vec<ClassificationResult>, RankError> {
    if k > probabilities.len() {
        return Err(RankError::KTooLarge {
            k,
            len: probabilities.len(),
        });
    }

    let mut order: Vec<usize> = (0..probabilities.len()).collect();
    order.sort_by(|&a, &b| descending(probabilities[a], probabilities[b]));

    order
        .into_iter()
        .take(k)
        .enumerate()
        .map(|(rank, index)| -> Result<_, RankError> {
            let label = labels.at(index)?;
            Ok(ClassificationResult::new(
                label,
                probabilities[index] / SCORE_SCALE,
                rank,
            ))
        })
        .collect()
}

/// Fail when the label table cannot describe every model output.
pub fn check_consistency(labels: &LabelTable, outputs: usize) -> Result<(), RankError> {
    if labels.len() != outputs {
        return Err(RankError::LabelCountMismatch {
            labels: labels.len(),
            outputs,
        });
    }
    Ok(())
}

fn descending(a: f32, b: f32) -> Ordering {
    sort_key(b).total_cmp(&sort_key(a))
}

// NaN sorts below everything; -0.0 and 0.0 tie.
fn sort_key(v: f32) -> f32 {
    if v.is_nan() { f32::NEG_INFINITY } else { v + 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IndexError;

    fn animals() -> LabelTable {
        LabelTable::from_lines(["0 cat", "1 dog", "2 bird", "3 fish", "4 mouse"])
    }

    fn assert_result(r: &ClassificationResult, label: &str, confidence: f32, rank: usize) {
        assert_eq!(r.label, label);
        assert!(
            (r.confidence - confidence).abs() < 1e-6,
            "{label}: expected {confidence}, got {}",
            r.confidence
        );
        assert_eq!(r.rank, rank);
    }

    #[test]
    fn top_three_known_vector() {
        let results = rank(&[0.1, 92.0, 0.05, 4.0, 3.0], &animals(), 3).unwrap();
        assert_eq!(results.len(), 3);
        assert_result(&results[0], "dog", 0.92, 0);
        assert_result(&results[1], "fish", 0.04, 1);
        assert_result(&results[2], "mouse", 0.03, 2);
    }

    #[test]
    fn raw_scores_are_divided_by_one_hundred() {
        let table = LabelTable::from_lines(["a x", "b y"]);
        let results = rank(&[50.0, 0.5], &table, 2).unwrap();
        assert_eq!(results[0].confidence, 0.5);
        assert_eq!(results[1].confidence, 0.005);
    }

    #[test]
    fn ties_keep_lower_index_first() {
        let results = rank(&[5.0, 7.0, 5.0, 7.0, 5.0], &animals(), 5).unwrap();
        let labels: Vec<&str> = results.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["dog", "fish", "cat", "bird", "mouse"]);
    }

    #[test]
    fn all_equal_scores_rank_in_index_order() {
        for _ in 0..10 {
            let results = rank(&[1.0; 5], &animals(), 3).unwrap();
            let labels: Vec<&str> = results.iter().map(|r| r.label.as_str()).collect();
            assert_eq!(labels, ["cat", "dog", "bird"]);
        }
    }

    #[test]
    fn nan_scores_rank_last() {
        let results = rank(&[f32::NAN, 1.0, -3.0, f32::NAN, 0.0], &animals(), 5).unwrap();
        let labels: Vec<&str> = results.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["dog", "mouse", "bird", "cat", "fish"]);
    }

    #[test]
    fn results_are_non_increasing() {
        let scores = [3.0, 9.0, 1.0, 9.5, 0.0];
        let results = rank(&scores, &animals(), 5).unwrap();
        for pair in results.windows(2) {
            assert!(pair[0].confidence >= pair[1].confidence);
        }
    }

    #[test]
    fn k_larger_than_vector() {
        let err = rank(&[1.0, 2.0], &animals(), 3).unwrap_err();
        assert_eq!(err, RankError::KTooLarge { k: 3, len: 2 });
    }

    #[test]
    fn zero_k_is_empty() {
        assert!(rank(&[1.0, 2.0], &animals(), 0).unwrap().is_empty());
    }

    #[test]
    fn selected_index_beyond_label_table() {
        let table = LabelTable::from_lines(["0 cat", "1 dog"]);
        let err = rank(&[0.0, 1.0, 50.0], &table, 1).unwrap_err();
        assert_eq!(
            err,
            RankError::Label(IndexError::OutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn selected_label_without_display_name() {
        let table = LabelTable::from_lines(["0 cat", "n01443537"]);
        let err = rank(&[0.0, 1.0], &table, 1).unwrap_err();
        assert!(matches!(
            err,
            RankError::Label(IndexError::MissingDisplayName { index: 1, .. })
        ));
    }

    #[test]
    fn consistency_check() {
        check_consistency(&animals(), 5).unwrap();
        assert_eq!(
            check_consistency(&animals(), 1000),
            Err(RankError::LabelCountMismatch {
                labels: 5,
                outputs: 1000
            })
        );
    }
}
