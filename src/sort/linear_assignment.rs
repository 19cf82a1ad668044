use ndarray::prelude::*;
use tracing::{debug, trace};

use crate::config::AssociationConfig;
use crate::error::Error;
use crate::sort::iou_matching::iou_matrix;
use crate::sort::{BBox, Ltrb};

/// Cost of pairing a row or column with padding in the squared-up cost matrix.
/// Must stay strictly above the worst real cost (`1 - 0`) so that the optimum
/// always covers `min(rows, cols)` real pairs.
const PADDING_COST: f32 = 2.0;

///
/// Result of associating one frame of detections with the current trackers.
///
/// Every detection index is either in exactly one match or in
/// `unmatched_detections`; likewise for tracker indices.
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Association {
    /// `(detection index, tracker index)` pairs, in ascending detection order.
    pub matches: Vec<(usize, usize)>,
    /// Ascending.
    pub unmatched_detections: Vec<usize>,
    /// Ascending.
    pub unmatched_trackers: Vec<usize>,
}

impl Association {
    #[inline]
    pub fn num_matches(&self) -> usize {
        self.matches.len()
    }

    #[inline]
    pub fn into_parts(self) -> (Vec<(usize, usize)>, Vec<usize>, Vec<usize>) {
        (self.matches, self.unmatched_detections, self.unmatched_trackers)
    }
}

/// Solve linear assignment problem, maximizing total similarity.
///
/// Parameters
/// ----------
/// similarity : ArrayView2<f32>
///     An NxM matrix with entries in [0, 1]; rows are detections, columns
///     are trackers.
///
/// Returns
/// -------
/// Vec<(usize, usize)>
///     `min(N, M)` `(row, column)` pairs, each row and column used at most once,
///     whose summed similarity is maximal. Sorted by row.
///
pub fn max_similarity_assignment(similarity: ArrayView2<'_, f32>) -> Result<Vec<(usize, usize)>, Error> {
    let (rows, cols) = similarity.dim();
    if rows == 0 || cols == 0 {
        return Ok(vec![]);
    }

    let n = rows.max(cols);
    let mut cost_matrix = Array2::from_elem((n, n), PADDING_COST);
    cost_matrix
        .slice_mut(s![..rows, ..cols])
        .assign(&similarity.mapv(|x| 1.0 - x));

    let mut weights = munkres::WeightMatrix::from_row_vec(n, cost_matrix.iter().copied().collect());
    let positions = munkres::solve_assignment(&mut weights)?;

    let mut pairs: Vec<_> = positions
        .into_iter()
        .filter(|pos| pos.row < rows && pos.column < cols)
        .map(|pos| (pos.row, pos.column))
        .collect();

    pairs.sort_unstable();

    Ok(pairs)
}

/// Assigns detections to tracked objects, both given as `(left, top, right, bottom)` boxes.
///
/// Parameters
/// ----------
/// detections : &[BBox<Ltrb>]
///     Boxes detected in the current frame.
/// trackers : &[BBox<Ltrb>]
///     Boxes predicted for the current frame by each tracker.
/// iou_threshold : f32
///     Solver-proposed pairs with IoU below this value are rejected.
///     `0.3` is the usual choice, see `AssociationConfig::default`.
///
/// Returns
/// -------
/// Association
///     Matches, unmatched detection indices and unmatched tracker indices.
///
/// Fails with an invalid-input error, before doing any work, if the threshold
/// is not a finite value in [0, 1] or any box is malformed.
///
pub fn associate(detections: &[BBox<Ltrb>], trackers: &[BBox<Ltrb>], iou_threshold: f32) -> Result<Association, Error> {
    validate_threshold(iou_threshold)?;

    if let Some(idx) = detections.iter().position(|b| !b.is_valid()) {
        return Err(Error::InvalidDetection(idx));
    }

    if let Some(idx) = trackers.iter().position(|b| !b.is_valid()) {
        return Err(Error::InvalidTracker(idx));
    }

    if trackers.is_empty() || detections.is_empty() {
        debug!(detections = detections.len(), trackers = trackers.len(), "nothing to associate");

        return Ok(Association {
            matches: vec![],
            unmatched_detections: (0..detections.len()).collect(),
            unmatched_trackers: (0..trackers.len()).collect(),
        });
    }

    let similarity = iou_matrix(detections, trackers);
    let indices = max_similarity_assignment(similarity.view())?;

    let mut matches = Vec::with_capacity(indices.len());
    let mut detection_matched = vec![false; detections.len()];
    let mut tracker_matched = vec![false; trackers.len()];

    for (det_idx, trk_idx) in indices {
        let score = similarity[(det_idx, trk_idx)];

        if score < iou_threshold {
            trace!(detection = det_idx, tracker = trk_idx, iou = score, "pair rejected by gate");
            continue;
        }

        detection_matched[det_idx] = true;
        tracker_matched[trk_idx] = true;
        matches.push((det_idx, trk_idx));
    }

    let unmatched_detections = unmarked(&detection_matched);
    let unmatched_trackers = unmarked(&tracker_matched);

    debug!(
        detections = detections.len(),
        trackers = trackers.len(),
        matches = matches.len(),
        unmatched_detections = unmatched_detections.len(),
        unmatched_trackers = unmatched_trackers.len(),
        "associated detections to trackers"
    );

    Ok(Association {
        matches,
        unmatched_detections,
        unmatched_trackers,
    })
}

#[inline]
fn unmarked(marks: &[bool]) -> Vec<usize> {
    marks
        .iter()
        .enumerate()
        .filter(|&(_, &matched)| !matched)
        .map(|(idx, _)| idx)
        .collect()
}

pub(crate) fn validate_threshold(iou_threshold: f32) -> Result<(), Error> {
    if iou_threshold.is_finite() && (0.0..=1.0).contains(&iou_threshold) {
        Ok(())
    } else {
        Err(Error::InvalidThreshold(iou_threshold))
    }
}

/// Frame-to-frame association with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct Associator {
    config: AssociationConfig,
}

impl Associator {
    pub fn new(config: AssociationConfig) -> Result<Self, Error> {
        config.validate()?;

        Ok(Self { config })
    }

    #[inline]
    pub fn config(&self) -> &AssociationConfig {
        &self.config
    }

    #[inline]
    pub fn associate(&self, detections: &[BBox<Ltrb>], trackers: &[BBox<Ltrb>]) -> Result<Association, Error> {
        associate(detections, trackers, self.config.iou_threshold)
    }
}
