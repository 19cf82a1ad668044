use ndarray::prelude::*;

use crate::sort::{BBox, Ltrb};

impl BBox<Ltrb> {
    /// Intersection over union with `other`, in [0, 1].
    ///
    /// Symmetric in its arguments. Returns 0 when the union is empty, so two
    /// coincident zero-area boxes never count as a confident match.
    pub fn iou(&self, other: &BBox<Ltrb>) -> f32 {
        let i_xmin = self.left().max(other.left());
        let i_ymin = self.top().max(other.top());

        let i_xmax = self.right().min(other.right());
        let i_ymax = self.bottom().min(other.bottom());

        let intersection_area = (i_xmax - i_xmin).max(0.0) * (i_ymax - i_ymin).max(0.0);
        let union_area = self.area() + other.area() - intersection_area;

        if !(union_area > 0.0) {
            return 0.0;
        }

        let iou = intersection_area / union_area;
        if iou.is_finite() {
            iou
        } else {
            0.0
        }
    }
}

/// Compute intersection over union.
/// Parameters
/// ----------
/// bbox : BBox<Ltrb>
///     A bounding box in format `(left, top, right, bottom)`.
/// candidates : &[BBox<Ltrb>]
///     Candidate bounding boxes in the same format as `bbox`.
/// Returns
/// -------
/// Array1<f32>
///     The intersection over union in [0, 1] between the `bbox` and each
///     candidate.
pub fn iou(bbox: &BBox<Ltrb>, candidates: &[BBox<Ltrb>]) -> Array1<f32> {
    candidates
        .iter()
        .map(|c| bbox.iou(c))
        .collect()
}

///
/// Pair-wise IoU between every detection and every tracker.
///
/// Returns a matrix of shape `(detections.len(), trackers.len())` where entry
/// `(d, t)` is `iou(detections[d], trackers[t])`. Either side may be empty.
///
pub fn iou_matrix(detections: &[BBox<Ltrb>], trackers: &[BBox<Ltrb>]) -> Array2<f32> {
    let mut matrix = Array2::zeros((detections.len(), trackers.len()));

    for (mut row, det) in matrix.axis_iter_mut(Axis(0)).zip(detections.iter()) {
        row.assign(&iou(det, trackers));
    }

    matrix
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn grid() -> Vec<BBox<Ltrb>> {
        let mut boxes = vec![];
        for &l in &[0.0f32, 3.5, 7.0, 20.0] {
            for &t in &[0.0f32, 4.0, 9.5] {
                for &(w, h) in &[(0.0f32, 0.0f32), (1.0, 2.0), (10.0, 10.0), (12.5, 3.0)] {
                    boxes.push(BBox::ltrb(l, t, l + w, t + h));
                }
            }
        }
        boxes
    }

    #[test]
    fn half_overlap() {
        let a = BBox::ltrb(0.0, 0.0, 10.0, 10.0);
        let b = BBox::ltrb(5.0, 5.0, 15.0, 15.0);

        assert_relative_eq!(a.iou(&b), 25.0 / 175.0);
    }

    #[test]
    fn identical_boxes() {
        let a = BBox::ltrb(1.5, 2.0, 11.0, 7.25);
        assert_eq!(a.iou(&a), 1.0);
    }

    #[test]
    fn disjoint_and_touching_boxes() {
        let a = BBox::ltrb(0.0, 0.0, 10.0, 10.0);

        assert_eq!(a.iou(&BBox::ltrb(20.0, 20.0, 30.0, 30.0)), 0.0);
        assert_eq!(a.iou(&BBox::ltrb(10.0, 0.0, 20.0, 10.0)), 0.0);
    }

    #[test]
    fn zero_area_boxes() {
        let p = BBox::ltrb(5.0, 5.0, 5.0, 5.0);
        let a = BBox::ltrb(0.0, 0.0, 10.0, 10.0);

        assert_eq!(p.iou(&p), 0.0);
        assert_eq!(p.iou(&a), 0.0);
        assert_eq!(a.iou(&p), 0.0);
    }

    #[test]
    fn overflowing_area_is_never_nan() {
        let big = BBox::ltrb(0.0, 0.0, 1e20, 1e20);
        let other = BBox::ltrb(0.0, 0.0, 10.0, 10.0);

        assert_eq!(big.iou(&big), 0.0);
        assert_eq!(big.iou(&other), 0.0);
        assert_eq!(other.iou(&big), 0.0);
    }

    #[test]
    fn symmetric_and_bounded() {
        let boxes = grid();

        for a in &boxes {
            for b in &boxes {
                let ab = a.iou(b);
                assert_eq!(ab, b.iou(a));
                assert!(ab >= 0.0 && ab <= 1.0, "iou {} out of range", ab);
                assert!(!ab.is_nan());
            }

            if a.area() > 0.0 {
                assert_eq!(a.iou(a), 1.0);
            }
        }
    }

    #[test]
    fn matrix_shape_and_values() {
        let dets = vec![
            BBox::ltrb(0.0, 0.0, 10.0, 10.0),
            BBox::ltrb(20.0, 20.0, 30.0, 30.0),
        ];
        let trks = vec![
            BBox::ltrb(5.0, 5.0, 15.0, 15.0),
            BBox::ltrb(0.0, 0.0, 10.0, 10.0),
            BBox::ltrb(20.0, 20.0, 30.0, 30.0),
        ];

        let m = iou_matrix(&dets, &trks);
        assert_eq!(m.dim(), (2, 3));
        assert_relative_eq!(m[(0, 0)], 25.0 / 175.0);
        assert_eq!(m[(0, 1)], 1.0);
        assert_eq!(m[(0, 2)], 0.0);
        assert_eq!(m[(1, 2)], 1.0);

        assert_eq!(iou_matrix(&dets, &[]).dim(), (2, 0));
        assert_eq!(iou_matrix(&[], &trks).dim(), (0, 3));
    }
}
