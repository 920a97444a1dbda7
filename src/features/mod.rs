//! Per-object features of a normalized slice.
//!
//! For every synapse id present in a slice this computes the centroid (in
//! absolute coordinates), the pixel count and a detection uncertainty
//! derived from the classifier's probabilities: the average margin between
//! the two most likely classes, subtracted from one. Confident pixels have a
//! wide margin and pull the uncertainty towards zero.

use std::collections::BTreeMap;

use crate::error::SynaptrackError;
use crate::geometry::SliceRoi;
use crate::labels::{NormalizedLabelSlice, ProbabilitySlice};
use crate::model::{SkeletonNode, SynapseId, SynapseRecord};

#[derive(Default)]
struct ObjectAccumulator {
    pixels: u64,
    sum_x: f64,
    sum_y: f64,
    sum_margin: f64,
}

/// Checks that `probabilities` can be paired with a `width x height` label
/// slice.
///
/// # Errors
/// Returns a contract violation if the shapes differ or if there are fewer
/// than two channels (no margin can be computed).
pub fn check_probabilities(
    probabilities: &ProbabilitySlice,
    width: usize,
    height: usize,
) -> Result<(), SynaptrackError> {
    if probabilities.width() != width || probabilities.height() != height {
        return Err(SynaptrackError::ContractViolation(format!(
            "probability slice is {}x{} but the label slice is {}x{}",
            probabilities.width(),
            probabilities.height(),
            width,
            height
        )));
    }
    if probabilities.channels() < 2 {
        return Err(SynaptrackError::ContractViolation(format!(
            "detection uncertainty needs at least 2 probability channels, got {}",
            probabilities.channels()
        )));
    }
    Ok(())
}

/// Gap between the largest and second-largest entry.
fn top_two_margin(probabilities: &[f32]) -> f64 {
    let mut first = f64::NEG_INFINITY;
    let mut second = f64::NEG_INFINITY;
    for &p in probabilities {
        let p = f64::from(p);
        if p > first {
            second = first;
            first = p;
        } else if p > second {
            second = p;
        }
    }
    first - second
}

/// Rounds half up, matching how centroids are reported.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Produces one record per synapse id in `slice`, in ascending id order.
///
/// `roi` is the window the slice was computed over and `node` the skeleton
/// node it belongs to.
///
/// # Errors
/// See [`check_probabilities`]. A slice/ROI size mismatch is also a
/// contract violation.
pub fn extract_synapses(
    slice: &NormalizedLabelSlice,
    probabilities: &ProbabilitySlice,
    roi: &SliceRoi,
    node: &SkeletonNode,
) -> Result<Vec<SynapseRecord>, SynaptrackError> {
    check_probabilities(probabilities, slice.width(), slice.height())?;
    if slice.width() != roi.width() || slice.height() != roi.height() {
        return Err(SynaptrackError::ContractViolation(format!(
            "label slice is {}x{} but its ROI is {}x{}",
            slice.width(),
            slice.height(),
            roi.width(),
            roi.height()
        )));
    }

    let mut objects: BTreeMap<u32, ObjectAccumulator> = BTreeMap::new();
    for (x, y, label) in slice.pixels() {
        if label == 0 {
            continue;
        }
        let acc = objects.entry(label).or_default();
        acc.pixels += 1;
        acc.sum_x += x as f64;
        acc.sum_y += y as f64;
        acc.sum_margin += top_two_margin(probabilities.pixel(x, y));
    }

    let origin = roi.area.min();
    let records = objects
        .into_iter()
        .map(|(label, acc)| {
            let n = acc.pixels as f64;
            SynapseRecord {
                synapse_id: SynapseId::new(label),
                x_px: round_half_up(acc.sum_x / n + origin.x as f64),
                y_px: round_half_up(acc.sum_y / n + origin.y as f64),
                z_px: roi.plane,
                size_px: acc.pixels,
                detection_uncertainty: 1.0 - acc.sum_margin / n,
                node_id: node.id,
                node_x_px: node.x_px,
                node_y_px: node.y_px,
                node_z_px: node.z_px,
            }
        })
        .collect();
    Ok(records)
}
