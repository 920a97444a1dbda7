#![allow(dead_code)]

use synaptrack::geometry::SliceRoi;
use synaptrack::labels::RawLabelSlice;

/// Side length of one grid cell of a synthetic scene, in pixels.
pub const CELL: i64 = 5;

/// Number of cells along each axis.
pub const GRID: i64 = 4;

/// Absolute rectangle `(x0, y0, x1, y1)` of the object living in `cell`.
///
/// Objects sit inside their cell with a one-pixel margin, so two objects
/// never touch.
pub fn object_rect(cell: usize) -> (i64, i64, i64, i64) {
    let cx = cell as i64 % GRID;
    let cy = cell as i64 / GRID;
    (
        cx * CELL + 1,
        cy * CELL + 1,
        cx * CELL + CELL - 1,
        cy * CELL + CELL - 1,
    )
}

/// A physical object: grid cell and visible plane range.
#[derive(Clone, Copy, Debug)]
pub struct Object {
    pub cell: usize,
    pub z_start: i64,
    pub z_end: i64,
}

impl Object {
    pub fn covers(&self, x: i64, y: i64, z: i64) -> bool {
        let (x0, y0, x1, y1) = object_rect(self.cell);
        z >= self.z_start && z < self.z_end && x >= x0 && x < x1 && y >= y0 && y < y1
    }
}

/// Renders the raw labeling of `roi`, plus the ground-truth object index of
/// every pixel (`None` for background).
///
/// Raw labels are scrambled per slice with `label_shift` so they carry no
/// meaning across slices.
pub fn render(
    objects: &[Object],
    roi: &SliceRoi,
    label_shift: u32,
) -> (RawLabelSlice, Vec<Option<usize>>) {
    let min = roi.area.min();
    let mut labels = Vec::with_capacity(roi.width() * roi.height());
    let mut truth = Vec::with_capacity(roi.width() * roi.height());
    for y in 0..roi.height() as i64 {
        for x in 0..roi.width() as i64 {
            let hit = objects
                .iter()
                .position(|o| o.covers(min.x + x, min.y + y, roi.plane));
            truth.push(hit);
            labels.push(match hit {
                Some(index) => (objects[index].cell as u32 + label_shift) % 64 + 1,
                None => 0,
            });
        }
    }
    let slice = RawLabelSlice::new(roi.width(), roi.height(), labels).expect("consistent shape");
    (slice, truth)
}
