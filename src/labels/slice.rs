//! Dense 2D label arrays.

use std::collections::BTreeSet;
use std::marker::PhantomData;

use super::kind::{Normalized, Raw};
use crate::error::SynaptrackError;
use crate::geometry::{Local, Roi};

/// A row-major 2D array of labels, indexed `[y][x]`.
///
/// Label `0` is background. The `TKind` parameter is [`Raw`] or
/// [`Normalized`].
#[derive(Clone, PartialEq, Eq)]
pub struct LabelSlice<TKind> {
    width: usize,
    height: usize,
    data: Vec<u32>,
    _kind: PhantomData<TKind>,
}

/// Per-slice connected-component labels.
pub type RawLabelSlice = LabelSlice<Raw>;

/// Globally consistent synapse ids.
pub type NormalizedLabelSlice = LabelSlice<Normalized>;

impl<TKind> LabelSlice<TKind> {
    /// Creates a slice from row-major data.
    ///
    /// # Errors
    /// Returns a contract violation if `data.len() != width * height` or if
    /// the slice would be empty.
    pub fn new(width: usize, height: usize, data: Vec<u32>) -> Result<Self, SynaptrackError> {
        if width == 0 || height == 0 {
            return Err(SynaptrackError::ContractViolation(format!(
                "label slice must not be empty (got {}x{})",
                width, height
            )));
        }
        if data.len() != width * height {
            return Err(SynaptrackError::ContractViolation(format!(
                "label slice of {}x{} needs {} values, got {}",
                width,
                height,
                width * height,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
            _kind: PhantomData,
        })
    }

    /// Creates an all-background slice.
    pub fn zeros(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
            _kind: PhantomData,
        }
    }

    /// Creates a slice from rows of labels. All rows must have equal length.
    pub fn from_rows<R: AsRef<[u32]>>(rows: &[R]) -> Result<Self, SynaptrackError> {
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(SynaptrackError::ContractViolation(format!(
                    "ragged label rows: row {} has {} values, expected {}",
                    y,
                    row.len(),
                    width
                )));
            }
            data.extend_from_slice(row);
        }
        Self::new(width, rows.len(), data)
    }

    /// Creates a slice from signed values, as produced by tools that do not
    /// distinguish label widths.
    ///
    /// # Errors
    /// Returns a contract violation for negative labels and for labels that
    /// do not fit in a `u32`.
    pub fn from_signed(width: usize, height: usize, values: &[i64]) -> Result<Self, SynaptrackError> {
        let data = values
            .iter()
            .map(|&v| {
                u32::try_from(v).map_err(|_| {
                    SynaptrackError::ContractViolation(if v < 0 {
                        format!("negative label {} in raw slice", v)
                    } else {
                        format!("label {} exceeds the 32-bit label range", v)
                    })
                })
            })
            .collect::<Result<Vec<u32>, _>>()?;
        Self::new(width, height, data)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the label at `(x, y)`.
    ///
    /// # Panics
    /// Panics if the position lies outside the slice.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u32 {
        assert!(x < self.width && y < self.height, "({x}, {y}) out of bounds");
        self.data[y * self.width + x]
    }

    /// Returns the labels in row-major order.
    #[inline]
    pub fn as_slice(&self) -> &[u32] {
        &self.data
    }

    /// Iterates over `(x, y, label)` for every pixel.
    pub fn pixels(&self) -> impl Iterator<Item = (usize, usize, u32)> + '_ {
        let width = self.width;
        self.data
            .iter()
            .enumerate()
            .map(move |(i, &label)| (i % width, i / width, label))
    }

    /// Returns the distinct nonzero labels, ascending.
    pub fn distinct_labels(&self) -> BTreeSet<u32> {
        self.data.iter().copied().filter(|&l| l != 0).collect()
    }

    /// Returns true if the slice contains no objects.
    pub fn is_background(&self) -> bool {
        self.data.iter().all(|&l| l == 0)
    }

    /// Iterates over the labels inside `region`, row by row.
    ///
    /// # Panics
    /// Panics if `region` is not contained in the slice.
    pub fn window(&self, region: &Roi<Local>) -> impl Iterator<Item = u32> + '_ {
        let (min, max) = (region.min(), region.max());
        assert!(
            min.x >= 0 && min.y >= 0 && max.x as usize <= self.width && max.y as usize <= self.height,
            "window {:?} exceeds {}x{} slice",
            region,
            self.width,
            self.height
        );
        let (x0, x1) = (min.x as usize, max.x as usize);
        (min.y as usize..max.y as usize)
            .flat_map(move |y| self.data[y * self.width + x0..y * self.width + x1].iter().copied())
    }

    /// Applies `f` to every label, producing a slice of another kind.
    pub(crate) fn map_labels<TOther>(&self, mut f: impl FnMut(u32) -> u32) -> LabelSlice<TOther> {
        LabelSlice {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&l| f(l)).collect(),
            _kind: PhantomData,
        }
    }
}

impl<TKind> std::fmt::Debug for LabelSlice<TKind> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut rows = f.debug_list();
        for row in self.data.chunks(self.width.max(1)) {
            rows.entry(&row);
        }
        rows.finish()
    }
}
