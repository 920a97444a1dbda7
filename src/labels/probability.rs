//! Per-pixel class probabilities.

use crate::error::SynaptrackError;

/// A channels-last array of class probabilities, indexed `[y][x][channel]`.
///
/// Each pixel's vector is expected to sum to one, as produced by the pixel
/// classifier; this is not enforced.
#[derive(Clone, Debug, PartialEq)]
pub struct ProbabilitySlice {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<f32>,
}

impl ProbabilitySlice {
    /// Creates a probability slice from channels-last row-major data.
    pub fn new(
        width: usize,
        height: usize,
        channels: usize,
        data: Vec<f32>,
    ) -> Result<Self, SynaptrackError> {
        if data.len() != width * height * channels {
            return Err(SynaptrackError::ContractViolation(format!(
                "probability slice of {}x{}x{} needs {} values, got {}",
                width,
                height,
                channels,
                width * height * channels,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Creates a probability slice from nested `[y][x][channel]` vectors.
    pub fn from_nested(rows: &[Vec<Vec<f32>>]) -> Result<Self, SynaptrackError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let channels = rows
            .first()
            .and_then(|row| row.first())
            .map_or(0, Vec::len);

        let mut data = Vec::with_capacity(width * height * channels);
        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(SynaptrackError::ContractViolation(format!(
                    "ragged probability rows: row {} has {} pixels, expected {}",
                    y,
                    row.len(),
                    width
                )));
            }
            for (x, pixel) in row.iter().enumerate() {
                if pixel.len() != channels {
                    return Err(SynaptrackError::ContractViolation(format!(
                        "pixel ({}, {}) has {} channels, expected {}",
                        x,
                        y,
                        pixel.len(),
                        channels
                    )));
                }
                data.extend_from_slice(pixel);
            }
        }
        Self::new(width, height, channels, data)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Returns the probability vector of the pixel at `(x, y)`.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> &[f32] {
        let start = (y * self.width + x) * self.channels;
        &self.data[start..start + self.channels]
    }
}
