use std::path::PathBuf;

use crate::consts::{BYTES_PER_PIXEL, LUMINANCE_B, LUMINANCE_G, LUMINANCE_R};
use crate::error::{DeshakeError, Result};

/// Order of the three interleaved channel bytes of a pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PixelLayout {
    #[default]
    Bgr,
    Rgb,
}

impl PixelLayout {
    /// BT.601 luma of one pixel, rounded to the nearest 8-bit level.
    pub fn luma(self, pixel: &[u8]) -> u8 {
        let (r, g, b) = match self {
            Self::Bgr => (pixel[2], pixel[1], pixel[0]),
            Self::Rgb => (pixel[0], pixel[1], pixel[2]),
        };
        let y = LUMINANCE_R * r as f32 + LUMINANCE_G * g as f32 + LUMINANCE_B * b as f32;
        y.round().clamp(0.0, 255.0) as u8
    }
}

impl std::fmt::Display for PixelLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bgr => write!(f, "BGR"),
            Self::Rgb => write!(f, "RGB"),
        }
    }
}

/// A single 8-bit, 3-channel video frame.
///
/// Pixel bytes are row-major and interleaved, `width * height * 3` bytes long.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    width: usize,
    height: usize,
    layout: PixelLayout,
    data: Vec<u8>,
    pub metadata: FrameMetadata,
}

impl Frame {
    pub fn new(width: usize, height: usize, layout: PixelLayout, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(DeshakeError::InvalidDimensions {
                width: width as u32,
                height: height as u32,
            });
        }
        let expected = width * height * BYTES_PER_PIXEL;
        if data.len() != expected {
            return Err(DeshakeError::FrameSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            layout,
            data,
            metadata: FrameMetadata::default(),
        })
    }

    /// An all-zero frame with the given geometry.
    pub fn black(width: usize, height: usize, layout: PixelLayout) -> Result<Self> {
        Self::new(width, height, layout, vec![0; width * height * BYTES_PER_PIXEL])
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width * BYTES_PER_PIXEL
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn row(&self, y: usize) -> &[u8] {
        let stride = self.stride();
        &self.data[y * stride..(y + 1) * stride]
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let stride = self.stride();
        &mut self.data[y * stride..(y + 1) * stride]
    }

    /// The three bytes of pixel `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let start = x * BYTES_PER_PIXEL;
        &self.row(y)[start..start + BYTES_PER_PIXEL]
    }

    /// Grayscale intensity of pixel `(x, y)`.
    pub fn luma(&self, x: usize, y: usize) -> u8 {
        self.layout.luma(self.pixel(x, y))
    }

    pub fn same_geometry(&self, other: &Frame) -> bool {
        self.width == other.width && self.height == other.height && self.layout == other.layout
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameMetadata {
    pub frame_index: usize,
    pub timestamp: Option<u64>,
}

/// Metadata about the source video.
#[derive(Clone, Debug)]
pub struct SourceInfo {
    pub filename: PathBuf,
    pub total_frames: usize,
    pub width: u32,
    pub height: u32,
    pub layout: PixelLayout,
    pub frame_rate: Option<f64>,
    pub observer: Option<String>,
    pub telescope: Option<String>,
    pub instrument: Option<String>,
}
