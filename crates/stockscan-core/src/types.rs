use crate::{
    Result,
    constants::BYTES_PER_PIXEL,
    error::Error,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Detection backend tier.
///
/// The set is closed: engines are selected among exactly these three tiers,
/// ranked by hardware affinity (native first, pure software last).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    /// Platform-provided, usually hardware-accelerated detector.
    Native,

    /// Dynamically loaded ZBar decoder, strongest on retail linear codes.
    Zbar,

    /// Pure software matrix-code decoder. Always available.
    Jsqr,
}

impl EngineKind {
    /// All tiers in ranked order, best first.
    pub const RANKED: [EngineKind; 3] = [EngineKind::Native, EngineKind::Zbar, EngineKind::Jsqr];

    /// Canonical tier identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use stockscan_core::EngineKind;
    ///
    /// assert_eq!(EngineKind::Zbar.tier_id(), "zbar-tier");
    /// ```
    #[must_use]
    pub fn tier_id(self) -> &'static str {
        match self {
            EngineKind::Native => "native-tier",
            EngineKind::Zbar => "zbar-tier",
            EngineKind::Jsqr => "jsqr-tier",
        }
    }

    /// Whether the tier can read linear (1D) symbologies.
    #[must_use]
    pub fn supports_1d(self) -> bool {
        !matches!(self, EngineKind::Jsqr)
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.tier_id())
    }
}

impl std::str::FromStr for EngineKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "native" | "native-tier" => Ok(EngineKind::Native),
            "zbar" | "zbar-tier" => Ok(EngineKind::Zbar),
            "jsqr" | "jsqr-tier" => Ok(EngineKind::Jsqr),
            other => Err(Error::Config(format!("Unknown engine tier: {other}"))),
        }
    }
}

/// A point in frame pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in frame pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest rectangle enclosing every point.
    ///
    /// Returns `None` for an empty slice.
    ///
    /// # Examples
    ///
    /// ```
    /// use stockscan_core::{BoundingBox, Point};
    ///
    /// let points = [
    ///     Point::new(10.0, 20.0),
    ///     Point::new(110.0, 25.0),
    ///     Point::new(105.0, 70.0),
    ///     Point::new(12.0, 65.0),
    /// ];
    /// let bbox = BoundingBox::from_points(&points).unwrap();
    /// assert_eq!(bbox, BoundingBox::new(10.0, 20.0, 100.0, 50.0));
    /// ```
    #[must_use]
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);

        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        Some(Self::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }
}

/// One decode result from a single frame.
///
/// Produced per `detect` call and never persisted by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedBarcode {
    /// Decoded text.
    pub raw_value: String,

    /// Canonical symbology name (see [`constants`](crate::constants)).
    pub format: String,

    /// Location of the symbol, when the backend knows it.
    pub bounding_box: Option<BoundingBox>,

    /// Ordered outline of the symbol; four points for quadrilateral symbols.
    /// Empty when the backend reports no geometry.
    pub corner_points: Vec<Point>,
}

impl DetectedBarcode {
    pub fn new(raw_value: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            raw_value: raw_value.into(),
            format: format.into(),
            bounding_box: None,
            corner_points: Vec::new(),
        }
    }

    /// Set the bounding box.
    pub fn with_bounding_box(mut self, bounding_box: BoundingBox) -> Self {
        self.bounding_box = Some(bounding_box);
        self
    }

    /// Set the corner points.
    pub fn with_corner_points(mut self, corner_points: Vec<Point>) -> Self {
        self.corner_points = corner_points;
        self
    }
}

/// An accepted scan handed to inventory and order collaborators.
///
/// The code is guaranteed non-empty. Collaborators should treat it as an
/// opaque identifier and may run it through the check-digit validator
/// before trusting it for data entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    code: String,
    format: String,
    timestamp: DateTime<Utc>,
}

impl ScanResult {
    /// Create a scan result stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyCode` if `code` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use stockscan_core::ScanResult;
    ///
    /// let scan = ScanResult::new("036000291452", "UPC_A").unwrap();
    /// assert_eq!(scan.code(), "036000291452");
    ///
    /// assert!(ScanResult::new("", "UPC_A").is_err());
    /// ```
    pub fn new(code: impl Into<String>, format: impl Into<String>) -> Result<Self> {
        Self::with_timestamp(code, format, Utc::now())
    }

    /// Create a scan result with an explicit timestamp.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyCode` if `code` is empty.
    pub fn with_timestamp(
        code: impl Into<String>,
        format: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Result<Self> {
        let code = code.into();
        if code.is_empty() {
            return Err(Error::EmptyCode);
        }

        Ok(Self {
            code,
            format: format.into(),
            timestamp,
        })
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[must_use]
    pub fn format(&self) -> &str {
        &self.format
    }

    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl fmt::Display for ScanResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.code, self.format)
    }
}

/// A captured video frame as tightly packed RGBA8 pixels.
///
/// The backing storage is reference counted, so cloning a frame to hand it
/// to an engine does not copy pixel data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Bytes,
}

impl PixelBuffer {
    /// Wrap RGBA8 pixel data.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero or if `data` is not
    /// exactly `width * height * 4` bytes.
    pub fn new(width: u32, height: u32, data: impl Into<Bytes>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::ZeroDimensions { width, height });
        }

        let data = data.into();
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if data.len() != expected {
            return Err(Error::InvalidFrame {
                message: format!(
                    "{width}x{height} RGBA frame needs {expected} bytes, got {}",
                    data.len()
                ),
            });
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build an RGBA frame from 8-bit grayscale samples.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero or if `luma` is not
    /// exactly `width * height` bytes.
    pub fn from_luma(width: u32, height: u32, luma: &[u8]) -> Result<Self> {
        let expected = width as usize * height as usize;
        if luma.len() != expected {
            return Err(Error::InvalidFrame {
                message: format!(
                    "{width}x{height} luma frame needs {expected} bytes, got {}",
                    luma.len()
                ),
            });
        }

        let mut data = Vec::with_capacity(expected * BYTES_PER_PIXEL);
        for &v in luma {
            data.extend_from_slice(&[v, v, v, 0xFF]);
        }
        Self::new(width, height, data)
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, row-major.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Convert to 8-bit grayscale using integer BT.601 weights.
    #[must_use]
    pub fn luma(&self) -> Vec<u8> {
        self.data
            .chunks_exact(BYTES_PER_PIXEL)
            .map(|px| {
                let (r, g, b) = (px[0] as u32, px[1] as u32, px[2] as u32);
                ((77 * r + 150 * g + 29 * b) >> 8) as u8
            })
            .collect()
    }
}
