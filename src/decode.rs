//! The decode gate.
//!
//! One frame in, at most one payload out. Frames without a readable code are
//! the common case (blurry, partial, or simply no code in view), so every
//! decoder failure maps to "no payload" rather than an error. Built without
//! the `decode` feature the gate reports unavailable and the scanner
//! degrades to never detecting.

use crate::camera::Frame;

/// The gate as a seam: the controller talks to this trait so the scanner
/// logic can be exercised with scripted gates.
pub trait Gate {
    fn available(&self) -> bool;
    fn decode(&self, frame: &Frame) -> Option<String>;
}

/// The real decoder, or the always-empty stand-in when decoding is compiled out.
pub struct QrGate;

impl Gate for QrGate {
    fn available(&self) -> bool {
        available()
    }

    fn decode(&self, frame: &Frame) -> Option<String> {
        decode(frame)
    }
}

/// Whether decoding support was compiled in.
pub fn available() -> bool {
    cfg!(feature = "decode")
}

/// Decode the first QR code in a frame, if any.
///
/// Multiple codes in one frame surface only the first grid the detector
/// reports; the rest are ignored.
#[cfg(feature = "decode")]
pub fn decode(frame: &Frame) -> Option<String> {
    let rgba = image::RgbaImage::from_raw(frame.width, frame.height, frame.pixels.clone())?;
    let luma = image::DynamicImage::ImageRgba8(rgba).to_luma8();

    let mut prepared = rqrr::PreparedImage::prepare(luma);
    let grids = prepared.detect_grids();
    let grid = grids.into_iter().next()?;

    grid.decode().ok().map(|(_meta, content)| content)
}

#[cfg(not(feature = "decode"))]
pub fn decode(_frame: &Frame) -> Option<String> {
    None
}
