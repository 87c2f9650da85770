//! Frame acquisition.
//!
//! The scanner consumes frames through the `FrameSource` trait. Sources are
//! read-only collaborators: no exposure, focus, or format control beyond the
//! initial open. A source that is unavailable (no hardware, access denied,
//! feature compiled out) never yields a frame, which the controller treats
//! the same as "no code in view".

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// A raw RGBA pixel buffer at the source's configured resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl Frame {
    /// Build a frame, rejecting buffers that disagree with the dimensions.
    pub fn from_rgba(pixels: Vec<u8>, width: u32, height: u32) -> Option<Frame> {
        if pixels.len() as u64 != u64::from(width) * u64::from(height) * 4 {
            return None;
        }
        Some(Frame { pixels, width, height })
    }

    /// An all-black frame. No decoder will find a code in it.
    pub fn blank(width: u32, height: u32) -> Frame {
        Frame {
            pixels: vec![0; width as usize * height as usize * 4],
            width,
            height,
        }
    }

    /// Luminance of the pixel at (x, y), for preview rendering.
    pub fn luma_at(&self, x: u32, y: u32) -> u8 {
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let r = u32::from(self.pixels[idx]);
        let g = u32::from(self.pixels[idx + 1]);
        let b = u32::from(self.pixels[idx + 2]);
        // integer Rec. 601 weights
        ((r * 299 + g * 587 + b * 114) / 1000) as u8
    }
}

pub trait FrameSource {
    fn name(&self) -> &'static str;
    fn available(&self) -> bool;
    /// The current frame, or `None` when none is ready.
    fn frame(&mut self) -> Option<Frame>;
}

/// A source with nothing behind it. Stands in when no camera can be opened
/// so the scanner runs (and never detects) instead of aborting.
pub struct NullSource;

impl FrameSource for NullSource {
    fn name(&self) -> &'static str {
        "none"
    }

    fn available(&self) -> bool {
        false
    }

    fn frame(&mut self) -> Option<Frame> {
        None
    }
}

/// Feeds pre-loaded frames one per call. Backs the one-shot decode command
/// and lets tests exercise the pipeline without hardware.
pub struct StillSource {
    frames: VecDeque<Frame>,
}

impl StillSource {
    pub fn from_frames(frames: Vec<Frame>) -> StillSource {
        StillSource {
            frames: frames.into(),
        }
    }

    /// Load image files as frames. Unreadable files become diagnostics, not
    /// errors; the remaining files still decode.
    pub fn from_paths(paths: &[PathBuf]) -> (StillSource, Vec<String>) {
        let mut frames = VecDeque::new();
        let mut diagnostics = Vec::new();

        for path in paths {
            match load_frame(path) {
                Ok(frame) => frames.push_back(frame),
                Err(e) => diagnostics.push(e),
            }
        }

        (StillSource { frames }, diagnostics)
    }
}

/// Load an image file as an RGBA frame.
pub fn load_frame(path: &Path) -> Result<Frame, String> {
    let img = image::open(path).map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Frame::from_rgba(rgba.into_raw(), width, height)
        .ok_or_else(|| format!("{}: inconsistent pixel buffer", path.display()))
}

impl FrameSource for StillSource {
    fn name(&self) -> &'static str {
        "still"
    }

    fn available(&self) -> bool {
        !self.frames.is_empty()
    }

    fn frame(&mut self) -> Option<Frame> {
        self.frames.pop_front()
    }
}

#[cfg(feature = "camera")]
pub use live::CameraSource;

#[cfg(feature = "camera")]
mod live {
    use super::{Frame, FrameSource};

    use nokhwa::pixel_format::RgbAFormat;
    use nokhwa::utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    };
    use nokhwa::Camera;

    /// Live capture via nokhwa. A camera that cannot be opened degrades to
    /// an unavailable source rather than failing startup.
    pub struct CameraSource {
        camera: Option<Camera>,
    }

    impl CameraSource {
        pub fn open(index: u32, width: u32, height: u32) -> (CameraSource, Vec<String>) {
            let mut diagnostics = Vec::new();
            let requested = RequestedFormat::new::<RgbAFormat>(RequestedFormatType::Closest(
                CameraFormat::new(Resolution::new(width, height), FrameFormat::MJPEG, 30),
            ));

            let camera = match Camera::new(CameraIndex::Index(index), requested) {
                Ok(mut cam) => match cam.open_stream() {
                    Ok(()) => Some(cam),
                    Err(e) => {
                        diagnostics.push(format!("camera {index}: failed to start stream: {e}"));
                        None
                    }
                },
                Err(e) => {
                    diagnostics.push(format!("camera {index}: failed to open: {e}"));
                    None
                }
            };

            (CameraSource { camera }, diagnostics)
        }
    }

    impl FrameSource for CameraSource {
        fn name(&self) -> &'static str {
            "camera"
        }

        fn available(&self) -> bool {
            self.camera.is_some()
        }

        fn frame(&mut self) -> Option<Frame> {
            let camera = self.camera.as_mut()?;
            // a grab that fails this tick is just "no frame yet"
            let buffer = camera.frame().ok()?;
            let decoded = buffer.decode_image::<RgbAFormat>().ok()?;
            let (width, height) = decoded.dimensions();
            Frame::from_rgba(decoded.into_raw(), width, height)
        }
    }
}
