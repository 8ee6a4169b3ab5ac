use crate::error::CaptureError;
use crate::grabber::Frame;

/// Seam for turning a frame into compressed bytes, mirroring the
/// `FrameGrabber` seam on the acquisition side.
pub trait FrameEncoder {
    fn encode(&mut self, frame: &Frame) -> Result<Vec<u8>, CaptureError>;
}

/// RGB to JPEG compressor with a fixed quality setting.
pub struct JpegEncoder {
    compressor: turbojpeg::Compressor,
}

impl JpegEncoder {
    pub fn new(quality: i32) -> Result<Self, CaptureError> {
        let mut compressor = turbojpeg::Compressor::new().map_err(CaptureError::Encode)?;
        compressor.set_quality(quality).map_err(CaptureError::Encode)?;
        compressor
            .set_subsamp(turbojpeg::Subsamp::Sub2x2)
            .map_err(CaptureError::Encode)?;
        Ok(Self { compressor })
    }
}

impl FrameEncoder for JpegEncoder {
    /// Compress a frame into a fresh JPEG byte buffer.
    fn encode(&mut self, frame: &Frame) -> Result<Vec<u8>, CaptureError> {
        let image = turbojpeg::Image {
            pixels: frame.rgb.as_slice(),
            width: frame.width as usize,
            pitch: frame.width as usize * 3,
            height: frame.height as usize,
            format: turbojpeg::PixelFormat::RGB,
        };
        self.compressor
            .compress_to_vec(image)
            .map_err(CaptureError::Encode)
    }
}
