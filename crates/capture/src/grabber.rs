use crate::decoder;
use crate::device::{OpenCamera, SelectedFormat, open_device};
use crate::error::CaptureError;
use v4l::{
    buffer::Type,
    io::{mmap::Stream, traits::CaptureStream},
};

const BUFFER_COUNT: u32 = 4;

/// Frames to discard after stream start so auto-exposure settles before
/// the one frame we keep.
const WARMUP_FRAME_COUNT: usize = 4;

/// A single decoded RGB frame (3 bytes per pixel).
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

/// Hardware seam: anything that can produce one frame on demand.
pub trait FrameGrabber {
    fn grab(&mut self) -> Result<Frame, CaptureError>;
}

/// Grabs single frames from a V4L2 device. The device is opened and
/// released inside each call; no handle survives between grabs.
pub struct CameraGrabber {
    device_index: u32,
}

impl CameraGrabber {
    pub fn new(device_index: u32) -> Self {
        Self { device_index }
    }

    /// Startup diagnostic: open the device, query its capabilities and
    /// release it again.
    pub fn probe(device_index: u32) -> Result<(), CaptureError> {
        let device = open_device(device_index)?;
        let caps = device.query_caps().map_err(CaptureError::Open)?;
        tracing::info!("Camera check successful: {} ({})", caps.card, caps.driver);
        Ok(())
    }
}

impl FrameGrabber for CameraGrabber {
    fn grab(&mut self) -> Result<Frame, CaptureError> {
        let camera = OpenCamera::open(self.device_index)?;

        let mut stream = Stream::with_buffers(&camera.device, Type::VideoCapture, BUFFER_COUNT)
            .map_err(CaptureError::Stream)?;

        for _ in 0..WARMUP_FRAME_COUNT {
            let _ = stream.next();
        }

        let (raw, _meta) = stream.next().map_err(CaptureError::Read)?;

        let frame = match camera.format {
            SelectedFormat::Yuyv => Frame {
                width: camera.width,
                height: camera.height,
                rgb: decoder::yuyv_to_rgb(raw, camera.width, camera.height)?,
            },
            SelectedFormat::Mjpeg => decoder::mjpeg_to_rgb(raw)?,
        };

        // stream and device drop here; the camera is free again
        Ok(frame)
    }
}
