pub mod decoder;
pub mod device;
pub mod encoder;
pub mod error;
pub mod grabber;

pub use encoder::{FrameEncoder, JpegEncoder};
pub use error::CaptureError;
pub use grabber::{CameraGrabber, Frame, FrameGrabber};
