use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("failed to open camera device: {0}")]
    Open(#[source] io::Error),

    #[error("no usable video capture device found")]
    NoDevice,

    #[error("camera supports neither YUYV nor MJPEG (available: {available})")]
    NoSupportedFormat { available: String },

    #[error("failed to start capture stream: {0}")]
    Stream(#[source] io::Error),

    #[error("failed to read frame: {0}")]
    Read(#[source] io::Error),

    #[error("frame buffer too short: got {actual} bytes, need {expected}")]
    ShortFrame { expected: usize, actual: usize },

    #[error("failed to decode frame: {0}")]
    Decode(#[source] turbojpeg::Error),

    #[error("failed to encode JPEG: {0}")]
    Encode(#[source] turbojpeg::Error),
}
