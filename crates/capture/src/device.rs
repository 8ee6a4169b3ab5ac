use crate::error::CaptureError;
use v4l::{Device, FourCC, video::Capture};

const FOURCC_YUYV: FourCC = FourCC { repr: *b"YUYV" };
const FOURCC_MJPG: FourCC = FourCC { repr: *b"MJPG" };

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectedFormat {
    Yuyv,
    Mjpeg,
}

/// A camera opened for a single acquisition, with its negotiated format.
pub struct OpenCamera {
    pub device: Device,
    pub width: u32,
    pub height: u32,
    pub format: SelectedFormat,
}

fn find_usable_device() -> Option<usize> {
    v4l::context::enum_devices()
        .into_iter()
        .find(|dev| {
            Device::with_path(dev.path())
                .and_then(|d| d.query_caps())
                .map(|caps| {
                    caps.capabilities
                        .contains(v4l::capability::Flags::VIDEO_CAPTURE)
                })
                .unwrap_or(false)
        })
        .map(|dev| dev.index())
}

/// Open the configured device index, scanning for any usable capture
/// device if that index is busy or missing.
pub(crate) fn open_device(index: u32) -> Result<Device, CaptureError> {
    if let Ok(dev) = Device::new(index as usize)
        && dev.query_caps().is_ok()
    {
        return Ok(dev);
    }

    tracing::debug!("Camera index {} busy or missing, scanning alternatives", index);

    let fallback = find_usable_device().ok_or(CaptureError::NoDevice)?;
    Device::new(fallback).map_err(CaptureError::Open)
}

/// Pick a pixel format the decoder can handle: YUYV first, MJPEG second.
fn select_format(device: &Device) -> Result<SelectedFormat, CaptureError> {
    let formats = device.enum_formats().map_err(CaptureError::Open)?;

    if formats.iter().any(|f| f.fourcc == FOURCC_YUYV) {
        return Ok(SelectedFormat::Yuyv);
    }
    if formats.iter().any(|f| f.fourcc == FOURCC_MJPG) {
        return Ok(SelectedFormat::Mjpeg);
    }

    let available = formats
        .iter()
        .map(|f| format!("{:?}", f.fourcc))
        .collect::<Vec<_>>()
        .join(", ");
    Err(CaptureError::NoSupportedFormat { available })
}

impl OpenCamera {
    pub fn open(index: u32) -> Result<Self, CaptureError> {
        let device = open_device(index)?;

        let caps = device.query_caps().map_err(CaptureError::Open)?;
        tracing::info!("Camera opened: {} ({})", caps.card, caps.driver);

        let selected = select_format(&device)?;
        let fourcc = match selected {
            SelectedFormat::Yuyv => FOURCC_YUYV,
            SelectedFormat::Mjpeg => FOURCC_MJPG,
        };

        let mut format = device.format().map_err(CaptureError::Open)?;
        format.fourcc = fourcc;
        let format = device.set_format(&format).map_err(CaptureError::Open)?;

        tracing::debug!(
            "Capture format: {}x{} {:?}",
            format.width,
            format.height,
            format.fourcc
        );

        Ok(Self {
            device,
            width: format.width,
            height: format.height,
            format: selected,
        })
    }
}
