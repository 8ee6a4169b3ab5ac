use crate::error::CaptureError;
use crate::grabber::Frame;

/// Convert a packed YUYV (YUV 4:2:2) buffer to RGB.
///
/// Rows may carry driver padding, so the stride is derived from the
/// buffer length rather than assumed to be `width * 2`.
pub fn yuyv_to_rgb(raw: &[u8], width: u32, height: u32) -> Result<Vec<u8>, CaptureError> {
    let row_bytes = (width as usize) * 2;
    let expected = row_bytes * height as usize;
    if raw.len() < expected {
        return Err(CaptureError::ShortFrame {
            expected,
            actual: raw.len(),
        });
    }

    let stride = raw.len() / height as usize;
    let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);

    for row in raw.chunks_exact(stride).take(height as usize) {
        for quad in row[..row_bytes].chunks_exact(4) {
            // Two pixels share one chroma sample: [Y0, Cb, Y1, Cr]
            let cb = quad[1] as i32 - 128;
            let cr = quad[3] as i32 - 128;

            // BT.601, 8-bit fixed point
            let r_off = (359 * cr) >> 8;
            let g_off = (88 * cb + 183 * cr) >> 8;
            let b_off = (454 * cb) >> 8;

            for &luma in [quad[0], quad[2]].iter() {
                let y = luma as i32;
                rgb.push((y + r_off).clamp(0, 255) as u8);
                rgb.push((y - g_off).clamp(0, 255) as u8);
                rgb.push((y + b_off).clamp(0, 255) as u8);
            }
        }
    }

    Ok(rgb)
}

/// Decode an MJPEG frame to RGB via libjpeg-turbo. Dimensions come from
/// the JPEG header, not the caller.
pub fn mjpeg_to_rgb(raw: &[u8]) -> Result<Frame, CaptureError> {
    let mut decompressor = turbojpeg::Decompressor::new().map_err(CaptureError::Decode)?;
    let header = decompressor.read_header(raw).map_err(CaptureError::Decode)?;

    let (width, height) = (header.width, header.height);
    let mut rgb = vec![0u8; width * height * 3];

    let output = turbojpeg::Image {
        pixels: rgb.as_mut_slice(),
        width,
        pitch: width * 3,
        height,
        format: turbojpeg::PixelFormat::RGB,
    };
    decompressor
        .decompress(raw, output)
        .map_err(CaptureError::Decode)?;

    Ok(Frame {
        width: width as u32,
        height: height as u32,
        rgb,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yuyv_neutral_gray_decodes_to_gray() {
        // One 2x1 row: Y=128 for both pixels, neutral chroma
        let raw = vec![128, 128, 128, 128];
        let rgb = yuyv_to_rgb(&raw, 2, 1).unwrap();
        assert_eq!(rgb.len(), 6);
        for channel in rgb {
            assert!((126..=130).contains(&channel));
        }
    }

    #[test]
    fn yuyv_rejects_truncated_buffer() {
        let raw = vec![0u8; 10];
        let err = yuyv_to_rgb(&raw, 4, 2).unwrap_err();
        assert!(matches!(
            err,
            CaptureError::ShortFrame {
                expected: 16,
                actual: 10
            }
        ));
    }

    #[test]
    fn yuyv_handles_padded_rows() {
        // 2x2 image with 2 bytes of padding per row (stride 6)
        let raw = vec![
            128, 128, 128, 128, 0, 0, //
            128, 128, 128, 128, 0, 0,
        ];
        let rgb = yuyv_to_rgb(&raw, 2, 2).unwrap();
        assert_eq!(rgb.len(), 12);
    }

    #[test]
    fn mjpeg_rejects_garbage() {
        let raw = vec![0, 1, 2, 3];
        assert!(matches!(
            mjpeg_to_rgb(&raw),
            Err(CaptureError::Decode(_))
        ));
    }
}
