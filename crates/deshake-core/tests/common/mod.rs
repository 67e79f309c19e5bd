use deshake_core::frame::{Frame, PixelLayout};
use deshake_core::io::ser::{SER_COLOR_BGR, SER_HEADER_SIZE};

/// Picture texture: bright enough to never read as pure black, varied enough
/// to catch an off-by-one shift.
pub fn texture(x: usize, y: usize) -> [u8; 3] {
    let v = 100 + ((x * 7 + y * 3) % 120) as u8;
    [v, v.wrapping_add(10), v.wrapping_sub(20)]
}

/// Frame whose picture is framed by `left` black columns on the left and
/// `right` black columns on the right. Picture pixel `(x, y)` is
/// `texture(x - left, y)`, so two frames with the same picture width hold
/// the same picture at different offsets.
pub fn bordered_frame(width: usize, height: usize, left: usize, right: usize) -> Frame {
    let rows: Vec<(usize, usize)> = vec![(left, right); height];
    bordered_frame_rows(width, &rows)
}

/// Like [`bordered_frame`], with its own `(left, right)` border per row.
pub fn bordered_frame_rows(width: usize, rows: &[(usize, usize)]) -> Frame {
    let height = rows.len();
    let mut data = vec![0u8; width * height * 3];
    for (y, &(left, right)) in rows.iter().enumerate() {
        for x in left..width - right {
            let i = (y * width + x) * 3;
            data[i..i + 3].copy_from_slice(&texture(x - left, y));
        }
    }
    Frame::new(width, height, PixelLayout::Bgr, data).unwrap()
}

/// Frame filled edge to edge with picture, with no border on either side.
pub fn borderless_frame(width: usize, height: usize) -> Frame {
    bordered_frame(width, height, 0, 0)
}

/// Build a SER file header with configurable bit depth and color mode.
pub fn build_ser_header_full(
    width: u32,
    height: u32,
    bit_depth: u32,
    num_frames: usize,
    color_id: i32,
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(SER_HEADER_SIZE);

    // Magic (14 bytes)
    buf.extend_from_slice(b"LUCAM-RECORDER");
    // LuID (4 bytes)
    buf.extend_from_slice(&0i32.to_le_bytes());
    // ColorID (4 bytes)
    buf.extend_from_slice(&color_id.to_le_bytes());
    // LittleEndian = 0 (little-endian per Siril convention)
    buf.extend_from_slice(&0i32.to_le_bytes());
    // Width
    buf.extend_from_slice(&(width as i32).to_le_bytes());
    // Height
    buf.extend_from_slice(&(height as i32).to_le_bytes());
    // PixelDepth
    buf.extend_from_slice(&(bit_depth as i32).to_le_bytes());
    // FrameCount
    buf.extend_from_slice(&(num_frames as i32).to_le_bytes());
    // Observer (40 bytes)
    let mut observer = [0u8; 40];
    observer[..4].copy_from_slice(b"Test");
    buf.extend_from_slice(&observer);
    // Instrument (40 bytes)
    buf.extend_from_slice(&[0u8; 40]);
    // Telescope (40 bytes)
    let mut telescope = [0u8; 40];
    telescope[..3].copy_from_slice(b"VCR");
    buf.extend_from_slice(&telescope);
    // DateTime (8 bytes)
    buf.extend_from_slice(&0u64.to_le_bytes());
    // DateTimeUTC (8 bytes)
    buf.extend_from_slice(&0u64.to_le_bytes());

    assert_eq!(buf.len(), SER_HEADER_SIZE);
    buf
}

/// Build a complete BGR 8-bit SER file from `frames`, with an optional
/// timestamp trailer.
pub fn build_ser_with_frames(frames: &[Frame], timestamps: Option<&[u64]>) -> Vec<u8> {
    let first = &frames[0];
    let mut buf = build_ser_header_full(
        first.width() as u32,
        first.height() as u32,
        8,
        frames.len(),
        SER_COLOR_BGR,
    );
    for frame in frames {
        buf.extend_from_slice(frame.data());
    }
    if let Some(ts) = timestamps {
        for t in ts {
            buf.extend_from_slice(&t.to_le_bytes());
        }
    }
    buf
}

/// Write a SER buffer to a temporary file and return the temp file handle.
///
/// The file stays alive as long as the returned `NamedTempFile` is not dropped.
pub fn write_test_ser(data: &[u8]) -> tempfile::NamedTempFile {
    use std::io::Write;
    let mut f = tempfile::NamedTempFile::new().expect("create temp file");
    f.write_all(data).expect("write SER data");
    f.flush().expect("flush");
    f
}
