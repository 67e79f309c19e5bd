use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use crate::error::{DeshakeError, Result};
use crate::frame::Frame;
use crate::io::ser::{SerHeader, SER_HEADER_SIZE, SER_MAGIC};
use crate::io::FrameSink;

/// Byte offset of the FrameCount field inside the header.
const FRAME_COUNT_OFFSET: u64 = 38;

/// Writes a valid SER file at the raw byte level.
pub struct SerWriter {
    writer: BufWriter<File>,
    header: SerHeader,
    frames_written: u32,
    timestamps: Option<Vec<u64>>,
}

impl SerWriter {
    /// Create a new SER file and write the header.
    pub fn create(path: &Path, header: &SerHeader) -> Result<Self> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        write_header(&mut writer, header)?;
        Ok(Self {
            writer,
            header: header.clone(),
            frames_written: 0,
            timestamps: None,
        })
    }

    /// Timestamps (100 ns ticks) written as the trailer when the file is
    /// finished, one per written frame.
    pub fn with_timestamps(mut self, timestamps: Vec<u64>) -> Self {
        self.timestamps = Some(timestamps);
        self
    }

    /// Write a single raw frame (bytes must match the header's frame_byte_size).
    pub fn write_raw_frame(&mut self, data: &[u8]) -> Result<()> {
        let expected = self.header.frame_byte_size();
        if data.len() != expected {
            return Err(DeshakeError::FrameSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        self.writer.write_all(data)?;
        self.frames_written += 1;
        Ok(())
    }
}

impl FrameSink for SerWriter {
    fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        self.write_raw_frame(frame.data())
    }

    /// Write the timestamp trailer, patch the frame count and flush.
    fn finish(&mut self) -> Result<()> {
        let count = self.frames_written as usize;
        if let Some(ref timestamps) = self.timestamps {
            if timestamps.len() >= count {
                for &ts in &timestamps[..count] {
                    self.writer.write_all(&ts.to_le_bytes())?;
                }
            }
        }

        if self.frames_written != self.header.frame_count {
            self.writer.seek(SeekFrom::Start(FRAME_COUNT_OFFSET))?;
            self.writer
                .write_all(&(self.frames_written as i32).to_le_bytes())?;
            self.writer.seek(SeekFrom::End(0))?;
            self.header.frame_count = self.frames_written;
        }

        self.writer.flush()?;
        Ok(())
    }

    fn frames_written(&self) -> usize {
        self.frames_written as usize
    }
}

fn write_header(w: &mut impl Write, header: &SerHeader) -> Result<()> {
    // Magic (14 bytes)
    w.write_all(SER_MAGIC)?;
    // LuID (4 bytes)
    w.write_all(&0i32.to_le_bytes())?;
    // ColorID (4 bytes)
    w.write_all(&header.color_id.to_le_bytes())?;
    // LittleEndian flag: 0 = little-endian (Siril convention)
    let le_flag: i32 = if header.little_endian { 0 } else { 1 };
    w.write_all(&le_flag.to_le_bytes())?;
    // Width (4 bytes)
    w.write_all(&(header.width as i32).to_le_bytes())?;
    // Height (4 bytes)
    w.write_all(&(header.height as i32).to_le_bytes())?;
    // PixelDepth (4 bytes)
    w.write_all(&(header.pixel_depth as i32).to_le_bytes())?;
    // FrameCount (4 bytes)
    w.write_all(&(header.frame_count as i32).to_le_bytes())?;
    // Observer (40 bytes)
    write_fixed_string(w, &header.observer, 40)?;
    // Instrument (40 bytes)
    write_fixed_string(w, &header.instrument, 40)?;
    // Telescope (40 bytes)
    write_fixed_string(w, &header.telescope, 40)?;
    // DateTime (8 bytes)
    w.write_all(&header.date_time.to_le_bytes())?;
    // DateTimeUTC (8 bytes)
    w.write_all(&header.date_time_utc.to_le_bytes())?;

    debug_assert_eq!(
        14 + 4 + 4 + 4 + 4 + 4 + 4 + 4 + 40 + 40 + 40 + 8 + 8,
        SER_HEADER_SIZE
    );
    Ok(())
}

fn write_fixed_string(w: &mut impl Write, s: &str, len: usize) -> Result<()> {
    let bytes = s.as_bytes();
    let to_write = bytes.len().min(len);
    w.write_all(&bytes[..to_write])?;
    w.write_all(&vec![0u8; len - to_write])?;
    Ok(())
}
