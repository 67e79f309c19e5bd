use std::io::Write;

use crate::error::Result;
use crate::frame::Frame;
use crate::io::FrameSink;

/// Writes bare frame bytes back to back, e.g. into an encoder reading
/// rawvideo from a pipe.
pub struct RawVideoWriter<W: Write> {
    writer: W,
    frames_written: usize,
    bytes_written: u64,
}

impl<W: Write> RawVideoWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            frames_written: 0,
            bytes_written: 0,
        }
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> FrameSink for RawVideoWriter<W> {
    fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        self.writer.write_all(frame.data())?;
        self.frames_written += 1;
        self.bytes_written += frame.data().len() as u64;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn frames_written(&self) -> usize {
        self.frames_written
    }
}
