use super::ResponseLine;
use crate::error::Result;
use std::io::Write;

/// Writes one JSON object per line.
pub struct ResponseWriter<W: Write> {
    sink: W,
}

impl<W: Write> ResponseWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn write(&mut self, response: &ResponseLine) -> Result<()> {
        serde_json::to_writer(&mut self.sink, response)?;
        self.sink.write_all(b"\n")?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }
}
