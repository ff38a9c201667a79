use crate::error::Error;
use std::io::{Stdout, Write};

/// Write all stdout outputs in the app
///
/// In either plain text mode or structured (e.g. JSON).
#[derive(Default)]
pub struct Writer {
    is_structured: bool,
}

impl Writer {
    pub fn new(is_structured: bool) -> Self {
        Writer { is_structured }
    }

    /// Output plain text
    ///
    /// Prints out nothing but a warning (in warn log level) when the writer is in structured mode.
    pub fn text(&self, output: &str) -> Result<(), Error> {
        if self.is_structured {
            log::warn!("Skipping output (not structured data): {output}");
            return Ok(());
        }

        self.write(output)
    }

    /// Output serialized JSON, one document per line
    ///
    /// Prints out nothing but a warning (in warn log level) when the writer is in plain text mode.
    pub fn json(&self, output: serde_json::Value) -> Result<(), Error> {
        if !self.is_structured {
            log::warn!("Skipping output (not plain text): {output}");
            return Ok(());
        }

        self.write(&format!("{output}\n"))
    }

    /// General method for writing to stdout
    fn write(&self, output: &str) -> Result<(), Error> {
        let mut stdout: Stdout = std::io::stdout();

        stdout.write_all(output.as_bytes()).map_err(|e| {
            log::error!("Error while writing to stdout: {e:?}");
            Error::new("Output error", Some("Is the output stream closed?"))
        })?;

        Ok(())
    }

    pub fn is_structured(&self) -> bool {
        self.is_structured
    }
}
