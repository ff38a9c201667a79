use crate::config::Settings;
use crate::error::Error;
use crate::writer::Writer;
use std::error::Error as StdError;
use std::path::{Path, PathBuf};

pub trait Runner {
    /// Settings file passed on the command line, if any
    fn config_path(&self) -> Option<&Path>;

    /// Settings of the current working dir
    fn settings(&self) -> Result<Settings, Error> {
        Settings::load(self.config_path()).map_err(|e| {
            let details = format!("{e:#}");
            self.error(Some("Invalid settings"), Some(&details), Some(e.into()))
        })
    }

    /// Run the command
    ///
    /// Returns an error shown to the user in case of failure
    fn run(&mut self) -> Result<(), Error>;

    /// Construct an error shown to the user
    fn error(
        &self,
        title: Option<&str>,
        description: Option<&str>,
        origin: Option<Box<dyn StdError>>,
    ) -> Error {
        if let Some(origin) = origin {
            log::error!("{origin:?}");
        }

        if let Some(title) = title {
            Error::new(title, description)
        } else {
            Error::new("Failed to run the command", None)
        }
    }
}

/// Return a runner for a command
pub trait Runnable {
    fn runner<'a>(
        &'a self,
        writer: &'a Writer,
        config_path: Option<PathBuf>,
    ) -> impl Runner + 'a;
}
