use common::ConfigurationError;

/// Display global error message in unified format
#[derive(Debug)]
pub struct Error(String, Option<String>);

impl Error {
    pub fn new(message: &str, details: Option<&str>) -> Self {
        Error(message.to_string(), details.map(|d| d.to_string()))
    }

    pub fn message(&self) -> &str {
        &self.0
    }

    pub fn details(&self) -> Option<&str> {
        self.1.as_deref()
    }
}

/// Display the message and details, as sort of a hint
impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}\n\n{}",
            self.0,
            console::style(self.1.clone().unwrap_or("".into())).dim()
        )
    }
}

/// Implement std::error::Error trait for Error
impl std::error::Error for Error {}

/// Automatically convert all eyre error reports
///
/// An Error wrapped into the report is kept as is, anything else becomes the message,
/// with the chain of causes as details.
impl From<eyre::ErrReport> for Error {
    fn from(error: eyre::ErrReport) -> Self {
        error.downcast::<Error>().unwrap_or_else(|err| {
            let causes = err
                .chain()
                .skip(1)
                .map(|cause| cause.to_string())
                .collect::<Vec<String>>();

            if causes.is_empty() {
                Error::new(&err.to_string(), None)
            } else {
                Error::new(&err.to_string(), Some(&causes.join("\n")))
            }
        })
    }
}

impl From<ConfigurationError> for Error {
    fn from(error: ConfigurationError) -> Self {
        Error::new(
            "Invalid stack declaration",
            Some(&format!("{error}. Fix the declaration and run the command again.")),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eyre::WrapErr;

    #[test]
    fn report_chain_becomes_details() {
        let report = Err::<(), _>(std::io::Error::other("disk full"))
            .wrap_err("Failed to write template")
            .unwrap_err();

        let error: Error = report.into();
        assert_eq!(error.message(), "Failed to write template");
        assert_eq!(error.details(), Some("disk full"));
    }

    #[test]
    fn wrapped_error_is_kept() {
        let report = eyre::Report::new(Error::new("Output error", Some("hint")));
        let error: Error = report.into();
        assert_eq!(error.message(), "Output error");
        assert_eq!(error.details(), Some("hint"));
    }
}
