//! Stacks of the sample applications
//!
//! Each app turns a stack id into a [`Stack`] with nothing but literal declarations.
pub mod parameter_store;
pub mod secrets_manager;
pub mod sns;
pub mod sqs;

use common::{ConfigurationError, Stack};
use url::Url;

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum App {
    ParameterStore,
    SecretsManager,
    Sns,
    Sqs,
}

impl App {
    pub const ALL: [App; 4] = [App::ParameterStore, App::SecretsManager, App::Sns, App::Sqs];

    /// Name used on the command line
    pub fn name(&self) -> &'static str {
        match self {
            App::ParameterStore => "parameter-store",
            App::SecretsManager => "secrets-manager",
            App::Sns => "sns",
            App::Sqs => "sqs",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            App::ParameterStore => "SSM parameters under /config/spring",
            App::SecretsManager => "A secret with a generated password",
            App::Sns => "SNS topic with a queue and an optional URL subscriber",
            App::Sqs => "Standalone queues with a dead-letter queue",
        }
    }

    /// Stack id used when none is given
    pub fn default_stack_id(&self) -> &'static str {
        match self {
            App::ParameterStore => "ParameterStoreStack",
            App::SecretsManager => "SecretsManagerStack",
            App::Sns => "SnsStack",
            App::Sqs => "SqsStack",
        }
    }

    /// Declare the stack of the app
    ///
    /// The endpoint is only used by the SNS app.
    pub fn stack(
        &self,
        stack_id: &str,
        endpoint: Option<&Url>,
    ) -> Result<Stack, ConfigurationError> {
        match self {
            App::ParameterStore => parameter_store::stack(stack_id),
            App::SecretsManager => secrets_manager::stack(stack_id),
            App::Sns => sns::stack(stack_id, endpoint),
            App::Sqs => sqs::stack(stack_id),
        }
    }
}

impl std::fmt::Display for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
