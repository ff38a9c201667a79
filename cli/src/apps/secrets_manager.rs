use common::{ConfigurationError, SecretDescriptor, Stack};
use serde_json::json;

pub const SECRET_NAME: &str = "/secrets/spring-cloud-aws-sample-app";

/// Credentials of the secrets manager sample app
///
/// The username is fixed, the password is generated by the provider when the secret is created.
pub fn declare_secret(stack_id: &str) -> Result<SecretDescriptor, ConfigurationError> {
    Ok(
        SecretDescriptor::new("Secret", SECRET_NAME, "password", json!({"username": "admin"}))?
            .with_description(&format!("Managed by stack {stack_id}"))
            .exclude_punctuation(),
    )
}

pub fn stack(stack_id: &str) -> Result<Stack, ConfigurationError> {
    let mut stack = Stack::new(stack_id)?.with_description("Secret for the secrets manager sample");
    stack.add(declare_secret(stack_id)?)?;
    Ok(stack)
}
