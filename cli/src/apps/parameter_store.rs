use common::{ConfigurationError, ParameterEntry, Stack};

/// Every parameter of the sample app lives under this path
pub const NAMESPACE: &str = "/config/spring";

/// Parameters read by the parameter store sample app on startup
///
/// The values are literals, the stack id only ends up in the descriptions.
pub fn declare_parameters(stack_id: &str) -> Result<Vec<ParameterEntry>, ConfigurationError> {
    let description = format!("Managed by stack {stack_id}");

    [
        ("Message", "message", "Spring-cloud-aws value!"),
        ("HttpUrl", "httpUrl", "external-website.com"),
    ]
    .into_iter()
    .map(|(id, key, value)| {
        Ok(ParameterEntry::new(id, &format!("{NAMESPACE}/{key}"), value)?
            .with_description(&description))
    })
    .collect()
}

pub fn stack(stack_id: &str) -> Result<Stack, ConfigurationError> {
    let mut stack =
        Stack::new(stack_id)?.with_description("Parameters for the parameter store sample");

    stack.add_all(declare_parameters(stack_id)?)?;
    Ok(stack)
}
