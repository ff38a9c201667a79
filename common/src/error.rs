/// A stack declaration that the provisioning engine would reject
///
/// Raised while descriptors are added to a stack or when the stack is validated before rendering.
/// Nothing is partially applied: a failed declaration leaves the stack as it was.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The logical id is already taken by another descriptor in the stack
    DuplicateLogicalId { stack: String, id: String },

    /// Two parameters in the stack share the same path
    DuplicateParameterPath { stack: String, path: String },

    /// A descriptor points at a queue that is not declared in the stack
    DanglingReference {
        stack: String,
        from: String,
        queue: String,
    },

    /// The generated secret key would overwrite a literal key of the template
    GeneratedKeyInTemplate { secret: String, key: String },

    /// A name does not satisfy the provider's naming rules
    InvalidName { kind: &'static str, name: String },

    /// URL subscriptions only deliver over http(s)
    UnsupportedEndpoint { endpoint: String },
}

impl std::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateLogicalId { stack, id } => {
                write!(f, "Logical id {id} is declared twice in stack {stack}")
            }

            Self::DuplicateParameterPath { stack, path } => {
                write!(f, "Parameter {path} is declared twice in stack {stack}")
            }

            Self::DanglingReference { stack, from, queue } => write!(
                f,
                "{from} references queue {queue} which is not declared in stack {stack}"
            ),

            Self::GeneratedKeyInTemplate { secret, key } => write!(
                f,
                "Secret {secret} generates key {key:?} which is already set by its template"
            ),

            Self::InvalidName { kind, name } => write!(f, "Invalid {kind}: {name:?}"),

            Self::UnsupportedEndpoint { endpoint } => write!(
                f,
                "Subscription endpoint {endpoint} must use the http or https scheme"
            ),
        }
    }
}

impl std::error::Error for ConfigurationError {}
