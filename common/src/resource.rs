use crate::error::ConfigurationError;
use crate::template::sanitize::escape_resource_name;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;
use url::Url;

/// Validate a name against a pattern, reporting the kind of the name on failure
fn check(
    kind: &'static str,
    name: &str,
    pattern: &'static str,
    cell: &'static OnceLock<Regex>,
) -> Result<(), ConfigurationError> {
    let re = cell.get_or_init(|| Regex::new(pattern).unwrap());

    if re.is_match(name) {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidName {
            kind,
            name: name.to_string(),
        })
    }
}

/// Identifier of a descriptor inside its stack (a CloudFormation logical id)
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LogicalId(String);

impl LogicalId {
    /// Build a logical id out of a construct id
    ///
    /// Characters CloudFormation does not accept are escaped, e.g. "spring-aws" becomes
    /// "springHYPHENaws".
    pub fn new(construct_id: &str) -> Result<Self, ConfigurationError> {
        static RE: OnceLock<Regex> = OnceLock::new();
        let escaped = escape_resource_name(construct_id);
        check("logical id", &escaped, r"^[A-Za-z0-9]{1,255}$", &RE)?;
        Ok(LogicalId(escaped))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LogicalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What happens to the physical resource when it leaves the stack
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RemovalPolicy {
    #[default]
    Destroy,
    Retain,
}

impl RemovalPolicy {
    /// Value of DeletionPolicy and UpdateReplacePolicy attributes
    pub fn as_str(&self) -> &'static str {
        match self {
            RemovalPolicy::Destroy => "Delete",
            RemovalPolicy::Retain => "Retain",
        }
    }
}

/// A plain String entry in the parameter store
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParameterEntry {
    pub id: LogicalId,
    pub path: String,
    pub value: String,
    pub description: Option<String>,
}

impl ParameterEntry {
    pub fn new(id: &str, path: &str, value: &str) -> Result<Self, ConfigurationError> {
        static RE: OnceLock<Regex> = OnceLock::new();
        check("parameter path", path, r"^[A-Za-z0-9_.\-/]{1,1011}$", &RE)?;

        // Hierarchical paths must be fully qualified
        if path.contains('/') && !path.starts_with('/') {
            return Err(ConfigurationError::InvalidName {
                kind: "parameter path",
                name: path.to_string(),
            });
        }

        Ok(ParameterEntry {
            id: LogicalId::new(id)?,
            path: path.to_string(),
            value: value.to_string(),
            description: None,
        })
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

/// The rule for the value the provider generates when the secret is created
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecretGeneration {
    /// The key the generated string is stored under
    pub generate_key: String,

    /// Fixed part of the secret JSON body
    pub template: Map<String, Value>,

    pub length: u32,
    pub exclude_punctuation: bool,
}

/// A secret whose value is partially generated by the provider
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecretDescriptor {
    pub id: LogicalId,
    pub name: String,
    pub description: Option<String>,
    pub generation: SecretGeneration,
    pub removal_policy: RemovalPolicy,
}

impl SecretDescriptor {
    /// Declare a secret with a JSON object template and one generated key
    ///
    /// Fails if the template is not an object, or if it already has the generated key.
    pub fn new(
        id: &str,
        name: &str,
        generate_key: &str,
        template: Value,
    ) -> Result<Self, ConfigurationError> {
        static RE: OnceLock<Regex> = OnceLock::new();
        check("secret name", name, r"^[A-Za-z0-9/_+=.@\-]{1,512}$", &RE)?;

        let Value::Object(template) = template else {
            return Err(ConfigurationError::InvalidName {
                kind: "secret template",
                name: template.to_string(),
            });
        };

        if generate_key.is_empty() {
            return Err(ConfigurationError::InvalidName {
                kind: "generated secret key",
                name: generate_key.to_string(),
            });
        }

        if template.contains_key(generate_key) {
            return Err(ConfigurationError::GeneratedKeyInTemplate {
                secret: name.to_string(),
                key: generate_key.to_string(),
            });
        }

        Ok(SecretDescriptor {
            id: LogicalId::new(id)?,
            name: name.to_string(),
            description: None,
            generation: SecretGeneration {
                generate_key: generate_key.to_string(),
                template,
                length: 32,
                exclude_punctuation: false,
            },
            removal_policy: RemovalPolicy::default(),
        })
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_length(mut self, length: u32) -> Self {
        self.generation.length = length;
        self
    }

    pub fn exclude_punctuation(mut self) -> Self {
        self.generation.exclude_punctuation = true;
        self
    }

    pub fn with_removal_policy(mut self, policy: RemovalPolicy) -> Self {
        self.removal_policy = policy;
        self
    }
}

/// Where a topic delivers its messages
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubscriptionTarget {
    /// A queue declared in the same stack
    Queue {
        queue: LogicalId,
        raw_message_delivery: bool,
    },

    /// An HTTP(S) endpoint outside of the stack
    Url { endpoint: Url },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subscription {
    pub id: LogicalId,
    pub target: SubscriptionTarget,
}

impl Subscription {
    /// Deliver to a queue, referenced by its logical id
    pub fn queue(id: &str, queue: &LogicalId) -> Result<Self, ConfigurationError> {
        Ok(Subscription {
            id: LogicalId::new(id)?,
            target: SubscriptionTarget::Queue {
                queue: queue.clone(),
                raw_message_delivery: false,
            },
        })
    }

    /// Deliver to an http or https endpoint
    pub fn url(id: &str, endpoint: &Url) -> Result<Self, ConfigurationError> {
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ConfigurationError::UnsupportedEndpoint {
                endpoint: endpoint.to_string(),
            });
        }

        Ok(Subscription {
            id: LogicalId::new(id)?,
            target: SubscriptionTarget::Url {
                endpoint: endpoint.clone(),
            },
        })
    }

    /// Deliver the message body as is, without the SNS envelope
    ///
    /// Has no effect on URL subscriptions.
    pub fn raw_message_delivery(mut self) -> Self {
        if let SubscriptionTarget::Queue {
            raw_message_delivery,
            ..
        } = &mut self.target
        {
            *raw_message_delivery = true;
        }

        self
    }

    /// SNS protocol of the subscription
    pub fn protocol(&self) -> &str {
        match &self.target {
            SubscriptionTarget::Queue { .. } => "sqs",
            SubscriptionTarget::Url { endpoint } => endpoint.scheme(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Topic {
    pub id: LogicalId,
    pub topic_name: String,
    pub display_name: Option<String>,
    pub subscriptions: Vec<Subscription>,
}

impl Topic {
    pub fn new(id: &str, topic_name: &str) -> Result<Self, ConfigurationError> {
        static RE: OnceLock<Regex> = OnceLock::new();
        check(
            "topic name",
            topic_name,
            r"^[A-Za-z0-9_\-]{1,256}(\.fifo)?$",
            &RE,
        )?;

        Ok(Topic {
            id: LogicalId::new(id)?,
            topic_name: topic_name.to_string(),
            display_name: None,
            subscriptions: vec![],
        })
    }

    pub fn with_display_name(mut self, display_name: &str) -> Self {
        self.display_name = Some(display_name.to_string());
        self
    }

    /// Attach subscriptions, the topic owns them from now on
    pub fn with_subscriptions(mut self, subscriptions: Vec<Subscription>) -> Self {
        self.subscriptions.extend(subscriptions);
        self
    }
}

/// Messages that failed to be processed too many times go to another queue
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeadLetter {
    pub queue: LogicalId,
    pub max_receive_count: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Queue {
    pub id: LogicalId,
    pub queue_name: String,

    /// In seconds
    pub visibility_timeout: Option<u32>,

    /// In seconds
    pub retention_period: Option<u32>,

    pub dead_letter: Option<DeadLetter>,
    pub removal_policy: RemovalPolicy,
}

impl Queue {
    pub fn new(id: &str, queue_name: &str) -> Result<Self, ConfigurationError> {
        static RE: OnceLock<Regex> = OnceLock::new();
        check("queue name", queue_name, r"^[A-Za-z0-9_\-]{1,80}$", &RE)?;

        Ok(Queue {
            id: LogicalId::new(id)?,
            queue_name: queue_name.to_string(),
            visibility_timeout: None,
            retention_period: None,
            dead_letter: None,
            removal_policy: RemovalPolicy::default(),
        })
    }

    pub fn with_visibility_timeout(mut self, seconds: u32) -> Self {
        self.visibility_timeout = Some(seconds);
        self
    }

    pub fn with_retention_period(mut self, seconds: u32) -> Self {
        self.retention_period = Some(seconds);
        self
    }

    pub fn with_dead_letter_queue(mut self, queue: &LogicalId, max_receive_count: u32) -> Self {
        self.dead_letter = Some(DeadLetter {
            queue: queue.clone(),
            max_receive_count,
        });

        self
    }

    pub fn with_removal_policy(mut self, policy: RemovalPolicy) -> Self {
        self.removal_policy = policy;
        self
    }
}

/// Any resource a stack can hold
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResourceDescriptor {
    Parameter(ParameterEntry),
    Secret(SecretDescriptor),
    Topic(Topic),
    Queue(Queue),
}

impl ResourceDescriptor {
    pub fn id(&self) -> &LogicalId {
        match self {
            ResourceDescriptor::Parameter(parameter) => &parameter.id,
            ResourceDescriptor::Secret(secret) => &secret.id,
            ResourceDescriptor::Topic(topic) => &topic.id,
            ResourceDescriptor::Queue(queue) => &queue.id,
        }
    }

    /// All logical ids the descriptor occupies, including those of owned subscriptions
    pub fn ids(&self) -> Vec<&LogicalId> {
        let mut ids = vec![self.id()];

        if let ResourceDescriptor::Topic(topic) = self {
            ids.extend(topic.subscriptions.iter().map(|s| &s.id));
        }

        ids
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ResourceDescriptor::Parameter(_) => "parameter",
            ResourceDescriptor::Secret(_) => "secret",
            ResourceDescriptor::Topic(_) => "topic",
            ResourceDescriptor::Queue(_) => "queue",
        }
    }
}

impl From<ParameterEntry> for ResourceDescriptor {
    fn from(parameter: ParameterEntry) -> Self {
        ResourceDescriptor::Parameter(parameter)
    }
}

impl From<SecretDescriptor> for ResourceDescriptor {
    fn from(secret: SecretDescriptor) -> Self {
        ResourceDescriptor::Secret(secret)
    }
}

impl From<Topic> for ResourceDescriptor {
    fn from(topic: Topic) -> Self {
        ResourceDescriptor::Topic(topic)
    }
}

impl From<Queue> for ResourceDescriptor {
    fn from(queue: Queue) -> Self {
        ResourceDescriptor::Queue(queue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn logical_id_is_escaped() {
        let id = LogicalId::new("spring-aws").unwrap();
        assert_eq!(id.as_str(), "springHYPHENaws");
    }

    #[test]
    fn logical_id_rejects_empty_and_spaces() {
        assert!(LogicalId::new("").is_err());
        assert!(LogicalId::new("two words").is_err());
    }

    #[test]
    fn relative_hierarchical_path_is_rejected() {
        let err = ParameterEntry::new("Parameter", "config/app/key", "value").unwrap_err();

        assert_eq!(
            err,
            ConfigurationError::InvalidName {
                kind: "parameter path",
                name: "config/app/key".into()
            }
        );

        assert!(ParameterEntry::new("Parameter", "flat-name", "value").is_ok());
    }

    #[test]
    fn generated_key_must_not_be_in_template() {
        let err = SecretDescriptor::new(
            "Secret",
            "/secrets/app",
            "password",
            json!({"username": "admin", "password": "hunter2"}),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            ConfigurationError::GeneratedKeyInTemplate { ref key, .. } if key == "password"
        ));
    }

    #[test]
    fn secret_template_must_be_an_object() {
        let err = SecretDescriptor::new("Secret", "/secrets/app", "password", json!("admin"))
            .unwrap_err();

        assert!(matches!(
            err,
            ConfigurationError::InvalidName {
                kind: "secret template",
                ..
            }
        ));
    }

    #[test]
    fn url_subscription_takes_protocol_from_scheme() {
        let http = Url::parse("http://localhost:8080/topic").unwrap();
        let ftp = Url::parse("ftp://example.com/topic").unwrap();

        assert_eq!(Subscription::url("Url", &http).unwrap().protocol(), "http");

        assert_eq!(
            Subscription::url("Url", &ftp).unwrap_err(),
            ConfigurationError::UnsupportedEndpoint {
                endpoint: "ftp://example.com/topic".into()
            }
        );
    }

    #[test]
    fn queue_name_length_is_limited() {
        assert!(Queue::new("Queue", &"q".repeat(80)).is_ok());
        assert!(Queue::new("Queue", &"q".repeat(81)).is_err());
        assert!(Queue::new("Queue", "with.dot").is_err());
    }

    #[test]
    fn topic_descriptor_occupies_subscription_ids() {
        let queue = LogicalId::new("Queue").unwrap();

        let topic: ResourceDescriptor = Topic::new("Topic", "topic")
            .unwrap()
            .with_subscriptions(vec![Subscription::queue("Sub", &queue).unwrap()])
            .into();

        let ids: Vec<&str> = topic.ids().iter().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["Topic", "Sub"]);
    }
}
