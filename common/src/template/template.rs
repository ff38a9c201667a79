use crate::error::ConfigurationError;
use crate::resource::{
    LogicalId, ParameterEntry, Queue, RemovalPolicy, ResourceDescriptor, SecretDescriptor,
    SubscriptionTarget, Topic,
};
use crate::stack::Stack;
use serde_json::{json, Map, Value};

/// CloudFormation template rendered out of a stack
///
/// This is what the provisioning engine consumes. An empty stack renders to `{}`.
#[derive(Clone, Debug, PartialEq)]
pub struct Template {
    template: Value,
}

#[derive(Clone, Debug)]
struct CfnResource {
    name: String,
    resource: Value,
}

impl Template {
    /// Validate the stack and render all of its descriptors
    pub fn from_stack(stack: &Stack) -> Result<Self, ConfigurationError> {
        stack.validate()?;

        let mut template = Template {
            template: json!({}),
        };

        if stack.is_empty() {
            return Ok(template);
        }

        if let Some(description) = stack.description() {
            template.set("Description", json!(description));
        }

        template.set("Resources", json!({}));

        for resource in stack.resources() {
            match resource {
                ResourceDescriptor::Parameter(parameter) => {
                    template.add_resource(Self::parameter(parameter))
                }

                ResourceDescriptor::Secret(secret) => template.add_resource(Self::secret(secret)),

                ResourceDescriptor::Topic(topic) => {
                    for resource in Self::topic(topic) {
                        template.add_resource(resource);
                    }
                }

                ResourceDescriptor::Queue(queue) => template.add_resource(Self::queue(queue)),
            }
        }

        for policy in Self::queue_policies(stack) {
            template.add_resource(policy);
        }

        log::debug!(
            "Rendered {} resources for stack {}",
            template.resources().map(Map::len).unwrap_or_default(),
            stack.name()
        );

        Ok(template)
    }

    fn set(&mut self, key: &str, value: Value) {
        if let Value::Object(root) = &mut self.template {
            root.insert(key.into(), value);
        }
    }

    /// Add a resource to the CFN template
    fn add_resource(&mut self, CfnResource { name, resource }: CfnResource) {
        if let Some(Value::Object(resources)) = self.template.get_mut("Resources") {
            resources.insert(name, resource);
        }
    }

    /// All rendered resources keyed by logical id, None for an empty stack
    pub fn resources(&self) -> Option<&Map<String, Value>> {
        self.template.get("Resources").and_then(Value::as_object)
    }

    pub fn as_value(&self) -> &Value {
        &self.template
    }

    pub fn into_value(self) -> Value {
        self.template
    }

    /// Attach deletion attributes to a resource body
    fn with_removal_policy(mut resource: Value, policy: RemovalPolicy) -> Value {
        if let Value::Object(body) = &mut resource {
            body.insert("UpdateReplacePolicy".into(), json!(policy.as_str()));
            body.insert("DeletionPolicy".into(), json!(policy.as_str()));
        }

        resource
    }

    fn arn(id: &LogicalId) -> Value {
        json!({ "Fn::GetAtt": [id.as_str(), "Arn"] })
    }

    fn parameter(parameter: &ParameterEntry) -> CfnResource {
        let mut properties = json!({
            "Type": "String",
            "Name": parameter.path,
            "Value": parameter.value,
        });

        if let (Some(description), Value::Object(map)) = (&parameter.description, &mut properties) {
            map.insert("Description".into(), json!(description));
        }

        CfnResource {
            name: parameter.id.to_string(),
            resource: json!({
                "Type": "AWS::SSM::Parameter",
                "Properties": properties,
            }),
        }
    }

    fn secret(secret: &SecretDescriptor) -> CfnResource {
        let generation = &secret.generation;
        let mut properties = Map::new();
        properties.insert("Name".into(), json!(secret.name));

        if let Some(description) = &secret.description {
            properties.insert("Description".into(), json!(description));
        }

        // The provider expects the template as a serialized JSON string
        properties.insert(
            "GenerateSecretString".into(),
            json!({
                "SecretStringTemplate": Value::Object(generation.template.clone()).to_string(),
                "GenerateStringKey": generation.generate_key,
                "PasswordLength": generation.length,
                "ExcludePunctuation": generation.exclude_punctuation,
            }),
        );

        CfnResource {
            name: secret.id.to_string(),
            resource: Self::with_removal_policy(
                json!({
                    "Type": "AWS::SecretsManager::Secret",
                    "Properties": properties,
                }),
                secret.removal_policy,
            ),
        }
    }

    /// The topic itself followed by one resource per subscription
    fn topic(topic: &Topic) -> Vec<CfnResource> {
        let mut properties = Map::new();

        if let Some(display_name) = &topic.display_name {
            properties.insert("DisplayName".into(), json!(display_name));
        }

        properties.insert("TopicName".into(), json!(topic.topic_name));

        let mut resources = vec![CfnResource {
            name: topic.id.to_string(),
            resource: json!({
                "Type": "AWS::SNS::Topic",
                "Properties": properties,
            }),
        }];

        for subscription in topic.subscriptions.iter() {
            let mut properties = Map::new();
            properties.insert("Protocol".into(), json!(subscription.protocol()));
            properties.insert("TopicArn".into(), json!({ "Ref": topic.id.as_str() }));

            match &subscription.target {
                SubscriptionTarget::Queue {
                    queue,
                    raw_message_delivery,
                } => {
                    properties.insert("Endpoint".into(), Self::arn(queue));

                    if *raw_message_delivery {
                        properties.insert("RawMessageDelivery".into(), json!(true));
                    }
                }

                SubscriptionTarget::Url { endpoint } => {
                    properties.insert("Endpoint".into(), json!(endpoint.as_str()));
                }
            }

            resources.push(CfnResource {
                name: subscription.id.to_string(),
                resource: json!({
                    "Type": "AWS::SNS::Subscription",
                    "Properties": properties,
                }),
            });
        }

        resources
    }

    fn queue(queue: &Queue) -> CfnResource {
        let mut properties = Map::new();
        properties.insert("QueueName".into(), json!(queue.queue_name));

        if let Some(timeout) = queue.visibility_timeout {
            properties.insert("VisibilityTimeout".into(), json!(timeout));
        }

        if let Some(retention) = queue.retention_period {
            properties.insert("MessageRetentionPeriod".into(), json!(retention));
        }

        if let Some(dead_letter) = &queue.dead_letter {
            properties.insert(
                "RedrivePolicy".into(),
                json!({
                    "deadLetterTargetArn": Self::arn(&dead_letter.queue),
                    "maxReceiveCount": dead_letter.max_receive_count,
                }),
            );
        }

        CfnResource {
            name: queue.id.to_string(),
            resource: Self::with_removal_policy(
                json!({
                    "Type": "AWS::SQS::Queue",
                    "Properties": properties,
                }),
                queue.removal_policy,
            ),
        }
    }

    /// Policies allowing topics to send messages to their subscribed queues
    ///
    /// One policy per queue, with a statement per subscribed topic, in declaration order.
    fn queue_policies(stack: &Stack) -> Vec<CfnResource> {
        let mut statements: Vec<(LogicalId, Vec<Value>)> = vec![];

        for resource in stack.resources() {
            let ResourceDescriptor::Topic(topic) = resource else {
                continue;
            };

            for subscription in topic.subscriptions.iter() {
                let SubscriptionTarget::Queue { queue, .. } = &subscription.target else {
                    continue;
                };

                let statement = json!({
                    "Action": "sqs:SendMessage",
                    "Condition": {
                        "ArnEquals": { "aws:SourceArn": { "Ref": topic.id.as_str() } }
                    },
                    "Effect": "Allow",
                    "Principal": { "Service": "sns.amazonaws.com" },
                    "Resource": Self::arn(queue),
                });

                match statements.iter_mut().find(|(id, _)| id == queue) {
                    Some((_, list)) if list.contains(&statement) => {}
                    Some((_, list)) => list.push(statement),
                    None => statements.push((queue.clone(), vec![statement])),
                }
            }
        }

        statements
            .into_iter()
            .map(|(queue, statements)| CfnResource {
                name: Stack::queue_policy_id(&queue),
                resource: json!({
                    "Type": "AWS::SQS::QueuePolicy",
                    "Properties": {
                        "PolicyDocument": {
                            "Statement": statements,
                            "Version": "2012-10-17",
                        },
                        "Queues": [{ "Ref": queue.as_str() }],
                    }
                }),
            })
            .collect()
    }
}

impl std::fmt::Display for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pretty = serde_json::to_string_pretty(&self.template).map_err(|_| std::fmt::Error)?;
        write!(f, "{pretty}")
    }
}
