use common::{ConfigurationError, Queue, Stack, Subscription, Topic};
use url::Url;

pub const TOPIC_NAME: &str = "snsSpring";

/// Logical id of the queue subscribed to the topic
pub const QUEUE_ID: &str = "SnsQueue";

/// Queue receiving the topic messages, named after the stack
pub fn declare_queue(stack_id: &str) -> Result<Queue, ConfigurationError> {
    Queue::new(QUEUE_ID, &format!("{stack_id}-sns-queue"))
}

/// The sample topic, its subscribers and the queue the topic delivers to
///
/// The returned queue is the one the queue subscription references, so declaring all three keeps
/// the stack free of dangling references. The URL endpoint only subscribes when given, since it is
/// typically a temporary tunnel to a locally running app.
pub fn declare_topic(
    stack_id: &str,
    endpoint: Option<&Url>,
) -> Result<(Topic, Vec<Subscription>, Queue), ConfigurationError> {
    let topic = Topic::new("SnsTopic", TOPIC_NAME)?.with_display_name(TOPIC_NAME);
    let queue = declare_queue(stack_id)?;
    let mut subscriptions = vec![Subscription::queue("SnsQueueSubscription", &queue.id)?];

    if let Some(endpoint) = endpoint {
        subscriptions.push(Subscription::url("SnsUrlSubscription", endpoint)?);
    }

    Ok((topic, subscriptions, queue))
}

pub fn stack(stack_id: &str, endpoint: Option<&Url>) -> Result<Stack, ConfigurationError> {
    let mut stack =
        Stack::new(stack_id)?.with_description("Topic and subscribers for the SNS sample");
    let (topic, subscriptions, queue) = declare_topic(stack_id, endpoint)?;

    stack.add(queue)?.add(topic.with_subscriptions(subscriptions))?;

    Ok(stack)
}
