use common::{ConfigurationError, Queue, Stack};

/// Messages failing this many times are moved to the dead-letter queue
pub const MAX_RECEIVE_COUNT: u32 = 3;

/// Queues of the SQS sample app
///
/// Names are derived from the stack id, so stacks deployed under different ids never share a
/// queue. The app goes into the suffix, which keeps the names apart from the SNS app queue for any
/// pair of stack ids. The main queue redrives into the dead-letter queue.
pub fn declare_queues(stack_id: &str) -> Result<Vec<Queue>, ConfigurationError> {
    // 14 days, the longest SQS keeps a message
    let dead_letter = Queue::new("DeadLetterQueue", &format!("{stack_id}-sqs-dlq"))?
        .with_retention_period(1_209_600);

    let queue = Queue::new("Queue", &format!("{stack_id}-sqs-queue"))?
        .with_visibility_timeout(30)
        .with_dead_letter_queue(&dead_letter.id, MAX_RECEIVE_COUNT);

    Ok(vec![queue, dead_letter])
}

pub fn stack(stack_id: &str) -> Result<Stack, ConfigurationError> {
    let mut stack = Stack::new(stack_id)?.with_description("Queues for the SQS sample");
    stack.add_all(declare_queues(stack_id)?)?;
    Ok(stack)
}
