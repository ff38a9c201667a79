//! Declarations of cloud resources grouped into stacks
//!
//! A [`Stack`] owns a flat list of [`ResourceDescriptor`]s: parameters, secrets, topics with their
//! subscriptions, and queues. Descriptors are plain data. Rendering a stack with
//! [`Template::from_stack`] produces the CloudFormation template handed to the provisioning engine.
pub mod error;
pub mod resource;
pub mod stack;
pub mod template;

pub use error::ConfigurationError;
pub use resource::{
    DeadLetter, LogicalId, ParameterEntry, Queue, RemovalPolicy, ResourceDescriptor,
    SecretDescriptor, SecretGeneration, Subscription, SubscriptionTarget, Topic,
};
pub use stack::Stack;
pub use template::Template;
