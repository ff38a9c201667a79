use crate::error::ConfigurationError;
use crate::resource::{LogicalId, Queue, ResourceDescriptor, SubscriptionTarget};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Resources deployed together as one unit
///
/// Descriptors are added explicitly, there is no ambient "current stack". Duplicates are rejected
/// on [`Stack::add`], references between descriptors are checked by [`Stack::validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stack {
    name: String,
    description: Option<String>,
    resources: Vec<ResourceDescriptor>,
}

impl Stack {
    pub fn new(name: &str) -> Result<Self, ConfigurationError> {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9\-]{0,127}$").unwrap());

        if !re.is_match(name) {
            return Err(ConfigurationError::InvalidName {
                kind: "stack name",
                name: name.to_string(),
            });
        }

        Ok(Stack {
            name: name.to_string(),
            description: None,
            resources: vec![],
        })
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn resources(&self) -> &[ResourceDescriptor] {
        &self.resources
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Register a descriptor in the stack
    ///
    /// Fails without modifying the stack if any of the logical ids or the parameter path is taken.
    pub fn add(
        &mut self,
        resource: impl Into<ResourceDescriptor>,
    ) -> Result<&mut Self, ConfigurationError> {
        let resource = resource.into();
        let mut taken = self.ids();

        for id in resource.ids() {
            if !taken.insert(id) {
                return Err(ConfigurationError::DuplicateLogicalId {
                    stack: self.name.clone(),
                    id: id.to_string(),
                });
            }
        }

        if let ResourceDescriptor::Parameter(parameter) = &resource {
            let duplicate = self.resources.iter().any(|r| {
                matches!(r, ResourceDescriptor::Parameter(p) if p.path == parameter.path)
            });

            if duplicate {
                return Err(ConfigurationError::DuplicateParameterPath {
                    stack: self.name.clone(),
                    path: parameter.path.clone(),
                });
            }
        }

        log::debug!(
            "Declared {} {} in stack {}",
            resource.kind(),
            resource.id(),
            self.name
        );

        self.resources.push(resource);
        Ok(self)
    }

    /// Register several descriptors at once, all or nothing
    pub fn add_all<R, I>(&mut self, resources: I) -> Result<&mut Self, ConfigurationError>
    where
        R: Into<ResourceDescriptor>,
        I: IntoIterator<Item = R>,
    {
        let mut staged = self.clone();

        for resource in resources {
            staged.add(resource)?;
        }

        *self = staged;
        Ok(self)
    }

    /// Queue declared in the stack under the logical id
    pub fn queue(&self, id: &LogicalId) -> Option<&Queue> {
        self.resources.iter().find_map(|r| match r {
            ResourceDescriptor::Queue(queue) if &queue.id == id => Some(queue),
            _ => None,
        })
    }

    /// Logical id of the access policy generated for a queue that receives topic messages
    pub fn queue_policy_id(queue: &LogicalId) -> String {
        format!("{queue}Policy")
    }

    /// Check the references between descriptors
    ///
    /// Every queue subscription and every dead-letter target must point at a queue of this stack.
    /// Queue policies generated for subscribed queues must have valid logical ids that do not clash
    /// with declared ones.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let ids: HashSet<&str> = self.ids().into_iter().map(|id| id.as_str()).collect();

        for resource in self.resources.iter() {
            match resource {
                ResourceDescriptor::Topic(topic) => {
                    for subscription in topic.subscriptions.iter() {
                        let SubscriptionTarget::Queue { queue, .. } = &subscription.target else {
                            continue;
                        };

                        self.queue(queue)
                            .ok_or_else(|| ConfigurationError::DanglingReference {
                                stack: self.name.clone(),
                                from: subscription.id.to_string(),
                                queue: queue.to_string(),
                            })?;

                        let policy_id = Self::queue_policy_id(queue);

                        // The suffix can push a long queue id past the logical id limit
                        LogicalId::new(&policy_id)?;

                        if ids.contains(policy_id.as_str()) {
                            return Err(ConfigurationError::DuplicateLogicalId {
                                stack: self.name.clone(),
                                id: policy_id,
                            });
                        }
                    }
                }

                ResourceDescriptor::Queue(queue) => {
                    let Some(dead_letter) = &queue.dead_letter else {
                        continue;
                    };

                    // A queue can not be its own dead-letter queue
                    if dead_letter.queue == queue.id || self.queue(&dead_letter.queue).is_none() {
                        return Err(ConfigurationError::DanglingReference {
                            stack: self.name.clone(),
                            from: queue.id.to_string(),
                            queue: dead_letter.queue.to_string(),
                        });
                    }
                }

                ResourceDescriptor::Parameter(_) | ResourceDescriptor::Secret(_) => {}
            }
        }

        Ok(())
    }

    fn ids(&self) -> HashSet<&LogicalId> {
        self.resources.iter().flat_map(|r| r.ids()).collect()
    }
}
