use common::Template;
use infra::apps::{sns, sqs, App};
use proptest::prelude::*;
use url::Url;

fn stack_id() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9-]{0,60}"
}

/// Every queue name the apps derive out of a stack id
fn queue_names(id: &str) -> Vec<String> {
    let mut names: Vec<String> = sqs::declare_queues(id)
        .unwrap()
        .into_iter()
        .map(|q| q.queue_name)
        .collect();

    names.push(sns::declare_queue(id).unwrap().queue_name);
    names
}

proptest! {
    #[test]
    fn queue_names_are_unique_across_stacks(first in stack_id(), second in stack_id()) {
        prop_assume!(first != second);
        let second_names = queue_names(&second);

        for name in queue_names(&first).iter() {
            prop_assert!(!second_names.contains(name), "{name} is declared by both stacks");
        }
    }

    #[test]
    fn queue_names_are_unique_within_a_stack(id in stack_id()) {
        let mut names = queue_names(&id);
        let count = names.len();
        names.sort();
        names.dedup();
        prop_assert_eq!(names.len(), count);
    }

    #[test]
    fn app_suffix_in_stack_id_does_not_collide(id in stack_id()) {
        let sns_queue = sns::declare_queue(&id).unwrap().queue_name;

        for name in queue_names(&format!("{id}-sns")) {
            prop_assert_ne!(&name, &sns_queue);
        }
    }
}

#[test]
fn sqs_and_sns_queues_differ_for_overlapping_stack_ids() {
    let sns_queue = sns::declare_queue("Orders").unwrap().queue_name;

    for queue in sqs::declare_queues("Orders-sns").unwrap() {
        assert_ne!(queue.queue_name, sns_queue);
    }
}

#[test]
fn every_app_declares_deterministically() {
    let endpoint = Url::parse("https://1234abcd.ngrok.io/testTopic").unwrap();

    for app in App::ALL {
        let first = app.stack(app.default_stack_id(), Some(&endpoint)).unwrap();
        let second = app.stack(app.default_stack_id(), Some(&endpoint)).unwrap();
        assert_eq!(first, second, "{app} declared differently");

        assert_eq!(
            Template::from_stack(&first).unwrap().to_string(),
            Template::from_stack(&second).unwrap().to_string(),
            "{app} rendered differently"
        );
    }
}

#[test]
fn sns_endpoint_is_subscribed_when_given() {
    let endpoint = Url::parse("https://1234abcd.ngrok.io/testTopic").unwrap();
    let stack = App::Sns.stack("SnsStack", Some(&endpoint)).unwrap();
    let template = Template::from_stack(&stack).unwrap();

    let subscription = &template.resources().unwrap()["SnsUrlSubscription"];
    assert_eq!(subscription["Properties"]["Protocol"], "https");
    assert_eq!(
        subscription["Properties"]["Endpoint"],
        "https://1234abcd.ngrok.io/testTopic"
    );
}

#[test]
fn endpoint_is_ignored_by_other_apps() {
    let endpoint = Url::parse("https://1234abcd.ngrok.io/testTopic").unwrap();

    assert_eq!(
        App::Sqs.stack("SqsStack", Some(&endpoint)).unwrap(),
        App::Sqs.stack("SqsStack", None).unwrap()
    );
}
