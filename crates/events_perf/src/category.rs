//! Operation categories and their mark identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pipeline step whose durations are averaged independently.
///
/// Each category owns a literal name prefix. Every identifier built for a
/// category starts with that prefix, and no prefix starts with another, so a
/// measure name falls into at most one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    /// Fan-out of a triggered event into per-subscriber jobs
    CreateNotificationJobs,
    /// Digest filtering of workflow steps for one subscriber
    DigestFilterSteps,
    /// Trigger request as seen by the API endpoint
    EndpointTriggerEvent,
    /// Trigger processing for one notification template
    TriggerEvent,
}

impl Category {
    /// All categories in declaration order.
    pub const ALL: [Category; 4] = [
        Category::CreateNotificationJobs,
        Category::DigestFilterSteps,
        Category::EndpointTriggerEvent,
        Category::TriggerEvent,
    ];

    /// Order in which measure names are tested against category prefixes.
    pub const AGGREGATION_ORDER: [Category; 4] = [
        Category::EndpointTriggerEvent,
        Category::CreateNotificationJobs,
        Category::DigestFilterSteps,
        Category::TriggerEvent,
    ];

    /// Order in which per-category averages are reported.
    pub const REPORT_ORDER: [Category; 4] = [
        Category::EndpointTriggerEvent,
        Category::TriggerEvent,
        Category::CreateNotificationJobs,
        Category::DigestFilterSteps,
    ];

    /// Name prefix shared by every identifier of this category.
    pub const fn prefix(self) -> &'static str {
        match self {
            Category::CreateNotificationJobs => "createNotificationJobs",
            Category::DigestFilterSteps => "digestFilterSteps",
            Category::EndpointTriggerEvent => "endpoint:triggerEvent",
            Category::TriggerEvent => "triggerEvent",
        }
    }

    /// Prefixes of all categories, in declaration order.
    pub fn prefixes() -> [&'static str; 4] {
        Self::ALL.map(Category::prefix)
    }

    /// Check if a mark or measure name belongs to this category.
    #[inline]
    pub fn matches(self, name: &str) -> bool {
        name.starts_with(self.prefix())
    }

    /// Find the category a name belongs to.
    pub fn classify(name: &str) -> Option<Category> {
        Self::AGGREGATION_ORDER
            .into_iter()
            .find(|category| category.matches(name))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Identifier for the digest filter of one subscriber's workflow steps.
pub fn digest_filter_steps_id(
    transaction_id: &str,
    template_id: &str,
    notification_id: &str,
    subscriber_id: &str,
) -> String {
    format!(
        "{}:event:{}:template:{}:notification:{}:subscriber:{}:steps",
        Category::DigestFilterSteps.prefix(),
        transaction_id,
        template_id,
        notification_id,
        subscriber_id
    )
}

/// Identifier for a trigger request handled by the endpoint.
pub fn endpoint_trigger_event_id(transaction_id: &str) -> String {
    format!(
        "{}:event:{}",
        Category::EndpointTriggerEvent.prefix(),
        transaction_id
    )
}

/// Identifier for trigger processing of one notification template.
pub fn trigger_event_id(notification_template_id: &str, transaction_id: &str) -> String {
    format!(
        "{}:notificationTemplate:{}:event:{}",
        Category::TriggerEvent.prefix(),
        notification_template_id,
        transaction_id
    )
}

/// Identifier for job creation for one subscriber.
pub fn create_notification_jobs_id(
    notification_template_id: &str,
    transaction_id: &str,
    subscriber_id: &str,
) -> String {
    format!(
        "{}:notificationTemplate:{}:event:{}:subscriber:{}",
        Category::CreateNotificationJobs.prefix(),
        notification_template_id,
        transaction_id,
        subscriber_id
    )
}
