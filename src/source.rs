use tracing::debug;

use crate::config::WidgetConfig;
use crate::models::{Review, ReviewBatch};

/// Which upstream the next fetch cycle should query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceDecision {
    /// Nothing configured yet; serve the fixed sample batch, no network.
    Placeholder,
    /// Unauthenticated read via the public lookup endpoint.
    ByPublicKey(String),
    /// Bearer-authenticated read against the instance-scoped endpoint.
    ByInstance(String),
}

/// Decide the data source for the given configuration.
///
/// Precedence: neither key configured means placeholder mode; a public key
/// wins over an instance id when both are present. Exactly one branch is
/// taken per resolution.
pub fn resolve(config: &WidgetConfig) -> SourceDecision {
    let public_key = config.public_key.as_deref().filter(|k| !k.is_empty());
    let instance_id = config.instance_id.as_deref().filter(|i| !i.is_empty());

    let decision = match (public_key, instance_id) {
        (None, None) => SourceDecision::Placeholder,
        (Some(key), _) => SourceDecision::ByPublicKey(key.to_string()),
        (None, Some(id)) => SourceDecision::ByInstance(id.to_string()),
    };

    debug!(?decision, "Resolved data source");
    decision
}

/// The fixed sample batch shown before configuration is complete, so the
/// host page always renders something sensible.
pub fn placeholder_batch() -> ReviewBatch {
    let sample = |id: &str, name: &str, date: &str, stars: u8, text: &str, avatar: &str| Review {
        review_id: Some(id.to_string()),
        name: name.to_string(),
        date: date.to_string(),
        stars,
        text: text.to_string(),
        avatar: Some(avatar.to_string()),
    };

    ReviewBatch {
        average_rating: 4.9,
        count: 128,
        reviews: vec![
            sample(
                "m1",
                "Sarah Jenkins",
                "2 days ago",
                5,
                "Absolutely stunning service! The atmosphere was cozy and the staff went above and beyond.",
                "https://i.pravatar.cc/150?u=a042581f4e29026024d",
            ),
            sample(
                "m2",
                "David Miller",
                "1 week ago",
                4,
                "Great experience overall. The wait time was a bit longer than expected.",
                "https://i.pravatar.cc/150?u=a04258a24620826712d",
            ),
            sample(
                "m3",
                "Emily Chen",
                "3 weeks ago",
                5,
                "Best place in town! I highly recommend checking this out.",
                "https://i.pravatar.cc/150?u=a042581f4e29026704d",
            ),
            sample(
                "m4",
                "Michael Brown",
                "1 month ago",
                5,
                "The attention to detail was impressive. Will definitely be coming back.",
                "https://i.pravatar.cc/150?u=a042581f4e29026704e",
            ),
            sample(
                "m5",
                "Jessica Davis",
                "2 months ago",
                4,
                "Good value for money. The location is very convenient.",
                "https://i.pravatar.cc/150?u=a042581f4e29026704f",
            ),
            sample(
                "m6",
                "Chris Wilson",
                "2 months ago",
                5,
                "Simply amazing. I have no complaints whatsoever.",
                "https://i.pravatar.cc/150?u=a042581f4e290267050",
            ),
        ],
    }
}
