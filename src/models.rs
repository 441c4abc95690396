use serde::{Deserialize, Deserializer, Serialize};

/// One third-party testimonial as returned by the backend.
///
/// Immutable once received; the wire format is camelCase and may carry
/// fields this core does not consume (e.g. `profileLink`), which are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(rename = "reviewId", default, skip_serializing_if = "Option::is_none")]
    pub review_id: Option<String>,
    pub name: String,
    /// Pre-formatted relative date ("2 days ago"); opaque to this core.
    pub date: String,
    #[serde(deserialize_with = "de_stars")]
    pub stars: u8,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// The backend sends star ratings as floats; clamp into the 1-5 integer range.
fn de_stars<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    Ok(raw.round().clamp(1.0, 5.0) as u8)
}

impl Review {
    /// Stable identity for deduplication: the server-assigned id when
    /// present, else an md5 digest of the record's JSON serialization.
    ///
    /// The structural fallback collides for byte-identical reviews from
    /// different authors; that matches the upstream behavior and is kept
    /// deliberately weak.
    pub fn identity_key(&self) -> String {
        match &self.review_id {
            Some(id) if !id.is_empty() => id.clone(),
            _ => {
                let json = serde_json::to_string(self).unwrap_or_default();
                format!("{:x}", md5::compute(json.as_bytes()))
            }
        }
    }
}

/// The aggregate returned by one fetch: reviews in server order plus the
/// embedded summary numbers. Superseded wholesale on every successful fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewBatch {
    #[serde(rename = "averageRating")]
    pub average_rating: f64,
    /// Total review count upstream; may exceed `reviews.len()`.
    pub count: u64,
    pub reviews: Vec<Review>,
}

/// Independently fetched summary numbers that override the batch-embedded
/// ones for header display only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    #[serde(rename = "averageRating")]
    pub average_rating: f64,
    #[serde(rename = "totalCount")]
    pub total_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(id: Option<&str>, name: &str, text: &str) -> Review {
        Review {
            review_id: id.map(String::from),
            name: name.to_string(),
            date: "1 week ago".to_string(),
            stars: 5,
            text: text.to_string(),
            avatar: None,
        }
    }

    #[test]
    fn test_identity_key_prefers_server_id() {
        let r = review(Some("abc123"), "Sarah", "Great!");
        assert_eq!(r.identity_key(), "abc123");
    }

    #[test]
    fn test_identity_key_structural_fallback_is_stable() {
        let a = review(None, "Sarah", "Great!");
        let b = review(None, "Sarah", "Great!");
        assert_eq!(a.identity_key(), b.identity_key());

        let c = review(None, "Sarah", "Terrible!");
        assert_ne!(a.identity_key(), c.identity_key());
    }

    #[test]
    fn test_empty_id_falls_back_to_hash() {
        let r = review(Some(""), "Sarah", "Great!");
        assert_ne!(r.identity_key(), "");
        assert_eq!(r.identity_key().len(), 32);
    }

    #[test]
    fn test_parse_wire_payload() {
        let json = r#"{
            "success": true,
            "locale": "en-US",
            "averageRating": 4.6,
            "count": 42,
            "reviews": [
                {
                    "reviewId": "r1",
                    "name": "Sarah Jenkins",
                    "date": "2 days ago",
                    "stars": 4.7,
                    "text": "Lovely.",
                    "avatar": "https://example.com/a.png",
                    "profileLink": "https://example.com/u/1"
                }
            ]
        }"#;

        let batch: ReviewBatch = serde_json::from_str(json).unwrap();
        assert_eq!(batch.count, 42);
        assert!((batch.average_rating - 4.6).abs() < f64::EPSILON);
        assert_eq!(batch.reviews.len(), 1);
        // Float stars are rounded into the integer range.
        assert_eq!(batch.reviews[0].stars, 5);
    }

    #[test]
    fn test_parse_stats_payload() {
        let json = r#"{"success": true, "averageRating": 4.2, "totalCount": 131}"#;
        let stats: AggregateStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.total_count, 131);
    }
}
