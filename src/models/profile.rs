use chrono::{SecondsFormat, Utc};
use serde::Serialize;

/// Static profile served by `GET /api/user`.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub name: &'static str,
    pub age: u32,
    pub interests: [&'static str; 3],
    pub mood: &'static str,
    pub favourite_programming_language: &'static str,
}

impl UserProfile {
    pub const fn owner() -> Self {
        UserProfile {
            name: "Supun Hewagamage",
            age: 21,
            interests: ["coding", "hacking", "pizza"],
            mood: "burntout",
            favourite_programming_language: "Java",
        }
    }
}

/// Liveness report served by `GET /api/status`.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub status: &'static str,
    pub timestamp: String,
}

impl StatusReport {
    /// Timestamp is ISO-8601 in UTC with millisecond precision.
    pub fn now() -> Self {
        StatusReport {
            status: "Server is healthy and alive",
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn test_owner_profile_serialization() {
        let json = serde_json::to_string(&UserProfile::owner()).expect("Failed to serialize profile");
        let expected = r#"{"name":"Supun Hewagamage","age":21,"interests":["coding","hacking","pizza"],"mood":"burntout","favourite_programming_language":"Java"}"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn test_status_timestamp_format() {
        let report = StatusReport::now();

        assert_eq!(report.status, "Server is healthy and alive");
        assert!(report.timestamp.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(&report.timestamp).is_ok());
        // YYYY-MM-DDTHH:MM:SS.mmmZ
        assert_eq!(report.timestamp.len(), 24);
    }
}
