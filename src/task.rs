use chrono::{DateTime, Local, NaiveDateTime};
use ratatui::style::Color;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub type TaskId = u32;
pub type UserId = u32;

/// Placeholder description sent with every task created from the main form.
pub const DEFAULT_DESCRIPTION: &str = "Task description";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// Parses a wire label. Anything unrecognized falls back to `Low`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "high" => Priority::High,
            "medium" => Priority::Medium,
            _ => Priority::Low,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Priority::High => Color::Rgb(0xff, 0x44, 0x44),
            Priority::Medium => Color::Rgb(0xff, 0xbb, 0x33),
            Priority::Low => Color::Rgb(0x00, 0xc8, 0x51),
        }
    }

    /// Cycles through the selector values, wrapping at both ends.
    pub fn step(self, forward: bool) -> Self {
        let index = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        let len = Self::ALL.len();
        let next = if forward {
            (index + 1) % len
        } else {
            (index + len - 1) % len
        };
        Self::ALL[next]
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = Option::<String>::deserialize(deserializer)?;
        Ok(label.as_deref().map(Priority::from_label).unwrap_or_default())
    }
}

/// Display color for a raw priority label, `None` included.
pub fn priority_color(label: Option<&str>) -> Color {
    label.map(Priority::from_label).unwrap_or_default().color()
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default)]
    pub author_id: Option<UserId>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
}

impl Task {
    pub fn author_name(&self) -> &str {
        self.author.as_deref().unwrap_or("unknown")
    }

    pub fn created_at_display(&self) -> String {
        self.created_at
            .as_deref()
            .map(format_timestamp)
            .unwrap_or_default()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub author_id: UserId,
    pub priority: Priority,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
}

/// Partial update for `PUT /tasks/<id>`; `None` fields are left as they are.
#[derive(Debug, Serialize, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Renders a backend timestamp in local time.
///
/// Accepts RFC 3339 and the naive `isoformat()` shape; naive values are taken
/// as UTC. Unparseable input is returned unchanged.
pub fn format_timestamp(raw: &str) -> String {
    const DISPLAY: &str = "%Y-%m-%d %H:%M:%S";
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.with_timezone(&Local).format(DISPLAY).to_string();
    }
    match NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(naive) => naive.and_utc().with_timezone(&Local).format(DISPLAY).to_string(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("high"), Color::Rgb(0xff, 0x44, 0x44))]
    #[case(Some("medium"), Color::Rgb(0xff, 0xbb, 0x33))]
    #[case(Some("low"), Color::Rgb(0x00, 0xc8, 0x51))]
    #[case(Some("urgent"), Color::Rgb(0x00, 0xc8, 0x51))]
    #[case(Some(""), Color::Rgb(0x00, 0xc8, 0x51))]
    #[case(Some("HIGH"), Color::Rgb(0x00, 0xc8, 0x51))]
    #[case(None, Color::Rgb(0x00, 0xc8, 0x51))]
    fn priority_color_is_total(#[case] label: Option<&str>, #[case] expected: Color) {
        assert_eq!(priority_color(label), expected);
    }

    #[test]
    fn task_reads_backend_payload() {
        let json = r#"{
            "id": 7,
            "title": "Buy milk",
            "description": null,
            "is_completed": false,
            "created_at": "2024-03-01T10:20:30.123456",
            "author": "alice",
            "priority": "critical"
        }"#;

        let task: Task = serde_json::from_str(json).unwrap();

        assert_eq!(task.id, 7);
        assert_eq!(task.description, "");
        assert_eq!(task.author_id, None);
        assert_eq!(task.author_name(), "alice");
        assert_eq!(task.priority, Priority::Low);
        assert!(!task.is_completed);
    }

    #[test]
    fn task_tolerates_missing_optional_fields() {
        let task: Task =
            serde_json::from_str(r#"{"id": 1, "title": "x", "priority": null}"#).unwrap();

        assert_eq!(task.priority, Priority::Low);
        assert_eq!(task.author_name(), "unknown");
        assert_eq!(task.created_at_display(), "");
    }

    #[test]
    fn new_task_serializes_wire_shape() {
        let body = NewTask {
            title: "Buy milk".to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            author_id: 1,
            priority: Priority::High,
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "title": "Buy milk",
                "description": "Task description",
                "author_id": 1,
                "priority": "high"
            })
        );
    }

    #[test]
    fn task_update_omits_untouched_fields() {
        let update = TaskUpdate {
            is_completed: Some(true),
            ..TaskUpdate::default()
        };

        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({ "is_completed": true })
        );
    }

    #[rstest]
    #[case(Priority::Low, true, Priority::Medium)]
    #[case(Priority::High, true, Priority::Low)]
    #[case(Priority::Low, false, Priority::High)]
    fn priority_step_wraps(
        #[case] from: Priority,
        #[case] forward: bool,
        #[case] expected: Priority,
    ) {
        assert_eq!(from.step(forward), expected);
    }

    #[test]
    fn unparseable_timestamp_is_shown_raw() {
        assert_eq!(format_timestamp("yesterday"), "yesterday");
    }

    #[test]
    fn naive_and_offset_timestamps_agree() {
        assert_eq!(
            format_timestamp("2024-03-01T10:20:30"),
            format_timestamp("2024-03-01T10:20:30+00:00")
        );
    }
}
