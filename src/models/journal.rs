use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::store::StoreError;

/// 永続化された日記エントリ。
/// ID はドキュメントストアの慣習に合わせて JSON 上では `_id` として出力する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub entry: String,
    pub date: DateTime<Utc>,
}

/// Fields handed to the store on insert. Either may be missing; the store
/// decides whether the record is acceptable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewJournalEntry {
    pub title: Option<String>,
    pub entry: Option<String>,
}

/// Partial update. Only the keys present here are overwritten.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JournalPatch {
    pub title: Option<String>,
    pub entry: Option<String>,
}

/// POST / PUT `/api/journal` のリクエストボディ。
/// 型チェックはしないので、フィールドは生の `serde_json::Value` のまま受け取る。
#[derive(Debug, Default, Deserialize)]
pub struct JournalWriteRequest {
    #[serde(default)]
    pub title: Option<Value>,
    #[serde(default)]
    pub entry: Option<Value>,
}

/// Query string of `GET /api/journal`.
#[derive(Debug, Default, Deserialize)]
pub struct JournalQuery {
    pub title: Option<String>,
}

/// Filter understood by every store engine.
#[derive(Debug, Clone, PartialEq)]
pub enum JournalFilter {
    All,
    /// Case-insensitive substring match against `title` OR `entry`.
    Contains(String),
}

/// A field is blank when it is absent, `null`, `""`, `0` or `false`.
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::Bool(b)) => !b,
        Some(Value::Array(_)) | Some(Value::Object(_)) => false,
    }
}

/// Integral floats print without a fractional part (`1.0` -> `1`).
fn number_text(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        _ => n.to_string(),
    }
}

/// Text form of a scalar JSON value. Objects and arrays have none.
pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(number_text(n)),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// String coercion used when a value is interpolated into a message:
/// arrays join their elements with `,` and objects print as `[object Object]`.
pub fn display_text(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => display_text(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
        scalar => as_text(scalar).unwrap_or_default(),
    }
}

/// 非空のフィールドだけを文字列化して取り出す。
/// 文字列化できない値 (object / array) はストア側のキャスト失敗として扱う。
fn non_blank_text(value: Option<Value>, field: &'static str) -> Result<Option<String>, StoreError> {
    if is_blank(value.as_ref()) {
        return Ok(None);
    }

    match value.as_ref().and_then(as_text) {
        Some(text) => Ok(Some(text)),
        None => Err(StoreError::InvalidField(field)),
    }
}

impl JournalEntry {
    /// Fresh entry with a random id, stamped with the current time at
    /// millisecond precision so every engine serializes the same value.
    pub fn new(title: String, entry: String) -> Self {
        JournalEntry {
            id: Uuid::new_v4(),
            title,
            entry,
            date: Utc::now().trunc_subsecs(3),
        }
    }

    /// Overwrite the patched fields. `date` is never touched.
    pub fn apply(&mut self, patch: JournalPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }

        if let Some(entry) = patch.entry {
            self.entry = entry;
        }
    }
}

impl NewJournalEntry {
    /// ストアのスキーマ制約: title と entry の両方が必須。
    /// ハンドラーは「どちらか一方」しか見ないので、片方だけの POST はここで失敗する。
    pub fn require_fields(self) -> Result<(String, String), StoreError> {
        let title = self
            .title
            .filter(|t| !t.is_empty())
            .ok_or(StoreError::MissingField("title"))?;
        let entry = self
            .entry
            .filter(|e| !e.is_empty())
            .ok_or(StoreError::MissingField("entry"))?;

        Ok((title, entry))
    }
}

impl JournalPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.entry.is_none()
    }
}

impl JournalWriteRequest {
    /// True when at least one of `title` / `entry` is non-blank.
    pub fn has_content(&self) -> bool {
        !is_blank(self.title.as_ref()) || !is_blank(self.entry.as_ref())
    }

    pub fn into_new_entry(self) -> Result<NewJournalEntry, StoreError> {
        Ok(NewJournalEntry {
            title: non_blank_text(self.title, "title")?,
            entry: non_blank_text(self.entry, "entry")?,
        })
    }

    pub fn into_patch(self) -> Result<JournalPatch, StoreError> {
        Ok(JournalPatch {
            title: non_blank_text(self.title, "title")?,
            entry: non_blank_text(self.entry, "entry")?,
        })
    }
}

impl JournalFilter {
    /// A blank `title` query means no filtering.
    pub fn from_query(query: &JournalQuery) -> Self {
        match query.title.as_deref() {
            Some(needle) if !needle.is_empty() => JournalFilter::Contains(needle.to_string()),
            _ => JournalFilter::All,
        }
    }

    pub fn matches(&self, journal: &JournalEntry) -> bool {
        match self {
            JournalFilter::All => true,
            JournalFilter::Contains(needle) => {
                let needle = needle.to_lowercase();
                journal.title.to_lowercase().contains(&needle)
                    || journal.entry.to_lowercase().contains(&needle)
            }
        }
    }
}
