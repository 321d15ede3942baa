//! Wire shapes for remote and fixture data.
//!
//! Records are permissive (every field optional, ids as strings or
//! numbers) so a malformed entry deserializes and can then be rejected with a
//! precise `RecordError` by the `into_*` conversions. List bodies are decoded
//! entry by entry (`validate_all`), so one mistyped entry never sinks the rest.

use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use study_core::model::{
    Difficulty, Document, Flashcard, FlashcardError, ParseIdError, Question, Quiz, QuizError,
    User,
};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RecordError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("invalid field `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("question {index}: {source}")]
    Question {
        index: usize,
        #[source]
        source: QuizError,
    },

    #[error(transparent)]
    Quiz(#[from] QuizError),

    #[error(transparent)]
    Flashcard(#[from] FlashcardError),

    #[error(transparent)]
    Id(#[from] ParseIdError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Identifier as sent on the wire: `"1"` or `1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(u64),
    Text(String),
}

impl RawId {
    fn parse<T>(&self) -> Result<T, RecordError>
    where
        T: FromStr<Err = ParseIdError>,
    {
        match self {
            RawId::Number(n) => Ok(n.to_string().parse::<T>()?),
            RawId::Text(s) => Ok(s.parse::<T>()?),
        }
    }
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, RecordError> {
    value.ok_or(RecordError::MissingField(field))
}

fn parse_difficulty(raw: Option<&str>) -> Result<Difficulty, RecordError> {
    let raw = required(raw, "difficulty")?;
    raw.parse::<Difficulty>()
        .map_err(|_| RecordError::InvalidField {
            field: "difficulty",
            reason: format!("unknown difficulty {raw:?}"),
        })
}

//
// ─── QUIZZES ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub question: Option<String>,
    pub options: Option<Vec<String>>,
    pub correct_answer: Option<Value>,
}

impl QuestionRecord {
    fn into_question(self) -> Result<Question, RecordError> {
        let prompt = required(self.question, "question")?;
        let options = required(self.options, "options")?;
        let correct = required(self.correct_answer, "correctAnswer")?;
        let correct = correct
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| RecordError::InvalidField {
                field: "correctAnswer",
                reason: format!("expected a non-negative index, got {correct}"),
            })?;
        Ok(Question::new(prompt, options, correct)?)
    }
}

/// Unwraps a question list; anything but an array is an invalid `field`.
fn question_items(field: &'static str, value: Value) -> Result<Vec<Value>, RecordError> {
    match value {
        Value::Array(items) => Ok(items),
        other => Err(RecordError::InvalidField {
            field,
            reason: format!("expected a list of questions, got {other}"),
        }),
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizRecord {
    pub id: Option<RawId>,
    pub title: Option<String>,
    pub difficulty: Option<String>,
    pub estimated_time: Option<String>,
    pub topic: Option<String>,
    /// The question list in the current API; older payloads sent a count here
    /// and the list under `questions_list`.
    pub questions: Option<Value>,
    #[serde(rename = "questions_list")]
    pub questions_list: Option<Value>,
}

impl QuizRecord {
    /// Validates the record into a `Quiz`.
    ///
    /// # Errors
    ///
    /// Returns `RecordError` naming the first missing or invalid field.
    pub fn into_quiz(self) -> Result<Quiz, RecordError> {
        let id = required(self.id, "id")?.parse()?;
        let title = required(self.title, "title")?;
        let difficulty = parse_difficulty(self.difficulty.as_deref())?;
        let (field, items) = match (self.questions_list, self.questions) {
            (Some(list), _) => ("questions_list", question_items("questions_list", list)?),
            (None, Some(value)) if !value.is_number() => {
                ("questions", question_items("questions", value)?)
            }
            (None, _) => return Err(RecordError::MissingField("questions")),
        };
        let questions = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let record: QuestionRecord =
                    serde_json::from_value(item).map_err(|err| RecordError::InvalidField {
                        field,
                        reason: format!("question {index}: {err}"),
                    })?;
                record.into_question().map_err(|err| match err {
                    RecordError::Quiz(source) => RecordError::Question { index, source },
                    other => other,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let quiz = Quiz::new(
            id,
            title,
            difficulty,
            self.estimated_time.unwrap_or_default(),
            questions,
        )?;
        Ok(match self.topic {
            Some(topic) => quiz.with_topic(topic),
            None => quiz,
        })
    }
}

//
// ─── FLASHCARDS ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlashcardRecord {
    pub id: Option<RawId>,
    pub question: Option<String>,
    pub answer: Option<String>,
    pub topic: Option<String>,
    pub difficulty: Option<String>,
}

impl FlashcardRecord {
    /// # Errors
    ///
    /// Returns `RecordError` naming the first missing or invalid field.
    pub fn into_flashcard(self) -> Result<Flashcard, RecordError> {
        let id = required(self.id, "id")?.parse()?;
        let difficulty = parse_difficulty(self.difficulty.as_deref())?;
        Ok(Flashcard::new(
            id,
            required(self.question, "question")?,
            required(self.answer, "answer")?,
            self.topic.unwrap_or_default(),
            difficulty,
        )?)
    }
}

//
// ─── DOCUMENTS ─────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: Option<RawId>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub file_url: Option<String>,
    pub created_at: Option<String>,
    pub topics: Option<Vec<String>>,
}

impl DocumentRecord {
    /// # Errors
    ///
    /// Returns `RecordError` if the id or timestamp is missing or malformed, or if
    /// neither a title nor a file name is present.
    pub fn into_document(self) -> Result<Document, RecordError> {
        let id = required(self.id, "id")?.parse()?;
        let created_at = parse_timestamp(&required(self.created_at, "created_at")?)?;

        let mut document = Document {
            id,
            title: String::new(),
            summary: self.summary.unwrap_or_default(),
            file_url: self.file_url,
            created_at,
            topics: self.topics.unwrap_or_default(),
        };
        document.title = match self.title.filter(|t| !t.trim().is_empty()) {
            Some(title) => title,
            None => document
                .file_name()
                .map(str::to_string)
                .ok_or(RecordError::MissingField("title"))?,
        };
        Ok(document)
    }
}

/// RFC 3339, or a naive `YYYY-MM-DDTHH:MM:SS[.f]` taken as UTC.
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, RecordError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|err| RecordError::InvalidField {
            field: "created_at",
            reason: err.to_string(),
        })
}

//
// ─── USERS ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: Option<RawId>,
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
}

impl UserRecord {
    /// # Errors
    ///
    /// Returns `RecordError` if the id or email is missing.
    pub fn into_user(self) -> Result<User, RecordError> {
        let id = required(self.id, "id")?.parse()?;
        let email = required(self.email, "email")?;
        Ok(User::new(id, self.name, self.username.unwrap_or_default(), email))
    }
}

//
// ─── LISTS ─────────────────────────────────────────────────────────────────────
//

/// Decodes and converts every entry of a list body, dropping (and logging) the
/// ones that are mistyped or fail validation.
pub fn validate_all<R, T>(
    kind: &'static str,
    entries: Vec<Value>,
    convert: impl Fn(R) -> Result<T, RecordError>,
) -> Vec<T>
where
    R: DeserializeOwned,
{
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(position, entry)| {
            match serde_json::from_value::<R>(entry)
                .map_err(RecordError::from)
                .and_then(&convert)
            {
                Ok(value) => Some(value),
                Err(err) => {
                    tracing::warn!(kind, position, error = %err, "dropping malformed record");
                    None
                }
            }
        })
        .collect()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use study_core::model::{DocumentId, QuizId, UserId};

    #[test]
    fn quiz_record_accepts_string_ids_and_camel_case() {
        let json = r#"{
            "id": "2",
            "title": "React Hooks Quiz",
            "difficulty": "Beginner",
            "estimatedTime": "10 min",
            "questions": [
                {"question": "Which hook manages state?",
                 "options": ["useEffect", "useState", "useContext", "useReducer"],
                 "correctAnswer": 1}
            ]
        }"#;
        let quiz = serde_json::from_str::<QuizRecord>(json)
            .unwrap()
            .into_quiz()
            .unwrap();
        assert_eq!(quiz.id(), QuizId::new(2));
        assert_eq!(quiz.estimated_time(), "10 min");
        assert_eq!(quiz.questions()[0].correct_answer(), 1);
    }

    #[test]
    fn legacy_count_with_questions_list() {
        let json = r#"{
            "id": 1, "title": "ML", "difficulty": "Intermediate",
            "questions": 10,
            "questions_list": [
                {"question": "What is supervised learning?", "options": ["a", "b"], "correctAnswer": 0}
            ]
        }"#;
        let quiz = serde_json::from_str::<QuizRecord>(json)
            .unwrap()
            .into_quiz()
            .unwrap();
        assert_eq!(quiz.question_count(), 1);
    }

    #[test]
    fn count_without_list_is_missing_questions() {
        let json = r#"{"id": 1, "title": "ML", "difficulty": "Beginner", "questions": 3}"#;
        let err = serde_json::from_str::<QuizRecord>(json)
            .unwrap()
            .into_quiz()
            .unwrap_err();
        assert!(matches!(err, RecordError::MissingField("questions")));
    }

    #[test]
    fn bad_question_reports_its_index() {
        let json = r#"{
            "id": 1, "title": "ML", "difficulty": "Beginner",
            "questions": [
                {"question": "ok", "options": ["a", "b"], "correctAnswer": 1},
                {"question": "bad", "options": ["a", "b"], "correctAnswer": 4}
            ]
        }"#;
        let err = serde_json::from_str::<QuizRecord>(json)
            .unwrap()
            .into_quiz()
            .unwrap_err();
        assert!(matches!(
            err,
            RecordError::Question {
                index: 1,
                source: QuizError::CorrectAnswerOutOfRange { .. }
            }
        ));
    }

    #[test]
    fn negative_correct_answer_is_invalid() {
        let record = QuestionRecord {
            question: Some("q".into()),
            options: Some(vec!["a".into(), "b".into()]),
            correct_answer: Some(json!(-1)),
        };
        let err = record.into_question().unwrap_err();
        assert!(matches!(
            err,
            RecordError::InvalidField {
                field: "correctAnswer",
                ..
            }
        ));
    }

    #[test]
    fn unknown_difficulty_is_invalid() {
        let record = QuizRecord {
            id: Some(RawId::Number(1)),
            title: Some("t".into()),
            difficulty: Some("Expert".into()),
            ..QuizRecord::default()
        };
        assert!(matches!(
            record.into_quiz().unwrap_err(),
            RecordError::InvalidField {
                field: "difficulty",
                ..
            }
        ));
    }

    #[test]
    fn document_falls_back_to_file_name_and_parses_naive_time() {
        let json = r#"{
            "id": 12,
            "file_url": "/uploads/7/db-design.docx",
            "summary": "Normalization",
            "created_at": "2024-03-10T08:30:00.123"
        }"#;
        let doc = serde_json::from_str::<DocumentRecord>(json)
            .unwrap()
            .into_document()
            .unwrap();
        assert_eq!(doc.id, DocumentId::new(12));
        assert_eq!(doc.title, "db-design.docx");
        assert_eq!(doc.created_at.to_rfc3339(), "2024-03-10T08:30:00.123+00:00");
    }

    #[test]
    fn document_without_time_is_rejected() {
        let record = DocumentRecord {
            id: Some(RawId::Number(1)),
            title: Some("Notes".into()),
            ..DocumentRecord::default()
        };
        assert!(matches!(
            record.into_document().unwrap_err(),
            RecordError::MissingField("created_at")
        ));
    }

    #[test]
    fn user_record_requires_email() {
        let ok = UserRecord {
            id: Some(RawId::Text("5".into())),
            name: None,
            username: Some("alex".into()),
            email: Some("alex@example.com".into()),
        }
        .into_user()
        .unwrap();
        assert_eq!(ok.id, UserId::new(5));
        assert_eq!(ok.display_name(), "alex");

        let err = UserRecord {
            id: Some(RawId::Number(5)),
            ..UserRecord::default()
        }
        .into_user()
        .unwrap_err();
        assert!(matches!(err, RecordError::MissingField("email")));
    }

    #[test]
    fn validate_all_drops_bad_entries() {
        let entries = vec![
            json!({"id": 1, "question": "What is React?", "answer": "A UI library",
                   "topic": "React", "difficulty": "Beginner"}),
            json!({}),
            json!({"id": 2.5, "question": "q", "answer": "a", "difficulty": "Beginner"}),
        ];
        let cards = validate_all("flashcard", entries, FlashcardRecord::into_flashcard);
        assert_eq!(cards.len(), 1);
    }

    #[test]
    fn mistyped_quiz_entry_does_not_sink_the_list() {
        let entries = vec![
            json!({"id": "1", "title": "React Basics", "difficulty": "Beginner",
                   "questions": [{"question": "What is React?",
                                  "options": ["Library", "Framework"], "correctAnswer": 0}]}),
            json!({"id": "2", "title": "Hooks", "difficulty": "Beginner",
                   "questions": [{"question": "Which hook?",
                                  "options": ["useState", "useEffect"], "correctAnswer": "1"}]}),
            json!({"id": "3", "title": 42, "difficulty": "Beginner", "questions": []}),
        ];
        let quizzes = validate_all("quiz", entries, QuizRecord::into_quiz);
        assert_eq!(quizzes.len(), 1);
        assert_eq!(quizzes[0].id(), QuizId::new(1));
    }

    #[test]
    fn mistyped_document_entry_is_dropped() {
        let entries = vec![
            json!({"id": 1, "title": "ML notes", "created_at": "2024-03-10T08:30:00Z",
                   "topics": ["ml"]}),
            json!({"id": 2, "title": "Stats", "created_at": "2024-03-11T08:30:00Z",
                   "topics": "ml"}),
        ];
        let docs = validate_all("document", entries, DocumentRecord::into_document);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, DocumentId::new(1));
    }

    #[test]
    fn string_correct_answer_names_the_field() {
        let record: QuizRecord = serde_json::from_value(json!({
            "id": 2, "title": "Hooks", "difficulty": "Beginner",
            "questions": [{"question": "Which hook?",
                           "options": ["useState", "useEffect"], "correctAnswer": "1"}]
        }))
        .unwrap();
        assert!(matches!(
            record.into_quiz().unwrap_err(),
            RecordError::InvalidField {
                field: "correctAnswer",
                ..
            }
        ));
    }

    #[test]
    fn non_list_questions_is_invalid() {
        let record: QuizRecord = serde_json::from_value(json!({
            "id": 2, "title": "Hooks", "difficulty": "Beginner", "questions": "soon"
        }))
        .unwrap();
        assert!(matches!(
            record.into_quiz().unwrap_err(),
            RecordError::InvalidField {
                field: "questions",
                ..
            }
        ));
    }
}
