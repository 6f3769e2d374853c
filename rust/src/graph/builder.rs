//! Validation of raw project payloads into a [`TaskGraph`].

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::{effective_duration, Task, TaskId, TaskStatus, MAX_DURATION};

use super::{Diagnostic, TaskGraph};

/// Input that cannot be turned into a graph. The only fatal error class.
#[derive(Error, Debug)]
pub enum MalformedInput {
    #[error("Invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Project record must be a JSON object")]
    NotAnObject,
    #[error("Project record has no task list")]
    MissingTasks,
    #[error("Task list must be a sequence of records, got {0}")]
    NotASequence(&'static str),
    #[error("Task record #{index} is not an object")]
    NotARecord { index: usize },
    #[error("Task record #{index} has no identifier")]
    MissingId { index: usize },
    #[error("Task record #{index} is invalid: {source}")]
    InvalidRecord {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid start date {0:?}, expected YYYY-MM-DD")]
    InvalidStartDate(String),
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Accepted keys per task field, most preferred first.
const ID_KEYS: &[&str] = &["id", "identifiant", "task_id"];
const NAME_KEYS: &[&str] = &["nom", "name", "titre", "title"];
const DESCRIPTION_KEYS: &[&str] = &["description", "desc", "detail", "details"];
const DURATION_KEYS: &[&str] = &["duree_estimee", "duree", "duration", "estimated_duration"];
const UNIT_KEYS: &[&str] = &["unite_duree", "duration_unit", "unite"];
const PREDECESSOR_KEYS: &[&str] = &[
    "predecesseurs",
    "predecessors",
    "dependances",
    "dependencies",
];
const RESOURCE_KEYS: &[&str] = &["ressources_requises", "resources", "ressources"];
const STATUS_KEYS: &[&str] = &["statut", "status", "etat"];

const PROJECT_NAME_KEYS: &[&str] = &["nom_projet", "project_name", "nom", "name", "titre", "title"];
const MANAGER_KEYS: &[&str] = &["responsable", "manager", "chef_projet", "project_manager"];
const START_DATE_KEYS: &[&str] = &["date_debut", "start_date", "debut", "start"];
const TASK_LIST_KEYS: &[&str] = &["taches", "tasks", "activites"];

/// Value of the first key in `keys` present in `record`.
fn first_match<'a>(record: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| record.get(*key))
}

/// Deserialize the first matching field; absent and null both give `None`.
fn field<T: DeserializeOwned>(
    record: &Map<String, Value>,
    keys: &[&str],
) -> Result<Option<T>, serde_json::Error> {
    match first_match(record, keys) {
        None => Ok(None),
        Some(value) => Option::<T>::deserialize(value),
    }
}

/// A free-text field that may arrive as a string, number or boolean.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ScalarText {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
}

impl From<ScalarText> for String {
    fn from(text: ScalarText) -> Self {
        match text {
            ScalarText::Text(s) => s,
            ScalarText::Number(n) => n.to_string(),
            ScalarText::Flag(b) => b.to_string(),
        }
    }
}

/// A resource given by name or as a record carrying a `name`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResourceRef {
    Name(String),
    Number(serde_json::Number),
    Record(Map<String, Value>),
}

impl From<ResourceRef> for String {
    fn from(resource: ResourceRef) -> Self {
        match resource {
            ResourceRef::Name(name) => name,
            ResourceRef::Number(n) => n.to_string(),
            ResourceRef::Record(record) => match record.get("name") {
                Some(Value::String(name)) => name.clone(),
                Some(other) => other.to_string(),
                None => Value::Object(record).to_string(),
            },
        }
    }
}

/// One task record as supplied by the caller. Unknown fields are ignored.
#[derive(Debug, Default)]
pub struct RawTask {
    pub id: Option<TaskId>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration: Option<f64>,
    pub duration_unit: Option<String>,
    pub predecessors: Option<Vec<TaskId>>,
    pub resources: Option<Vec<String>>,
    pub status: Option<TaskStatus>,
}

impl RawTask {
    /// Read a record, taking the first present synonym of every field.
    pub fn from_record(record: &Map<String, Value>) -> Result<Self, serde_json::Error> {
        let text = |keys: &[&str]| -> Result<Option<String>, serde_json::Error> {
            Ok(field::<ScalarText>(record, keys)?.map(String::from))
        };
        Ok(Self {
            id: field(record, ID_KEYS)?,
            name: text(NAME_KEYS)?,
            description: text(DESCRIPTION_KEYS)?,
            duration: field(record, DURATION_KEYS)?,
            duration_unit: text(UNIT_KEYS)?,
            predecessors: field(record, PREDECESSOR_KEYS)?,
            resources: field::<Vec<ResourceRef>>(record, RESOURCE_KEYS)?
                .map(|list| list.into_iter().map(String::from).collect()),
            status: text(STATUS_KEYS)?.map(TaskStatus::from),
        })
    }

    /// Normalize into a [`Task`], reporting a defaulted or clamped duration.
    fn into_task(self, index: usize) -> Result<(Task, Option<Diagnostic>), MalformedInput> {
        let id = self.id.ok_or(MalformedInput::MissingId { index })?;
        let duration = effective_duration(self.duration);
        let adjusted = match self.duration {
            Some(d) if d.is_finite() && d > MAX_DURATION as f64 => {
                Some(Diagnostic::ClampedDuration {
                    task: id.clone(),
                    raw: d,
                })
            }
            Some(d) if d.is_finite() && d > 0.0 => None,
            raw => Some(Diagnostic::DefaultedDuration {
                task: id.clone(),
                raw,
            }),
        };

        let task = Task {
            name: self.name.unwrap_or_else(|| format!("Task {}", id)),
            description: self.description.filter(|d| !d.is_empty()),
            duration,
            duration_unit: self.duration_unit.filter(|u| !u.trim().is_empty()),
            predecessors: self.predecessors.unwrap_or_default(),
            resources: self.resources.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            id,
        };
        Ok((task, adjusted))
    }
}

/// Project envelope around the task list. Unknown fields are ignored.
#[derive(Debug, Default)]
pub struct RawProject {
    pub name: Option<String>,
    pub start_date: Option<String>,
    pub manager: Option<String>,
    pub tasks: Option<Value>,
}

impl RawProject {
    pub fn from_record(record: &Map<String, Value>) -> Result<Self, serde_json::Error> {
        let text = |keys: &[&str]| -> Result<Option<String>, serde_json::Error> {
            Ok(field::<ScalarText>(record, keys)?.map(String::from))
        };
        Ok(Self {
            name: text(PROJECT_NAME_KEYS)?,
            start_date: text(START_DATE_KEYS)?,
            manager: text(MANAGER_KEYS)?,
            tasks: first_match(record, TASK_LIST_KEYS).filter(|tasks| !tasks.is_null()).cloned(),
        })
    }
}

impl TaskGraph {
    /// Validate a raw task sequence.
    ///
    /// Fails if `records` is not an array of objects or any record lacks an
    /// id. Everything else falls back and is reported in
    /// [`TaskGraph::diagnostics`].
    pub fn from_records(records: &Value) -> Result<Self, MalformedInput> {
        let items = records
            .as_array()
            .ok_or_else(|| MalformedInput::NotASequence(json_kind(records)))?;

        let mut tasks = Vec::with_capacity(items.len());
        let mut diagnostics = Vec::new();
        for (index, item) in items.iter().enumerate() {
            let record = item
                .as_object()
                .ok_or(MalformedInput::NotARecord { index })?;
            let raw = RawTask::from_record(record)
                .map_err(|source| MalformedInput::InvalidRecord { index, source })?;
            let (task, defaulted) = raw.into_task(index)?;
            diagnostics.extend(defaulted);
            tasks.push(task);
        }

        Ok(Self::assemble(tasks, diagnostics))
    }
}

/// A validated project: metadata plus its task graph.
#[derive(Clone, Debug)]
pub struct Project {
    pub name: String,
    pub manager: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub graph: TaskGraph,
}

impl Project {
    pub fn from_json_str(payload: &str) -> Result<Self, MalformedInput> {
        let value: Value = serde_json::from_str(payload)?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self, MalformedInput> {
        let record = value.as_object().ok_or(MalformedInput::NotAnObject)?;
        let raw = RawProject::from_record(record)?;
        let records = raw.tasks.as_ref().ok_or(MalformedInput::MissingTasks)?;
        let graph = TaskGraph::from_records(records)?;

        Ok(Self {
            name: raw
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| "Untitled Project".to_string()),
            manager: raw.manager,
            start_date: parse_start_date(raw.start_date.as_deref())?,
            graph,
        })
    }
}

fn parse_start_date(raw: Option<&str>) -> Result<Option<NaiveDate>, MalformedInput> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| MalformedInput::InvalidStartDate(s.to_string())),
    }
}
