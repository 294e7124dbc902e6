use thiserror::Error;

/// Domain-specific errors for the timetable engine
#[derive(Error, Debug)]
pub enum EngineError {
    // Input/Parse errors
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON in '{file}': {message}")]
    JsonParse { file: String, message: String },

    #[error("Failed to parse TOML in '{file}': {message}")]
    TomlParse { file: String, message: String },

    #[error("Duplicate ID found: {id_type} '{id}'")]
    DuplicateId { id_type: String, id: String },

    // Generation boundary errors (§7: returned immediately, not counted as attempts)
    #[error("no classes to schedule")]
    NoClassesToSchedule,

    #[error("no grades provided")]
    NoGradesProvided,

    #[error("Class '{class}' references unknown grade display '{grade_display}'")]
    UnknownGradeDisplay { class: String, grade_display: String },
}

/// Use anyhow::Result at application boundaries (CLI, file I/O).
pub type Result<T> = anyhow::Result<T>;
