//! Input Loader (SPEC_FULL §2 component 10): reads a data directory's
//! `teachers.json`, `classes.json`, `rules.json`, `grades.json`, and an
//! optional `generation.toml` into a `GenerationInput`, mirroring the
//! teacher's `load_input_from_dir` / `load_json_file` / `load_config_or_default`
//! shape (`parser/json.rs`).

use crate::engine::grid::TeacherGrid;
use crate::error::{EngineError, Result};
use crate::types::{Class, GenerationConfig, GenerationInput, Grade, LockedTeacherGrids, RuleRecord, Teacher};
use std::fs;
use std::path::Path;

/// Load every input file for one generation run from `dir`.
///
/// `dir/locked/*.json` is optional: when present, each file's stem is taken
/// as a teacher name and its contents deserialized as a frozen `TeacherGrid`,
/// populating `GenerationInput::locked_teachers` (refinement mode, §6
/// `lockedTeachers`).
pub fn load_input_from_dir(dir: &Path) -> Result<GenerationInput> {
    let teachers: Vec<Teacher> = load_json_file(&dir.join("teachers.json"))?;
    let classes: Vec<Class> = load_json_file(&dir.join("classes.json"))?;
    let grades: Vec<Grade> = load_json_file(&dir.join("grades.json"))?;
    let rules: Vec<RuleRecord> = load_json_file_or_default(&dir.join("rules.json"));
    let config = load_config_or_default(&dir.join("generation.toml"));
    let locked_teachers = load_locked_teachers(&dir.join("locked"))?;

    Ok(GenerationInput {
        teachers,
        classes,
        rules,
        grades,
        config,
        locked_teachers,
    })
}

fn load_locked_teachers(dir: &Path) -> Result<LockedTeacherGrids> {
    let mut locked = LockedTeacherGrids::new();
    if !dir.exists() {
        return Ok(locked);
    }

    let entries = fs::read_dir(dir).map_err(|e| EngineError::FileRead {
        path: dir.display().to_string(),
        source: e,
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| EngineError::FileRead {
            path: dir.display().to_string(),
            source: e,
        })?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let grid: TeacherGrid = load_json_file(&path)?;
        locked.insert(stem.to_string(), grid);
    }

    Ok(locked)
}

/// Load `generation.toml`, falling back to `GenerationConfig::default()` when
/// absent or malformed (mirrors `load_config_or_default`).
pub fn load_config_or_default(path: &Path) -> GenerationConfig {
    if !path.exists() {
        return GenerationConfig::default();
    }
    match fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content).unwrap_or_default(),
        Err(_) => GenerationConfig::default(),
    }
}

fn load_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let path_str = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|e| EngineError::FileRead {
        path: path_str.clone(),
        source: e,
    })?;

    serde_json::from_str(&content).map_err(|e| {
        EngineError::JsonParse {
            file: path_str,
            message: e.to_string(),
        }
        .into()
    })
}

fn load_json_file_or_default<T: serde::de::DeserializeOwned + Default>(path: &Path) -> T {
    if !path.exists() {
        return T::default();
    }
    load_json_file(path).unwrap_or_default()
}

/// Write a `GenerationResult` to `<output_dir>/schedule.json`, creating the
/// directory if needed.
pub fn save_result_json(result: &crate::engine::GenerationResult, output_dir: &Path) -> Result<()> {
    fs::create_dir_all(output_dir)?;
    let json = serde_json::to_string_pretty(result)?;
    fs::write(output_dir.join("schedule.json"), json)?;
    Ok(())
}
