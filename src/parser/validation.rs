//! Input Validator (SPEC_FULL §2 component 11): collects non-fatal warnings
//! and fatal errors before generation starts, mirroring `validate_input`'s
//! duplicate-ID and dangling-reference checks (`parser/validation.rs`).

use crate::types::GenerationInput;
use std::collections::HashSet;

/// Validation result with collected errors and warnings.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }
}

/// Validate a `GenerationInput` ahead of a generation run. The two fatal
/// conditions the engine itself refuses to run with (empty grade vocabulary,
/// zero classes, §7) are reported as errors here too, so callers can surface
/// them before spending a CLI invocation on `generate`.
pub fn validate_input(input: &GenerationInput) -> ValidationResult {
    let mut result = ValidationResult::default();

    if input.grades.is_empty() {
        result.add_error("no grades provided");
    }
    if input.classes.is_empty() {
        result.add_error("no classes to schedule");
    }

    check_duplicate_teacher_names(&input.teachers, &mut result);
    check_duplicate_grade_names(&input.grades, &mut result);

    let teacher_names: HashSet<&str> = input.teachers.iter().map(|t| t.name.as_str()).collect();
    for class in &input.classes {
        if !teacher_names.contains(class.teacher.as_str()) {
            result.add_error(format!(
                "Class for '{}' references unknown teacher '{}'",
                class.grade_display, class.teacher
            ));
        }
        if class.days_per_week == 0 && class.fixed_slots.is_empty() {
            result.add_warning(format!(
                "Class '{} / {}' has days_per_week = 0 and no fixed slots; it will contribute no sessions",
                class.teacher, class.subject
            ));
        }
        if !class.fixed_slots.is_empty() && class.fixed_slots.len() as u8 != class.days_per_week
            && class.days_per_week != 0
        {
            result.add_warning(format!(
                "Class '{} / {}' has {} fixed slots but days_per_week = {}; fixed slots win (§3)",
                class.teacher,
                class.subject,
                class.fixed_slots.len(),
                class.days_per_week
            ));
        }
    }

    let rule_keys: HashSet<&str> = input.rules.iter().map(|r| r.rule_key.as_str()).collect();
    for locked_name in input.locked_teachers.keys() {
        if !teacher_names.contains(locked_name.as_str()) {
            result.add_warning(format!(
                "Locked teacher '{locked_name}' does not appear in the teacher roster"
            ));
        }
    }
    if !rule_keys.contains(crate::engine::rules::STUDY_HALL_GRADES) {
        result.add_warning("no study_hall_grades rule configured; study-hall placement will place nothing");
    }

    result
}

fn check_duplicate_teacher_names(teachers: &[crate::types::Teacher], result: &mut ValidationResult) {
    let mut seen = HashSet::new();
    for teacher in teachers {
        if !seen.insert(teacher.name.as_str()) {
            result.add_error(format!("Duplicate teacher name: '{}'", teacher.name));
        }
    }
}

fn check_duplicate_grade_names(grades: &[crate::types::Grade], result: &mut ValidationResult) {
    let mut seen = HashSet::new();
    for grade in grades {
        if !seen.insert(grade.name.as_str()) {
            result.add_error(format!("Duplicate grade name: '{}'", grade.name));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Class, GenerationConfig, Grade, RuleRecord, Teacher, TeacherStatus};
    use std::collections::HashMap;

    fn base_input() -> GenerationInput {
        GenerationInput {
            teachers: vec![Teacher {
                name: "T1".to_string(),
                status: TeacherStatus::FullTime,
                can_supervise_study_hall: Default::default(),
            }],
            classes: vec![Class {
                teacher: "T1".to_string(),
                grade_display: "1st Grade".to_string(),
                grades: vec![],
                subject: "Math".to_string(),
                days_per_week: 3,
                is_elective: false,
                available_days: None,
                available_blocks: None,
                fixed_slots: vec![],
            }],
            rules: vec![RuleRecord {
                rule_key: "study_hall_grades".to_string(),
                enabled: true,
                config: Some(serde_json::json!({"grades": []})),
            }],
            grades: vec![Grade {
                name: "1st Grade".to_string(),
                sort_order: 1,
            }],
            config: GenerationConfig::default(),
            locked_teachers: HashMap::new(),
        }
    }

    #[test]
    fn well_formed_input_is_valid() {
        let result = validate_input(&base_input());
        assert!(result.is_valid(), "{:?}", result.errors);
    }

    #[test]
    fn empty_grades_is_an_error() {
        let mut input = base_input();
        input.grades.clear();
        let result = validate_input(&input);
        assert!(!result.is_valid());
    }

    #[test]
    fn class_with_unknown_teacher_is_an_error() {
        let mut input = base_input();
        input.classes[0].teacher = "Ghost".to_string();
        let result = validate_input(&input);
        assert!(!result.is_valid());
    }

    #[test]
    fn duplicate_teacher_names_are_an_error() {
        let mut input = base_input();
        input.teachers.push(input.teachers[0].clone());
        let result = validate_input(&input);
        assert!(!result.is_valid());
    }
}
