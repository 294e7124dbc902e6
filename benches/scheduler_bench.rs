//! Benchmarks the generation pipeline end to end, the way a solver-heavy
//! crate benchmarks its own search loop rather than individual helpers.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::collections::HashMap;
use timetable_engine::engine::{generate, NoOpProgress};
use timetable_engine::types::{
    Class, GenerationConfig, GenerationInput, Grade, RuleRecord, Teacher, TeacherStatus,
};

fn grade_vocabulary() -> Vec<Grade> {
    let mut grades = vec![Grade { name: "Kindergarten".to_string(), sort_order: 0 }];
    for n in 1..=11u8 {
        grades.push(Grade { name: format!("{n}th Grade"), sort_order: n });
    }
    grades
}

/// Build a roster with `teacher_count` full-time teachers, each holding two
/// classes against distinct grades, plus a shared study-hall rule set.
fn input_of_size(teacher_count: usize) -> GenerationInput {
    let grades = grade_vocabulary();
    let mut teachers = Vec::with_capacity(teacher_count);
    let mut classes = Vec::with_capacity(teacher_count * 2);

    for i in 0..teacher_count {
        let name = format!("Teacher {i}");
        teachers.push(Teacher {
            name: name.clone(),
            status: TeacherStatus::FullTime,
            can_supervise_study_hall: Default::default(),
        });
        let grade = &grades[1 + (i % 11)];
        classes.push(Class {
            teacher: name.clone(),
            grade_display: grade.name.clone(),
            grades: vec![],
            subject: "Math".to_string(),
            days_per_week: 3,
            is_elective: false,
            available_days: None,
            available_blocks: None,
            fixed_slots: vec![],
        });
        classes.push(Class {
            teacher: name,
            grade_display: grade.name.clone(),
            grades: vec![],
            subject: "Reading".to_string(),
            days_per_week: 2,
            is_elective: false,
            available_days: None,
            available_blocks: None,
            fixed_slots: vec![],
        });
    }

    let rules = vec![
        RuleRecord { rule_key: "no_duplicate_subjects".to_string(), enabled: true, config: None },
        RuleRecord { rule_key: "no_btb_open".to_string(), enabled: true, config: None },
        RuleRecord {
            rule_key: "study_hall_grades".to_string(),
            enabled: true,
            config: Some(serde_json::json!({"grades": ["3rd Grade", "4th Grade"]})),
        },
    ];

    GenerationInput {
        teachers,
        classes,
        rules,
        grades,
        config: GenerationConfig {
            num_options: 3,
            num_attempts: 20,
            timeout_per_attempt_ms: 2_000,
            seed: Some(42),
            teachers_needing_study_halls: Vec::new(),
            allow_study_hall_reassignment: false,
        },
        locked_teachers: HashMap::new(),
    }
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    for teacher_count in [4usize, 8, 12] {
        let input = input_of_size(teacher_count);
        group.bench_with_input(BenchmarkId::from_parameter(teacher_count), &input, |b, input| {
            b.iter(|| {
                let mut progress = NoOpProgress;
                black_box(generate(black_box(input), &mut progress))
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_generate);
criterion_main!(benches);
