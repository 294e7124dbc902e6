//! Session Builder (§4.3): expands classes into atomic placement requests and
//! links co-taught sessions into groups that must share a single slot.

use super::interner::{Interner, SubjectId, TeacherId};
use crate::types::{Block, Class, Day, Slot};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub u32);

#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub teacher: TeacherId,
    pub grade_display: String,
    pub subject: SubjectId,
    pub valid_slots: Vec<Slot>,
    pub is_fixed: bool,
    pub cotaught_group: Option<GroupId>,
    /// Index into the originating `classes` slice; used by stats/reconciliation
    /// to check P1 ("sessions for c == days_per_week(c)").
    pub class_index: usize,
}

#[derive(Debug, Clone)]
pub struct Group {
    pub id: GroupId,
    /// k-th session of every participating teacher, in teacher-encounter order.
    pub sessions: Vec<SessionId>,
}

#[derive(Debug, Default)]
pub struct SessionBuildResult {
    pub sessions: Vec<Session>,
    pub groups: Vec<Group>,
}

fn all_valid_slots(class: &Class) -> Vec<Slot> {
    let days: Vec<Day> = class
        .available_days
        .clone()
        .unwrap_or_else(|| Day::all().collect());
    let blocks: Vec<Block> = class
        .available_blocks
        .clone()
        .unwrap_or_else(|| Block::all().collect());

    let mut slots = Vec::with_capacity(days.len() * blocks.len());
    for day in &days {
        for block in &blocks {
            slots.push(Slot::new(*day, *block));
        }
    }
    slots
}

/// Build the flat session list for every class (§4.3 first paragraph).
fn build_flat_sessions(classes: &[Class], interner: &mut Interner) -> Vec<Session> {
    let mut sessions = Vec::new();
    let mut next_id = 0u32;

    for (class_index, class) in classes.iter().enumerate() {
        let teacher = interner.intern_teacher(&class.teacher);
        let subject = interner.intern_subject(&class.subject);

        if class.is_fixed() {
            for &(day, block) in &class.fixed_slots {
                sessions.push(Session {
                    id: SessionId(next_id),
                    teacher,
                    grade_display: class.grade_display.clone(),
                    subject,
                    valid_slots: vec![Slot::new(day, block)],
                    is_fixed: true,
                    cotaught_group: None,
                    class_index,
                });
                next_id += 1;
            }
        } else {
            let valid_slots = all_valid_slots(class);
            for _ in 0..class.days_per_week {
                sessions.push(Session {
                    id: SessionId(next_id),
                    teacher,
                    grade_display: class.grade_display.clone(),
                    subject,
                    valid_slots: valid_slots.clone(),
                    is_fixed: false,
                    cotaught_group: None,
                    class_index,
                });
                next_id += 1;
            }
        }
    }

    sessions
}

/// Link sessions sharing `(grade_display, subject)` across distinct teachers into
/// co-taught groups, pairing the k-th session of each teacher (§4.3 second
/// paragraph). Electives never form co-taught groups.
fn link_cotaught_groups(sessions: &mut [Session]) -> Vec<Group> {
    let mut by_key: HashMap<(String, SubjectId), Vec<usize>> = HashMap::new();

    for (idx, session) in sessions.iter().enumerate() {
        if session.grade_display.to_lowercase().contains("elective") {
            continue;
        }
        by_key
            .entry((session.grade_display.clone(), session.subject))
            .or_default()
            .push(idx);
    }

    let mut keys: Vec<_> = by_key.keys().cloned().collect();
    keys.sort_by(|a, b| a.0.cmp(&b.0).then(a.1 .0.cmp(&b.1 .0)));

    let mut groups = Vec::new();
    let mut next_group_id = 0u32;

    for key in keys {
        let indices = &by_key[&key];

        // Partition indices by teacher, preserving encounter order.
        let mut by_teacher: HashMap<TeacherId, Vec<usize>> = HashMap::new();
        let mut teacher_order: Vec<TeacherId> = Vec::new();
        for &idx in indices {
            let t = sessions[idx].teacher;
            if !by_teacher.contains_key(&t) {
                teacher_order.push(t);
            }
            by_teacher.entry(t).or_default().push(idx);
        }

        if teacher_order.len() < 2 {
            continue;
        }

        let min_count = teacher_order
            .iter()
            .map(|t| by_teacher[t].len())
            .min()
            .unwrap_or(0);

        for k in 0..min_count {
            let group_id = GroupId(next_group_id);
            next_group_id += 1;
            let mut member_ids = Vec::with_capacity(teacher_order.len());
            for t in &teacher_order {
                let idx = by_teacher[t][k];
                sessions[idx].cotaught_group = Some(group_id);
                member_ids.push(sessions[idx].id);
            }
            groups.push(Group {
                id: group_id,
                sessions: member_ids,
            });
        }
    }

    groups
}

pub fn build_sessions(classes: &[Class], interner: &mut Interner) -> SessionBuildResult {
    let mut sessions = build_flat_sessions(classes, interner);
    let groups = link_cotaught_groups(&mut sessions);
    SessionBuildResult { sessions, groups }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Class;

    fn class(teacher: &str, grade_display: &str, subject: &str, days: u8) -> Class {
        Class {
            teacher: teacher.to_string(),
            grade_display: grade_display.to_string(),
            grades: vec![],
            subject: subject.to_string(),
            days_per_week: days,
            is_elective: false,
            available_days: None,
            available_blocks: None,
            fixed_slots: vec![],
        }
    }

    #[test]
    fn free_class_yields_days_per_week_sessions() {
        let mut interner = Interner::new();
        let classes = vec![class("T1", "1st Grade", "Math", 3)];
        let result = build_sessions(&classes, &mut interner);
        assert_eq!(result.sessions.len(), 3);
        assert!(result.sessions.iter().all(|s| s.valid_slots.len() == 25));
    }

    #[test]
    fn fixed_class_yields_one_session_per_fixed_slot() {
        let mut interner = Interner::new();
        let mut c = class("T1", "2nd Grade", "Art", 0);
        c.fixed_slots = vec![(Day(0), Block(1)), (Day(2), Block(1))];
        let result = build_sessions(&[c], &mut interner);
        assert_eq!(result.sessions.len(), 2);
        assert!(result.sessions.iter().all(|s| s.is_fixed && s.valid_slots.len() == 1));
    }

    #[test]
    fn cotaught_groups_pair_same_index_sessions_across_teachers() {
        let mut interner = Interner::new();
        let classes = vec![
            class("T1", "6th-7th Grade", "Science", 3),
            class("T2", "6th-7th Grade", "Science", 3),
        ];
        let result = build_sessions(&classes, &mut interner);
        assert_eq!(result.groups.len(), 3);
        for group in &result.groups {
            assert_eq!(group.sessions.len(), 2);
        }
    }

    #[test]
    fn electives_never_group() {
        let mut interner = Interner::new();
        let classes = vec![
            class("T1", "Art Elective", "Art", 2),
            class("T2", "Art Elective", "Art", 2),
        ];
        let result = build_sessions(&classes, &mut interner);
        assert!(result.groups.is_empty());
    }

    #[test]
    fn mismatched_teacher_session_counts_pair_up_to_the_minimum() {
        let mut interner = Interner::new();
        let classes = vec![
            class("T1", "6th Grade", "Science", 3),
            class("T2", "6th Grade", "Science", 2),
        ];
        let result = build_sessions(&classes, &mut interner);
        assert_eq!(result.groups.len(), 2);
    }
}
