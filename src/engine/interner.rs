//! Interns teacher/subject/grade-display strings into small integer ids at the
//! generation boundary so inner solver loops compare integers, not strings
//! (§9 Design Notes). Names are restored only when building the output grids.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TeacherId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubjectId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GradeDisplayId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GradeId(pub u32);

/// A two-way string <-> id table. One `Interner` per generation run.
#[derive(Debug, Default)]
pub struct Interner {
    names: Vec<String>,
    ids: HashMap<String, u32>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, s: &str) -> u32 {
        if let Some(&id) = self.ids.get(s) {
            return id;
        }
        let id = self.names.len() as u32;
        self.names.push(s.to_string());
        self.ids.insert(s.to_string(), id);
        id
    }

    pub fn resolve(&self, id: u32) -> &str {
        self.names
            .get(id as usize)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn lookup(&self, s: &str) -> Option<u32> {
        self.ids.get(s).copied()
    }
}

impl Interner {
    pub fn intern_teacher(&mut self, name: &str) -> TeacherId {
        TeacherId(self.intern(name))
    }
    pub fn intern_subject(&mut self, name: &str) -> SubjectId {
        SubjectId(self.intern(name))
    }
    pub fn intern_grade_display(&mut self, name: &str) -> GradeDisplayId {
        GradeDisplayId(self.intern(name))
    }
    pub fn intern_grade(&mut self, name: &str) -> GradeId {
        GradeId(self.intern(name))
    }

    pub fn teacher_name(&self, id: TeacherId) -> &str {
        self.resolve(id.0)
    }
    pub fn subject_name(&self, id: SubjectId) -> &str {
        self.resolve(id.0)
    }
    pub fn grade_display_name(&self, id: GradeDisplayId) -> &str {
        self.resolve(id.0)
    }
    pub fn grade_name(&self, id: GradeId) -> &str {
        self.resolve(id.0)
    }
}
