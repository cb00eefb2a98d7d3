use crate::lesson::Lesson;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub name: String,
    /// 0-based position in first-seen order.
    pub order: usize,
    /// Lessons in crawl order.
    pub lessons: Vec<Lesson>,
}

/// Lessons grouped by module name. Iteration follows the order in which
/// each module name was first seen, not alphabetical order.
#[derive(Debug, Default)]
pub struct ModuleCollection {
    modules: Vec<Module>,
    /// Module name to index into `modules`
    index: HashMap<String, usize>,
}

impl ModuleCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `lesson` to its module, creating the module at the end when
    /// its name hasn't been seen yet.
    pub fn push(&mut self, lesson: Lesson) {
        match self.index.get(&lesson.module_name) {
            Some(&idx) => self.modules[idx].lessons.push(lesson),
            None => {
                let order = self.modules.len();
                tracing::debug!("New module {:?} at position {}", lesson.module_name, order);
                self.index.insert(lesson.module_name.clone(), order);
                self.modules.push(Module {
                    name: lesson.module_name.clone(),
                    order,
                    lessons: vec![lesson],
                });
            }
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Module> {
        self.modules.iter()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn lesson_count(&self) -> usize {
        self.modules.iter().map(|m| m.lessons.len()).sum()
    }
}

impl FromIterator<Lesson> for ModuleCollection {
    fn from_iter<T: IntoIterator<Item = Lesson>>(iter: T) -> Self {
        let mut modules = ModuleCollection::new();
        for lesson in iter {
            modules.push(lesson);
        }
        modules
    }
}

impl<'a> IntoIterator for &'a ModuleCollection {
    type Item = &'a Module;
    type IntoIter = std::slice::Iter<'a, Module>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
