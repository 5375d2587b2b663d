use std::path::Path;

use crate::environment::Environment;

/// Insertion-ordered list of environments with no two entries sharing a path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentList {
    entries: Vec<Environment>,
}

impl EnvironmentList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `env` unless an entry with the same path is already present.
    pub fn insert(&mut self, env: Environment) -> bool {
        if self.contains_path(&env.path) {
            return false;
        }
        self.entries.push(env);
        true
    }

    pub fn contains_path(&self, path: &Path) -> bool {
        self.find_by_path(path).is_some()
    }

    pub fn find_by_path(&self, path: &Path) -> Option<&Environment> {
        self.entries.iter().find(|env| env.path == path)
    }

    pub fn remove_by_path(&mut self, path: &Path) -> Option<Environment> {
        let index = self.entries.iter().position(|env| env.path == path)?;
        Some(self.entries.remove(index))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Environment> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn sort_by_path(&mut self) {
        self.entries.sort_by(|a, b| a.path.cmp(&b.path));
    }
}

impl FromIterator<Environment> for EnvironmentList {
    fn from_iter<I: IntoIterator<Item = Environment>>(iter: I) -> Self {
        let mut list = Self::new();
        for env in iter {
            list.insert(env);
        }
        list
    }
}

impl<'a> IntoIterator for &'a EnvironmentList {
    type Item = &'a Environment;
    type IntoIter = std::slice::Iter<'a, Environment>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
