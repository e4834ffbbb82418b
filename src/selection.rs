//! "Select all" groups used for project and user filters.

use serde::{Deserialize, Serialize};

/// A group of checkable values with an "all" option. While "all" is checked the group stands for every known value.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct SelectGroup {
    all: bool,
    checked: Vec<String>,
    single: bool,
}

impl Default for SelectGroup {
    fn default() -> Self {
        Self::multi()
    }
}

impl SelectGroup {
    pub fn multi() -> Self {
        Self {
            all: true,
            checked: Vec::new(),
            single: false,
        }
    }

    /// Radio-style group: at most one item besides "all".
    pub fn single() -> Self {
        Self {
            single: true,
            ..Self::multi()
        }
    }

    pub fn is_all(&self) -> bool {
        self.all
    }

    pub fn checked(&self) -> &[String] {
        &self.checked
    }

    pub fn set_all(&mut self, checked: bool) {
        self.all = checked;
        if checked {
            self.checked.clear();
        }
    }

    pub fn set_item(&mut self, value: &str, checked: bool) {
        if checked {
            self.all = false;
            if self.single {
                self.checked.clear();
            }
            if !self.checked.iter().any(|item| item == value) {
                self.checked.push(value.to_string());
            }
        } else {
            self.checked.retain(|item| item != value);
            if self.checked.is_empty() {
                self.all = true;
            }
        }
    }

    /// Effective values: every known value under "all", otherwise the checked items.
    pub fn values(&self, known: &[String]) -> Vec<String> {
        if self.all {
            known.to_vec()
        } else {
            self.checked.clone()
        }
    }
}
