use std::str::FromStr;

use shared::{
    domain::{Action, ActionCategory, Complexity},
    protocol::ActionsQuery,
};

/// Sentinel accepted by every criterion to mean "no filtering".
pub const ALL: &str = "all";

/// One equality criterion. `Unmatched` holds a value that names no known
/// variant and therefore matches nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criterion<T> {
    Any,
    Is(T),
    Unmatched(String),
}

impl<T> Default for Criterion<T> {
    fn default() -> Self {
        Criterion::Any
    }
}

impl<T: FromStr> Criterion<T> {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case(ALL) {
            return Criterion::Any;
        }
        match raw.parse() {
            Ok(value) => Criterion::Is(value),
            Err(_) => Criterion::Unmatched(raw.to_string()),
        }
    }
}

impl<T: PartialEq> Criterion<T> {
    pub fn accepts(&self, value: &T) -> bool {
        match self {
            Criterion::Any => true,
            Criterion::Is(expected) => expected == value,
            Criterion::Unmatched(_) => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActionFilter {
    pub category: Criterion<ActionCategory>,
    pub complexity: Criterion<Complexity>,
    /// Lowercased search text; empty disables the search.
    search: String,
}

impl ActionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_query(query: &ActionsQuery) -> Self {
        Self::new()
            .category_str(query.category.as_deref().unwrap_or(ALL))
            .complexity_str(query.complexity.as_deref().unwrap_or(ALL))
            .search(query.q.as_deref().unwrap_or_default())
    }

    pub fn category(mut self, category: ActionCategory) -> Self {
        self.category = Criterion::Is(category);
        self
    }

    pub fn category_str(mut self, raw: &str) -> Self {
        self.category = Criterion::parse(raw);
        self
    }

    pub fn complexity(mut self, complexity: Complexity) -> Self {
        self.complexity = Criterion::Is(complexity);
        self
    }

    pub fn complexity_str(mut self, raw: &str) -> Self {
        self.complexity = Criterion::parse(raw);
        self
    }

    pub fn search(mut self, text: &str) -> Self {
        self.search = text.to_lowercase();
        self
    }

    pub fn matches(&self, action: &Action) -> bool {
        self.category.accepts(&action.category)
            && self.complexity.accepts(&action.complexity)
            && self.matches_search(action)
    }

    fn matches_search(&self, action: &Action) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.as_str();
        action.title.to_lowercase().contains(needle)
            || action.description.to_lowercase().contains(needle)
            || action
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(needle))
    }

    /// Matching actions in their original order.
    pub fn apply(&self, actions: &[Action]) -> Vec<Action> {
        actions
            .iter()
            .filter(|action| self.matches(action))
            .cloned()
            .collect()
    }
}
