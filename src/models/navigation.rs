//! Navigation cursor for a shell session.

/// The current working directory, as directory names from root.
///
/// Only `cd` mutates it, and only with a segment it has already validated,
/// so the cursor always names an existing directory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NavigationState {
    cursor: Vec<String>,
}

impl NavigationState {
    /// Session start: the cursor sits at root.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[String] {
        &self.cursor
    }

    pub fn is_root(&self) -> bool {
        self.cursor.is_empty()
    }

    pub(crate) fn push(&mut self, name: impl Into<String>) {
        self.cursor.push(name.into());
    }

    /// Pop one level. Returns `false` at root.
    pub(crate) fn pop(&mut self) -> bool {
        self.cursor.pop().is_some()
    }

    /// Prompt text: `/` followed by the cursor joined with `/`.
    pub fn display_path(&self) -> String {
        format!("/{}", self.cursor.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_path() {
        let mut nav = NavigationState::new();
        assert_eq!(nav.display_path(), "/");
        nav.push("blog");
        assert_eq!(nav.display_path(), "/blog");
        nav.push("drafts");
        assert_eq!(nav.display_path(), "/blog/drafts");
    }

    #[test]
    fn test_pop_at_root() {
        let mut nav = NavigationState::new();
        assert!(!nav.pop());
        nav.push("blog");
        assert!(nav.pop());
        assert!(nav.is_root());
    }
}
