// Structure tab state management.
// Holds the fetched file tree and scroll position for the tree view.

use crate::github::FileTree;

use super::LoadingState;

/// State for the Structure tab.
#[derive(Debug, Default)]
pub struct StructureTabState {
    /// Branch the tree was fetched from.
    pub branch: Option<String>,
    /// The file tree, once fetched.
    pub tree: LoadingState<FileTree>,
    /// Vertical scroll offset.
    pub scroll_y: u16,
    /// Horizontal scroll offset.
    pub scroll_x: u16,
}

impl StructureTabState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_loading(&mut self) {
        self.tree = LoadingState::Loading;
        self.scroll_y = 0;
        self.scroll_x = 0;
    }

    pub fn set_loaded(&mut self, branch: String, tree: FileTree) {
        self.branch = Some(branch);
        self.tree = LoadingState::Loaded(tree);
        self.scroll_y = 0;
        self.scroll_x = 0;
    }

    pub fn set_error(&mut self, error: String) {
        self.tree = LoadingState::Error(error);
    }

    /// Lines to render: every tree path, files and directories alike,
    /// in the order GitHub returned them.
    pub fn display_lines(&self) -> Vec<&str> {
        match self.tree.data() {
            Some(tree) => tree.entries.iter().map(|e| e.path.as_str()).collect(),
            None => Vec::new(),
        }
    }

    pub fn scroll_down(&mut self, lines: u16) {
        let max = self.display_lines().len().saturating_sub(1) as u16;
        self.scroll_y = self.scroll_y.saturating_add(lines).min(max);
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll_y = self.scroll_y.saturating_sub(lines);
    }

    pub fn scroll_left(&mut self) {
        self.scroll_x = self.scroll_x.saturating_sub(4);
    }

    pub fn scroll_right(&mut self) {
        self.scroll_x = self.scroll_x.saturating_add(4);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::types::{TreeEntry, TreeEntryKind};

    fn sample_tree() -> FileTree {
        FileTree {
            entries: vec![
                TreeEntry {
                    path: "src".to_string(),
                    kind: TreeEntryKind::Tree,
                },
                TreeEntry {
                    path: "src/main.rs".to_string(),
                    kind: TreeEntryKind::Blob,
                },
            ],
            truncated: false,
        }
    }

    #[test]
    fn test_display_lines_include_directories() {
        let mut state = StructureTabState::new();
        state.set_loaded("main".to_string(), sample_tree());
        assert_eq!(state.display_lines(), vec!["src", "src/main.rs"]);
    }

    #[test]
    fn test_scroll_clamps_to_content() {
        let mut state = StructureTabState::new();
        state.set_loaded("main".to_string(), sample_tree());

        state.scroll_down(50);
        assert_eq!(state.scroll_y, 1);
        state.scroll_up(50);
        assert_eq!(state.scroll_y, 0);
    }
}
