//! Editable markdown buffer with a character-indexed selection.

/// Selection in character (not byte) offsets. `start <= end` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    /// Collapsed selection (a caret) at `at`.
    pub fn caret(at: usize) -> Self {
        Self { start: at, end: at }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Text buffer edited by the biography editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorDocument {
    text: String,
    selection: Selection,
}

impl EditorDocument {
    /// Create a document with the caret at the end.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let end = text.chars().count();
        Self {
            text,
            selection: Selection::caret(end),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Mutable access for the text widget. Call [`Self::set_selection`]
    /// afterwards so the selection stays in bounds.
    pub fn text_mut(&mut self) -> &mut String {
        &mut self.text
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Set the selection, ordering and clamping the bounds.
    pub fn set_selection(&mut self, a: usize, b: usize) {
        let len = self.char_len();
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        self.selection = Selection {
            start: start.min(len),
            end: end.min(len),
        };
    }

    /// Erase everything and put the caret at the document start.
    pub fn clear(&mut self) {
        self.text.clear();
        self.selection = Selection::caret(0);
    }

    /// Surround the selection with `marker`. With an empty selection the
    /// caret lands between the two markers.
    pub fn wrap_selection(&mut self, marker: &str) {
        self.wrap_with(marker, marker);
    }

    /// Surround the selection with `before` and `after`, keeping the
    /// original text selected.
    pub fn wrap_with(&mut self, before: &str, after: &str) {
        let Selection { start, end } = self.selection;
        let before_len = before.chars().count();

        self.insert_raw(end, after);
        self.insert_raw(start, before);
        self.selection = Selection {
            start: start + before_len,
            end: end + before_len,
        };
    }

    /// Turn the selection into `[text](url)`. An empty selection inserts a
    /// placeholder label.
    pub fn insert_link(&mut self, url: &str) {
        if self.selection.is_empty() {
            let at = self.selection.start;
            let label = "link";
            self.insert_raw(at, &format!("[{label}]({url})"));
            // Select the label so typing replaces it.
            self.selection = Selection {
                start: at + 1,
                end: at + 1 + label.chars().count(),
            };
        } else {
            self.wrap_with("[", &format!("]({url})"));
        }
    }

    /// Prefix every line touched by the selection. `prefix` receives the
    /// zero-based line number within the selection.
    pub fn prefix_lines(&mut self, prefix: impl Fn(usize) -> String) {
        let Selection { start, end } = self.selection;
        let line_starts = self.line_starts_between(start, end);

        let mut added = 0;
        let mut added_before_start = 0;
        for (n, line_start) in line_starts.into_iter().enumerate() {
            let p = prefix(n);
            let p_len = p.chars().count();
            self.insert_raw(line_start + added, &p);
            if line_start <= start {
                added_before_start += p_len;
            }
            added += p_len;
        }

        self.selection = Selection {
            start: start + added_before_start,
            end: end + added,
        };
    }

    /// Insert `content` at character offset `at` and place the caret after it.
    pub fn insert_at(&mut self, at: usize, content: &str) {
        let at = at.min(self.char_len());
        self.insert_raw(at, content);
        self.selection = Selection::caret(at + content.chars().count());
    }

    /// Insert a markdown image reference at `at`.
    pub fn insert_image(&mut self, at: usize, url: &str) {
        self.insert_at(at, &format!("![]({url})"));
    }

    fn insert_raw(&mut self, at: usize, content: &str) {
        let byte = self.byte_offset(at);
        self.text.insert_str(byte, content);
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len())
    }

    /// Character offsets of the starts of lines overlapping `start..=end`.
    fn line_starts_between(&self, start: usize, end: usize) -> Vec<usize> {
        let mut starts = Vec::new();
        let mut line_start = 0;
        for (i, c) in self.text.chars().enumerate() {
            if i > end {
                break;
            }
            if c == '\n' {
                if i >= start {
                    starts.push(line_start);
                }
                line_start = i + 1;
            }
        }
        if line_start <= end {
            starts.push(line_start);
        }
        starts
    }
}
