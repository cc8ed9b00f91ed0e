// In-place terminal rewriting with backspaces
//
// The status text is rewritten by moving the cursor back over what was
// printed last and overwriting it. When the new text is shorter the stale
// tail is blanked with spaces and the cursor moved back again.

/// Character-count bookkeeping for the text currently on screen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Renderer {
    last_len: usize,
    title_len: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Length of the status text currently displayed, title excluded
    pub fn displayed_len(&self) -> usize {
        self.last_len
    }

    pub fn title_len(&self) -> usize {
        self.title_len
    }

    /// Record a title printed ahead of the status text
    pub fn print_title(&mut self, title: &str) -> String {
        self.title_len += text_len(title);
        title.to_string()
    }

    /// Bytes that replace the current status text with `text`
    pub fn repaint(&mut self, text: &str) -> String {
        let new_len = text_len(text);
        let mut out = String::with_capacity(self.last_len * 2 + text.len());

        push_repeat(&mut out, '\x08', self.last_len);
        out.push_str(text);
        if new_len < self.last_len {
            let stale = self.last_len - new_len;
            push_repeat(&mut out, ' ', stale);
            push_repeat(&mut out, '\x08', stale);
        }

        self.last_len = new_len;
        out
    }

    /// Bytes that wipe the status text and title from the line
    pub fn clear(&self) -> String {
        "\x08 \x08".repeat(self.last_len + self.title_len)
    }
}

fn text_len(text: &str) -> usize {
    text.chars().count()
}

fn push_repeat(out: &mut String, c: char, n: usize) {
    out.extend(std::iter::repeat(c).take(n));
}
