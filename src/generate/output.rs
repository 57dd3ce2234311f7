/// Output buffer that accumulates generated code line by line
pub struct Output {
    lines: Vec<String>,
    current_line: String,
    indent_width: usize,
}

impl Output {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            current_line: String::new(),
            indent_width: 4,
        }
    }

    /// Add text to the current line
    pub fn push(&mut self, text: &str) {
        self.current_line.push_str(text);
    }

    /// Indent the current line to `level`
    pub fn indent(&mut self, level: usize) {
        self.current_line
            .extend(std::iter::repeat_n(' ', level * self.indent_width));
    }

    /// Add a newline
    pub fn newline(&mut self) {
        self.current_line.push('\n');
        self.lines.push(std::mem::take(&mut self.current_line));
    }

    /// Add a complete line
    pub fn line(&mut self, text: &str) {
        self.push(text);
        self.newline();
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.current_line.is_empty()
    }

    /// Finish and return the generated code
    pub fn finish(mut self) -> String {
        if !self.current_line.is_empty() {
            self.lines.push(std::mem::take(&mut self.current_line));
        }
        self.lines.join("")
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
