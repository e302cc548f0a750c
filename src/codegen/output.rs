//! Indented text sink with deferred insertion points
//!
//! Besides plain appending, the buffer supports *waypoints*: a position marked
//! while later text is still being produced and filled afterwards. Waypoints
//! form a stack; filling always targets the most recently marked one, so a
//! fill never shifts a position that is still pending.

#[derive(Debug, Clone)]
pub struct OutputBuffer {
    text: String,
    indent: usize,
    indent_width: usize,
    at_line_start: bool,
    blank_line_pending: bool,
    waypoints: Vec<usize>,
}

impl OutputBuffer {
    pub fn new(indent_width: usize) -> Self {
        Self {
            text: String::new(),
            indent: 0,
            indent_width,
            at_line_start: true,
            blank_line_pending: false,
            waypoints: Vec::new(),
        }
    }

    /// Append text, indenting every line that starts fresh
    pub fn write(&mut self, s: &str) {
        for (index, piece) in s.split('\n').enumerate() {
            if index > 0 {
                self.text.push('\n');
                self.at_line_start = true;
            }
            if !piece.is_empty() {
                self.start_line();
                self.text.push_str(piece);
            }
        }
    }

    pub fn newline(&mut self) {
        self.text.push('\n');
        self.at_line_start = true;
    }

    /// `write` followed by a newline
    pub fn line(&mut self, s: &str) {
        self.write(s);
        self.newline();
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    /// Separate the next written line from the previous one by an empty line
    pub fn request_blank_line(&mut self) {
        self.blank_line_pending = true;
    }

    pub fn cancel_blank_line(&mut self) {
        self.blank_line_pending = false;
    }

    /// Remember the current position for a later [`fill_waypoint`](Self::fill_waypoint)
    pub fn mark_waypoint(&mut self) {
        self.start_line();
        self.waypoints.push(self.text.len());
    }

    /// Splice `s` in at the most recent waypoint; everything written since stays after it
    pub fn fill_waypoint(&mut self, s: &str) {
        match self.waypoints.pop() {
            Some(position) => self.text.insert_str(position, s),
            None => tracing::warn!(text = s, "waypoint filled without a mark"),
        }
    }

    pub fn pending_waypoints(&self) -> usize {
        self.waypoints.len()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    fn start_line(&mut self) {
        if !self.at_line_start {
            return;
        }
        if self.blank_line_pending {
            self.text.push('\n');
            self.blank_line_pending = false;
        }
        self.text.push_str(&" ".repeat(self.indent * self.indent_width));
        self.at_line_start = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indentation() {
        let mut out = OutputBuffer::new(4);
        out.line("class A");
        out.indent();
        out.write("int X;\nint Y;");
        out.newline();
        out.dedent();
        out.line("}");

        assert_eq!(out.as_str(), "class A\n    int X;\n    int Y;\n}\n");
    }

    #[test]
    fn test_waypoints_fill_in_reverse_order() {
        let mut out = OutputBuffer::new(4);
        out.write("var (");
        out.mark_waypoint();
        out.write(", ");
        out.mark_waypoint();
        out.write(") = Pair();");

        out.fill_waypoint("B");
        out.fill_waypoint("A");
        assert_eq!(out.as_str(), "var (A, B) = Pair();");
        assert_eq!(out.pending_waypoints(), 0);
    }

    #[test]
    fn test_waypoint_keeps_later_multiline_text() {
        let mut out = OutputBuffer::new(2);
        out.indent();
        out.mark_waypoint();
        out.write(" = F(\nx);");
        out.fill_waypoint("var Y");

        assert_eq!(out.as_str(), "  var Y = F(\n  x);");
    }

    #[test]
    fn test_blank_line_is_lazy() {
        let mut out = OutputBuffer::new(4);
        out.line("a");
        out.request_blank_line();
        out.line("b");
        out.request_blank_line();
        out.cancel_blank_line();
        out.line("}");

        assert_eq!(out.as_str(), "a\n\nb\n}\n");
    }
}
