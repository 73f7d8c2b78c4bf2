//! HTML trace of a reasoning loop, reported as `thoughts`.

/// Trace lines, escaped and joined with `<br>` on render.
#[derive(Debug, Clone, Default)]
pub struct Trace {
    lines: Vec<String>,
}

impl Trace {
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn render(&self) -> String {
        self.lines
            .iter()
            .map(|line| html_escape(line).replace('\n', "<br>"))
            .collect::<Vec<_>>()
            .join("<br>")
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
