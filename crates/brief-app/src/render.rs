//! Terminal rendering of session snapshots.

use std::io::{self, Write};

use brief_common::SessionId;
use brief_stream::{Event, SessionState};

/// Writes each committed event exactly once, however many snapshots it
/// appears in.
pub struct Renderer<W: Write> {
    out: W,
    session: Option<SessionId>,
    printed: usize,
    mid_line: bool,
    timestamps: bool,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W, timestamps: bool) -> Self {
        Self {
            out,
            session: None,
            printed: 0,
            mid_line: false,
            timestamps,
        }
    }

    /// Render the events of `state` not yet written.
    pub fn render_new(&mut self, state: &SessionState) -> io::Result<()> {
        if self.session.as_ref() != Some(&state.session) {
            self.session = Some(state.session.clone());
            self.printed = 0;
            self.end_line()?;
        }
        for event in &state.event_log[self.printed..] {
            self.render_event(event)?;
        }
        self.printed = state.event_log.len();
        self.out.flush()
    }

    fn render_event(&mut self, event: &Event) -> io::Result<()> {
        if let Event::Token { text } = event {
            self.out.write_all(text.as_bytes())?;
            if !text.is_empty() {
                self.mid_line = !text.ends_with('\n');
            }
            return Ok(());
        }

        self.end_line()?;
        if self.timestamps {
            write!(self.out, "{} ", chrono::Local::now().format("%H:%M:%S"))?;
        }
        match event {
            Event::Phase { text } => writeln!(self.out, "== {} ==", title_case(text)),
            Event::Status { text } => writeln!(self.out, "[status] {text}"),
            Event::OpsPatch { text } => writeln!(self.out, "[ops] {text}"),
            Event::Export { out_dir } => writeln!(self.out, "[export] {out_dir}"),
            Event::Final { .. } => writeln!(self.out, "[final] result received"),
            Event::Error { error } => writeln!(self.out, "[error] {error}"),
            Event::Token { .. } => Ok(()),
        }
    }

    fn end_line(&mut self) -> io::Result<()> {
        if self.mid_line {
            writeln!(self.out)?;
            self.mid_line = false;
        }
        Ok(())
    }

    /// Closing summary after the session settles.
    pub fn summary(&mut self, state: &SessionState) -> io::Result<()> {
        self.end_line()?;
        writeln!(self.out)?;
        writeln!(
            self.out,
            "{} · {} events · {} tokens · last: {}",
            state.status.as_str(),
            state.event_log.len(),
            state.token_count,
            state
                .last_event
                .map(|kind| kind.as_str())
                .unwrap_or("none"),
        )?;
        for path in &state.exported_paths {
            writeln!(self.out, "exported: {path}")?;
        }
        if let Some(result) = &state.final_result {
            let pretty = serde_json::to_string_pretty(result)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            writeln!(self.out, "{pretty}")?;
        }
        self.out.flush()
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

/// `design_system` -> `Design System`.
pub fn title_case(name: &str) -> String {
    name.split(|c: char| c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
