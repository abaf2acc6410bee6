//! Newline reassembly over decoded text fragments.

/// Splits a running text stream into complete lines.
///
/// Text after the last `\n` stays in the carry buffer until a later
/// fragment terminates it. The splitter never looks at line content.
#[derive(Debug, Default)]
pub struct LineSplitter {
    carry: String,
}

impl LineSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `fragment` and return every line it completed, without the
    /// trailing newline.
    pub fn push(&mut self, fragment: &str) -> Vec<String> {
        if fragment.is_empty() {
            return Vec::new();
        }

        let searched = self.carry.len();
        self.carry.push_str(fragment);

        let Some(offset) = self.carry[searched..].rfind('\n') else {
            return Vec::new();
        };
        let cut = searched + offset;

        let rest = self.carry.split_off(cut + 1);
        let mut complete = std::mem::replace(&mut self.carry, rest);
        complete.truncate(cut);

        complete.split('\n').map(str::to_owned).collect()
    }

    /// The unterminated suffix held so far.
    pub fn carry(&self) -> &str {
        &self.carry
    }

    /// Take the unterminated suffix, if any. Called once at end of stream.
    pub fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.carry);
        (!rest.is_empty()).then_some(rest)
    }
}
