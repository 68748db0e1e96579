use std::io;

use super::Section;
use crate::print::Printer;

/// A full-width rule made of a repeated pattern.
pub struct Separator {
    pattern: String,
}

impl Separator {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }
}

impl Section for Separator {
    fn print(&self, p: &mut dyn Printer) -> io::Result<()> {
        let len = self.pattern.chars().count().max(1);
        p.text(&self.pattern.repeat(p.width() / len))
    }
}
