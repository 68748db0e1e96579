use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

pub const DEFAULT_WIDTH: usize = 42;

const ESC: u8 = 0x1b;
const GS: u8 = 0x1d;

/// Encode for the printer's default code page (CP437). Characters it lacks
/// print as `?`.
fn encode_cp437(line: &str) -> Vec<u8> {
    line.chars()
        .map(|c| match c {
            c if c.is_ascii() => c as u8,
            '°' => 0xf8,
            'é' => 0x82,
            'è' => 0x8a,
            'ü' => 0x81,
            'ö' => 0x94,
            'ä' => 0x84,
            'ñ' => 0xa4,
            '£' => 0x9c,
            '·' => 0xfa,
            _ => b'?',
        })
        .collect()
}

/// Character formatting for the lines that follow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Style {
    pub bold: bool,
    pub double_width: bool,
    pub double_height: bool,
}

impl Style {
    pub fn bold() -> Self {
        Self {
            bold: true,
            ..Self::default()
        }
    }

    pub fn title() -> Self {
        Self {
            bold: true,
            double_width: true,
            double_height: true,
        }
    }

    fn escpos(&self) -> [u8; 6] {
        let mut size = 0u8;
        if self.double_width {
            size |= 0x10;
        }
        if self.double_height {
            size |= 0x01;
        }
        [ESC, b'E', u8::from(self.bold), GS, b'!', size]
    }
}

/// Anything the dashboard can be printed on.
pub trait Printer {
    fn set(&mut self, style: Style) -> io::Result<()>;

    /// Print one line. Lines wider than the paper are cut off.
    fn text(&mut self, line: &str) -> io::Result<()>;

    fn cut(&mut self) -> io::Result<()>;

    /// Columns available per line.
    fn width(&self) -> usize;
}

/// An ESC/POS receipt printer behind a raw character device.
///
/// Every line is also echoed to stdout. Without a device (dry run) the echo
/// is all that happens.
pub struct ReceiptPrinter<W: Write = File> {
    device: Option<W>,
    width: usize,
}

impl ReceiptPrinter<File> {
    pub fn dry(width: usize) -> Self {
        Self {
            device: None,
            width,
        }
    }

    pub fn open(path: &Path, width: usize) -> io::Result<Self> {
        let file = OpenOptions::new().write(true).open(path)?;
        log::info!("Printing to {}", path.display());
        Self::with_device(file, width)
    }
}

impl<W: Write> ReceiptPrinter<W> {
    pub fn with_device(mut device: W, width: usize) -> io::Result<Self> {
        // ESC @ resets the printer to its power-on state.
        device.write_all(&[ESC, b'@'])?;
        Ok(Self {
            device: Some(device),
            width,
        })
    }

    pub fn into_device(self) -> Option<W> {
        self.device
    }

    fn truncate<'a>(&self, line: &'a str) -> &'a str {
        match line.char_indices().nth(self.width) {
            Some((idx, _)) => &line[..idx],
            None => line,
        }
    }
}

impl<W: Write> Printer for ReceiptPrinter<W> {
    fn set(&mut self, style: Style) -> io::Result<()> {
        if let Some(device) = self.device.as_mut() {
            device.write_all(&style.escpos())?;
        }
        Ok(())
    }

    fn text(&mut self, line: &str) -> io::Result<()> {
        let line = self.truncate(line);
        if let Some(device) = self.device.as_mut() {
            device.write_all(&encode_cp437(line))?;
            device.write_all(b"\n")?;
        }
        println!("{}", line);
        Ok(())
    }

    fn cut(&mut self) -> io::Result<()> {
        if let Some(device) = self.device.as_mut() {
            // Feed past the cutter, then GS V 1 (partial cut).
            device.write_all(b"\n\n\n")?;
            device.write_all(&[GS, b'V', 1])?;
            device.flush()?;
        }
        println!("Cutting...");
        Ok(())
    }

    fn width(&self) -> usize {
        self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_escpos_stream() {
        let mut p = ReceiptPrinter::with_device(Vec::new(), 42).unwrap();
        p.set(Style::title()).unwrap();
        p.text("Hi").unwrap();
        p.set(Style::default()).unwrap();
        p.cut().unwrap();

        let bytes = p.into_device().unwrap();
        let mut expected = vec![ESC, b'@'];
        expected.extend([ESC, b'E', 1, GS, b'!', 0x11]);
        expected.extend(b"Hi\n");
        expected.extend([ESC, b'E', 0, GS, b'!', 0]);
        expected.extend(b"\n\n\n");
        expected.extend([GS, b'V', 1]);
        assert_eq!(bytes, expected);
    }

    #[test]
    fn truncates_to_width_by_chars() {
        let mut p = ReceiptPrinter::with_device(Vec::new(), 5).unwrap();
        p.text("72°F/55°F sunny").unwrap();
        p.text("abc").unwrap();
        let bytes = p.into_device().unwrap();
        assert_eq!(&bytes[2..], b"72\xf8F/\nabc\n");
    }

    #[test]
    fn unknown_characters_become_question_marks() {
        assert_eq!(encode_cp437("Café ☕"), b"Caf\x82 ?");
    }

    #[test]
    fn dry_run_writes_nothing() {
        let mut p = ReceiptPrinter::dry(DEFAULT_WIDTH);
        p.set(Style::bold()).unwrap();
        p.text("Only on stdout").unwrap();
        p.cut().unwrap();
        assert!(p.into_device().is_none());
        assert_eq!(Style::bold().escpos()[2], 1);
    }
}
