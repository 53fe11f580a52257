use std::io::{self, BufRead, Write};

/// Line-oriented terminal the session talks through.
pub trait Console {
    /// Next input line without its terminator, or `None` once input is closed.
    fn read_line(&mut self) -> io::Result<Option<String>>;

    fn print_line(&mut self, line: &str) -> io::Result<()>;
}

/// Standard input and output.
#[derive(Debug, Default)]
pub struct StdConsole;

impl Console for StdConsole {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = String::new();
        if io::stdin().lock().read_line(&mut buf)? == 0 {
            return Ok(None);
        }

        let trimmed = buf.trim_end_matches(['\n', '\r']).len();
        buf.truncate(trimmed);
        Ok(Some(buf))
    }

    fn print_line(&mut self, line: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{line}")?;
        out.flush()
    }
}
