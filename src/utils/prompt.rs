//! Interactive console prompts

use std::io::{self, BufRead, Write};

/// Line-oriented interaction with the operator
pub trait Prompter {
    /// Show `label` and read one line of input, without its line terminator
    fn prompt(&mut self, label: &str) -> io::Result<String>;

    /// Report a recoverable problem to the operator
    fn report(&mut self, message: &str) -> io::Result<()>;
}

/// Prompter over arbitrary reader and writers
///
/// Prompts go to `output` and reports to `errors`, mirroring stdout/stderr.
#[derive(Debug)]
pub struct ConsolePrompter<R, W, E> {
    input: R,
    output: W,
    errors: E,
}

impl ConsolePrompter<io::StdinLock<'static>, io::Stdout, io::Stderr> {
    /// Prompter bound to the process's standard streams
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout(), io::stderr())
    }
}

impl<R: BufRead, W: Write, E: Write> ConsolePrompter<R, W, E> {
    pub fn new(input: R, output: W, errors: E) -> Self {
        Self {
            input,
            output,
            errors,
        }
    }

    /// Release the underlying streams
    pub fn into_parts(self) -> (R, W, E) {
        (self.input, self.output, self.errors)
    }
}

impl<R: BufRead, W: Write, E: Write> Prompter for ConsolePrompter<R, W, E> {
    fn prompt(&mut self, label: &str) -> io::Result<String> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "end of input while waiting for an answer",
            ));
        }

        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(line)
    }

    fn report(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.errors, "{message}")?;
        self.errors.flush()
    }
}
