//! Yes/no confirmation capability used before staging a drive deletion.

use std::io::{self, BufRead, StdinLock, Stdout, Write};

/// Asks the operator to approve a destructive step.
pub trait Confirm {
    /// Presents `prompt` and returns `true` when the operator approves.
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<C: Confirm + ?Sized> Confirm for &mut C {
    fn confirm(&mut self, prompt: &str) -> bool {
        (**self).confirm(prompt)
    }
}

/// Approves every prompt; used for `--force`.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&mut self, _prompt: &str) -> bool {
        true
    }
}

/// Prompts on a line-oriented reader and writer.
///
/// Answers are case-insensitive `y` or `n`; anything else repeats the
/// prompt. End of input or a read failure counts as a refusal.
#[derive(Debug)]
pub struct ConsoleConfirm<R, W> {
    input: R,
    output: W,
}

impl ConsoleConfirm<StdinLock<'static>, Stdout> {
    /// Prompts on the process's standard streams.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsoleConfirm<R, W> {
    /// Creates a prompt over the given streams.
    #[must_use]
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Confirm for ConsoleConfirm<R, W> {
    fn confirm(&mut self, prompt: &str) -> bool {
        loop {
            write!(self.output, "{prompt} ").ok();
            self.output.flush().ok();

            let mut answer = String::new();
            match self.input.read_line(&mut answer) {
                Ok(0) | Err(_) => return false,
                Ok(_) => {}
            }
            match answer.trim().to_lowercase().as_str() {
                "y" => return true,
                "n" => return false,
                _ => {}
            }
        }
    }
}
