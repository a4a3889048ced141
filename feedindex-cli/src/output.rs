//! Console output abstraction for command handlers.
//!
//! Handlers print through [`Output`] so tests can capture what a command
//! would show the user.

/// Destination for user-facing command output.
pub trait Output {
    /// Print a line.
    fn println(&self, line: &str);

    /// Print a line indented under the previous one.
    fn indented(&self, line: &str) {
        self.println(&format!("  {}", line));
    }
}

/// Writes to stdout.
#[derive(Debug, Default)]
pub struct ConsoleOutput;

impl ConsoleOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Output for ConsoleOutput {
    fn println(&self, line: &str) {
        println!("{}", line);
    }
}

#[cfg(test)]
pub mod testing {
    use std::cell::RefCell;

    use super::Output;

    /// Collects output lines in memory.
    #[derive(Debug, Default)]
    pub struct BufferOutput {
        lines: RefCell<Vec<String>>,
    }

    impl BufferOutput {
        pub fn lines(&self) -> Vec<String> {
            self.lines.borrow().clone()
        }
    }

    impl Output for BufferOutput {
        fn println(&self, line: &str) {
            self.lines.borrow_mut().push(line.to_string());
        }
    }
}
