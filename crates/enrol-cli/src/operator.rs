//! Terminal implementation of the console's [`Operator`].

use std::io::{self, BufRead, Write};

use enrol_core::service::{NoticeKind, Operator};

pub struct TerminalOperator {
  /// Answer every confirmation with "yes" (`--yes`).
  assume_yes: bool,
}

impl TerminalOperator {
  pub fn new(assume_yes: bool) -> Self { Self { assume_yes } }
}

impl Operator for TerminalOperator {
  async fn confirm_destructive(&self, prompt: &str) -> bool {
    if self.assume_yes {
      return true;
    }
    // Reading stdin blocks; move off the async worker while waiting.
    tokio::task::block_in_place(|| {
      print!("{prompt} [y/N] ");
      io::stdout().flush().ok();
      let mut line = String::new();
      if io::stdin().lock().read_line(&mut line).is_err() {
        return false;
      }
      is_yes(&line)
    })
  }

  fn notify(&self, kind: NoticeKind, message: &str) {
    match kind {
      NoticeKind::Success => println!("✓ {message}"),
      NoticeKind::Error => eprintln!("✗ {message}"),
    }
  }
}

fn is_yes(answer: &str) -> bool {
  matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
