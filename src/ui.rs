// ============================================================================
// src/ui.rs – operator-facing console output
// ============================================================================

use console::Style;
use std::sync::{Arc, Mutex};

pub const BANNER_BODY_WIDTH: usize = 52;

#[derive(Debug, Clone, Default)]
enum Sink {
    #[default]
    Console,
    /// Everything (stdout and stderr lines) appended to a shared buffer.
    Capture(Arc<Mutex<String>>),
}

/// Console printer. `quiet` silences chatter; the file echo, the not-found
/// notice and errors remain.
#[derive(Debug, Clone, Default)]
pub struct UX {
    pub quiet: bool,
    sink: Sink,
}

impl UX {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            sink: Sink::Console,
        }
    }

    /// A printer that records its output instead of writing to the terminal.
    pub fn capture(quiet: bool) -> (Self, Arc<Mutex<String>>) {
        let buf = Arc::new(Mutex::new(String::new()));
        let ui = Self {
            quiet,
            sink: Sink::Capture(Arc::clone(&buf)),
        };
        (ui, buf)
    }

    fn out(&self, text: &str) {
        match &self.sink {
            Sink::Console => print!("{text}"),
            Sink::Capture(buf) => {
                if let Ok(mut buf) = buf.lock() {
                    buf.push_str(text);
                }
            }
        }
    }

    fn err(&self, text: &str) {
        match &self.sink {
            Sink::Console => eprint!("{text}"),
            Sink::Capture(_) => self.out(text),
        }
    }

    fn line(&self, text: String) {
        self.out(&text);
        self.out("\n");
    }

    pub fn banner(&self, title: &str) {
        if self.quiet {
            return;
        }
        let frame = Style::new().color256(202).bold();
        let span = "═".repeat(BANNER_BODY_WIDTH + 2);
        let body = format!("{:^width$}", title, width = BANNER_BODY_WIDTH + 2);
        self.line(frame.apply_to(format!("╔{span}╗")).to_string());
        self.line(frame.apply_to(format!("║{body}║")).to_string());
        self.line(frame.apply_to(format!("╚{span}╝")).to_string());
    }

    pub fn phase(&self, msg: &str) {
        if !self.quiet {
            self.line(Style::new().white().bold().apply_to(format!("▸ {msg}")).to_string());
        }
    }

    pub fn info(&self, msg: &str) {
        if !self.quiet {
            self.line(format!("{} {msg}", Style::new().cyan().apply_to("[INFO]")));
        }
    }

    pub fn success(&self, msg: &str) {
        if !self.quiet {
            self.line(format!("{} {msg}", Style::new().green().bold().apply_to("[ OK ]")));
        }
    }

    pub fn security(&self, msg: &str) {
        if !self.quiet {
            self.line(format!("{} {msg}", Style::new().color256(214).bold().apply_to("[SIGNET]")));
        }
    }

    pub fn warn(&self, msg: &str) {
        if !self.quiet {
            self.line(format!("{} {msg}", Style::new().yellow().bold().apply_to("[WARN]")));
        }
    }

    /// Printed even when quiet.
    pub fn notice(&self, msg: &str) {
        self.line(format!("{} {msg}", Style::new().yellow().bold().apply_to("[MISS]")));
    }

    pub fn error(&self, msg: &str) {
        self.err(&format!("{} {msg}\n", Style::new().red().bold().apply_to("[FAIL]")));
    }

    /// Print the rewritten file verbatim for operator confirmation.
    pub fn echo_file(&self, contents: &str) {
        self.out(contents);
        if !contents.is_empty() && !contents.ends_with('\n') {
            self.out("\n");
        }
    }

    pub fn data_panel(&self, title: &str, rows: &[(&str, String)]) {
        if self.quiet {
            return;
        }
        let head = Style::new().color256(208).bold();
        let label = Style::new().color256(221);
        self.line(head.apply_to(format!("── {title} ──")).to_string());
        let width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        for (k, v) in rows {
            self.line(format!("  {}  {v}", label.apply_to(format!("{k:<width$}"))));
        }
    }
}
