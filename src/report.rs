use std::time::{Duration, Instant};
use colored::Colorize;

/// Prints the four kinds of messages a run produces.
#[derive(Debug, Default, Clone, Copy)]
pub struct Reporter;

impl Reporter {
    pub fn detail(&self, msg: &str) {
        println!("{}", msg);
    }

    /// A run that stops early without failing.
    pub fn notice(&self, msg: &str) {
        println!("{}", msg.yellow());
    }

    pub fn failure(&self, msg: &str) {
        eprintln!("{}", msg.red());
    }

    pub fn success(&self, msg: &str) {
        println!("{}", msg.green());
    }

    pub fn banner(&self, version: &str) {
        println!("{}", format!("Fudge v{version}").cyan());
    }
}

/// Reports the elapsed time of a run when dropped, whichever way the run ends.
pub struct RunTimer {
    started: Instant,
    reporter: Reporter,
}

impl RunTimer {
    pub fn start(reporter: Reporter) -> RunTimer {
        RunTimer {
            started: Instant::now(),
            reporter,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl Drop for RunTimer {
    fn drop(&mut self) {
        self.reporter.detail(&format_duration(self.elapsed()));
    }
}

/// `Duration: 00:00:01.234`
pub fn format_duration(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    format!(
        "Duration: {:02}:{:02}:{:02}.{:03}",
        total / 3600,
        (total / 60) % 60,
        total % 60,
        elapsed.subsec_millis()
    )
}
