use crate::domain::{Error, Notifier};

/// Snackbar for a terminal: one line per message on stderr.
#[derive(Default, Debug)]
pub struct StdErrNotifier {}

impl Notifier for StdErrNotifier {
    fn error(&self, error: &Error) {
        eprintln!("error: {}", error);
    }

    fn success(&self, message: &str) {
        eprintln!("ok: {}", message);
    }
}
