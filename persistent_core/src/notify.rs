use crate::error::DriverError;
use nix::sys::signal::{Signal, raise};

/// Wakes a parent that is waiting on this process after each completed input.
pub trait Notifier {
    fn notify(&mut self) -> Result<(), DriverError>;
}

/// Raises a continue-type signal at the current process. A parent sleeping in
/// `waitpid(.., WCONTINUED)` returns as soon as it is delivered.
#[derive(Debug, Clone, Copy)]
pub struct SelfSignal {
    signal: Signal,
}

impl SelfSignal {
    pub fn new(signal: Signal) -> Self {
        Self { signal }
    }

    pub fn signal(&self) -> Signal {
        self.signal
    }
}

impl Default for SelfSignal {
    fn default() -> Self {
        Self::new(Signal::SIGCONT)
    }
}

impl Notifier for SelfSignal {
    fn notify(&mut self) -> Result<(), DriverError> {
        raise(self.signal).map_err(|source| DriverError::Notify {
            signal: self.signal,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_signal_is_sigcont() {
        assert_eq!(SelfSignal::default().signal(), Signal::SIGCONT);
    }

    #[test]
    fn raising_sigcont_at_self_is_harmless() {
        // SIGCONT's default disposition continues a running process.
        let mut notifier = SelfSignal::default();
        notifier.notify().unwrap();
        notifier.notify().unwrap();
    }
}
