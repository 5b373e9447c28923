//! Cooperative cancellation for the discovery walk.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::warn;

/// Cloneable token observed by the scan loops at directory and file
/// boundaries. Setting it never interrupts a file already being processed.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Spawns the Ctrl-C listener as the producer side of the token. The first
/// interrupt cancels the scan, a second one exits outright.
pub fn install_interrupt_handler(token: CancelToken) {
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if token.is_cancelled() {
                std::process::exit(130);
            }
            warn!("interrupt received, stopping the scan; files already found will be processed");
            token.cancel();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_starts_clear_and_latches() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());

        let observer = token.clone();
        token.cancel();
        assert!(observer.is_cancelled());
        assert!(token.is_cancelled());
    }
}
