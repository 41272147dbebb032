//! # Backend Selector
//!
//! The single decision point between ledger and tabular backends.
//!
//! Selection happens once per logical session, not per field: the first
//! `select` probes (if the mode asks for the ledger) and every later call
//! returns the memoized decision without re-probing. A session therefore
//! never mixes sources mid-interaction, and a dead node costs one probe,
//! not one per call.

use hl_ledger_client::LedgerTransport;
use shared_types::{BackendKind, BackendMode};
use tracing::{info, warn};

/// The memoized outcome of backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// The backend serving this session.
    pub kind: BackendKind,
    /// True when the ledger was preferred but unreachable. The caller uses
    /// this to disclose which write operations are unavailable.
    pub degraded: bool,
}

/// Chooses a backend per the requested mode and ledger reachability.
#[derive(Debug)]
pub struct BackendSelector {
    preferred: BackendMode,
    decided: Option<Selection>,
}

impl BackendSelector {
    pub fn new(preferred: BackendMode) -> Self {
        Self {
            preferred,
            decided: None,
        }
    }

    /// Decide (once) which backend serves this session.
    pub fn select<T: LedgerTransport + ?Sized>(&mut self, transport: &T) -> Selection {
        if let Some(selection) = self.decided {
            return selection;
        }

        let selection = match self.preferred {
            BackendMode::TabularPreferred => Selection {
                kind: BackendKind::Tabular,
                degraded: false,
            },
            BackendMode::LedgerPreferred => {
                if transport.probe_liveness() {
                    info!("ledger reachable, session uses ledger backend");
                    Selection {
                        kind: BackendKind::Ledger,
                        degraded: false,
                    }
                } else {
                    warn!("ledger unreachable, session degraded to tabular backend");
                    Selection {
                        kind: BackendKind::Tabular,
                        degraded: true,
                    }
                }
            }
        };

        self.decided = Some(selection);
        selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hl_ledger_client::{LedgerError, SignedTransaction, TxId};
    use serde_json::Value;
    use shared_types::Address;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts probes so memoization is observable.
    struct ProbeCounter {
        alive: bool,
        probes: AtomicUsize,
    }

    impl ProbeCounter {
        fn new(alive: bool) -> Self {
            Self {
                alive,
                probes: AtomicUsize::new(0),
            }
        }
    }

    impl LedgerTransport for ProbeCounter {
        fn probe_liveness(&self) -> bool {
            self.probes.fetch_add(1, Ordering::SeqCst);
            self.alive
        }

        fn call(&self, _: Address, _: &str, _: &[Value]) -> Result<Value, LedgerError> {
            unreachable!("selector only probes")
        }

        fn sequence_number(&self, _: &Address) -> Result<u64, LedgerError> {
            unreachable!("selector only probes")
        }

        fn submit(&self, _: &SignedTransaction) -> Result<TxId, LedgerError> {
            unreachable!("selector only probes")
        }
    }

    #[test]
    fn ledger_preferred_and_reachable_selects_ledger() {
        let transport = ProbeCounter::new(true);
        let mut selector = BackendSelector::new(BackendMode::LedgerPreferred);
        let selection = selector.select(&transport);
        assert_eq!(selection.kind, BackendKind::Ledger);
        assert!(!selection.degraded);
    }

    #[test]
    fn unreachable_ledger_degrades_without_reprobing() {
        let transport = ProbeCounter::new(false);
        let mut selector = BackendSelector::new(BackendMode::LedgerPreferred);

        let first = selector.select(&transport);
        assert_eq!(first.kind, BackendKind::Tabular);
        assert!(first.degraded);

        for _ in 0..5 {
            assert_eq!(selector.select(&transport), first);
        }
        assert_eq!(transport.probes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn tabular_preferred_never_probes() {
        let transport = ProbeCounter::new(true);
        let mut selector = BackendSelector::new(BackendMode::TabularPreferred);
        let selection = selector.select(&transport);
        assert_eq!(selection.kind, BackendKind::Tabular);
        assert!(!selection.degraded);
        assert_eq!(transport.probes.load(Ordering::SeqCst), 0);
    }
}
