//! Cash session gate.
//!
//! Tracks whether a register session is open; the single source of truth the
//! rest of the terminal consults before allowing a sale. The gate is derived,
//! never locally authoritative: `refresh` re-queries the backend's current
//! session and treats any failure (including "no open session") as Closed,
//! and every open/close mutation is followed by a mandatory re-derivation.

use tracing::{info, warn};

use crate::backend::Backend;
use crate::error::PosError;
use crate::types::{CashClose, CashOpen, CashSession};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CashState {
    #[default]
    Closed,
    Open,
}

#[derive(Debug, Default)]
pub struct CashGate {
    state: CashState,
    session: Option<CashSession>,
}

impl CashGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.state == CashState::Open
    }

    pub fn state(&self) -> CashState {
        self.state
    }

    /// The last payload fetched for the open session, if any.
    pub fn session(&self) -> Option<&CashSession> {
        self.session.as_ref()
    }

    /// Re-derive the gate from the backend. Success means Open; any failure
    /// means Closed. This is a pure re-derivation, never a toggle. The error
    /// is returned so refresh steps can report it, but the state has already
    /// been settled either way.
    pub async fn refresh<B: Backend>(&mut self, backend: &B) -> Result<(), PosError> {
        match backend.current_cash_session().await {
            Ok(session) => {
                self.state = CashState::Open;
                self.session = Some(session);
                Ok(())
            }
            Err(err) => {
                self.state = CashState::Closed;
                self.session = None;
                Err(err)
            }
        }
    }

    /// Submit an open request. The optimistic transition to Open is
    /// reconciled immediately by a mandatory `refresh`; the mutation's own
    /// outcome is never trusted as final state.
    pub async fn open<B: Backend>(
        &mut self,
        backend: &B,
        req: &CashOpen,
    ) -> Result<CashSession, PosError> {
        let submitted = backend.open_cash(req).await;
        if submitted.is_ok() {
            self.state = CashState::Open;
            info!(opening_amount = req.opening_amount, "cash session opened");
        }
        if let Err(err) = self.refresh(backend).await {
            warn!(error = %err, "cash re-derivation after open reported closed");
        }
        submitted
    }

    /// Submit a close request, then re-derive. Operator confirmation is a
    /// precondition supplied by the caller.
    pub async fn close<B: Backend>(
        &mut self,
        backend: &B,
        req: &CashClose,
    ) -> Result<CashSession, PosError> {
        let submitted = backend.close_cash(req).await;
        if submitted.is_ok() {
            self.state = CashState::Closed;
            info!(closing_amount = req.closing_amount, "cash session closed");
        }
        if let Err(err) = self.refresh(backend).await {
            // Expected after a successful close: the backend no longer has a
            // current session.
            warn!(error = %err, "cash re-derivation after close reported closed");
        }
        submitted
    }
}
