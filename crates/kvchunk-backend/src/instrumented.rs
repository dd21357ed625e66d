//! A wrapping backend that records calls and injects faults.
//!
//! [`InstrumentedBackend`] forwards to an inner backend, appending every
//! call to an ordered log. Fault rules make selected calls fail with
//! [`BackendError::Injected`] without reaching the inner backend, which lets
//! callers exercise partial-failure paths deterministically.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::{BackendError, BackendOp, BackendResult};
use crate::traits::KeyValueBackend;

/// One recorded backend call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendCall {
    pub op: BackendOp,
    /// The key the call addressed; empty for `clear`.
    pub key: String,
}

impl BackendCall {
    pub fn new(op: BackendOp, key: impl Into<String>) -> Self {
        Self {
            op,
            key: key.into(),
        }
    }
}

#[derive(Clone, Debug)]
enum FaultRule {
    /// Fail every `op` call addressing `key`.
    Key { op: BackendOp, key: String },
    /// Fail the n-th (0-based) call of `op`.
    Nth { op: BackendOp, n: usize },
}

#[derive(Debug, Default)]
struct State {
    calls: Vec<BackendCall>,
    rules: Vec<FaultRule>,
}

/// Records calls to an inner backend and fails the ones matching a rule.
#[derive(Debug)]
pub struct InstrumentedBackend<B> {
    inner: B,
    state: Mutex<State>,
}

impl<B: KeyValueBackend> InstrumentedBackend<B> {
    pub fn new(inner: B) -> Self {
        Self {
            inner,
            state: Mutex::new(State::default()),
        }
    }

    /// Fail every `op` call on `key`.
    pub fn fail_on(&self, op: BackendOp, key: impl Into<String>) {
        self.lock().rules.push(FaultRule::Key {
            op,
            key: key.into(),
        });
    }

    /// Fail the n-th (0-based) call of `op`, counted over the whole log.
    pub fn fail_nth(&self, op: BackendOp, n: usize) {
        self.lock().rules.push(FaultRule::Nth { op, n });
    }

    /// Drop every fault rule.
    pub fn clear_faults(&self) {
        self.lock().rules.clear();
    }

    /// All calls so far, in order.
    pub fn calls(&self) -> Vec<BackendCall> {
        self.lock().calls.clone()
    }

    /// Keys addressed by calls of `op`, in order.
    pub fn calls_for(&self, op: BackendOp) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.op == op)
            .map(|c| c.key.clone())
            .collect()
    }

    /// Forget recorded calls. Fault rules stay in place.
    pub fn reset_calls(&self) {
        self.lock().calls.clear();
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }

    /// Record the call and decide whether it should fail.
    fn intercept(&self, op: BackendOp, key: &str) -> BackendResult<()> {
        let mut state = self.lock();
        let seen = state.calls.iter().filter(|c| c.op == op).count();
        state.calls.push(BackendCall::new(op, key));
        let hit = state.rules.iter().any(|rule| match rule {
            FaultRule::Key { op: rop, key: rkey } => *rop == op && rkey == key,
            FaultRule::Nth { op: rop, n } => *rop == op && *n == seen,
        });
        if hit {
            tracing::debug!(%op, key, "injecting backend fault");
            return Err(BackendError::Injected {
                op,
                key: key.to_string(),
            });
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // The call log stays readable after a panicking holder.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl<B: KeyValueBackend> KeyValueBackend for InstrumentedBackend<B> {
    async fn get(&self, key: &str) -> BackendResult<Option<String>> {
        self.intercept(BackendOp::Get, key)?;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> BackendResult<()> {
        self.intercept(BackendOp::Set, key)?;
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> BackendResult<()> {
        self.intercept(BackendOp::Remove, key)?;
        self.inner.remove(key).await
    }

    async fn clear(&self) -> BackendResult<()> {
        self.intercept(BackendOp::Clear, "")?;
        self.inner.clear().await
    }
}
