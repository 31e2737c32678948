//! Background eviction of idle resources
//!
//! Every `idle_timeout` the reaper looks for resources that have sat idle for
//! at least that long and destroys them, never letting idle + active drop
//! below `initial_size`. Inside a tokio runtime it runs as a task; otherwise
//! it gets a dedicated thread.

use crate::lifecycle::LifecycleHooks;
use crate::metrics::MetricsTracker;
use crate::pool::Shared;

use crossbeam::channel::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Weak};
use std::thread;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

impl<T: LifecycleHooks + Send + 'static> Shared<T> {
    /// One eviction pass. `cancelled` is polled before each candidate.
    pub(crate) fn sweep_idle<C>(&self, cancelled: C) -> usize
    where
        C: Fn() -> bool,
    {
        let floor = self.config.initial_size;
        let candidates = self.state.lock().stale_idle(self.config.idle_timeout);
        let mut evicted = 0;

        for (id, since) in candidates {
            if cancelled() {
                break;
            }

            let mut state = self.state.lock();
            if state.in_service() <= floor {
                break;
            }
            // Skip anything acquired since the snapshot
            let Some(resource) = state.take_idle(id, since) else {
                continue;
            };
            self.destroy_locked(&mut state, id, resource);
            MetricsTracker::bump(&self.metrics.evictions);
            evicted += 1;
        }

        if evicted > 0 && self.verbose() {
            debug!(pool = self.label, evicted, "evicted idle resources");
        }
        evicted
    }
}

/// Handle to a running reaper
pub(crate) enum Reaper {
    Task {
        cancel: CancellationToken,
    },
    Thread {
        stop: Sender<()>,
        handle: thread::JoinHandle<()>,
    },
    Disabled,
}

impl Reaper {
    /// Start reaping for `shared`, holding only a weak reference to it
    pub fn start<T>(shared: &Arc<Shared<T>>) -> Self
    where
        T: LifecycleHooks + Send + 'static,
    {
        let interval = shared.config.idle_timeout;
        let weak = Arc::downgrade(shared);

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let cancel = CancellationToken::new();
                runtime.spawn(run_task(weak, interval, cancel.clone()));
                Reaper::Task { cancel }
            }
            Err(_) => {
                let (stop, signal) = channel::bounded::<()>(1);
                let spawned = thread::Builder::new()
                    .name("pool-reaper".to_string())
                    .spawn(move || {
                        loop {
                            match signal.recv_timeout(interval) {
                                Err(RecvTimeoutError::Timeout) => {}
                                _ => break,
                            }
                            let Some(shared) = weak.upgrade() else { break };
                            shared.sweep_idle(|| !signal.is_empty());
                        }
                    });

                match spawned {
                    Ok(handle) => Reaper::Thread { stop, handle },
                    Err(e) => {
                        warn!(error = %e, "could not start reaper thread, idle eviction disabled");
                        Reaper::Disabled
                    }
                }
            }
        }
    }

    /// Signal the reaper to stop; a sweep in progress finishes its current
    /// resource first
    pub fn stop(self) {
        match self {
            Reaper::Task { cancel } => cancel.cancel(),
            Reaper::Disabled => {}
            Reaper::Thread { stop, handle } => {
                let _ = stop.try_send(());
                drop(stop);
                let _ = handle.join();
            }
        }
    }
}

async fn run_task<T>(weak: Weak<Shared<T>>, interval: Duration, cancel: CancellationToken)
where
    T: LifecycleHooks + Send + 'static,
{
    loop {
        tokio::select! {
            () = tokio::time::sleep(interval) => {}
            () = cancel.cancelled() => break,
        }
        let Some(shared) = weak.upgrade() else { break };
        shared.sweep_idle(|| cancel.is_cancelled());
    }
}
