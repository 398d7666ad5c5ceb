use futures::future::{BoxFuture, FutureExt, Shared};
use lexis_client::{classify, BackendGateway};
use lexis_types::{ConnectivityState, ModelStatus};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::options::DEFAULT_POLL_INTERVAL;

type CheckFuture = Shared<BoxFuture<'static, ConnectivityState>>;

/// Polls backend health and publishes the resulting [`ConnectivityState`]
///
/// At most one health request is outstanding at any time. Timer ticks that
/// fire while a check is running are skipped, and `check_now()` calls made
/// during a check share its result instead of issuing a second request.
///
/// Health failures never surface as errors: they flip the state to
/// disconnected with every model flag cleared, and are logged.
pub struct HealthMonitor {
    inner: Arc<MonitorInner>,
}

struct MonitorInner {
    gateway: Arc<dyn BackendGateway>,
    state: watch::Sender<ConnectivityState>,
    /// Check currently in flight, tagged with the epoch it was launched in
    in_flight: Mutex<Option<(u64, CheckFuture)>>,
    ticker: Mutex<Option<JoinHandle<()>>>,
    /// Bumped by `stop()`; checks launched under an older epoch are discarded
    epoch: AtomicU64,
}

impl HealthMonitor {
    pub fn new(gateway: Arc<dyn BackendGateway>) -> Self {
        let (state, _) = watch::channel(ConnectivityState::unknown());

        Self {
            inner: Arc::new(MonitorInner {
                gateway,
                state,
                in_flight: Mutex::new(None),
                ticker: Mutex::new(None),
                epoch: AtomicU64::new(0),
            }),
        }
    }

    /// Start polling: one check right away, then one per `interval`
    ///
    /// Restarting replaces the previous timer. Must be called within a Tokio
    /// runtime.
    pub fn start(&self, interval: Duration) {
        let interval = if interval.is_zero() {
            tracing::warn!(
                "Zero poll interval requested, using {:?}",
                DEFAULT_POLL_INTERVAL
            );
            DEFAULT_POLL_INTERVAL
        } else {
            interval
        };

        let mut ticker = lock(&self.inner.ticker);
        if let Some(previous) = ticker.take() {
            previous.abort();
        }

        let inner = Arc::clone(&self.inner);
        *ticker = Some(tokio::spawn(async move {
            let mut tick = tokio::time::interval(interval);
            tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tick.tick().await;
                if inner.is_checking() {
                    tracing::debug!("Health check still in flight, skipping tick");
                    continue;
                }
                // The check runs on its own task; the ticker does not wait for it
                drop(MonitorInner::join_or_launch(&inner));
            }
        }));

        tracing::info!("Health monitor started (interval {:?})", interval);
    }

    /// Cancel the timer
    ///
    /// A check already in flight runs to completion, but its result is not
    /// published, and later checks do not join it.
    pub fn stop(&self) {
        self.inner.epoch.fetch_add(1, Ordering::SeqCst);
        lock(&self.inner.in_flight).take();
        if let Some(ticker) = lock(&self.inner.ticker).take() {
            ticker.abort();
            tracing::info!("Health monitor stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        lock(&self.inner.ticker)
            .as_ref()
            .is_some_and(|ticker| !ticker.is_finished())
    }

    /// Force an out-of-band check, or join the one already running
    ///
    /// The check is launched immediately; the returned future resolves to the
    /// state after it completes. Dropping the future does not cancel the
    /// check. Must be called within a Tokio runtime.
    pub fn check_now(&self) -> impl Future<Output = ConnectivityState> + Send + 'static {
        MonitorInner::join_or_launch(&self.inner)
    }

    pub fn is_checking(&self) -> bool {
        self.inner.is_checking()
    }

    /// Latest published state
    pub fn snapshot(&self) -> ConnectivityState {
        *self.inner.state.borrow()
    }

    pub fn is_connected(&self) -> bool {
        self.inner.state.borrow().connected
    }

    /// Receiver notified after every published update
    pub fn subscribe(&self) -> watch::Receiver<ConnectivityState> {
        self.inner.state.subscribe()
    }
}

impl Drop for HealthMonitor {
    fn drop(&mut self) {
        if let Some(ticker) = lock(&self.inner.ticker).take() {
            ticker.abort();
        }
    }
}

impl MonitorInner {
    fn is_checking(&self) -> bool {
        lock(&self.in_flight).is_some()
    }

    /// Empty the slot if it still holds the check launched in `epoch`
    fn release(&self, epoch: u64) {
        let mut slot = lock(&self.in_flight);
        if slot.as_ref().is_some_and(|(owner, _)| *owner == epoch) {
            slot.take();
        }
    }

    fn join_or_launch(this: &Arc<Self>) -> CheckFuture {
        let mut slot = lock(&this.in_flight);
        let epoch = this.epoch.load(Ordering::SeqCst);
        if let Some((owner, check)) = slot.as_ref() {
            if *owner == epoch {
                tracing::debug!("Joining health check already in flight");
                return check.clone();
            }
        }

        let inner = Arc::clone(this);
        let fallback = Arc::clone(this);
        // The slot stays locked until the shared future is stored, so the task
        // cannot clear it before it is set
        let task = tokio::spawn(async move { inner.run_check(epoch).await });

        let check = async move {
            match task.await {
                Ok(state) => state,
                Err(e) => {
                    tracing::error!("Health check task failed: {}", e);
                    fallback.release(epoch);
                    *fallback.state.borrow()
                }
            }
        }
        .boxed()
        .shared();

        *slot = Some((epoch, check.clone()));
        check
    }

    async fn run_check(&self, epoch: u64) -> ConnectivityState {
        let next = self.probe().await;
        self.release(epoch);

        if self.epoch.load(Ordering::SeqCst) != epoch {
            tracing::debug!("Monitor stopped during health check, discarding result");
            return *self.state.borrow();
        }

        self.state.send_replace(next);
        next
    }

    async fn probe(&self) -> ConnectivityState {
        let health = match self.gateway.get_health().await {
            Ok(health) => health,
            Err(e) => {
                tracing::warn!(category = %classify(&e), "Backend health check failed: {}", e);
                return ConnectivityState::unreachable();
            }
        };

        let models = match health.models_loaded {
            Some(models) => models,
            None => match self.gateway.get_model_status().await {
                Ok(models) => models,
                Err(e) => {
                    tracing::warn!("Model status check failed: {}", e);
                    ModelStatus::none()
                }
            },
        };

        tracing::debug!(
            status = %health.status,
            models_ready = models.ready_count(),
            "Backend reachable"
        );
        ConnectivityState::reachable(models)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
