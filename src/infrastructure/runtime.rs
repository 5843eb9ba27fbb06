// Tokio driver - One timer task per subsystem feeding the shared engine
use crate::application::dashboard_service::DashboardService;
use crate::application::engine::TelemetryEngine;
use crate::application::sample_source::SampleGenerationError;
use crate::application::scheduler::{Subsystem, TimerState};
use crate::application::view_projector::ViewProjector;
use crate::domain::dashboard::DashboardView;
use crate::domain::telemetry::{ChartKind, TimeRange};
use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

const VIEW_CHANNEL_CAPACITY: usize = 100;

fn lock(engine: &Mutex<TelemetryEngine>) -> MutexGuard<'_, TelemetryEngine> {
    engine.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owns the engine and every timer task.
///
/// Tasks only hold a `Weak` handle, and dropping the runtime aborts them, so
/// no timer outlives the state it writes to.
pub struct EngineRuntime {
    engine: Arc<Mutex<TelemetryEngine>>,
    gate: watch::Sender<u64>,
    shutdown: broadcast::Sender<()>,
    tasks: Vec<JoinHandle<()>>,
}

impl EngineRuntime {
    /// Must be called from inside a tokio runtime.
    pub fn spawn(engine: TelemetryEngine, projector: Arc<dyn ViewProjector>) -> Self {
        let engine = Arc::new(Mutex::new(engine));
        let (gate, _) = watch::channel(0u64);
        let (shutdown, _) = broadcast::channel(1);
        let (views_tx, views_rx) = mpsc::channel(VIEW_CHANNEL_CAPACITY);

        let mut tasks = Vec::with_capacity(Subsystem::ALL.len() + 1);
        tasks.push(tokio::spawn(run_projector(views_rx, projector)));

        for subsystem in Subsystem::ALL {
            tasks.push(tokio::spawn(run_subsystem(
                subsystem,
                Arc::downgrade(&engine),
                gate.subscribe(),
                shutdown.subscribe(),
                views_tx.clone(),
            )));
        }

        tracing::info!("Engine runtime started with {} subsystems", Subsystem::ALL.len());

        Self {
            engine,
            gate,
            shutdown,
            tasks,
        }
    }

    /// Read engine state under the lock.
    pub fn read<R>(&self, f: impl FnOnce(&TelemetryEngine) -> R) -> R {
        f(&lock(&self.engine))
    }

    pub fn set_live(&self, live: bool) {
        let changed = lock(&self.engine).set_live(live);
        if changed {
            self.bump_gate();
        }
    }

    pub fn start_recording(&self) {
        lock(&self.engine).start_recording();
        self.bump_gate();
    }

    pub fn stop_recording(&self) {
        lock(&self.engine).stop_recording();
        self.bump_gate();
    }

    pub fn regenerate_now(&self) -> Result<(), SampleGenerationError> {
        lock(&self.engine).regenerate_now(Utc::now())
    }

    pub fn set_chart_type(&self, kind: ChartKind) {
        lock(&self.engine).set_chart_type(kind);
    }

    pub fn set_time_range(&self, range: TimeRange) {
        lock(&self.engine).set_time_range(range);
    }

    pub fn set_manual_display_range(&self, low: f64, high: f64) {
        lock(&self.engine).set_manual_display_range(low, high);
    }

    pub fn set_auto_display_range(&self, auto: bool) {
        lock(&self.engine).set_auto_display_range(auto);
    }

    pub fn set_mission_success(&self, pct: f64) {
        lock(&self.engine).set_mission_success(pct);
    }

    pub fn view(&self) -> DashboardView {
        DashboardService::new().build_view(&lock(&self.engine))
    }

    fn bump_gate(&self) {
        self.gate.send_modify(|epoch| *epoch = epoch.wrapping_add(1));
    }

    /// Stop every loop and wait for them to finish their current tick.
    pub async fn shutdown(mut self) {
        let _ = self.shutdown.send(());
        for task in std::mem::take(&mut self.tasks) {
            let _ = task.await;
        }
        tracing::info!("Engine runtime stopped");
    }
}

impl Drop for EngineRuntime {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

/// Running flag and start epoch of `subsystem`, or `None` once the engine is gone.
fn timer_status(engine: &Weak<Mutex<TelemetryEngine>>, subsystem: Subsystem) -> Option<(bool, u64)> {
    let engine = engine.upgrade()?;
    let guard = lock(&engine);
    let scheduler = guard.scheduler();
    Some((
        scheduler.state(subsystem) == TimerState::Running,
        scheduler.epoch(subsystem),
    ))
}

async fn run_subsystem(
    subsystem: Subsystem,
    engine: Weak<Mutex<TelemetryEngine>>,
    mut gate: watch::Receiver<u64>,
    mut shutdown: broadcast::Receiver<()>,
    views: mpsc::Sender<DashboardView>,
) {
    let period = match engine.upgrade() {
        Some(engine) => lock(&engine).scheduler().period(subsystem),
        None => return,
    };
    let dashboard = DashboardService::new();

    let mut ticker = interval_at(Instant::now() + period, period);
    // A resumed timer starts a fresh period instead of replaying missed ticks
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let (mut running, mut epoch) = timer_status(&engine, subsystem).unwrap_or((false, 0));

    loop {
        tokio::select! {
            _ = shutdown.recv() => {
                tracing::info!("{} loop shutting down", subsystem);
                break;
            }
            changed = gate.changed() => {
                if changed.is_err() {
                    break;
                }
                let Some((now_running, now_epoch)) = timer_status(&engine, subsystem) else {
                    break;
                };
                // A restart realigns the period even when the stop was never observed
                if now_running && now_epoch != epoch {
                    ticker.reset();
                }
                running = now_running;
                epoch = now_epoch;
            }
            _ = ticker.tick(), if running => {
                let Some(engine) = engine.upgrade() else {
                    tracing::debug!("{} tick after teardown ignored", subsystem);
                    break;
                };
                let view = {
                    let mut guard = lock(&engine);
                    if !guard.tick(subsystem, Utc::now()).is_applied() {
                        continue;
                    }
                    dashboard.build_view(&guard)
                };
                match views.try_send(view) {
                    Ok(()) => {}
                    Err(mpsc::error::TrySendError::Full(_)) => {
                        tracing::debug!("Projector busy, dropping {} view", subsystem);
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => break,
                }
            }
        }
    }
}

async fn run_projector(mut views: mpsc::Receiver<DashboardView>, projector: Arc<dyn ViewProjector>) {
    while let Some(view) = views.recv().await {
        if let Err(e) = projector.project(view).await {
            tracing::warn!("Projector failed: {}", e);
        }
    }
}
