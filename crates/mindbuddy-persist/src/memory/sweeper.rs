use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::store::ThreadMemoryStore;

/// Handle to the background expiry task. Dropping it leaves the task running;
/// call [`SweeperHandle::shutdown`] to stop it.
pub struct SweeperHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Err(e) = (&mut self.task).await {
            tracing::warn!("Memory sweeper task ended abnormally: {}", e);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Sweep expired thread memory every `every`, independently of message handling
pub fn spawn_sweeper(store: Arc<ThreadMemoryStore>, every: Duration) -> SweeperHandle {
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + every, every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = store.sweep_expired();
                    tracing::info!(
                        removed,
                        remaining = store.len(),
                        "Swept expired thread memory"
                    );
                }
                _ = &mut shutdown_rx => {
                    tracing::debug!("Memory sweeper stopping");
                    break;
                }
            }
        }
    });

    SweeperHandle {
        shutdown_tx: Some(shutdown_tx),
        task,
    }
}

/// Drop a thread's memory `grace` after its connection closed, unless it was used again meanwhile
pub fn schedule_idle_removal(
    store: Arc<ThreadMemoryStore>,
    thread_id: String,
    grace: Duration,
) -> JoinHandle<bool> {
    tokio::spawn(async move {
        tokio::time::sleep(grace).await;
        let removed = store.remove_if_idle(&thread_id, grace);
        if removed {
            tracing::debug!(thread_id = %thread_id, "Removed thread memory after disconnect");
        }
        removed
    })
}
