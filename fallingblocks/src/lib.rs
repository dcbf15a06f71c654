//! # Fallingblocks
//!
//! A standalone server that runs the falling blocks timer against a generated
//! world and a handful of simulated players.

use std::{sync::Arc, time::Duration};

use parking_lot::Mutex;
use tokio::{
    select, spawn,
    task::{self, JoinHandle},
    time::{self, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::sim::SimHost;

/// Logging setup.
pub mod logger;
/// The simulated world and players.
pub mod sim;

/// The main server struct.
pub struct FallingBlocksServer {
    /// The cancellation token for graceful shutdown.
    pub cancel_token: CancellationToken,
    /// The simulated host, locked once per tick.
    pub host: Arc<Mutex<SimHost>>,
    /// Wall time per tick. `None` runs ticks back to back.
    tick_period: Option<Duration>,
    /// Stop on our own after this many ticks.
    max_ticks: Option<u64>,
}

impl FallingBlocksServer {
    /// Creates a new server around `host`.
    #[must_use]
    pub fn new(host: SimHost, tick_period: Option<Duration>, max_ticks: Option<u64>) -> Self {
        log::info!("Starting falling blocks server");

        Self {
            cancel_token: CancellationToken::new(),
            host: Arc::new(Mutex::new(host)),
            tick_period,
            max_ticks,
        }
    }

    /// Starts the session and spawns the tick loop.
    ///
    /// The returned handle resolves to the number of ticks run once the loop has
    /// stopped and the session has been closed.
    pub fn start(&self) -> JoinHandle<u64> {
        self.host.lock().start_session();
        log::info!("Started falling blocks server");

        let host = self.host.clone();
        let cancel_token = self.cancel_token.clone();
        let max_ticks = self.max_ticks;
        let mut interval = self.tick_period.map(|period| {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });

        spawn(async move {
            let mut ticks = 0;
            loop {
                if let Some(interval) = interval.as_mut() {
                    select! {
                        () = cancel_token.cancelled() => {
                            break;
                        }
                        _ = interval.tick() => {}
                    }
                } else if cancel_token.is_cancelled() {
                    break;
                } else {
                    task::yield_now().await;
                }

                host.lock().tick();
                ticks += 1;

                if max_ticks.is_some_and(|max| ticks >= max) {
                    break;
                }
            }

            host.lock().stop_session();
            ticks
        })
    }

    /// Stops the server.
    pub fn stop(&self) {
        self.cancel_token.cancel();
    }
}
