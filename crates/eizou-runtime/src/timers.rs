//! Hero auto-advance and download countdown timers.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use eizou_core::views::download::{Countdown, Tick};

/// One auto-advance step for the hero carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeroTick;

/// Auto-advance timer for the hero carousel.
///
/// Manual navigation calls [`HeroTicker::restart`], which clears the running
/// timer and starts a fresh full period.
pub struct HeroTicker {
    period: Duration,
    tx: mpsc::Sender<HeroTick>,
    handle: Option<JoinHandle<()>>,
}

/// Start the hero timer. Ticks arrive on the returned receiver.
pub fn spawn_hero_ticker(period: Duration) -> (HeroTicker, mpsc::Receiver<HeroTick>) {
    let (tx, rx) = mpsc::channel(1);
    let mut ticker = HeroTicker {
        period,
        tx,
        handle: None,
    };
    ticker.restart();
    (ticker, rx)
}

impl HeroTicker {
    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn restart(&mut self) {
        self.stop();
        let tx = self.tx.clone();
        let period = self.period;
        self.handle = Some(tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(HeroTick).await.is_err() {
                    break;
                }
            }
        }));
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for HeroTicker {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Drive `countdown` once per `period` until the links are revealed.
///
/// `on_tick` sees every tick, including the single [`Tick::Revealed`]. The
/// timer clears itself afterwards.
pub async fn run_countdown(
    countdown: &mut Countdown,
    period: Duration,
    mut on_tick: impl FnMut(Tick, &Countdown),
) {
    if countdown.revealed() {
        return;
    }
    let mut interval = interval_at(Instant::now() + period, period);
    while !countdown.revealed() {
        interval.tick().await;
        let tick = countdown.tick();
        on_tick(tick, countdown);
    }
    tracing::debug!("download countdown finished");
}
