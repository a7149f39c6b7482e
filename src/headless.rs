use std::time::Duration;

use async_trait::async_trait;
use lifemesh_core::{Frame, FrameSink, TileStatus};
use tokio::time::{Interval, MissedTickBehavior};

/// Draws nothing. Paces to the target frame rate unless built unpaced,
/// in which case it only yields to the runtime between generations.
#[derive(Debug)]
pub struct HeadlessSink {
    pacer: Option<Interval>,
    presented: u64,
}

impl HeadlessSink {
    /// Must be called inside a tokio runtime when `paced`.
    pub fn new(target_fps: u64, paced: bool) -> Self {
        let pacer = paced.then(|| {
            let period = Duration::from_micros(1_000_000 / target_fps.max(1));
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            interval
        });
        Self {
            pacer,
            presented: 0,
        }
    }

    pub fn unpaced() -> Self {
        Self::new(0, false)
    }

    /// Frames handed to [`FrameSink::present`] so far.
    pub fn presented(&self) -> u64 {
        self.presented
    }
}

#[async_trait]
impl FrameSink for HeadlessSink {
    fn present(&mut self, _frame: &Frame, status: &TileStatus) -> anyhow::Result<()> {
        self.presented += 1;
        tracing::trace!(generation = status.generation, live = status.live_cells, "frame");
        Ok(())
    }

    async fn wait_for_frame(&mut self) {
        match self.pacer.as_mut() {
            Some(pacer) => {
                pacer.tick().await;
            }
            None => tokio::task::yield_now().await,
        }
    }
}
