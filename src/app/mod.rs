//! The per-node run loop: render, wait for the frame slot, then evolve,
//! perturb and export, until shutdown.

pub mod shutdown;

pub use shutdown::ShutdownManager;

use anyhow::{Context, Result};
use lifemesh_core::{FrameSink, Knob, SinkEvent};

use crate::simulation::Simulation;

/// Knobs of the loop itself.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Stop after this many generations.
    pub generations: Option<u64>,
}

/// Drives `sim` until `shutdown` is requested, the sink asks to quit, or
/// the generation limit is reached.
pub async fn run<S>(
    sim: &mut S,
    sink: &mut dyn FrameSink,
    mut knob: Knob,
    options: &RunOptions,
    shutdown: &ShutdownManager,
) -> Result<()>
where
    S: Simulation + ?Sized,
{
    tracing::info!(
        limit = ?options.generations,
        thickness = knob.thickness(),
        "Run loop starting"
    );

    while !shutdown.is_shutdown_requested() {
        if options
            .generations
            .is_some_and(|limit| sim.generation() >= limit)
        {
            break;
        }

        for event in sink.poll_events().context("reading input")? {
            match event {
                SinkEvent::Quit => shutdown.request_shutdown(),
                SinkEvent::TurnKnob(steps) => {
                    knob.turn(steps);
                    tracing::debug!(thickness = knob.thickness(), "knob turned");
                }
            }
        }
        if shutdown.is_shutdown_requested() {
            break;
        }

        let thickness = knob.thickness();
        let status = sim.status(thickness);
        sink.present(sim.frame(), &status)
            .context("presenting frame")?;
        sink.wait_for_frame().await;
        sim.step(thickness);
    }

    sink.finish()?;
    tracing::info!(generation = sim.generation(), "Run loop stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessSink;
    use crate::node::Node;
    use async_trait::async_trait;
    use lifemesh_core::{AppConfig, Frame, TileStatus};

    fn node() -> Node {
        let mut config = AppConfig {
            seed: Some(11),
            ..Default::default()
        };
        config.grid.width = 10;
        config.grid.height = 10;
        config.perturbation.max_thickness = 5;
        Node::new(&config).unwrap()
    }

    /// Scripted input: quits after a fixed number of frames.
    struct Scripted {
        frames: u64,
        quit_after: u64,
        knob_seen: Vec<usize>,
        finished: bool,
    }

    #[async_trait]
    impl FrameSink for Scripted {
        fn present(&mut self, _frame: &Frame, status: &TileStatus) -> Result<()> {
            self.frames += 1;
            self.knob_seen.push(status.thickness);
            Ok(())
        }

        async fn wait_for_frame(&mut self) {}

        fn poll_events(&mut self) -> Result<Vec<SinkEvent>> {
            if self.frames >= self.quit_after {
                Ok(vec![SinkEvent::Quit])
            } else {
                Ok(vec![SinkEvent::TurnKnob(1)])
            }
        }

        fn finish(&mut self) -> Result<()> {
            self.finished = true;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_generation_limit_stops_loop() {
        let mut node = node();
        let mut sink = HeadlessSink::unpaced();
        let options = RunOptions {
            generations: Some(5),
        };
        run(&mut node, &mut sink, Knob::default(), &options, &ShutdownManager::new())
            .await
            .unwrap();
        assert_eq!(node.tile().generation(), 5);
        assert_eq!(sink.presented(), 5);
        assert_eq!(node.metrics().generations(), 5);
    }

    #[tokio::test]
    async fn test_sink_quit_and_knob() {
        let mut node = node();
        let mut sink = Scripted {
            frames: 0,
            quit_after: 3,
            knob_seen: Vec::new(),
            finished: false,
        };
        let shutdown = ShutdownManager::new();
        run(&mut node, &mut sink, Knob::new(50, 5), &RunOptions::default(), &shutdown)
            .await
            .unwrap();
        assert!(shutdown.is_shutdown_requested());
        assert!(sink.finished);
        assert_eq!(node.tile().generation(), 3);
        assert_eq!(sink.knob_seen, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_requested_shutdown_skips_loop() {
        let mut node = node();
        let mut sink = HeadlessSink::unpaced();
        let shutdown = ShutdownManager::new();
        shutdown.request_shutdown();
        run(&mut node, &mut sink, Knob::default(), &RunOptions::default(), &shutdown)
            .await
            .unwrap();
        assert_eq!(node.tile().generation(), 0);
    }
}
