//! Poll scheduler.
//!
//! One cycle: fetch both feeds concurrently (fork-join), compose, render.
//! Cycles share nothing: a failed fetch falls back to the default snapshot,
//! a failed renderer is logged, and a panicking cycle is caught and skipped.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use khoj_grid::{Compositor, GridFrame, MapState, RobotState};
use tracing::{debug, error, info, warn};

use crate::feed::{MapFeed, RobotFeed, fetch_or_default};
use crate::render::Renderer;

/// Longest single sleep, so Ctrl-C is noticed quickly
const SLEEP_SLICE: Duration = Duration::from_millis(100);

/// Drives the fetch, compose, render loop.
pub struct Poller {
    map_feed: Box<dyn MapFeed>,
    robot_feed: Box<dyn RobotFeed>,
    compositor: Compositor,
    renderers: Vec<Box<dyn Renderer>>,
    interval: Duration,
    max_cycles: Option<u64>,
}

impl Poller {
    pub fn new(
        map_feed: Box<dyn MapFeed>,
        robot_feed: Box<dyn RobotFeed>,
        compositor: Compositor,
        interval: Duration,
    ) -> Self {
        Self {
            map_feed,
            robot_feed,
            compositor,
            renderers: Vec::new(),
            interval,
            max_cycles: None,
        }
    }

    /// Add a renderer
    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderers.push(renderer);
        self
    }

    /// Stop after `max_cycles` cycles
    pub fn with_max_cycles(mut self, max_cycles: Option<u64>) -> Self {
        self.max_cycles = max_cycles;
        self
    }

    /// Fetch both feeds concurrently.
    ///
    /// Each feed has its own fallback: one feed failing (or its fetch
    /// panicking) does not discard the other.
    pub fn fetch(&self) -> (MapState, RobotState) {
        let map_feed = self.map_feed.as_ref();
        let robot_feed = self.robot_feed.as_ref();

        std::thread::scope(|s| {
            let map_handle = s.spawn(|| map_feed.fetch_map());
            let robot_handle = s.spawn(|| robot_feed.fetch_robot());

            let map = match map_handle.join() {
                Ok(result) => fetch_or_default(&map_feed.describe(), result),
                Err(_) => {
                    error!("Map fetch from {} panicked", map_feed.describe());
                    MapState::default()
                }
            };
            let robot = match robot_handle.join() {
                Ok(result) => fetch_or_default(&robot_feed.describe(), result),
                Err(_) => {
                    error!("Robot fetch from {} panicked", robot_feed.describe());
                    RobotState::default()
                }
            };
            (map, robot)
        })
    }

    /// Run one cycle and return the frame handed to the renderers.
    pub fn run_cycle(&mut self) -> GridFrame {
        let (map, robot) = self.fetch();
        let frame = self.compositor.frame(map, robot);

        debug!(
            "Composed {} cells, robot at {}",
            frame.view.cells.len(),
            frame.robot.coordinate
        );

        for renderer in &mut self.renderers {
            if let Err(e) = renderer.render(&frame) {
                warn!("Renderer {} failed: {}", renderer.name(), e);
            }
        }
        frame
    }

    /// Loop until `running` is cleared or `max_cycles` is reached.
    ///
    /// Returns the number of cycles started.
    pub fn run(&mut self, running: &AtomicBool) -> u64 {
        let mut cycles = 0u64;

        while running.load(Ordering::SeqCst) {
            let started = Instant::now();
            cycles += 1;

            if catch_unwind(AssertUnwindSafe(|| self.run_cycle())).is_err() {
                error!("Cycle {} panicked, skipping", cycles);
            }

            if self.max_cycles.is_some_and(|max| cycles >= max) {
                info!("Reached {} cycles", cycles);
                break;
            }

            // Fixed-rate: subtract the time the cycle took
            let deadline = started + self.interval;
            while running.load(Ordering::SeqCst) {
                let now = Instant::now();
                if now >= deadline {
                    break;
                }
                std::thread::sleep((deadline - now).min(SLEEP_SLICE));
            }
        }
        cycles
    }
}
