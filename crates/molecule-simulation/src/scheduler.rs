//! Frame scheduling
//!
//! A frame is one `tick` followed by one `draw`, each run to completion.
//! The scheduler keeps going until its [`StopHandle`] fires; nothing else
//! ends a run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable stop signal shared between a scheduler and whoever owns the host.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    stopped: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// The frame ran; ask the host for another one
    Continue,
    /// The stop handle fired; nothing ran
    Stopped,
}

#[derive(Debug, Default)]
pub struct FrameScheduler {
    stop: StopHandle,
    frames: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Frames completed so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run a single frame. Meant to be called by a host once per presented
    /// frame (e.g. on a redraw request).
    pub fn frame<S, T, D, E>(&mut self, state: &mut S, tick: T, draw: D) -> Result<FrameStatus, E>
    where
        T: FnOnce(&mut S),
        D: FnOnce(&S) -> Result<(), E>,
    {
        self.frame_with_target(state, || Ok(()), tick, |state, ()| draw(state))
    }

    /// Like [`frame`](Self::frame), but first acquires the draw target.
    ///
    /// If `acquire` fails the error is returned and `tick` is not called, so
    /// the state never advances past what was last drawn.
    pub fn frame_with_target<S, G, A, T, D, E>(
        &mut self,
        state: &mut S,
        acquire: A,
        tick: T,
        draw: D,
    ) -> Result<FrameStatus, E>
    where
        A: FnOnce() -> Result<G, E>,
        T: FnOnce(&mut S),
        D: FnOnce(&S, G) -> Result<(), E>,
    {
        if self.stop.is_stopped() {
            return Ok(FrameStatus::Stopped);
        }

        let target = acquire()?;
        tick(state);
        draw(state, target)?;
        self.frames += 1;

        Ok(FrameStatus::Continue)
    }

    /// Run frames back to back until stopped. Returns the number of frames
    /// completed by this call. A draw error ends the run and is returned.
    pub fn run<S, T, D, E>(&mut self, state: &mut S, mut tick: T, mut draw: D) -> Result<u64, E>
    where
        T: FnMut(&mut S),
        D: FnMut(&S) -> Result<(), E>,
    {
        let start = self.frames;
        log::debug!("Scheduler run started");

        while self.frame(state, &mut tick, &mut draw)? == FrameStatus::Continue {}

        let completed = self.frames - start;
        log::info!("Scheduler stopped after {} frames", completed);
        Ok(completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_runs_before_draw() {
        let mut scheduler = FrameScheduler::new();
        let mut events: Vec<&str> = Vec::new();
        let mut seen_by_draw = Vec::new();

        let status = scheduler
            .frame(
                &mut events,
                |events| events.push("tick"),
                |events| {
                    seen_by_draw.push(events.clone());
                    Ok::<(), ()>(())
                },
            )
            .unwrap();

        assert_eq!(status, FrameStatus::Continue);
        assert_eq!(seen_by_draw, vec![vec!["tick"]]);
        assert_eq!(scheduler.frames(), 1);
    }

    #[test]
    fn test_stopped_scheduler_runs_nothing() {
        let mut scheduler = FrameScheduler::new();
        scheduler.stop_handle().stop();

        let mut ticks = 0u32;
        let status = scheduler
            .frame(&mut ticks, |t| *t += 1, |_| Ok::<(), ()>(()))
            .unwrap();

        assert_eq!(status, FrameStatus::Stopped);
        assert_eq!(ticks, 0);
        assert_eq!(scheduler.frames(), 0);
    }

    #[test]
    fn test_run_until_stop_handle_fires() {
        let mut scheduler = FrameScheduler::new();
        let stop = scheduler.stop_handle();

        let mut ticks = 0u32;
        let frames = scheduler
            .run(
                &mut ticks,
                |t| *t += 1,
                |t| {
                    if *t == 25 {
                        stop.stop();
                    }
                    Ok::<(), ()>(())
                },
            )
            .unwrap();

        assert_eq!(frames, 25);
        assert_eq!(ticks, 25);
        assert!(scheduler.stop_handle().is_stopped());
    }

    #[test]
    fn test_draw_error_ends_run() {
        let mut scheduler = FrameScheduler::new();

        let mut ticks = 0u32;
        let result = scheduler.run(
            &mut ticks,
            |t| *t += 1,
            |t| if *t == 3 { Err("surface lost") } else { Ok(()) },
        );

        assert_eq!(result, Err("surface lost"));
        assert_eq!(ticks, 3);
        assert_eq!(scheduler.frames(), 2);
    }

    #[test]
    fn test_failed_acquire_does_not_tick() {
        let mut scheduler = FrameScheduler::new();

        let mut ticks = 0u32;
        let result = scheduler.frame_with_target(
            &mut ticks,
            || Err::<(), _>("surface outdated"),
            |t| *t += 1,
            |_, ()| Ok(()),
        );

        assert_eq!(result, Err("surface outdated"));
        assert_eq!(ticks, 0);
        assert_eq!(scheduler.frames(), 0);
    }

    #[test]
    fn test_target_reaches_draw_after_tick() {
        let mut scheduler = FrameScheduler::new();

        let mut ticks = 0u32;
        let mut drawn = Vec::new();
        for _ in 0..2 {
            let status = scheduler
                .frame_with_target(
                    &mut ticks,
                    || Ok::<_, ()>("texture"),
                    |t| *t += 1,
                    |t, target| {
                        drawn.push((*t, target));
                        Ok(())
                    },
                )
                .unwrap();
            assert_eq!(status, FrameStatus::Continue);
        }

        assert_eq!(drawn, vec![(1, "texture"), (2, "texture")]);
        assert_eq!(u64::from(ticks), scheduler.frames());
    }

    #[test]
    fn test_stopped_scheduler_does_not_acquire() {
        let mut scheduler = FrameScheduler::new();
        scheduler.stop_handle().stop();

        let mut acquired = false;
        let status = scheduler
            .frame_with_target(
                &mut (),
                || {
                    acquired = true;
                    Ok::<_, ()>(())
                },
                |_| {},
                |_, ()| Ok(()),
            )
            .unwrap();

        assert_eq!(status, FrameStatus::Stopped);
        assert!(!acquired);
    }

    #[test]
    fn test_stop_handle_is_shared_across_threads() {
        let handle = StopHandle::default();
        let remote = handle.clone();

        std::thread::spawn(move || remote.stop())
            .join()
            .unwrap();

        assert!(handle.is_stopped());
    }
}
