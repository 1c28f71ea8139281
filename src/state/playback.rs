//! Year playback: the year sequence, the stepping state and the single
//! recurring timer that drives it.

use std::collections::BTreeSet;

/// Sorted, deduplicated years from all sources plus the anchor year.
pub fn year_sequence(sources: &[&[i32]], anchor: i32) -> Vec<i32> {
    let mut set: BTreeSet<i32> = sources.iter().flat_map(|s| s.iter().copied()).collect();
    set.insert(anchor);
    set.into_iter().collect()
}

/// Per-step interval so that a full run takes `total_ms`.
pub fn step_interval_ms(total_ms: u32, steps: usize) -> u32 {
    if steps == 0 {
        return total_ms;
    }
    (total_ms / steps as u32).max(1)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Playback {
    years: Vec<i32>,
    index: usize,
    playing: bool,
}

impl Playback {
    /// Starts at `initial` when present in the sequence, otherwise at the last year.
    pub fn new(years: Vec<i32>, initial: i32) -> Self {
        let index = years
            .iter()
            .position(|y| *y == initial)
            .unwrap_or(years.len().saturating_sub(1));
        Self { years, index, playing: false }
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn year(&self) -> Option<i32> {
        self.years.get(self.index).copied()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn at_end(&self) -> bool {
        self.index + 1 >= self.years.len()
    }

    /// Begins playing; from the last year playback wraps to the first.
    /// Returns false when there is nothing to play.
    pub fn play(&mut self) -> bool {
        if self.years.len() < 2 {
            return false;
        }
        if self.at_end() {
            self.index = 0;
        }
        self.playing = true;
        true
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Advances one step while playing; stops on the last year.
    pub fn tick(&mut self) {
        if !self.playing {
            return;
        }
        if !self.at_end() {
            self.index += 1;
        }
        if self.at_end() {
            self.playing = false;
        }
    }

    /// Direct selection from the slider, ignored while playing.
    pub fn select_index(&mut self, index: usize) {
        if !self.playing && index < self.years.len() {
            self.index = index;
        }
    }
}

/// Something that can run a callback repeatedly until cancelled.
pub trait Scheduler {
    type Handle;
    fn schedule(&mut self, interval_ms: u32, tick: Box<dyn FnMut()>) -> Self::Handle;
    fn cancel(&mut self, handle: Self::Handle);
}

/// Owns at most one live timer. Starting replaces (cancels) the previous one
/// and stopping an idle slot is a no-op.
pub struct TimerSlot<S: Scheduler> {
    scheduler: S,
    handle: Option<S::Handle>,
}

impl<S: Scheduler> TimerSlot<S> {
    pub fn new(scheduler: S) -> Self {
        Self { scheduler, handle: None }
    }

    pub fn start(&mut self, interval_ms: u32, tick: Box<dyn FnMut()>) {
        self.stop();
        self.handle = Some(self.scheduler.schedule(interval_ms, tick));
    }

    pub fn stop(&mut self) {
        if let Some(h) = self.handle.take() {
            self.scheduler.cancel(h);
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    #[cfg(test)]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }
}

impl<S: Scheduler> Drop for TimerSlot<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    #[derive(Default)]
    struct FakeScheduler {
        next: u32,
        live: Rc<RefCell<HashMap<u32, Box<dyn FnMut()>>>>,
        intervals: Vec<u32>,
    }

    impl FakeScheduler {
        fn fire_all(&self) {
            for cb in self.live.borrow_mut().values_mut() {
                cb();
            }
        }
    }

    impl Scheduler for FakeScheduler {
        type Handle = u32;
        fn schedule(&mut self, interval_ms: u32, tick: Box<dyn FnMut()>) -> u32 {
            self.next += 1;
            self.intervals.push(interval_ms);
            self.live.borrow_mut().insert(self.next, tick);
            self.next
        }
        fn cancel(&mut self, handle: u32) {
            self.live.borrow_mut().remove(&handle);
        }
    }

    #[test]
    fn sequence_is_sorted_unique_and_anchored() {
        assert_eq!(year_sequence(&[&[2001, 1999, 2001], &[2000]], 2024), vec![1999, 2000, 2001, 2024]);
        assert_eq!(year_sequence(&[&[2010, 2024]], 2024), vec![2010, 2024]);
        assert_eq!(year_sequence(&[], 2024), vec![2024]);
    }

    #[test]
    fn interval_divides_total_duration() {
        assert_eq!(step_interval_ms(15_000, 30), 500);
        assert_eq!(step_interval_ms(15_000, 0), 15_000);
    }

    #[test]
    fn playback_advances_and_stops_at_end() {
        let mut p = Playback::new(vec![2000, 2001, 2002], 2000);
        assert!(p.play());
        p.tick();
        assert_eq!(p.year(), Some(2001));
        assert!(p.is_playing());
        p.tick();
        assert_eq!(p.year(), Some(2002));
        assert!(!p.is_playing());
        p.tick();
        assert_eq!(p.year(), Some(2002));
    }

    #[test]
    fn play_from_last_year_restarts() {
        let mut p = Playback::new(vec![2000, 2001, 2002], 2002);
        assert!(p.play());
        assert_eq!(p.year(), Some(2000));
    }

    #[test]
    fn single_year_cannot_play() {
        let mut p = Playback::new(vec![2024], 2024);
        assert!(!p.play());
        assert!(!p.is_playing());
    }

    #[test]
    fn slider_is_ignored_while_playing() {
        let mut p = Playback::new(vec![2000, 2001, 2002], 2000);
        p.play();
        p.select_index(2);
        assert_eq!(p.year(), Some(2000));
        p.pause();
        p.select_index(2);
        assert_eq!(p.year(), Some(2002));
    }

    #[test]
    fn unknown_initial_year_starts_at_latest() {
        assert_eq!(Playback::new(vec![2000, 2001], 1900).year(), Some(2001));
    }

    #[test]
    fn timer_slot_holds_one_handle() {
        let hits = Rc::new(RefCell::new(0));
        let mut slot = TimerSlot::new(FakeScheduler::default());
        for _ in 0..3 {
            let h = hits.clone();
            slot.start(100, Box::new(move || *h.borrow_mut() += 1));
        }
        assert_eq!(slot.scheduler().live.borrow().len(), 1);
        slot.scheduler().fire_all();
        assert_eq!(*hits.borrow(), 1);

        slot.stop();
        slot.stop();
        assert!(!slot.is_running());
        assert!(slot.scheduler().live.borrow().is_empty());
    }

    #[test]
    fn dropping_the_slot_cancels() {
        let live;
        {
            let mut slot = TimerSlot::new(FakeScheduler::default());
            live = slot.scheduler().live.clone();
            slot.start(10, Box::new(|| {}));
            assert_eq!(live.borrow().len(), 1);
        }
        assert!(live.borrow().is_empty());
    }
}
