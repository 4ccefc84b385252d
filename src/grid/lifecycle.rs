//! Mount/resize/unmount bookkeeping
//!
//! Decides *when* the grid must be rebuilt; the engine does the building.
//! All timers are deadlines polled from the frame loop, so tearing down is a
//! matter of clearing them.

use crate::consts::{RESIZE_DEBOUNCE_MS, ZERO_SIZE_RETRY_MS};
use crate::timing::Debounce;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    /// Not yet mounted
    Unmounted,
    /// Mounted, waiting for the container to get a usable size
    Mounting,
    /// A grid has been built at least once
    Live,
    /// Unmounted; everything is ignored from here on
    TornDown,
}

/// Why a build is due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildTrigger {
    Mount,
    Resize,
    Config,
    Retry,
}

/// What happened when a due build met the container's actual size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildDecision {
    /// Lay out the grid for the measured size (possibly empty)
    Build,
    /// Zero size during mount: try once more shortly
    RetryLater,
    /// Zero size on the retry: keep whatever grid exists
    KeepPrevious,
}

#[derive(Debug, Clone)]
pub struct Lifecycle {
    phase: LifecyclePhase,
    immediate: Option<BuildTrigger>,
    resize: Debounce,
    retry: Debounce,
    retried: bool,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            phase: LifecyclePhase::Unmounted,
            immediate: None,
            resize: Debounce::new(RESIZE_DEBOUNCE_MS),
            retry: Debounce::new(ZERO_SIZE_RETRY_MS),
            retried: false,
        }
    }

    pub fn phase(&self) -> LifecyclePhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, LifecyclePhase::Mounting | LifecyclePhase::Live)
    }

    /// Start observing; the first build happens on the next poll
    pub fn mount(&mut self) {
        if self.phase != LifecyclePhase::Unmounted {
            log::warn!("mount ignored in phase {:?}", self.phase);
            return;
        }
        self.phase = LifecyclePhase::Mounting;
        self.immediate = Some(BuildTrigger::Mount);
    }

    /// Container size changed (debounced)
    pub fn notify_resize(&mut self, now: f64) {
        if self.is_active() {
            self.resize.trigger(now);
        }
    }

    /// Dot size or gap changed (immediate)
    pub fn notify_layout_change(&mut self) {
        if self.is_active() {
            self.immediate = Some(BuildTrigger::Config);
        }
    }

    /// Next due build, if any
    pub fn poll(&mut self, now: f64) -> Option<BuildTrigger> {
        if !self.is_active() {
            return None;
        }
        if let Some(trigger) = self.immediate.take() {
            return Some(trigger);
        }
        if self.resize.fire(now) {
            return Some(BuildTrigger::Resize);
        }
        if self.retry.fire(now) {
            return Some(BuildTrigger::Retry);
        }
        None
    }

    /// Resolve a due build against the measured container.
    ///
    /// While mounting, a zero-size container is retried once after a short
    /// delay; if the retry also sees zero the previous grid stays and the
    /// next resize notification gets another chance. Once live, zero size
    /// simply builds an empty grid.
    pub fn decide(&mut self, trigger: BuildTrigger, container_empty: bool, now: f64) -> BuildDecision {
        if !container_empty {
            self.phase = LifecyclePhase::Live;
            self.retry.cancel();
            return BuildDecision::Build;
        }
        match self.phase {
            LifecyclePhase::Mounting if trigger == BuildTrigger::Retry => BuildDecision::KeepPrevious,
            LifecyclePhase::Mounting if !self.retried => {
                self.retried = true;
                self.retry.trigger(now);
                BuildDecision::RetryLater
            }
            LifecyclePhase::Mounting => BuildDecision::KeepPrevious,
            _ => BuildDecision::Build,
        }
    }

    pub fn has_pending_timers(&self) -> bool {
        self.immediate.is_some() || self.resize.is_pending() || self.retry.is_pending()
    }

    /// Cancel every pending deadline and stop accepting work
    pub fn unmount(&mut self) {
        self.immediate = None;
        self.resize.cancel();
        self.retry.cancel();
        self.phase = LifecyclePhase::TornDown;
    }
}
