use std::time::{Duration, Instant};

/// Number of steps between two deadline checks.
const POLL_INTERVAL: u32 = 16;

/// A cooperative time limit for one evaluation.
///
/// The evaluator calls [`Budget::tick`] on every recursive step and on
/// every iteration of long loops. Reading the clock is comparatively
/// expensive, so the deadline is only checked every few ticks. Once expired
/// the budget stays expired.
///
/// # Example
/// ```
/// use std::time::Duration;
///
/// use reckon::interpreter::evaluator::budget::Budget;
///
/// let mut unbounded = Budget::start(Duration::ZERO);
/// assert!((0..1000).all(|_| unbounded.tick()));
///
/// let mut exhausted = Budget::exhausted();
/// assert!(!exhausted.tick());
/// assert!(exhausted.is_expired());
/// ```
#[derive(Debug, Clone)]
pub struct Budget {
    deadline: Option<Instant>,
    steps:    u32,
    expired:  bool,
}

impl Budget {
    /// Starts a budget of `timeout` from now. A zero timeout is unbounded.
    #[must_use]
    pub fn start(timeout: Duration) -> Self {
        let deadline = if timeout.is_zero() {
            None
        } else {
            Instant::now().checked_add(timeout)
        };
        Self { deadline,
               steps: 0,
               expired: false }
    }

    #[must_use]
    pub const fn unbounded() -> Self {
        Self { deadline: None,
               steps:    0,
               expired:  false, }
    }

    /// A budget that is already used up; evaluating with it returns the
    /// input unevaluated.
    #[must_use]
    pub const fn exhausted() -> Self {
        Self { deadline: None,
               steps:    0,
               expired:  true, }
    }

    /// Records one step of work.
    ///
    /// # Returns
    /// `true` while time remains, `false` once the deadline has passed.
    pub fn tick(&mut self) -> bool {
        if self.expired {
            return false;
        }
        self.steps = self.steps.wrapping_add(1);
        if self.steps % POLL_INTERVAL == 0
           && let Some(deadline) = self.deadline
           && Instant::now() >= deadline
        {
            log::debug!("evaluation budget expired after {} steps", self.steps);
            self.expired = true;
        }
        !self.expired
    }

    #[must_use]
    pub const fn is_expired(&self) -> bool {
        self.expired
    }
}

impl Default for Budget {
    fn default() -> Self {
        Self::unbounded()
    }
}
