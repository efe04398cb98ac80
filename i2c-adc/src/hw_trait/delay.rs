//! Blocking delay abstraction.

use std::time::Duration;

/// Blocks the calling thread for a fixed time.
pub trait Delay {
    fn delay(&mut self, duration: Duration);
}

/// Delay backed by [`std::thread::sleep`].
///
/// Not cancellable. Signal interruptions are absorbed by the standard
/// library, which resumes sleeping for the remaining time.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdDelay;

impl Delay for StdDelay {
    fn delay(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

impl<T: Delay + ?Sized> Delay for &mut T {
    fn delay(&mut self, duration: Duration) {
        (**self).delay(duration)
    }
}
