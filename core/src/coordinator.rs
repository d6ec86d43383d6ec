//! Status-driven UI side effects.
//!
//! The session reports what changed as effects; a coordinator turns the
//! presentational ones into scroll and focus actions on the real UI.

use crate::effect::Effect;

pub trait UiCoordinator {
    /// The message list changed: bring the newest content into view
    fn scroll_to_latest(&mut self);

    /// The session became ready: put the cursor back in the input
    fn focus_input(&mut self);

    /// Route presentational effects; everything else is ignored here
    fn apply_effects(&mut self, effects: &[Effect]) {
        for effect in effects {
            match effect {
                Effect::ScrollToLatest => self.scroll_to_latest(),
                Effect::FocusInput => self.focus_input(),
                Effect::StartExchange(_) | Effect::ResolveToolCall { .. } => {}
            }
        }
    }
}

/// Coordinator that only counts what it was asked to do
#[cfg(test)]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordingCoordinator {
    pub scrolls: usize,
    pub focuses: usize,
}

#[cfg(test)]
impl UiCoordinator for RecordingCoordinator {
    fn scroll_to_latest(&mut self) {
        self.scrolls += 1;
    }

    fn focus_input(&mut self) {
        self.focuses += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes_presentational_effects() {
        let mut coordinator = RecordingCoordinator::default();
        coordinator.apply_effects(&[Effect::ScrollToLatest, Effect::FocusInput, Effect::ScrollToLatest]);
        assert_eq!(coordinator.scrolls, 2);
        assert_eq!(coordinator.focuses, 1);
    }
}
