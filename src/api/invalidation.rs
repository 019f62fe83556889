use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::render::Renderer;

use super::PlotEngine;

/// Ordered repaint levels.
///
/// `Light` covers color, opacity and paint order; `Full` also covers point
/// positions and axis decorations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum InvalidationLevel {
    #[default]
    None,
    Light,
    Full,
}

impl InvalidationLevel {
    #[must_use]
    pub const fn max(self, other: Self) -> Self {
        if self as u8 >= other as u8 {
            self
        } else {
            other
        }
    }
}

impl<R: Renderer> PlotEngine<R> {
    #[must_use]
    pub fn pending_invalidation(&self) -> InvalidationLevel {
        self.core.invalidation
    }

    #[must_use]
    pub fn needs_render(&self) -> bool {
        self.core.invalidation != InvalidationLevel::None
    }

    pub(super) fn invalidate(&mut self, level: InvalidationLevel) {
        let merged = self.core.invalidation.max(level);
        if merged != self.core.invalidation {
            trace!(from = ?self.core.invalidation, to = ?merged, "invalidation raised");
        }
        self.core.invalidation = merged;
    }

    pub(super) fn invalidate_light(&mut self) {
        self.invalidate(InvalidationLevel::Light);
    }

    pub(super) fn invalidate_full(&mut self) {
        self.invalidate(InvalidationLevel::Full);
    }

    pub(super) fn clear_invalidation(&mut self) {
        self.core.invalidation = InvalidationLevel::None;
    }
}

#[cfg(test)]
mod tests {
    use super::InvalidationLevel;

    #[test]
    fn levels_merge_to_the_stronger_one() {
        assert_eq!(
            InvalidationLevel::Light.max(InvalidationLevel::Full),
            InvalidationLevel::Full
        );
        assert_eq!(
            InvalidationLevel::Light.max(InvalidationLevel::None),
            InvalidationLevel::Light
        );
        assert!(InvalidationLevel::None < InvalidationLevel::Light);
    }
}
