use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StackingLevel {
    Floating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowPolicy {
    pub stacking_level: StackingLevel,
    pub movable_by_background: bool,
    pub capture_excluded: bool,
}

impl WindowPolicy {
    pub const fn overlay() -> Self {
        Self {
            stacking_level: StackingLevel::Floating,
            movable_by_background: true,
            capture_excluded: true,
        }
    }
}

/// Window-manager properties of the overlay. Each one is independent of the
/// others.
pub trait PolicyTarget {
    fn set_stacking_level(&mut self, level: StackingLevel) -> Result<()>;
    fn set_movable_by_background(&mut self, movable: bool) -> Result<()>;
    /// Keeps the window out of screen recording, sharing and remote
    /// presentation. Must be set before the window is first shown.
    fn set_capture_excluded(&mut self, excluded: bool) -> Result<()>;
}

pub fn apply_policy<T: PolicyTarget + ?Sized>(target: &mut T, policy: &WindowPolicy) -> Result<()> {
    target.set_stacking_level(policy.stacking_level)?;
    target.set_movable_by_background(policy.movable_by_background)?;
    target.set_capture_excluded(policy.capture_excluded)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorded {
        level: Option<StackingLevel>,
        movable: Option<bool>,
        excluded: Option<bool>,
    }

    impl PolicyTarget for Recorded {
        fn set_stacking_level(&mut self, level: StackingLevel) -> Result<()> {
            self.level = Some(level);
            Ok(())
        }

        fn set_movable_by_background(&mut self, movable: bool) -> Result<()> {
            self.movable = Some(movable);
            Ok(())
        }

        fn set_capture_excluded(&mut self, excluded: bool) -> Result<()> {
            self.excluded = Some(excluded);
            Ok(())
        }
    }

    #[test]
    fn test_overlay_policy_sets_all_three() {
        let mut target = Recorded::default();
        apply_policy(&mut target, &WindowPolicy::overlay()).expect("apply policy");

        assert_eq!(target.level, Some(StackingLevel::Floating));
        assert_eq!(target.movable, Some(true));
        assert_eq!(target.excluded, Some(true));
    }
}
