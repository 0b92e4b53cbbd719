//! The exclusive-behavior priority table.
//!
//! When several behavior buttons are pressed in the same frame only the
//! first matching row of [`PRIORITY_TABLE`] runs:
//!
//! | Rank | Button | Behavior |
//! |---|---|---|
//! | 1 | `lb` | [`ExclusiveBehavior::WhatsNext`] |
//! | 2 | `rb` | [`ExclusiveBehavior::ThankYou`] |
//! | 3 | `center` | [`ExclusiveBehavior::MotionAloha`] |
//! | 4 | `a` | [`ExclusiveBehavior::Stand`] |
//! | 5 | `b` | [`ExclusiveBehavior::Rest`] |
//! | 6 | `x` | [`ExclusiveBehavior::Welcome`] |
//! | 7 | `y` | [`ExclusiveBehavior::HandsOnHips`] |
//! | 8–11 | `up`, `down`, `left`, `right` | [`ExclusiveBehavior::Head`] |

use teleop_types::{ControlEvent, HeadNudge};

/// A behavior that needs the behavior slot to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExclusiveBehavior {
    WhatsNext,
    ThankYou,
    MotionAloha,
    Stand,
    Rest,
    Welcome,
    HandsOnHips,
    Head(HeadNudge),
}

/// Button test for one row of the table.
pub type Trigger = fn(&ControlEvent) -> bool;

/// Behavior rows, highest priority first.
pub const PRIORITY_TABLE: [(Trigger, ExclusiveBehavior); 11] = [
    (|ev: &ControlEvent| ev.lb, ExclusiveBehavior::WhatsNext),
    (|ev: &ControlEvent| ev.rb, ExclusiveBehavior::ThankYou),
    (|ev: &ControlEvent| ev.center, ExclusiveBehavior::MotionAloha),
    (|ev: &ControlEvent| ev.a, ExclusiveBehavior::Stand),
    (|ev: &ControlEvent| ev.b, ExclusiveBehavior::Rest),
    (|ev: &ControlEvent| ev.x, ExclusiveBehavior::Welcome),
    (|ev: &ControlEvent| ev.y, ExclusiveBehavior::HandsOnHips),
    (|ev: &ControlEvent| ev.up, ExclusiveBehavior::Head(HeadNudge::Up)),
    (|ev: &ControlEvent| ev.down, ExclusiveBehavior::Head(HeadNudge::Down)),
    (|ev: &ControlEvent| ev.left, ExclusiveBehavior::Head(HeadNudge::Left)),
    (|ev: &ControlEvent| ev.right, ExclusiveBehavior::Head(HeadNudge::Right)),
];

/// The highest-priority behavior requested by `ev`, if any.
pub fn select(ev: &ControlEvent) -> Option<ExclusiveBehavior> {
    PRIORITY_TABLE
        .iter()
        .find(|(trigger, _)| trigger(ev))
        .map(|(_, behavior)| *behavior)
}
