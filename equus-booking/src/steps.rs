use serde::{Deserialize, Serialize};
use std::fmt;

/// Pages of the booking wizard, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowStep {
    Horses,
    Details,
    Schedule,
    Extras,
    Review,
}

impl FlowStep {
    pub const ORDER: [FlowStep; 5] = [
        FlowStep::Horses,
        FlowStep::Details,
        FlowStep::Schedule,
        FlowStep::Extras,
        FlowStep::Review,
    ];

    /// Steps every flow shows regardless of service
    pub fn is_always_shown(self) -> bool {
        matches!(self, FlowStep::Extras | FlowStep::Review)
    }

    /// Whether validating this step covers rules owned by `other`
    pub fn covers(self, other: FlowStep) -> bool {
        self == FlowStep::Review || self == other
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FlowStep::Horses => "horses",
            FlowStep::Details => "details",
            FlowStep::Schedule => "schedule",
            FlowStep::Extras => "extras",
            FlowStep::Review => "review",
        }
    }
}

impl fmt::Display for FlowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
