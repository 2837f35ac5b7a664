use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};

use crate::core::SeriesId;
use crate::scene::NodeId;

/// Topmost node under the pointer together with its owning series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pick {
    pub series: SeriesId,
    pub node: NodeId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PickState {
    #[default]
    Idle,
    Hovering(Pick),
}

impl PickState {
    #[must_use]
    pub fn current(&self) -> Option<&Pick> {
        match self {
            Self::Idle => None,
            Self::Hovering(pick) => Some(pick),
        }
    }
}

/// Pointer input after hit testing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerInput {
    Moved {
        hit: Option<Pick>,
        /// Tooltip flag of the hit series, ignored when `hit` is `None`.
        tooltip_enabled: bool,
    },
    /// Pointer left the whole surface.
    Left,
}

/// Side effect requested by a transition, executed by the chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickCommand {
    Highlight(Pick),
    Dehighlight(SeriesId),
    /// Compute tooltip markup for the pick and show it at the pointer.
    ShowTooltip(Pick),
    /// Reposition the visible tooltip without touching its content.
    MoveTooltip,
    HideTooltip,
}

pub type PickCommands = SmallVec<[PickCommand; 4]>;

/// Hover state machine.
///
/// Pure function of the current state and one input; rendering side effects
/// are returned as commands so the transition logic stays testable on its own.
#[must_use]
pub fn transition(state: &PickState, input: PointerInput) -> (PickState, PickCommands) {
    match (state, input) {
        (PickState::Idle, PointerInput::Moved { hit: None, .. }) => {
            (PickState::Idle, SmallVec::new())
        }
        (PickState::Idle, PointerInput::Moved { hit: Some(pick), .. }) => (
            PickState::Hovering(pick.clone()),
            smallvec![PickCommand::Highlight(pick.clone()), PickCommand::ShowTooltip(pick)],
        ),
        (
            PickState::Hovering(current),
            PointerInput::Moved {
                hit: Some(pick),
                tooltip_enabled,
            },
        ) => {
            if *current == pick {
                let commands = if tooltip_enabled {
                    smallvec![PickCommand::MoveTooltip]
                } else {
                    SmallVec::new()
                };
                return (PickState::Hovering(pick), commands);
            }
            (
                PickState::Hovering(pick.clone()),
                smallvec![
                    PickCommand::Dehighlight(current.series.clone()),
                    PickCommand::Highlight(pick.clone()),
                    PickCommand::ShowTooltip(pick),
                ],
            )
        }
        (PickState::Hovering(current), PointerInput::Moved { hit: None, .. }) => (
            PickState::Idle,
            smallvec![
                PickCommand::Dehighlight(current.series.clone()),
                PickCommand::HideTooltip,
            ],
        ),
        (PickState::Idle, PointerInput::Left) => {
            (PickState::Idle, smallvec![PickCommand::HideTooltip])
        }
        (PickState::Hovering(current), PointerInput::Left) => (
            PickState::Idle,
            smallvec![
                PickCommand::HideTooltip,
                PickCommand::Dehighlight(current.series.clone()),
            ],
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::{Pick, PickCommand, PickState, PointerInput, transition};
    use crate::core::SeriesId;
    use crate::scene::NodeId;

    fn pick(series: &str, node: u32) -> Pick {
        Pick {
            series: SeriesId::new(series),
            node: NodeId::new(node, 0),
        }
    }

    fn moved(hit: Option<Pick>) -> PointerInput {
        PointerInput::Moved {
            hit,
            tooltip_enabled: true,
        }
    }

    #[test]
    fn entering_a_node_highlights_and_shows_tooltip() {
        let (state, commands) = transition(&PickState::Idle, moved(Some(pick("a", 1))));
        assert_eq!(state, PickState::Hovering(pick("a", 1)));
        assert_eq!(
            commands.as_slice(),
            &[
                PickCommand::Highlight(pick("a", 1)),
                PickCommand::ShowTooltip(pick("a", 1)),
            ]
        );
    }

    #[test]
    fn drifting_within_same_node_only_moves_tooltip() {
        let hovering = PickState::Hovering(pick("a", 1));
        let (state, commands) = transition(&hovering, moved(Some(pick("a", 1))));
        assert_eq!(state, hovering);
        assert_eq!(commands.as_slice(), &[PickCommand::MoveTooltip]);

        let (_, commands) = transition(
            &hovering,
            PointerInput::Moved {
                hit: Some(pick("a", 1)),
                tooltip_enabled: false,
            },
        );
        assert!(commands.is_empty());
    }

    #[test]
    fn switching_nodes_dehighlights_previous_series_first() {
        let hovering = PickState::Hovering(pick("a", 1));
        let (state, commands) = transition(&hovering, moved(Some(pick("b", 2))));
        assert_eq!(state, PickState::Hovering(pick("b", 2)));
        assert_eq!(
            commands.as_slice(),
            &[
                PickCommand::Dehighlight(SeriesId::new("a")),
                PickCommand::Highlight(pick("b", 2)),
                PickCommand::ShowTooltip(pick("b", 2)),
            ]
        );
    }

    #[test]
    fn leaving_nodes_or_surface_returns_to_idle() {
        let hovering = PickState::Hovering(pick("a", 1));
        let (state, commands) = transition(&hovering, moved(None));
        assert_eq!(state, PickState::Idle);
        assert_eq!(
            commands.as_slice(),
            &[
                PickCommand::Dehighlight(SeriesId::new("a")),
                PickCommand::HideTooltip,
            ]
        );

        let (state, commands) = transition(&hovering, PointerInput::Left);
        assert_eq!(state, PickState::Idle);
        assert!(commands.contains(&PickCommand::HideTooltip));

        let (state, commands) = transition(&PickState::Idle, PointerInput::Left);
        assert_eq!(state, PickState::Idle);
        assert_eq!(commands.as_slice(), &[PickCommand::HideTooltip]);
    }
}
