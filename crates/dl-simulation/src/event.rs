use dl_core::{CompanionId, HexCoord, NarrativeStage, QuestId};
use serde::Serialize;

use crate::stage::AdvanceTrigger;

/// What kind of simulation event occurred.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SimEventKind {
    // Movement
    /// The player stepped onto an adjacent hex.
    PlayerMoved {
        /// The hex left.
        from: HexCoord,
        /// The hex entered.
        to: HexCoord,
    },
    /// The player reached the end of the confirmed route.
    PathCompleted {
        /// The destination hex.
        at: HexCoord,
    },
    /// The next hex on the route became impassable; the route was dropped.
    PathBlocked {
        /// Where the player stopped.
        at: HexCoord,
        /// The hex that can no longer be entered.
        blocked: HexCoord,
    },

    // Sanity
    /// Sanity fell to or below a threshold.
    SanityThreshold {
        /// The threshold crossed.
        threshold: u8,
        /// Sanity after the drain.
        sanity: f64,
    },

    // Stage
    /// The story moved one stage forward.
    StageAdvanced {
        /// The previous stage.
        from: NarrativeStage,
        /// The new stage.
        to: NarrativeStage,
        /// What caused it.
        trigger: AdvanceTrigger,
    },

    // Companions
    /// A companion's morale changed by a notable amount.
    MoraleChanged {
        /// The companion.
        companion: CompanionId,
        /// Signed change actually applied.
        delta: f64,
        /// Morale afterwards.
        morale: f64,
    },
    /// A companion's morale hit zero and they left the party.
    CompanionDeparted {
        /// The companion.
        companion: CompanionId,
    },

    // Quests
    /// A quest became the active quest.
    QuestAssigned {
        /// The quest.
        quest: QuestId,
    },
    /// A task of the active quest was completed.
    QuestTaskCompleted {
        /// The quest.
        quest: QuestId,
        /// Index of the task within the quest.
        task: usize,
    },
    /// Every task of the active quest is done.
    QuestCompleted {
        /// The quest.
        quest: QuestId,
    },
    /// The quest was dropped unfinished by a stage transition.
    QuestAbandoned {
        /// The quest.
        quest: QuestId,
    },
}

impl SimEventKind {
    /// Check whether a given companion is involved in this event.
    pub fn involves(&self, id: CompanionId) -> bool {
        match self {
            Self::MoraleChanged { companion, .. } | Self::CompanionDeparted { companion } => {
                *companion == id
            }
            _ => false,
        }
    }

    /// Short machine-friendly label, used for filtering and tables.
    pub fn label(&self) -> &'static str {
        match self {
            Self::PlayerMoved { .. } => "player_moved",
            Self::PathCompleted { .. } => "path_completed",
            Self::PathBlocked { .. } => "path_blocked",
            Self::SanityThreshold { .. } => "sanity_threshold",
            Self::StageAdvanced { .. } => "stage_advanced",
            Self::MoraleChanged { .. } => "morale_changed",
            Self::CompanionDeparted { .. } => "companion_departed",
            Self::QuestAssigned { .. } => "quest_assigned",
            Self::QuestTaskCompleted { .. } => "quest_task_completed",
            Self::QuestCompleted { .. } => "quest_completed",
            Self::QuestAbandoned { .. } => "quest_abandoned",
        }
    }
}

/// A record of something that happened during simulation.
#[derive(Debug, Clone, Serialize)]
pub struct SimEvent {
    /// The simulation tick when this event occurred.
    pub tick: u64,
    /// The specific kind of event that occurred.
    pub kind: SimEventKind,
    /// A human-readable description of the event.
    pub description: String,
}

impl SimEvent {
    /// Create a new simulation event with the given tick, kind, and description.
    pub fn new(tick: u64, kind: SimEventKind, description: impl Into<String>) -> Self {
        Self {
            tick,
            kind,
            description: description.into(),
        }
    }
}

/// Accumulates events during a simulation run.
#[derive(Debug, Default, Serialize)]
pub struct EventLog {
    events: Vec<SimEvent>,
    #[serde(skip)]
    max_events: usize,
}

impl EventLog {
    /// Create a new event log with the given maximum capacity (0 = unlimited).
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
        }
    }

    /// Append an event, dropping the oldest events if the log exceeds its capacity.
    pub fn push(&mut self, event: SimEvent) {
        self.events.push(event);
        if self.max_events > 0 && self.events.len() > self.max_events {
            let drain_count = self.events.len() - self.max_events;
            self.events.drain(..drain_count);
        }
    }

    /// Return a slice of all recorded events.
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    /// Return all events involving the given companion.
    pub fn events_for_companion(&self, id: CompanionId) -> Vec<&SimEvent> {
        self.events.iter().filter(|e| e.kind.involves(id)).collect()
    }

    /// Return all events with the given label.
    pub fn events_labeled(&self, label: &str) -> Vec<&SimEvent> {
        self.events
            .iter()
            .filter(|e| e.kind.label() == label)
            .collect()
    }

    /// Return the number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Return `true` if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moved(tick: u64) -> SimEvent {
        SimEvent::new(
            tick,
            SimEventKind::PlayerMoved {
                from: HexCoord::ORIGIN,
                to: HexCoord::new(1, 0),
            },
            "moved",
        )
    }

    #[test]
    fn event_log_push_and_query() {
        let mut log = EventLog::new(0);
        log.push(moved(1));
        assert_eq!(log.len(), 1);
        assert!(!log.is_empty());
        assert_eq!(log.events_labeled("player_moved").len(), 1);
        assert!(log.events_labeled("quest_assigned").is_empty());
    }

    #[test]
    fn event_log_max_events_trims() {
        let mut log = EventLog::new(2);
        for i in 0..5 {
            log.push(moved(i));
        }
        assert_eq!(log.len(), 2);
        assert_eq!(log.events()[0].tick, 3);
        assert_eq!(log.events()[1].tick, 4);
    }

    #[test]
    fn event_kind_involves_companion() {
        let a = CompanionId::new();
        let b = CompanionId::new();
        let kind = SimEventKind::MoraleChanged {
            companion: a,
            delta: -8.0,
            morale: 92.0,
        };
        assert!(kind.involves(a));
        assert!(!kind.involves(b));
        assert!(SimEventKind::CompanionDeparted { companion: b }.involves(b));
        assert!(!SimEventKind::PathCompleted { at: HexCoord::ORIGIN }.involves(a));
    }
}
