use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hex::HexCoord;
use crate::stage::NarrativeStage;

/// Stable quest identifier, e.g. `"welcome-road"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuestId(pub String);

impl fmt::Display for QuestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a task asks of the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Objective {
    /// Stand at least `distance` hexes from the origin.
    ReachRing {
        /// Minimum distance from the origin.
        distance: u32,
    },
    /// Stand on a specific hex.
    ReachHex {
        /// Target hex.
        target: HexCoord,
    },
    /// Walk this many hexes after the quest was assigned.
    TravelDistance {
        /// Hexes to walk.
        hexes: u32,
    },
    /// Let this many seconds pass after the quest was assigned.
    SurviveSeconds {
        /// Seconds to endure.
        seconds: f64,
    },
    /// Speak with a companion.
    TalkTo {
        /// Companion name, case-insensitive.
        companion: String,
    },
    /// Stand on the origin after having left it.
    ReturnHome,
}

/// The facts objectives are checked against.
#[derive(Debug, Clone, Copy)]
pub struct ObjectiveContext<'a> {
    /// Where the player stands.
    pub position: HexCoord,
    /// Total hexes walked this session.
    pub distance_traveled: u32,
    /// Session time in seconds.
    pub elapsed_secs: f64,
    /// Narrative flags set so far.
    pub flags: &'a HashSet<String>,
}

/// Flag set when the player speaks with a companion.
pub fn talked_to_flag(companion: &str) -> String {
    format!("talked_to:{}", companion.to_lowercase())
}

impl Objective {
    /// Whether the objective only counts after every earlier task is done.
    pub fn waits_for_earlier(&self) -> bool {
        matches!(self, Self::ReturnHome)
    }

    /// Whether the objective holds, measured from the quest's starting point.
    pub fn is_met(&self, ctx: &ObjectiveContext<'_>, quest: &Quest) -> bool {
        match self {
            Self::ReachRing { distance } => ctx.position.length() >= *distance,
            Self::ReachHex { target } => ctx.position == *target,
            Self::TravelDistance { hexes } => {
                ctx.distance_traveled.saturating_sub(quest.started_distance) >= *hexes
            }
            Self::SurviveSeconds { seconds } => ctx.elapsed_secs - quest.started_at >= *seconds,
            Self::TalkTo { companion } => ctx.flags.contains(&talked_to_flag(companion)),
            Self::ReturnHome => {
                ctx.position == HexCoord::ORIGIN && ctx.distance_traveled > quest.started_distance
            }
        }
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReachRing { distance } => write!(f, "venture {distance} hexes from the hearth"),
            Self::ReachHex { target } => write!(f, "reach {target}"),
            Self::TravelDistance { hexes } => write!(f, "walk {hexes} hexes"),
            Self::SurviveSeconds { seconds } => write!(f, "endure {seconds:.0} seconds"),
            Self::TalkTo { companion } => write!(f, "speak with {companion}"),
            Self::ReturnHome => write!(f, "return to the hearth"),
        }
    }
}

/// One step of a quest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestTask {
    /// What the player is told.
    pub description: String,
    /// How completion is checked.
    pub objective: Objective,
    /// Set once, never cleared.
    pub done: bool,
}

impl QuestTask {
    /// Create an open task.
    pub fn new(description: impl Into<String>, objective: Objective) -> Self {
        Self {
            description: description.into(),
            objective,
            done: false,
        }
    }
}

/// Lifecycle of a quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    /// In progress.
    Active,
    /// All tasks done.
    Completed,
    /// Dropped when the stage moved on.
    Abandoned,
}

impl fmt::Display for QuestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Completed => write!(f, "completed"),
            Self::Abandoned => write!(f, "abandoned"),
        }
    }
}

/// A quest tied to a narrative stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    /// Stable identifier.
    pub id: QuestId,
    /// Short title.
    pub title: String,
    /// Flavor text.
    pub description: String,
    /// The stage this quest belongs to.
    pub stage: NarrativeStage,
    /// Ordered tasks.
    pub tasks: Vec<QuestTask>,
    /// Lifecycle status.
    pub status: QuestStatus,
    /// Player distance traveled when the quest was assigned.
    pub started_distance: u32,
    /// Session seconds when the quest was assigned.
    pub started_at: f64,
}

impl Quest {
    /// Create an active quest with no tasks.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        stage: NarrativeStage,
    ) -> Self {
        Self {
            id: QuestId(id.into()),
            title: title.into(),
            description: description.into(),
            stage,
            tasks: Vec::new(),
            status: QuestStatus::Active,
            started_distance: 0,
            started_at: 0.0,
        }
    }

    /// Append a task.
    pub fn with_task(mut self, description: impl Into<String>, objective: Objective) -> Self {
        self.tasks.push(QuestTask::new(description, objective));
        self
    }

    /// Record where and when the quest began; objectives measure from here.
    pub fn started(mut self, distance: u32, at: f64) -> Self {
        self.started_distance = distance;
        self.started_at = at;
        self
    }

    /// The quest auto-assigned when a stage begins.
    pub fn for_stage(stage: NarrativeStage) -> Quest {
        match stage {
            NarrativeStage::Peace => Quest::new(
                "welcome-road",
                "The Welcome Road",
                "The village sends you off with bread and blessings.",
                stage,
            )
            .with_task(
                "Ask Elena about the road ahead",
                Objective::TalkTo {
                    companion: "Elena".into(),
                },
            )
            .with_task(
                "Walk out past the last fence",
                Objective::ReachRing { distance: 3 },
            )
            .with_task("Come back to the hearth", Objective::ReturnHome),
            NarrativeStage::Unease => Quest::new(
                "treeline-whispers",
                "Whispers at the Treeline",
                "Something hums beneath the birdsong.",
                stage,
            )
            .with_task(
                "Find where the whispering starts",
                Objective::ReachRing { distance: 6 },
            )
            .with_task(
                "Keep walking until it stops",
                Objective::TravelDistance { hexes: 15 },
            ),
            NarrativeStage::Dread => Quest::new(
                "drowned-chapel",
                "The Drowned Chapel",
                "A bell tolls from somewhere with no tower.",
                stage,
            )
            .with_task(
                "Reach the marshland",
                Objective::ReachRing { distance: 7 },
            )
            .with_task(
                "Wait out the tolling",
                Objective::SurviveSeconds { seconds: 120.0 },
            ),
            NarrativeStage::Terror => Quest::new(
                "hold-the-line",
                "Hold the Line",
                "They are circling now. Keep the party together.",
                stage,
            )
            .with_task(
                "Ask Tobias what he can do for the wounded",
                Objective::TalkTo {
                    companion: "Tobias".into(),
                },
            )
            .with_task(
                "Survive until the screaming stops",
                Objective::SurviveSeconds { seconds: 180.0 },
            ),
            NarrativeStage::Horror => Quest::new(
                "labyrinth-heart",
                "The Labyrinth's Heart",
                "The hearth is the only thing left that is real.",
                stage,
            )
            .with_task("Return to the hearth", Objective::ReturnHome)
            .with_task(
                "Endure what comes",
                Objective::SurviveSeconds { seconds: 60.0 },
            ),
        }
    }

    /// Mark newly satisfied tasks done. Returns the indices that flipped.
    ///
    /// Tasks that wait for earlier ones are only checked once every task
    /// before them is done, counting tasks that flip in the same update.
    pub fn update(&mut self, ctx: &ObjectiveContext<'_>) -> Vec<usize> {
        if self.status != QuestStatus::Active {
            return Vec::new();
        }
        let mut met = Vec::new();
        let mut earlier_done = true;
        for (i, task) in self.tasks.iter().enumerate() {
            let ready = earlier_done || !task.objective.waits_for_earlier();
            let done = task.done || (ready && task.objective.is_met(ctx, self));
            if done && !task.done {
                met.push(i);
            }
            earlier_done &= done;
        }
        for &i in &met {
            self.tasks[i].done = true;
        }
        if self.tasks.iter().all(|t| t.done) {
            self.status = QuestStatus::Completed;
        }
        met
    }

    /// Whether every task is done.
    pub fn is_complete(&self) -> bool {
        self.status == QuestStatus::Completed
    }

    /// Number of finished tasks.
    pub fn tasks_done(&self) -> usize {
        self.tasks.iter().filter(|t| t.done).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(position: HexCoord, distance: u32, secs: f64, flags: &HashSet<String>) -> ObjectiveContext<'_> {
        ObjectiveContext {
            position,
            distance_traveled: distance,
            elapsed_secs: secs,
            flags,
        }
    }

    #[test]
    fn every_stage_has_a_quest() {
        for stage in NarrativeStage::ALL {
            let q = Quest::for_stage(stage);
            assert_eq!(q.stage, stage);
            assert!(!q.tasks.is_empty());
            assert_eq!(q.status, QuestStatus::Active);
        }
    }

    #[test]
    fn tasks_complete_once_and_quest_finishes() {
        let flags = HashSet::new();
        let mut q = Quest::new("t", "T", "", NarrativeStage::Peace)
            .with_task("out", Objective::ReachRing { distance: 2 })
            .with_task("back", Objective::ReturnHome);

        assert_eq!(q.update(&ctx(HexCoord::new(2, 0), 2, 0.0, &flags)), vec![0]);
        assert!(!q.is_complete());
        // Returning to the origin does not undo the first task.
        assert_eq!(q.update(&ctx(HexCoord::ORIGIN, 4, 0.0, &flags)), vec![1]);
        assert!(q.is_complete());
        assert!(q.update(&ctx(HexCoord::ORIGIN, 4, 0.0, &flags)).is_empty());
    }

    #[test]
    fn return_home_waits_for_the_walk_out() {
        let flags: HashSet<String> = [talked_to_flag("Elena")].into();
        let mut q = Quest::for_stage(NarrativeStage::Peace);
        assert_eq!(q.update(&ctx(HexCoord::ORIGIN, 0, 0.0, &flags)), vec![0]);
        // One hex out and back is not the walk past the fence.
        assert!(q.update(&ctx(HexCoord::ORIGIN, 2, 0.0, &flags)).is_empty());
        assert_eq!(q.update(&ctx(HexCoord::new(3, 0), 5, 0.0, &flags)), vec![1]);
        assert_eq!(q.update(&ctx(HexCoord::ORIGIN, 8, 0.0, &flags)), vec![2]);
        assert!(q.is_complete());
    }

    #[test]
    fn return_home_requires_leaving() {
        let flags = HashSet::new();
        let mut q = Quest::new("t", "T", "", NarrativeStage::Horror)
            .with_task("home", Objective::ReturnHome)
            .started(10, 0.0);
        assert!(q.update(&ctx(HexCoord::ORIGIN, 10, 0.0, &flags)).is_empty());
        assert_eq!(q.update(&ctx(HexCoord::ORIGIN, 11, 0.0, &flags)), vec![0]);
    }

    #[test]
    fn objectives_measure_from_quest_start() {
        let flags = HashSet::new();
        let mut q = Quest::new("t", "T", "", NarrativeStage::Unease)
            .with_task("walk", Objective::TravelDistance { hexes: 5 })
            .with_task("wait", Objective::SurviveSeconds { seconds: 30.0 })
            .started(20, 100.0);
        assert!(q.update(&ctx(HexCoord::ORIGIN, 24, 129.0, &flags)).is_empty());
        assert_eq!(q.update(&ctx(HexCoord::ORIGIN, 25, 130.0, &flags)), vec![0, 1]);
    }

    #[test]
    fn talk_to_uses_flag() {
        let mut flags = HashSet::new();
        let mut q = Quest::for_stage(NarrativeStage::Terror);
        assert!(q.update(&ctx(HexCoord::ORIGIN, 0, 0.0, &flags)).is_empty());
        flags.insert(talked_to_flag("TOBIAS"));
        assert_eq!(q.update(&ctx(HexCoord::ORIGIN, 0, 0.0, &flags)), vec![0]);
    }

    #[test]
    fn abandoned_quests_do_not_progress() {
        let flags = HashSet::new();
        let mut q = Quest::new("t", "T", "", NarrativeStage::Peace)
            .with_task("out", Objective::ReachRing { distance: 0 });
        q.status = QuestStatus::Abandoned;
        assert!(q.update(&ctx(HexCoord::ORIGIN, 0, 0.0, &flags)).is_empty());
    }
}
