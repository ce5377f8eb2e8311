use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::debate_match::DebateFormat;

/// The fixed segments of a timed debate, in speaking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebatePhase {
    Speech1,
    Cross1,
    Speech2,
    Cross2,
    Rebuttal1,
    Rebuttal2,
    Summary1,
    Summary2,
}

impl DebatePhase {
    pub const SEQUENCE: [DebatePhase; 8] = [
        DebatePhase::Speech1,
        DebatePhase::Cross1,
        DebatePhase::Speech2,
        DebatePhase::Cross2,
        DebatePhase::Rebuttal1,
        DebatePhase::Rebuttal2,
        DebatePhase::Summary1,
        DebatePhase::Summary2,
    ];

    /// The phase after this one, or `None` past `Summary2`.
    pub fn next(self) -> Option<DebatePhase> {
        let position = DebatePhase::SEQUENCE
            .iter()
            .position(|phase| *phase == self)?;
        DebatePhase::SEQUENCE.get(position + 1).copied()
    }

    pub fn is_terminal(self) -> bool {
        self == DebatePhase::Summary2
    }
}

/// Per-format phase durations, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseSettings {
    pub speech_secs: u64,
    pub cross_secs: u64,
    pub rebuttal_secs: u64,
    pub summary_secs: u64,
    pub prep_secs: u64,
}

impl PhaseSettings {
    pub fn for_format(format: DebateFormat) -> Self {
        match format {
            DebateFormat::LincolnDouglas => PhaseSettings {
                speech_secs: 360,
                cross_secs: 180,
                rebuttal_secs: 240,
                summary_secs: 120,
                prep_secs: 240,
            },
            DebateFormat::PublicForum => PhaseSettings {
                speech_secs: 240,
                cross_secs: 180,
                rebuttal_secs: 240,
                summary_secs: 120,
                prep_secs: 120,
            },
        }
    }

    pub fn duration_of(&self, phase: DebatePhase) -> u64 {
        match phase {
            DebatePhase::Speech1 | DebatePhase::Speech2 => self.speech_secs,
            DebatePhase::Cross1 | DebatePhase::Cross2 => self.cross_secs,
            DebatePhase::Rebuttal1 | DebatePhase::Rebuttal2 => self.rebuttal_secs,
            DebatePhase::Summary1 | DebatePhase::Summary2 => self.summary_secs,
        }
    }
}

/// Runtime state of an active debate. One item per active match, keyed by
/// `match_id`, deleted when the match completes. Phase and remaining time
/// are persisted on every timer mutation so a reconnect picks up where the
/// debate stands. `version` is the optimistic-lock counter for timer
/// read-modify-write cycles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateSession {
    pub match_id: String,
    pub format: DebateFormat,
    pub current_phase: DebatePhase,
    pub time_remaining: u64,
    pub is_active: bool,
    pub prep_time_remaining: u64,
    pub prep_active: bool,
    pub awaiting_judgment: bool,
    pub version: u64,
    pub updated_at: DateTime<Utc>,
}

impl DebateSession {
    /// Session at the first phase with the timer loaded but stopped.
    pub fn new(match_id: &str, format: DebateFormat) -> Self {
        let settings = PhaseSettings::for_format(format);
        DebateSession {
            match_id: match_id.to_string(),
            format,
            current_phase: DebatePhase::Speech1,
            time_remaining: settings.duration_of(DebatePhase::Speech1),
            is_active: false,
            prep_time_remaining: settings.prep_secs,
            prep_active: false,
            awaiting_judgment: false,
            version: 0,
            updated_at: Utc::now(),
        }
    }

    pub fn settings(&self) -> PhaseSettings {
        PhaseSettings::for_format(self.format)
    }

    /// Whether any countdown is currently running.
    pub fn has_running_timer(&self) -> bool {
        self.is_active || self.prep_active
    }
}
