use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisStatus {
    Pending,
    Transcribing,
    Analyzing,
    Done,
    Error,
}

impl AnalysisStatus {
    pub const ALL: [AnalysisStatus; 5] = [
        AnalysisStatus::Pending,
        AnalysisStatus::Transcribing,
        AnalysisStatus::Analyzing,
        AnalysisStatus::Done,
        AnalysisStatus::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStatus::Pending => "pending",
            AnalysisStatus::Transcribing => "transcribing",
            AnalysisStatus::Analyzing => "analyzing",
            AnalysisStatus::Done => "done",
            AnalysisStatus::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AnalysisStatus::Done | AnalysisStatus::Error)
    }

    /// Whether a single run may move from `self` to `next`.
    ///
    /// Entering `transcribing` is allowed from `pending` and from either
    /// terminal status (re-analysis). `error` is reachable from every
    /// non-terminal status.
    pub fn can_transition_to(&self, next: AnalysisStatus) -> bool {
        use AnalysisStatus::*;
        match (self, next) {
            (Pending | Done | Error, Transcribing) => true,
            (Transcribing, Analyzing) => true,
            (Analyzing, Done) => true,
            (Pending | Transcribing | Analyzing, Error) => true,
            _ => false,
        }
    }

    /// Statuses a call may be in for a write to `next` to be accepted.
    pub fn predecessors(next: AnalysisStatus) -> Vec<AnalysisStatus> {
        Self::ALL
            .into_iter()
            .filter(|from| from.can_transition_to(next))
            .collect()
    }
}

impl FromStr for AnalysisStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AnalysisStatus::Pending),
            "transcribing" => Ok(AnalysisStatus::Transcribing),
            "analyzing" => Ok(AnalysisStatus::Analyzing),
            "done" => Ok(AnalysisStatus::Done),
            "error" => Ok(AnalysisStatus::Error),
            _ => Err(format!("Invalid analysis status: {}", s)),
        }
    }
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
