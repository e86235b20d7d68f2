use serde::Serialize;
use std::fmt::{Display, Formatter, Result as FmtResult};

#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub instances_seen: u64,
    pub unanswered: u64,
    pub accuracy: f64,
    pub kappa: f64,
    pub seconds: f64,
    pub model_bytes: usize,
}

impl Snapshot {
    #[inline]
    fn fmtv(v: f64) -> String {
        if v.is_nan() {
            "NaN".into()
        } else {
            format!("{:.6}", v)
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Display for Snapshot {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "seen={}, acc={}, kappa={}, unanswered={}, mem={}B, t={:.6}s",
            self.instances_seen,
            Self::fmtv(self.accuracy),
            Self::fmtv(self.kappa),
            self.unanswered,
            self.model_bytes,
            self.seconds
        )
    }
}
