use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// One point of a learning curve.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    pub instances_seen: u64,
    pub accuracy: f64,
    pub kappa: f64,
    pub ram_hours: f64,
    pub seconds: f64,
    #[serde(flatten)]
    pub extras: BTreeMap<String, f64>,
}

const PREFERRED_EXTRAS: &[&str] = &["g_mean", "recall", "specificity", "precision", "f1"];

impl Snapshot {
    #[inline]
    fn fmtv(v: f64) -> String {
        if v.is_nan() {
            "NaN".into()
        } else {
            format!("{:.6}", v)
        }
    }

    /// Extra metric names, preferred ones first and the rest alphabetically.
    pub fn extra_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = PREFERRED_EXTRAS
            .iter()
            .copied()
            .filter(|k| self.extras.contains_key(*k))
            .collect();
        names.extend(
            self.extras
                .keys()
                .map(String::as_str)
                .filter(|k| !PREFERRED_EXTRAS.contains(k)),
        );
        names
    }
}

impl Display for Snapshot {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "seen={}, acc={}, kappa={}, ram_h={:.9}, t={:.3}s",
            self.instances_seen,
            Self::fmtv(self.accuracy),
            Self::fmtv(self.kappa),
            self.ram_hours,
            self.seconds
        )?;
        for key in self.extra_names() {
            if let Some(v) = self.extras.get(key) {
                write!(f, ", {}={}", key, Self::fmtv(*v))?;
            }
        }
        Ok(())
    }
}
