use crate::evaluation::Snapshot;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Error, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurveFormat {
    #[default]
    Csv,
    Tsv,
    Json,
}

#[derive(Debug, Default)]
pub struct LearningCurve {
    entries: Vec<Snapshot>,
}

impl LearningCurve {
    pub fn push(&mut self, snapshot: Snapshot) {
        self.entries.push(snapshot)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<Snapshot> {
        self.entries.last().cloned()
    }

    pub fn entries(&self) -> &[Snapshot] {
        &self.entries
    }

    pub fn export<P: AsRef<Path>>(&self, path: P, fmt: CurveFormat) -> Result<(), Error> {
        let mut w = BufWriter::new(File::create(path)?);
        match fmt {
            CurveFormat::Csv => self.write_delimited(&mut w, ',')?,
            CurveFormat::Tsv => self.write_delimited(&mut w, '\t')?,
            CurveFormat::Json => self.write_json(&mut w)?,
        }
        w.flush()
    }

    /// Union of extra metric names across all snapshots, sorted.
    fn extra_columns(&self) -> Vec<&str> {
        self.entries
            .iter()
            .flat_map(|s| s.extras.keys().map(String::as_str))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn write_delimited<W: Write>(&self, w: &mut W, d: char) -> Result<(), Error> {
        let extras = self.extra_columns();

        write!(w, "instances_seen{d}accuracy{d}kappa{d}ram_hours{d}seconds")?;
        for name in &extras {
            write!(w, "{d}{name}")?;
        }
        writeln!(w)?;

        for s in &self.entries {
            write!(
                w,
                "{}{d}{:.12}{d}{:.12}{d}{:.12}{d}{:.6}",
                s.instances_seen, s.accuracy, s.kappa, s.ram_hours, s.seconds
            )?;
            for name in &extras {
                match s.extras.get(*name) {
                    Some(v) => write!(w, "{d}{v:.12}")?,
                    None => write!(w, "{d}")?,
                }
            }
            writeln!(w)?;
        }
        Ok(())
    }

    fn write_json<W: Write>(&self, w: &mut W) -> Result<(), Error> {
        serde_json::to_writer_pretty(&mut *w, &self.entries)?;
        writeln!(w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::NamedTempFile;

    fn snap(seen: u64, acc: f64, kap: f64, ram: f64, secs: f64) -> Snapshot {
        Snapshot {
            instances_seen: seen,
            accuracy: acc,
            kappa: kap,
            ram_hours: ram,
            seconds: secs,
            extras: BTreeMap::new(),
        }
    }

    fn two_rows() -> LearningCurve {
        let mut lc = LearningCurve::default();
        lc.push(snap(10, 1.0, 0.5, 0.125, 2.5));
        lc.push(snap(20, 0.25, 0.0, 1.5, 3.0));
        lc
    }

    #[test]
    fn test_default_is_empty() {
        let lc = LearningCurve::default();
        assert!(lc.is_empty());
        assert!(lc.latest().is_none());
    }

    #[test]
    fn test_push_and_latest() {
        let lc = two_rows();
        assert_eq!(lc.len(), 2);
        let last = lc.latest().unwrap();
        assert_eq!(last.instances_seen, 20);
        assert_eq!(last.accuracy, 0.25);
        assert_eq!(lc.entries()[0].seconds, 2.5);
    }

    #[test]
    fn test_export_csv() {
        let tf = NamedTempFile::new().unwrap();
        two_rows().export(tf.path(), CurveFormat::Csv).unwrap();

        let got = fs::read_to_string(tf.path()).unwrap();
        let exp = "\
instances_seen,accuracy,kappa,ram_hours,seconds
10,1.000000000000,0.500000000000,0.125000000000,2.500000
20,0.250000000000,0.000000000000,1.500000000000,3.000000
";
        assert_eq!(got, exp);
    }

    #[test]
    fn test_export_tsv_with_sparse_extras() {
        let mut lc = LearningCurve::default();
        let mut a = snap(10, 1.0, 0.5, 0.0, 1.0);
        a.extras.insert("recall".into(), 0.5);
        let mut b = snap(20, 1.0, 0.5, 0.0, 2.0);
        b.extras.insert("g_mean".into(), 0.25);
        lc.push(a);
        lc.push(b);

        let tf = NamedTempFile::new().unwrap();
        lc.export(tf.path(), CurveFormat::Tsv).unwrap();

        let got = fs::read_to_string(tf.path()).unwrap();
        let lines: Vec<&str> = got.lines().collect();
        assert_eq!(
            lines[0],
            "instances_seen\taccuracy\tkappa\tram_hours\tseconds\tg_mean\trecall"
        );
        assert!(lines[1].ends_with("1.000000\t\t0.500000000000"));
        assert!(lines[2].ends_with("2.000000\t0.250000000000\t"));
    }

    #[test]
    fn test_export_json() {
        let mut lc = two_rows();
        let mut extra = snap(30, f64::NAN, 0.0, 0.0, 4.0);
        extra.extras.insert("g_mean".into(), 0.75);
        lc.push(extra);

        let tf = NamedTempFile::new().unwrap();
        lc.export(tf.path(), CurveFormat::Json).unwrap();

        let parsed: Value = serde_json::from_str(&fs::read_to_string(tf.path()).unwrap()).unwrap();
        let rows = parsed.as_array().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["instances_seen"], 10);
        assert_eq!(rows[1]["accuracy"], 0.25);
        assert!(rows[2]["accuracy"].is_null());
        assert_eq!(rows[2]["g_mean"], 0.75);
    }

    #[test]
    fn test_export_empty() {
        let lc = LearningCurve::default();

        let tf = NamedTempFile::new().unwrap();
        lc.export(tf.path(), CurveFormat::Csv).unwrap();
        assert_eq!(
            fs::read_to_string(tf.path()).unwrap(),
            "instances_seen,accuracy,kappa,ram_hours,seconds\n"
        );

        lc.export(tf.path(), CurveFormat::Json).unwrap();
        assert_eq!(fs::read_to_string(tf.path()).unwrap(), "[]\n");
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("curve.csv");
        assert!(two_rows().export(path, CurveFormat::Csv).is_err());
    }
}
