//! CSV loaders for the shared extrema table and the per-catchment tables.

use std::fs::File;
use std::path::Path;

use serde::Deserialize;

use crate::catchment::{Extrema, SamplePair};
use crate::error::{HypsoError, Result};

#[derive(Debug, Deserialize)]
struct ExtremaRow {
    minimum: f64,
    maximum: f64,
}

/// Per-catchment table row. Only `ELEV` and `AREA_GEO` are read; any other
/// column the upstream GIS export carries is discarded.
#[derive(Debug, Deserialize)]
struct CatchmentRow {
    #[serde(rename = "ELEV")]
    elev: f64,
    #[serde(rename = "AREA_GEO")]
    area_geo: f64,
}

/// The shared `Minimum-Maximum.csv` table: one row per catchment, row i
/// (1-based) belongs to catchment i.
#[derive(Debug, Clone)]
pub struct ExtremaTable {
    rows: Vec<Extrema>,
}

impl ExtremaTable {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| HypsoError::FileNotFound {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut reader = csv::Reader::from_reader(file);
        let mut rows = Vec::new();
        for record in reader.deserialize::<ExtremaRow>() {
            let row = record.map_err(|e| HypsoError::MalformedTable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
            rows.push(Extrema {
                minimum: row.minimum,
                maximum: row.maximum,
            });
        }
        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Verify the table covers catchments 1..=count. The extrema table is a
    /// shared prerequisite, so the first missing index aborts the whole run
    /// before any catchment is processed.
    pub fn require_rows(&self, count: usize) -> Result<()> {
        if self.rows.len() < count {
            return Err(HypsoError::MissingData {
                index: self.rows.len() + 1,
            });
        }
        Ok(())
    }

    /// Extrema for the 1-based catchment index.
    pub fn row(&self, index: usize) -> Result<Extrema> {
        index
            .checked_sub(1)
            .and_then(|i| self.rows.get(i))
            .copied()
            .ok_or(HypsoError::MissingData { index })
    }
}

/// Load `<CODE>.csv` from `dir`. Rows keep file order (elevation ascending
/// as produced upstream). A negative area or a zero area total is rejected
/// here so the cumulative normalization downstream cannot divide by zero.
pub fn load_catchment_table(dir: &Path, code: &str) -> Result<Vec<SamplePair>> {
    let path = dir.join(format!("{code}.csv"));
    let malformed = |reason: String| HypsoError::MalformedTable {
        path: path.clone(),
        reason,
    };

    let file = File::open(&path).map_err(|e| HypsoError::FileNotFound {
        path: path.clone(),
        source: e,
    })?;
    let mut reader = csv::Reader::from_reader(file);

    let mut samples = Vec::new();
    for (i, record) in reader.deserialize::<CatchmentRow>().enumerate() {
        let row = record.map_err(|e| malformed(e.to_string()))?;
        if row.area_geo < 0.0 {
            return Err(malformed(format!(
                "negative AREA_GEO {} at row {}",
                row.area_geo,
                i + 1
            )));
        }
        samples.push(SamplePair {
            elevation: row.elev,
            area: row.area_geo,
        });
    }

    if samples.is_empty() {
        return Err(malformed("table has no rows".into()));
    }
    if samples.iter().map(|s| s.area).sum::<f64>() <= 0.0 {
        return Err(malformed("total AREA_GEO is zero".into()));
    }
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn fixture_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("hypso-loader-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn extrema_rows_are_one_indexed() {
        let dir = fixture_dir("extrema");
        let path = dir.join("Minimum-Maximum.csv");
        fs::write(&path, "minimum,maximum\n100,900\n250,1250\n").unwrap();

        let table = ExtremaTable::load(&path).unwrap();
        assert_eq!(table.len(), 2);
        let first = table.row(1).unwrap();
        assert_eq!(first.minimum, 100.0);
        assert_eq!(first.maximum, 900.0);
        let second = table.row(2).unwrap();
        assert_eq!(second.minimum, 250.0);
    }

    #[test]
    fn extrema_missing_row_is_missing_data() {
        let dir = fixture_dir("extrema-short");
        let path = dir.join("Minimum-Maximum.csv");
        fs::write(&path, "minimum,maximum\n100,900\n").unwrap();

        let table = ExtremaTable::load(&path).unwrap();
        assert!(matches!(
            table.row(2),
            Err(HypsoError::MissingData { index: 2 })
        ));
        assert!(matches!(
            table.row(0),
            Err(HypsoError::MissingData { index: 0 })
        ));
    }

    #[test]
    fn table_short_of_the_batch_is_fatal_up_front() {
        let dir = fixture_dir("extrema-92");
        let path = dir.join("Minimum-Maximum.csv");
        let mut csv = String::from("minimum,maximum\n");
        for i in 1..=92 {
            csv.push_str(&format!("{},{}\n", 100 * i, 100 * i + 500));
        }
        fs::write(&path, csv).unwrap();

        let table = ExtremaTable::load(&path).unwrap();
        assert!(table.require_rows(92).is_ok());
        assert!(matches!(
            table.require_rows(93),
            Err(HypsoError::MissingData { index: 93 })
        ));
    }

    #[test]
    fn catchment_table_extra_columns_are_discarded() {
        let dir = fixture_dir("extra-cols");
        fs::write(
            dir.join("C001.csv"),
            "FID,ELEV,AREA_GEO,PERIMETER\n0,1000,10,99\n1,1250,20,99\n",
        )
        .unwrap();

        let samples = load_catchment_table(&dir, "C001").unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].elevation, 1000.0);
        assert_eq!(samples[1].area, 20.0);
    }

    #[test]
    fn missing_file_is_file_not_found() {
        let dir = fixture_dir("absent");
        assert!(matches!(
            load_catchment_table(&dir, "C042"),
            Err(HypsoError::FileNotFound { .. })
        ));
    }

    #[test]
    fn missing_required_column_is_malformed() {
        let dir = fixture_dir("no-area");
        fs::write(dir.join("C001.csv"), "ELEV,PERIMETER\n1000,99\n").unwrap();
        assert!(matches!(
            load_catchment_table(&dir, "C001"),
            Err(HypsoError::MalformedTable { .. })
        ));
    }

    #[test]
    fn negative_area_is_malformed() {
        let dir = fixture_dir("neg-area");
        fs::write(dir.join("C001.csv"), "ELEV,AREA_GEO\n1000,10\n1250,-5\n").unwrap();
        assert!(matches!(
            load_catchment_table(&dir, "C001"),
            Err(HypsoError::MalformedTable { .. })
        ));
    }

    #[test]
    fn zero_area_total_is_malformed() {
        let dir = fixture_dir("zero-area");
        fs::write(dir.join("C001.csv"), "ELEV,AREA_GEO\n1000,0\n1250,0\n").unwrap();
        assert!(matches!(
            load_catchment_table(&dir, "C001"),
            Err(HypsoError::MalformedTable { .. })
        ));
    }
}
