//! CSV batch conversion of eyeglass prescriptions to contact lenses.
//!
//! Input columns are `SPH`, `CY`, `AX`, `BV` and `ADD`. Header names are
//! matched case-insensitively and any column may be missing, in which case
//! the converter default applies. Output rows use the serialized lens keys.

use crate::converter::{convert_to_spheric_with, convert_to_toric_with};
use crate::{ContactLensInput, ConversionConfig, FieldValue, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{Read, Write};
use std::str::FromStr;

/// Which contact-lens design to convert to
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LensKind {
    Spheric,
    Toric,
}

impl fmt::Display for LensKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LensKind::Spheric => f.write_str("spheric"),
            LensKind::Toric => f.write_str("toric"),
        }
    }
}

impl FromStr for LensKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "spheric" | "spherical" => Ok(LensKind::Spheric),
            "toric" => Ok(LensKind::Toric),
            other => Err(format!("unknown lens kind: {}", other)),
        }
    }
}

impl LensKind {
    /// Output column names, in serialized field order
    pub fn headers(self) -> &'static [&'static str] {
        match self {
            LensKind::Spheric => &["SPH", "ADD", "AX", "BV", "Exact SPH"],
            LensKind::Toric => &["SPH", "CY", "AX", "ADD", "BV", "Exact SPH", "Exact CY"],
        }
    }
}

/// Counts reported after a batch run
#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq, Eq)]
pub struct BatchSummary {
    pub converted: usize,
    pub skipped: usize,
}

/// Column positions of the input fields, if present
struct Columns {
    sph: Option<usize>,
    cy: Option<usize>,
    ax: Option<usize>,
    bv: Option<usize>,
    add: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Self {
        let find = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
        Columns {
            sph: find("SPH"),
            cy: find("CY"),
            ax: find("AX"),
            bv: find("BV"),
            add: find("ADD"),
        }
    }

    fn input(&self, record: &csv::StringRecord) -> ContactLensInput {
        let get = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .map(|s| FieldValue::Text(s.to_string()))
        };
        ContactLensInput {
            sph: get(self.sph),
            cy: get(self.cy),
            ax: get(self.ax),
            bv: get(self.bv),
            add: get(self.add),
        }
    }
}

/// Convert every row of a prescription CSV and write the lens CSV
///
/// Rows that cannot be converted are logged and skipped. The header line
/// is always written, so an input with no convertible rows yields a
/// header-only CSV.
pub fn convert_csv<R: Read, W: Write>(
    reader: R,
    writer: W,
    kind: LensKind,
    config: &ConversionConfig,
) -> Result<BatchSummary> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    writer.write_record(kind.headers())?;

    let columns = Columns::from_headers(reader.headers()?);
    if columns.sph.is_none() {
        tracing::warn!("Input has no SPH column; every sphere defaults to zero");
    }

    let mut summary = BatchSummary::default();

    for record in reader.records() {
        let record = record?;
        let input = columns.input(&record);

        let written = match kind {
            LensKind::Spheric => {
                convert_to_spheric_with(&input, config).map(|lens| writer.serialize(lens))
            }
            LensKind::Toric => {
                convert_to_toric_with(&input, config).map(|lens| writer.serialize(lens))
            }
        };

        match written {
            Ok(result) => {
                result?;
                summary.converted += 1;
            }
            Err(e) => {
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                tracing::warn!("Skipping line {}: {}", line, e);
                summary.skipped += 1;
            }
        }
    }

    writer.flush()?;

    tracing::info!(
        "Converted {} rows to {} lenses ({} skipped)",
        summary.converted,
        kind,
        summary.skipped
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(input: &str, kind: LensKind) -> (BatchSummary, String) {
        let mut out = Vec::new();
        let summary =
            convert_csv(input.as_bytes(), &mut out, kind, &ConversionConfig::default()).unwrap();
        (summary, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_spheric_batch() {
        let (summary, out) = run("SPH,CY,AX,BV\n-7.00,-1.00,90,12\n-2.00,,,\n", LensKind::Spheric);

        assert_eq!(summary, BatchSummary { converted: 2, skipped: 0 });

        let mut reader = csv::Reader::from_reader(out.as_bytes());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec!["SPH", "ADD", "AX", "BV", "Exact SPH"]
        );

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(&rows[0][0], "-07.00");
        assert_eq!(&rows[0][4], "-06.88");
        assert_eq!(&rows[1][0], "-02.00");
    }

    #[test]
    fn test_toric_batch_with_lowercase_headers() {
        let (summary, out) = run("sph, cy, ax\n-5.00, -1.00, 90\n", LensKind::Toric);

        assert_eq!(summary.converted, 1);
        let mut reader = csv::Reader::from_reader(out.as_bytes());
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[0], "-04.75");
        assert_eq!(&row[1], "-01.00");
        assert_eq!(&row[2], "90");
    }

    #[test]
    fn test_bad_rows_are_skipped() {
        let (summary, out) = run("SPH,BV\nabc,12\n-1.00,12\n100,10\n", LensKind::Spheric);

        assert_eq!(summary, BatchSummary { converted: 1, skipped: 2 });
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn test_header_written_when_every_row_is_skipped() {
        let (summary, out) = run("SPH\nabc\n", LensKind::Spheric);
        assert_eq!(summary, BatchSummary { converted: 0, skipped: 1 });
        assert_eq!(out.trim_end(), "SPH,ADD,AX,BV,Exact SPH");

        let (summary, out) = run("SPH,CY,AX\n", LensKind::Toric);
        assert_eq!(summary, BatchSummary::default());
        assert_eq!(out.trim_end(), "SPH,CY,AX,ADD,BV,Exact SPH,Exact CY");
    }

    #[test]
    fn test_lens_kind_from_str() {
        assert_eq!("Toric".parse::<LensKind>(), Ok(LensKind::Toric));
        assert_eq!("spherical".parse::<LensKind>(), Ok(LensKind::Spheric));
        assert!("bifocal".parse::<LensKind>().is_err());
    }
}
