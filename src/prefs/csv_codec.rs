//! Codec CSV pour la table de preferences : colonnes `Data,Lekarz,Status,Przyczyna`.

use super::PreferenceTable;
use crate::model::{AbsenceReason, DoctorId, PrefStatus, PreferenceRecord};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use std::io::{Read, Write};

/// Charge une table de preferences depuis un flux CSV (colonne `Przyczyna`
/// facultative en tete, traitee comme vide si absente).
pub fn load_csv<R: Read>(reader: R) -> Result<PreferenceTable> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let mut records = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let date_str = rec.get(0).context("missing Data column")?.trim();
        let doctor = rec.get(1).context("missing Lekarz column")?.trim();
        let status_str = rec.get(2).context("missing Status column")?.trim();
        let reason_str = rec.get(3).map(str::trim).unwrap_or("");

        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .with_context(|| format!("invalid date: {date_str}"))?;
        let status: PrefStatus = status_str
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))
            .with_context(|| format!("invalid status: {status_str}"))?;
        let reason = if reason_str.is_empty() {
            None
        } else {
            Some(
                reason_str
                    .parse::<AbsenceReason>()
                    .map_err(|e| anyhow::anyhow!(e))
                    .with_context(|| format!("invalid reason: {reason_str}"))?,
            )
        };

        let record = PreferenceRecord::new(date, DoctorId::new(doctor), status, reason)
            .map_err(|e| anyhow::anyhow!(e))?;
        records.push(record);
    }
    Ok(PreferenceTable::new(records))
}

/// Serialise la table de preferences en CSV.
pub fn save_csv<W: Write>(writer: W, table: &PreferenceTable) -> Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_writer(writer);
    w.write_record(["Data", "Lekarz", "Status", "Przyczyna"])?;
    for r in table.records() {
        let reason = r.reason.map(|r| r.to_string()).unwrap_or_default();
        w.write_record([
            r.date.format("%Y-%m-%d").to_string(),
            r.doctor.as_str().to_string(),
            r.status.to_string(),
            reason,
        ])?;
    }
    w.flush()?;
    Ok(())
}
