//! Persistance de la table de preferences : lecture/ecriture atomique d'un
//! blob CSV unique. Modele "tout ou rien" : pas d'ecriture partielle
//! observable, pas de coordination entre ecrivains concurrents (dernier
//! ecrivain gagnant).

use crate::prefs::{load_csv, save_csv, PreferenceTable};
use anyhow::Context;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub trait PreferenceStore {
    /// Charge la table. Un echec de lecture renvoie une table vide : les
    /// engins doivent pouvoir produire un resultat (certes creux) malgre
    /// tout.
    fn load(&self) -> PreferenceTable;
    /// Sauvegarde de maniere atomique. Un echec doit remonter au caller.
    fn save(&self, table: &PreferenceTable) -> anyhow::Result<()>;
}

pub struct FileCsvStore {
    path: PathBuf,
}

impl FileCsvStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl PreferenceStore for FileCsvStore {
    fn load(&self) -> PreferenceTable {
        match fs::read(&self.path) {
            Ok(data) => load_csv(data.as_slice()).unwrap_or_default(),
            Err(_) => PreferenceTable::default(),
        }
    }

    fn save(&self, table: &PreferenceTable) -> anyhow::Result<()> {
        let mut buf = Vec::new();
        save_csv(&mut buf, table)?;
        let mut tmp = NamedTempFile::new_in(self.path.parent().unwrap_or_else(|| Path::new(".")))
            .with_context(|| "creating temp file")?;
        tmp.write_all(&buf)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DoctorId, PrefStatus, PreferenceRecord};
    use chrono::NaiveDate;

    #[test]
    fn missing_file_loads_as_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCsvStore::open(dir.path().join("does-not-exist.csv"));
        let table = store.load();
        assert!(table.records().is_empty());
    }

    #[test]
    fn save_then_load_is_a_fixed_point() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCsvStore::open(dir.path().join("prefs.csv"));
        let table = PreferenceTable::new(vec![PreferenceRecord::new(
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            DoctorId::new("Ihab"),
            PrefStatus::Available,
            None,
        )
        .unwrap()]);
        store.save(&table).unwrap();
        let reloaded = store.load();
        assert_eq!(reloaded.records(), table.records());
    }
}
