// FICHIER : archimate-core/src/utils/fs.rs

use crate::utils::Result;
use chrono::Local;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Écriture atomique : fichier temporaire voisin puis renommage.
/// Un lecteur concurrent voit soit l'ancien contenu, soit le nouveau.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }

    let tmp_path = tmp_path_for(path);
    let write_result = (|| -> std::io::Result<()> {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(content)?;
        file.flush()?;
        file.sync_all()
    })();

    if let Err(e) = write_result {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    tracing::debug!("Écriture atomique terminée : {:?}", path);
    Ok(())
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.as_os_str().is_empty() && !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Renomme un fichier existant en `<nom>.<horodatage>.bak`.
/// Renvoie le chemin de sauvegarde, ou `None` si le fichier n'existait pas.
pub fn backup_existing(path: &Path) -> Result<Option<PathBuf>> {
    if !path.exists() {
        return Ok(None);
    }
    let stamp = Local::now().format("%Y%m%d_%H%M%S_%3f");
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string());
    let backup = path.with_file_name(format!("{}.{}.bak", file_name, stamp));

    fs::rename(path, &backup)?;
    tracing::info!("💾 Sauvegarde créée : {:?}", backup);
    Ok(Some(backup))
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", file_name))
}

// --- TESTS UNITAIRES ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_atomic_creates_parents_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("model.xml");

        write_atomic(&path, b"v1").unwrap();
        write_atomic(&path, b"v2").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "v2");
        assert!(!tmp_path_for(&path).exists());
    }

    #[test]
    fn test_backup_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.xml");

        assert!(backup_existing(&path).unwrap().is_none());

        fs::write(&path, "original").unwrap();
        let backup = backup_existing(&path).unwrap().expect("backup attendu");

        assert!(!path.exists());
        assert_eq!(fs::read_to_string(&backup).unwrap(), "original");
        let name = backup.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("model.xml.") && name.ends_with(".bak"));
    }
}
