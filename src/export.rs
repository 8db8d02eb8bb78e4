use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::model::Category;

pub const EXPORT_FILE_NAME: &str = "categorias.csv";

/// Two-column CSV over the original, unfiltered dataset in source order.
/// The current filter never affects the export.
pub fn csv_document(categories: &[Category]) -> String {
    let mut out = String::from("Categoria,Favoritos\n");
    for c in categories {
        out.push_str(&c.name);
        out.push(',');
        out.push_str(&c.favorites.to_string());
        out.push('\n');
    }
    out
}

pub fn write_csv(categories: &[Category], path: &Path) -> Result<()> {
    fs::write(path, csv_document(categories))
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat(name: &str, favorites: u64) -> Category {
        Category {
            name: name.to_string(),
            favorites,
        }
    }

    #[test]
    fn document_preserves_source_order() {
        // Source order, not sorted order: Moda before Beleza.
        let data = vec![cat("Moda", 10), cat("Beleza", 30)];
        assert_eq!(csv_document(&data), "Categoria,Favoritos\nModa,10\nBeleza,30\n");
    }

    #[test]
    fn empty_dataset_exports_header_only() {
        assert_eq!(csv_document(&[]), "Categoria,Favoritos\n");
    }

    #[test]
    fn write_csv_round_trips() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join(EXPORT_FILE_NAME);
        let data = vec![cat("Casa", 30)];

        write_csv(&data, &path)?;
        assert_eq!(
            std::fs::read_to_string(&path)?,
            "Categoria,Favoritos\nCasa,30\n"
        );
        Ok(())
    }
}
