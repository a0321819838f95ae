use std::env;
use std::path::PathBuf;

/// Fixed id of the category every orphaned scan falls back to
pub const GENERAL_CATEGORY_ID: &str = "cat-general";

/// Display name of the fallback category, seeded by the initial migration
pub const GENERAL_CATEGORY_NAME: &str = "General";

/// Get the path to the Scansheet directory (~/.scansheet)
pub fn scansheet_dir() -> PathBuf {
    // HOME first so tests can redirect it
    if let Ok(home) = env::var("HOME") {
        PathBuf::from(home).join(".scansheet")
    } else {
        dirs::home_dir()
            .unwrap_or_else(env::temp_dir)
            .join(".scansheet")
    }
}

/// Get the path to the default database file (~/.scansheet/scansheet.db)
pub fn database_file() -> PathBuf {
    scansheet_dir().join("scansheet.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_file_lives_in_scansheet_dir() {
        let db = database_file();
        assert_eq!(db.parent().unwrap(), scansheet_dir());
        assert_eq!(db.file_name().unwrap(), "scansheet.db");
    }
}
