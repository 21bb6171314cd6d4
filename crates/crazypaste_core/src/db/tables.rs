//! redb table definitions shared by storage modules.

use redb::TableDefinition;

/// File name for the redb database within the configured DB directory.
pub const REDB_FILE_NAME: &str = "data.redb";

/// Whole-document records keyed by a fixed name (JSON text values).
pub const DOCUMENTS: TableDefinition<&str, &str> = TableDefinition::new("documents");

/// Key of the document holding every paste as one JSON array.
pub const PASTES_KEY: &str = "crazypaste-pastes";
