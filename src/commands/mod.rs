//! Command implementations.
//!
//! CHANGELOG:
//! - 10/18/2026 - Config commands
//! - 10/18/2026 - Initial module structure

pub mod backup;
pub mod config;
pub mod maintenance;
pub mod setup;
pub mod substrates;
pub mod synonyms;
pub mod taxa;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::db::schema::init_schema;
    use crate::db::SqlHelper;
    use crate::output::OutputControls;

    /// Seeded in-memory database.
    pub fn seeded() -> SqlHelper {
        let helper = SqlHelper::open_in_memory().unwrap();
        init_schema(&helper).unwrap();
        helper
    }

    /// Compact JSON output, so tests don't print banners.
    pub fn quiet() -> OutputControls {
        OutputControls {
            json: true,
            compact: true,
            fields: None,
        }
    }
}
