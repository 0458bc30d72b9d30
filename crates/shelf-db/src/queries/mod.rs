//! Database query modules.

pub mod authors;
pub mod books;
pub mod carousels;
pub mod polls;
pub mod publishers;
pub mod tags;

use shelf_core::Error;

/// Map a failed write into the shared error type.
///
/// Uniqueness violations become [`Error::Conflict`] and dangling references
/// become [`Error::Validation`]; everything else is a database error.
pub(crate) fn write_error(entity: &str, key: &str, e: rusqlite::Error) -> Error {
    let msg = e.to_string();
    if msg.contains("UNIQUE constraint failed") {
        Error::Conflict(format!("{entity} '{key}' clashes with an existing record ({msg})"))
    } else if msg.contains("FOREIGN KEY constraint failed") {
        Error::Validation(format!("{entity} '{key}' references a record that does not exist"))
    } else {
        Error::database(msg)
    }
}

/// Collapse `QueryReturnedNoRows` into `None`.
pub(crate) fn optional<T>(result: rusqlite::Result<T>) -> shelf_core::Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}
