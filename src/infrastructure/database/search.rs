//! Case-insensitive name search, one strategy per SQL backend.
//!
//! The strategy is picked once from the connected backend and handed to
//! the store, so query code never branches on the database type.

use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, LikeExpr, SimpleExpr};
use sea_orm::DbBackend;

use super::entities::student;

const LIKE_ESCAPE: char = '\\';

pub trait NameSearch: Send + Sync {
    /// Condition matching rows whose name contains `needle`, ignoring case.
    fn contains(&self, needle: &str) -> SimpleExpr;
}

/// `name ILIKE '%needle%'`
pub struct PostgresNameSearch;

/// MySQL's default collations compare case-insensitively, so a plain
/// `LIKE` keeps the `name` column usable by indexes.
pub struct MySqlNameSearch;

/// `name_search LIKE lower('%needle%')`. Both sides are folded in Rust
/// so accented names compare the same way as in the in-memory store.
pub struct SqliteNameSearch;

impl NameSearch for PostgresNameSearch {
    fn contains(&self, needle: &str) -> SimpleExpr {
        Expr::col((student::Entity, student::Column::Name))
            .ilike(LikeExpr::new(contains_pattern(needle)).escape(LIKE_ESCAPE))
    }
}

impl NameSearch for MySqlNameSearch {
    fn contains(&self, needle: &str) -> SimpleExpr {
        Expr::col((student::Entity, student::Column::Name))
            .like(LikeExpr::new(contains_pattern(needle)).escape(LIKE_ESCAPE))
    }
}

impl NameSearch for SqliteNameSearch {
    fn contains(&self, needle: &str) -> SimpleExpr {
        Expr::col((student::Entity, student::Column::NameSearch))
            .like(LikeExpr::new(contains_pattern(&search_key(needle))).escape(LIKE_ESCAPE))
    }
}

/// Case-folded form of a name, stored in `students.name_search`.
pub fn search_key(name: &str) -> String {
    name.to_lowercase()
}

pub fn name_search_for(backend: DbBackend) -> Box<dyn NameSearch> {
    match backend {
        DbBackend::Postgres => Box::new(PostgresNameSearch),
        DbBackend::MySql => Box::new(MySqlNameSearch),
        DbBackend::Sqlite => Box::new(SqliteNameSearch),
    }
}

/// `%needle%` with LIKE metacharacters in `needle` matched literally.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if c == '%' || c == '_' || c == LIKE_ESCAPE {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
