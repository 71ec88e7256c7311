//! Adds the case-folded `name_search` column used by SQLite name lookups

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

use crate::infrastructure::database::search::search_key;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Students::Table)
                    .add_column(
                        ColumnDef::new(Students::NameSearch)
                            .string_len(255)
                            .not_null()
                            .default(""),
                    )
                    .to_owned(),
            )
            .await?;

        // Backfill in Rust: SQL LOWER() does not fold non-ASCII letters on SQLite.
        let db = manager.get_connection();
        let backend = manager.get_database_backend();
        let select = Query::select()
            .columns([Students::Id, Students::Name])
            .from(Students::Table)
            .to_owned();

        for row in db.query_all(backend.build(&select)).await? {
            let id: String = row.try_get("", "id")?;
            let name: String = row.try_get("", "name")?;
            let update = Query::update()
                .table(Students::Table)
                .value(Students::NameSearch, search_key(&name))
                .and_where(Expr::col(Students::Id).eq(id))
                .to_owned();
            db.execute(backend.build(&update)).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Students::Table)
                    .drop_column(Students::NameSearch)
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
enum Students {
    Table,
    Id,
    Name,
    NameSearch,
}
