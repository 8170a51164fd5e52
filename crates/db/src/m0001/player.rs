use sea_query::{ColumnDef, Table, TableCreateStatement, TableDropStatement};

use crate::table::Player;

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(Player::Table)
        .col(
            ColumnDef::new(Player::Id)
                .string()
                .not_null()
                .string_len(26)
                .primary_key(),
        )
        .col(ColumnDef::new(Player::Gender).string().string_len(10))
        .col(ColumnDef::new(Player::Name).string().string_len(50))
        .col(ColumnDef::new(Player::Email).string().string_len(320))
        .col(ColumnDef::new(Player::LineUid).string().string_len(64))
        .col(
            ColumnDef::new(Player::Role)
                .string()
                .not_null()
                .string_len(15)
                .default("User"),
        )
        .col(
            ColumnDef::new(Player::AttendedCount)
                .integer()
                .not_null()
                .default(0),
        )
        .col(
            ColumnDef::new(Player::ResolvedCount)
                .integer()
                .not_null()
                .default(0),
        )
        .col(
            ColumnDef::new(Player::AttendanceRate)
                .double()
                .not_null()
                .default(0.0),
        )
        .col(ColumnDef::new(Player::CreatedAt).big_integer().not_null())
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(Player::Table).to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateTable {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}
