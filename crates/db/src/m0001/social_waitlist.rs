use sea_query::{ColumnDef, Table, TableCreateStatement, TableDropStatement};

use crate::table::SocialWaitlist;

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(SocialWaitlist::Table)
        .col(
            ColumnDef::new(SocialWaitlist::Seq)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(
            ColumnDef::new(SocialWaitlist::SocialId)
                .string()
                .not_null()
                .string_len(26),
        )
        .col(
            ColumnDef::new(SocialWaitlist::PlayerId)
                .string()
                .not_null()
                .string_len(26),
        )
        .col(
            ColumnDef::new(SocialWaitlist::Gender)
                .string()
                .not_null()
                .string_len(10),
        )
        .col(
            ColumnDef::new(SocialWaitlist::JoinedAt)
                .big_integer()
                .not_null(),
        )
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(SocialWaitlist::Table).to_owned()
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

/// One waitlist entry per player and social.
pub struct CreateUk1;

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateUk1 {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        sqlx::query(
            r#"CREATE UNIQUE INDEX "uk_social_waitlist_Tm3bQe" ON "social_waitlist" ("social_id", "player_id")"#,
        )
        .execute(connection)
        .await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        sqlx::query(r#"DROP INDEX "uk_social_waitlist_Tm3bQe""#)
            .execute(connection)
            .await?;

        Ok(())
    }
}

pub struct CreateIdx1;

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateIdx1 {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        sqlx::query(
            r#"CREATE INDEX "idx_social_waitlist_a7JvLc" ON "social_waitlist" ("social_id", "gender", "joined_at", "seq")"#,
        )
        .execute(connection)
        .await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        sqlx::query(r#"DROP INDEX "idx_social_waitlist_a7JvLc""#)
            .execute(connection)
            .await?;

        Ok(())
    }
}
