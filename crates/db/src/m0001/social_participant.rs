use sea_query::{ColumnDef, Table, TableCreateStatement, TableDropStatement};

use crate::table::SocialParticipant;

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(SocialParticipant::Table)
        .col(
            ColumnDef::new(SocialParticipant::Id)
                .string()
                .not_null()
                .string_len(26)
                .primary_key(),
        )
        .col(
            ColumnDef::new(SocialParticipant::SocialId)
                .string()
                .not_null()
                .string_len(26),
        )
        .col(
            ColumnDef::new(SocialParticipant::PlayerId)
                .string()
                .not_null()
                .string_len(26),
        )
        .col(
            ColumnDef::new(SocialParticipant::Gender)
                .string()
                .not_null()
                .string_len(10),
        )
        .col(
            ColumnDef::new(SocialParticipant::Status)
                .string()
                .not_null()
                .string_len(20),
        )
        .col(
            ColumnDef::new(SocialParticipant::RegisteredAt)
                .big_integer()
                .not_null(),
        )
        .col(ColumnDef::new(SocialParticipant::CancelledAt).big_integer())
        .col(
            ColumnDef::new(SocialParticipant::CheckedIn)
                .boolean()
                .not_null()
                .default(false),
        )
        .col(ColumnDef::new(SocialParticipant::CheckedInAt).big_integer())
        .col(
            ColumnDef::new(SocialParticipant::IsOverridden)
                .boolean()
                .not_null()
                .default(false),
        )
        .col(ColumnDef::new(SocialParticipant::OverriddenAt).big_integer())
        .col(
            ColumnDef::new(SocialParticipant::Note)
                .string()
                .string_len(100),
        )
        .col(
            ColumnDef::new(SocialParticipant::CreatedAt)
                .big_integer()
                .not_null(),
        )
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(SocialParticipant::Table).to_owned()
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

/// At most one non-cancelled participation per player and social.
pub struct CreateUk1;

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateUk1 {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        sqlx::query(
            r#"CREATE UNIQUE INDEX "uk_social_participant_Wq9dRs" ON "social_participant" ("social_id", "player_id") WHERE "status" != 'Cancelled'"#,
        )
        .execute(connection)
        .await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        sqlx::query(r#"DROP INDEX "uk_social_participant_Wq9dRs""#)
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
            r#"CREATE INDEX "idx_social_participant_Xe5uYk" ON "social_participant" ("player_id", "created_at")"#,
        )
        .execute(connection)
        .await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        sqlx::query(r#"DROP INDEX "idx_social_participant_Xe5uYk""#)
            .execute(connection)
            .await?;

        Ok(())
    }
}
