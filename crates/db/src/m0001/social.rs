use sea_query::{ColumnDef, Table, TableCreateStatement, TableDropStatement};

use crate::table::Social;

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(Social::Table)
        .col(
            ColumnDef::new(Social::Id)
                .string()
                .not_null()
                .string_len(26)
                .primary_key(),
        )
        .col(
            ColumnDef::new(Social::HostId)
                .string()
                .not_null()
                .string_len(26),
        )
        .col(
            ColumnDef::new(Social::VenueId)
                .string()
                .not_null()
                .string_len(64),
        )
        .col(ColumnDef::new(Social::StartAt).big_integer().not_null())
        .col(ColumnDef::new(Social::EndAt).big_integer().not_null())
        .col(
            ColumnDef::new(Social::Fee)
                .big_integer()
                .not_null()
                .default(0),
        )
        .col(
            ColumnDef::new(Social::SkillLevel)
                .string()
                .not_null()
                .string_len(1),
        )
        .col(ColumnDef::new(Social::DemandFemale).integer().not_null())
        .col(ColumnDef::new(Social::DemandMale).integer().not_null())
        .col(
            ColumnDef::new(Social::CurrentFemale)
                .integer()
                .not_null()
                .default(0),
        )
        .col(
            ColumnDef::new(Social::CurrentMale)
                .integer()
                .not_null()
                .default(0),
        )
        .col(ColumnDef::new(Social::Note).string().string_len(100))
        .col(
            ColumnDef::new(Social::IsCancelled)
                .boolean()
                .not_null()
                .default(false),
        )
        .col(
            ColumnDef::new(Social::QrCodeGenerated)
                .boolean()
                .not_null()
                .default(false),
        )
        .col(
            ColumnDef::new(Social::ReminderSent)
                .boolean()
                .not_null()
                .default(false),
        )
        .col(
            ColumnDef::new(Social::AttendanceFinalized)
                .boolean()
                .not_null()
                .default(false),
        )
        .col(ColumnDef::new(Social::CreatedAt).big_integer().not_null())
        .col(ColumnDef::new(Social::UpdatedAt).big_integer())
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(Social::Table).to_owned()
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

/// Finalizer and reminder sweeps scan by time.
pub struct CreateIdx1;

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateIdx1 {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        sqlx::query(
            r#"CREATE INDEX "idx_social_k4Pz1q" ON "social" ("attendance_finalized", "end_at")"#,
        )
        .execute(connection)
        .await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        sqlx::query(r#"DROP INDEX "idx_social_k4Pz1q""#)
            .execute(connection)
            .await?;

        Ok(())
    }
}

pub struct CreateIdx2;

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateIdx2 {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        sqlx::query(r#"CREATE INDEX "idx_social_Hw82nB" ON "social" ("start_at")"#)
            .execute(connection)
            .await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        sqlx::query(r#"DROP INDEX "idx_social_Hw82nB""#)
            .execute(connection)
            .await?;

        Ok(())
    }
}
