use courtside_db::table::{Social as SocialTable, SocialParticipant};
use courtside_shared::{
    Metadata,
    social::{Status, TimeFilter},
};
use sea_query::{Expr, ExprTrait, Order, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::prelude::FromRow;

use crate::store::{self, participation::ParticipationRow};

use super::Participation;

#[derive(Debug, FromRow)]
struct MyParticipationRow {
    #[sqlx(flatten)]
    participation: ParticipationRow,
    venue_id: String,
    start_at: i64,
    end_at: i64,
    is_cancelled: bool,
}

/// A participation joined with the schedule of its social.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MyParticipation {
    #[serde(flatten)]
    pub participation: Participation,
    pub venue_id: String,
    pub start_at: i64,
    pub end_at: i64,
    pub social_cancelled: bool,
}

impl From<MyParticipationRow> for MyParticipation {
    fn from(row: MyParticipationRow) -> Self {
        Self {
            participation: row.participation.into(),
            venue_id: row.venue_id,
            start_at: row.start_at,
            end_at: row.end_at,
            social_cancelled: row.is_cancelled,
        }
    }
}

impl super::Query {
    pub async fn list_my_participations(
        &self,
        player_id: &str,
        status: Option<Status>,
        time: TimeFilter,
        now: i64,
    ) -> courtside_shared::Result<Vec<MyParticipation>> {
        let mut statement = store::participation::select()
            .columns([
                (SocialTable::Table, SocialTable::VenueId),
                (SocialTable::Table, SocialTable::StartAt),
                (SocialTable::Table, SocialTable::EndAt),
                (SocialTable::Table, SocialTable::IsCancelled),
            ])
            .inner_join(
                SocialTable::Table,
                Expr::col((SocialTable::Table, SocialTable::Id))
                    .equals((SocialParticipant::Table, SocialParticipant::SocialId)),
            )
            .and_where(
                Expr::col((SocialParticipant::Table, SocialParticipant::PlayerId)).eq(player_id),
            )
            .to_owned();

        if let Some(status) = status {
            statement.and_where(store::participation::status_in(&[status]));
        }

        match time {
            TimeFilter::Upcoming => {
                statement
                    .and_where(Expr::col((SocialTable::Table, SocialTable::StartAt)).gte(now))
                    .order_by((SocialTable::Table, SocialTable::StartAt), Order::Asc);
            }
            TimeFilter::Past => {
                statement
                    .and_where(Expr::col((SocialTable::Table, SocialTable::EndAt)).lt(now))
                    .order_by((SocialTable::Table, SocialTable::StartAt), Order::Desc);
            }
            TimeFilter::Available => {
                statement
                    .and_where(Expr::col((SocialTable::Table, SocialTable::IsCancelled)).eq(false))
                    .and_where(Expr::col((SocialTable::Table, SocialTable::StartAt)).gt(now))
                    .order_by((SocialTable::Table, SocialTable::StartAt), Order::Asc);
            }
            TimeFilter::All => {
                statement.order_by((SocialTable::Table, SocialTable::StartAt), Order::Desc);
            }
        }

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, MyParticipationRow, _>(&sql, values)
            .fetch_all(&self.0)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn list_social_participants(
        &self,
        social_id: &str,
    ) -> courtside_shared::Result<Vec<Participation>> {
        if store::social::find(&self.0, social_id).await?.is_none() {
            courtside_shared::not_found!("social");
        }

        let statement = store::participation::select()
            .and_where(Expr::col(SocialParticipant::SocialId).eq(social_id))
            .order_by(SocialParticipant::RegisteredAt, Order::Asc)
            .order_by(SocialParticipant::Id, Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, ParticipationRow, _>(&sql, values)
            .fetch_all(&self.0)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Every participation of a player, newest first. Admin only.
    pub async fn admin_list_participations(
        &self,
        player_id: &str,
        metadata: &Metadata,
    ) -> courtside_shared::Result<Vec<Participation>> {
        if !metadata.is_admin() {
            return Err(courtside_shared::Error::NotAuthorized);
        }

        if store::player::find(&self.0, player_id).await?.is_none() {
            courtside_shared::not_found!("player");
        }

        let statement = store::participation::select()
            .and_where(Expr::col(SocialParticipant::PlayerId).eq(player_id))
            .order_by(SocialParticipant::CreatedAt, Order::Desc)
            .order_by(SocialParticipant::Id, Order::Desc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, ParticipationRow, _>(&sql, values)
            .fetch_all(&self.0)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn find_participation(
        &self,
        id: &str,
    ) -> courtside_shared::Result<Option<Participation>> {
        Ok(store::participation::find(&self.0, id)
            .await?
            .map(Into::into))
    }
}
