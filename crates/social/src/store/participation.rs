use courtside_db::table::SocialParticipant;
use courtside_shared::social::{Gender, Status};
use sea_query::{Expr, ExprTrait, Order, Query, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqliteConnection, prelude::FromRow, types::Text};

#[derive(Debug, Clone, FromRow)]
pub struct ParticipationRow {
    pub id: String,
    pub social_id: String,
    pub player_id: String,
    pub gender: Text<Gender>,
    pub status: Text<Status>,
    pub registered_at: i64,
    pub cancelled_at: Option<i64>,
    pub checked_in: bool,
    pub checked_in_at: Option<i64>,
    pub is_overridden: bool,
    pub overridden_at: Option<i64>,
    pub note: Option<String>,
    pub created_at: i64,
}

pub(crate) struct NewParticipation<'a> {
    pub id: &'a str,
    pub social_id: &'a str,
    pub player_id: &'a str,
    pub gender: Gender,
    pub status: Status,
    pub now: i64,
}

const ACTIVE: [Status; 3] = [Status::Registered, Status::Waitlisted, Status::Promoted];

pub(crate) fn select() -> SelectStatement {
    Query::select()
        .columns([
            (SocialParticipant::Table, SocialParticipant::Id),
            (SocialParticipant::Table, SocialParticipant::SocialId),
            (SocialParticipant::Table, SocialParticipant::PlayerId),
            (SocialParticipant::Table, SocialParticipant::Gender),
            (SocialParticipant::Table, SocialParticipant::Status),
            (SocialParticipant::Table, SocialParticipant::RegisteredAt),
            (SocialParticipant::Table, SocialParticipant::CancelledAt),
            (SocialParticipant::Table, SocialParticipant::CheckedIn),
            (SocialParticipant::Table, SocialParticipant::CheckedInAt),
            (SocialParticipant::Table, SocialParticipant::IsOverridden),
            (SocialParticipant::Table, SocialParticipant::OverriddenAt),
            (SocialParticipant::Table, SocialParticipant::Note),
            (SocialParticipant::Table, SocialParticipant::CreatedAt),
        ])
        .from(SocialParticipant::Table)
        .to_owned()
}

pub(crate) fn status_in(statuses: &[Status]) -> Expr {
    Expr::col((SocialParticipant::Table, SocialParticipant::Status))
        .is_in(statuses.iter().map(ToString::to_string))
}

pub async fn find<'e, E: sqlx::SqliteExecutor<'e>>(
    executor: E,
    id: &str,
) -> courtside_shared::Result<Option<ParticipationRow>> {
    let statement = select()
        .and_where(Expr::col(SocialParticipant::Id).eq(id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, ParticipationRow, _>(&sql, values)
        .fetch_optional(executor)
        .await?)
}

/// The player's registered, waitlisted or promoted participation, if any.
pub async fn find_active<'e, E: sqlx::SqliteExecutor<'e>>(
    executor: E,
    social_id: &str,
    player_id: &str,
) -> courtside_shared::Result<Option<ParticipationRow>> {
    let statement = select()
        .and_where(Expr::col(SocialParticipant::SocialId).eq(social_id))
        .and_where(Expr::col(SocialParticipant::PlayerId).eq(player_id))
        .and_where(status_in(&ACTIVE))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, ParticipationRow, _>(&sql, values)
        .fetch_optional(executor)
        .await?)
}

pub(crate) async fn list_by_status(
    conn: &mut SqliteConnection,
    social_id: &str,
    statuses: &[Status],
) -> courtside_shared::Result<Vec<ParticipationRow>> {
    let statement = select()
        .and_where(Expr::col(SocialParticipant::SocialId).eq(social_id))
        .and_where(status_in(statuses))
        .order_by(SocialParticipant::RegisteredAt, Order::Asc)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, ParticipationRow, _>(&sql, values)
        .fetch_all(conn)
        .await?)
}

pub(crate) async fn insert(
    conn: &mut SqliteConnection,
    participation: NewParticipation<'_>,
) -> courtside_shared::Result<()> {
    let statement = Query::insert()
        .into_table(SocialParticipant::Table)
        .columns([
            SocialParticipant::Id,
            SocialParticipant::SocialId,
            SocialParticipant::PlayerId,
            SocialParticipant::Gender,
            SocialParticipant::Status,
            SocialParticipant::RegisteredAt,
            SocialParticipant::CreatedAt,
        ])
        .values_panic([
            participation.id.into(),
            participation.social_id.into(),
            participation.player_id.into(),
            participation.gender.to_string().into(),
            participation.status.to_string().into(),
            participation.now.into(),
            participation.now.into(),
        ])
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    match sqlx::query_with(&sql, values).execute(conn).await {
        Ok(_) => Ok(()),
        Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
            Err(courtside_shared::Error::AlreadyRegistered)
        }
        Err(err) => Err(err.into()),
    }
}

/// Moves a participation from `from` to `to`, stamping the matching
/// timestamp. Returns false when the participation is no longer in `from`.
pub(crate) async fn transition(
    conn: &mut SqliteConnection,
    id: &str,
    from: Status,
    to: Status,
    now: i64,
) -> courtside_shared::Result<bool> {
    let to = from.transition(to)?;

    let mut statement = Query::update()
        .table(SocialParticipant::Table)
        .values([(SocialParticipant::Status, to.to_string().into())])
        .and_where(Expr::col(SocialParticipant::Id).eq(id))
        .and_where(Expr::col(SocialParticipant::Status).eq(from.to_string()))
        .to_owned();

    match to {
        Status::Cancelled => {
            statement.values([(SocialParticipant::CancelledAt, now.into())]);
        }
        Status::Attended => {
            statement.values([
                (SocialParticipant::CheckedIn, true.into()),
                (SocialParticipant::CheckedInAt, now.into()),
            ]);
        }
        Status::ManuallyAttended => {
            statement.values([
                (SocialParticipant::IsOverridden, true.into()),
                (SocialParticipant::OverriddenAt, now.into()),
            ]);
        }
        _ => {}
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let res = sqlx::query_with(&sql, values).execute(conn).await?;

    Ok(res.rows_affected() == 1)
}
