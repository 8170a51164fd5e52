use courtside_db::table::SocialWaitlist;
use courtside_shared::social::Gender;
use sea_query::{Expr, ExprTrait, Order, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqliteConnection, prelude::FromRow, types::Text};

#[derive(Debug, Clone, FromRow)]
pub struct WaitlistRow {
    pub seq: i64,
    pub social_id: String,
    pub player_id: String,
    pub gender: Text<Gender>,
    pub joined_at: i64,
}

pub(crate) async fn push(
    conn: &mut SqliteConnection,
    social_id: &str,
    player_id: &str,
    gender: Gender,
    now: i64,
) -> courtside_shared::Result<()> {
    let statement = Query::insert()
        .into_table(SocialWaitlist::Table)
        .columns([
            SocialWaitlist::SocialId,
            SocialWaitlist::PlayerId,
            SocialWaitlist::Gender,
            SocialWaitlist::JoinedAt,
        ])
        .values_panic([
            social_id.into(),
            player_id.into(),
            gender.to_string().into(),
            now.into(),
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

/// Oldest entry for `gender`: lowest join time, then insertion order.
pub(crate) async fn oldest(
    conn: &mut SqliteConnection,
    social_id: &str,
    gender: Gender,
) -> courtside_shared::Result<Option<WaitlistRow>> {
    let statement = Query::select()
        .columns([
            SocialWaitlist::Seq,
            SocialWaitlist::SocialId,
            SocialWaitlist::PlayerId,
            SocialWaitlist::Gender,
            SocialWaitlist::JoinedAt,
        ])
        .from(SocialWaitlist::Table)
        .and_where(Expr::col(SocialWaitlist::SocialId).eq(social_id))
        .and_where(Expr::col(SocialWaitlist::Gender).eq(gender.to_string()))
        .order_by(SocialWaitlist::JoinedAt, Order::Asc)
        .order_by(SocialWaitlist::Seq, Order::Asc)
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, WaitlistRow, _>(&sql, values)
        .fetch_optional(conn)
        .await?)
}

pub async fn list<'e, E: sqlx::SqliteExecutor<'e>>(
    executor: E,
    social_id: &str,
) -> courtside_shared::Result<Vec<WaitlistRow>> {
    let statement = Query::select()
        .columns([
            SocialWaitlist::Seq,
            SocialWaitlist::SocialId,
            SocialWaitlist::PlayerId,
            SocialWaitlist::Gender,
            SocialWaitlist::JoinedAt,
        ])
        .from(SocialWaitlist::Table)
        .and_where(Expr::col(SocialWaitlist::SocialId).eq(social_id))
        .order_by(SocialWaitlist::JoinedAt, Order::Asc)
        .order_by(SocialWaitlist::Seq, Order::Asc)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, WaitlistRow, _>(&sql, values)
        .fetch_all(executor)
        .await?)
}

/// Removes the entry only if it is still present.
pub(crate) async fn remove(conn: &mut SqliteConnection, seq: i64) -> courtside_shared::Result<bool> {
    let statement = Query::delete()
        .from_table(SocialWaitlist::Table)
        .and_where(Expr::col(SocialWaitlist::Seq).eq(seq))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let res = sqlx::query_with(&sql, values).execute(conn).await?;

    Ok(res.rows_affected() == 1)
}

pub(crate) async fn remove_player(
    conn: &mut SqliteConnection,
    social_id: &str,
    player_id: &str,
) -> courtside_shared::Result<bool> {
    let statement = Query::delete()
        .from_table(SocialWaitlist::Table)
        .and_where(Expr::col(SocialWaitlist::SocialId).eq(social_id))
        .and_where(Expr::col(SocialWaitlist::PlayerId).eq(player_id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let res = sqlx::query_with(&sql, values).execute(conn).await?;

    Ok(res.rows_affected() == 1)
}
