use courtside_db::table::Player;
use courtside_shared::social::{Gender, Role};
use sea_query::{Expr, ExprTrait, OnConflict, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqliteConnection, prelude::FromRow, types::Text};

#[derive(Debug, Clone, FromRow)]
pub struct PlayerRow {
    pub id: String,
    pub gender: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub line_uid: Option<String>,
    pub role: Text<Role>,
    pub attended_count: i64,
    pub resolved_count: i64,
    pub attendance_rate: f64,
    pub created_at: i64,
}

pub(crate) struct PlayerProfile<'a> {
    pub id: &'a str,
    pub gender: Option<Gender>,
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub line_uid: Option<&'a str>,
    pub role: Role,
}

pub async fn find<'e, E: sqlx::SqliteExecutor<'e>>(
    executor: E,
    id: &str,
) -> courtside_shared::Result<Option<PlayerRow>> {
    let statement = Query::select()
        .columns([
            Player::Id,
            Player::Gender,
            Player::Name,
            Player::Email,
            Player::LineUid,
            Player::Role,
            Player::AttendedCount,
            Player::ResolvedCount,
            Player::AttendanceRate,
            Player::CreatedAt,
        ])
        .from(Player::Table)
        .and_where(Expr::col(Player::Id).eq(id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, PlayerRow, _>(&sql, values)
        .fetch_optional(executor)
        .await?)
}

/// Creates the attendance profile on first registration, keeping the
/// gender in sync with the identity provider afterwards.
pub(crate) async fn ensure(
    conn: &mut SqliteConnection,
    id: &str,
    gender: Gender,
    now: i64,
) -> courtside_shared::Result<()> {
    let statement = Query::insert()
        .into_table(Player::Table)
        .columns([Player::Id, Player::Gender, Player::CreatedAt])
        .values_panic([id.into(), gender.to_string().into(), now.into()])
        .on_conflict(
            OnConflict::column(Player::Id)
                .update_column(Player::Gender)
                .to_owned(),
        )
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(conn).await?;

    Ok(())
}

pub(crate) async fn upsert(
    conn: &mut SqliteConnection,
    profile: PlayerProfile<'_>,
    now: i64,
) -> courtside_shared::Result<()> {
    let statement = Query::insert()
        .into_table(Player::Table)
        .columns([
            Player::Id,
            Player::Gender,
            Player::Name,
            Player::Email,
            Player::LineUid,
            Player::Role,
            Player::CreatedAt,
        ])
        .values_panic([
            profile.id.into(),
            profile.gender.map(|g| g.to_string()).into(),
            profile.name.map(ToOwned::to_owned).into(),
            profile.email.map(ToOwned::to_owned).into(),
            profile.line_uid.map(ToOwned::to_owned).into(),
            profile.role.to_string().into(),
            now.into(),
        ])
        .on_conflict(
            OnConflict::column(Player::Id)
                .update_columns([
                    Player::Gender,
                    Player::Name,
                    Player::Email,
                    Player::LineUid,
                    Player::Role,
                ])
                .to_owned(),
        )
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(conn).await?;

    Ok(())
}

// SET expressions see pre-update values, so the rate uses the new counts
// spelled out explicitly.
async fn update_counters(
    conn: &mut SqliteConnection,
    id: &str,
    attended: i64,
    resolved: i64,
) -> courtside_shared::Result<()> {
    let rate = format!(
        "CASE WHEN resolved_count + {resolved} > 0 \
         THEN MIN(1.0, CAST(attended_count + {attended} AS REAL) / (resolved_count + {resolved})) \
         ELSE 0.0 END"
    );

    let statement = Query::update()
        .table(Player::Table)
        .values([
            (
                Player::AttendedCount,
                Expr::col(Player::AttendedCount).add(attended),
            ),
            (
                Player::ResolvedCount,
                Expr::col(Player::ResolvedCount).add(resolved),
            ),
            (Player::AttendanceRate, Expr::cust(rate)),
        ])
        .and_where(Expr::col(Player::Id).eq(id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let res = sqlx::query_with(&sql, values).execute(conn).await?;

    if res.rows_affected() != 1 {
        courtside_shared::not_found!("player");
    }

    Ok(())
}

/// Check-in: one more attended and one more resolved social.
pub(crate) async fn record_attended(
    conn: &mut SqliteConnection,
    id: &str,
) -> courtside_shared::Result<()> {
    update_counters(conn, id, 1, 1).await
}

/// No-show: one more resolved social.
pub(crate) async fn record_absent(
    conn: &mut SqliteConnection,
    id: &str,
) -> courtside_shared::Result<()> {
    update_counters(conn, id, 0, 1).await
}

/// Absence overturned by a host: the social was already counted as resolved.
pub(crate) async fn record_manual_attendance(
    conn: &mut SqliteConnection,
    id: &str,
) -> courtside_shared::Result<()> {
    update_counters(conn, id, 1, 0).await
}
