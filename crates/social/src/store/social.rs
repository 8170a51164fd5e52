use courtside_db::table::Social;
use courtside_shared::social::{Gender, SkillLevel};
use sea_query::{Expr, ExprTrait, Order, Query, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqliteConnection, prelude::FromRow, types::Text};

#[derive(Debug, Clone, FromRow)]
pub struct SocialRow {
    pub id: String,
    pub host_id: String,
    pub venue_id: String,
    pub start_at: i64,
    pub end_at: i64,
    pub fee: i64,
    pub skill_level: Text<SkillLevel>,
    pub demand_female: i64,
    pub demand_male: i64,
    pub current_female: i64,
    pub current_male: i64,
    pub note: Option<String>,
    pub is_cancelled: bool,
    pub qr_code_generated: bool,
    pub reminder_sent: bool,
    pub attendance_finalized: bool,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

impl SocialRow {
    pub fn demand(&self, gender: Gender) -> i64 {
        match gender {
            Gender::Female => self.demand_female,
            Gender::Male => self.demand_male,
        }
    }

    pub fn current(&self, gender: Gender) -> i64 {
        match gender {
            Gender::Female => self.current_female,
            Gender::Male => self.current_male,
        }
    }
}

pub(crate) struct NewSocial<'a> {
    pub id: &'a str,
    pub host_id: &'a str,
    pub venue_id: &'a str,
    pub start_at: i64,
    pub end_at: i64,
    pub fee: i64,
    pub skill_level: SkillLevel,
    pub female_slots: i64,
    pub male_slots: i64,
    pub note: Option<&'a str>,
    pub created_at: i64,
}

fn demand_col(gender: Gender) -> Social {
    match gender {
        Gender::Female => Social::DemandFemale,
        Gender::Male => Social::DemandMale,
    }
}

fn current_col(gender: Gender) -> Social {
    match gender {
        Gender::Female => Social::CurrentFemale,
        Gender::Male => Social::CurrentMale,
    }
}

pub(crate) fn select() -> SelectStatement {
    Query::select()
        .columns([
            Social::Id,
            Social::HostId,
            Social::VenueId,
            Social::StartAt,
            Social::EndAt,
            Social::Fee,
            Social::SkillLevel,
            Social::DemandFemale,
            Social::DemandMale,
            Social::CurrentFemale,
            Social::CurrentMale,
            Social::Note,
            Social::IsCancelled,
            Social::QrCodeGenerated,
            Social::ReminderSent,
            Social::AttendanceFinalized,
            Social::CreatedAt,
            Social::UpdatedAt,
        ])
        .from(Social::Table)
        .to_owned()
}

pub async fn find<'e, E: sqlx::SqliteExecutor<'e>>(
    executor: E,
    id: &str,
) -> courtside_shared::Result<Option<SocialRow>> {
    let statement = select()
        .and_where(Expr::col(Social::Id).eq(id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, SocialRow, _>(&sql, values)
        .fetch_optional(executor)
        .await?)
}

pub(crate) async fn insert(
    conn: &mut SqliteConnection,
    social: NewSocial<'_>,
) -> courtside_shared::Result<()> {
    let statement = Query::insert()
        .into_table(Social::Table)
        .columns([
            Social::Id,
            Social::HostId,
            Social::VenueId,
            Social::StartAt,
            Social::EndAt,
            Social::Fee,
            Social::SkillLevel,
            Social::DemandFemale,
            Social::DemandMale,
            Social::CurrentFemale,
            Social::CurrentMale,
            Social::Note,
            Social::CreatedAt,
        ])
        .values_panic([
            social.id.into(),
            social.host_id.into(),
            social.venue_id.into(),
            social.start_at.into(),
            social.end_at.into(),
            social.fee.into(),
            social.skill_level.to_string().into(),
            social.female_slots.into(),
            social.male_slots.into(),
            0.into(),
            0.into(),
            social.note.map(ToOwned::to_owned).into(),
            social.created_at.into(),
        ])
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(conn).await?;

    Ok(())
}

/// Takes one slot for `gender` if any is left.
///
/// Compare-and-decrement: returns false without touching the row when the
/// quota is exhausted.
pub(crate) async fn admit(
    conn: &mut SqliteConnection,
    id: &str,
    gender: Gender,
    now: i64,
) -> courtside_shared::Result<bool> {
    let statement = Query::update()
        .table(Social::Table)
        .values([
            (demand_col(gender), Expr::col(demand_col(gender)).sub(1)),
            (current_col(gender), Expr::col(current_col(gender)).add(1)),
            (Social::UpdatedAt, now.into()),
        ])
        .and_where(Expr::col(Social::Id).eq(id))
        .and_where(Expr::col(demand_col(gender)).gt(0))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let res = sqlx::query_with(&sql, values).execute(conn).await?;

    Ok(res.rows_affected() == 1)
}

/// Gives one slot for `gender` back to the quota.
pub(crate) async fn release(
    conn: &mut SqliteConnection,
    id: &str,
    gender: Gender,
    now: i64,
) -> courtside_shared::Result<()> {
    let statement = Query::update()
        .table(Social::Table)
        .values([
            (demand_col(gender), Expr::col(demand_col(gender)).add(1)),
            (current_col(gender), Expr::col(current_col(gender)).sub(1)),
            (Social::UpdatedAt, now.into()),
        ])
        .and_where(Expr::col(Social::Id).eq(id))
        .and_where(Expr::col(current_col(gender)).gt(0))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let res = sqlx::query_with(&sql, values).execute(conn).await?;

    if res.rows_affected() != 1 {
        courtside_shared::bail!("no {gender} slot held in social {id}");
    }

    Ok(())
}

pub(crate) struct SocialChanges {
    pub start_at: i64,
    pub end_at: i64,
    pub fee: i64,
    pub skill_level: SkillLevel,
    pub note: Option<String>,
    pub is_cancelled: bool,
    /// Re-arms the reminder and QR sweeps for the new start time.
    pub rescheduled: bool,
}

pub(crate) async fn update(
    conn: &mut SqliteConnection,
    id: &str,
    changes: SocialChanges,
    now: i64,
) -> courtside_shared::Result<()> {
    let mut values: Vec<(Social, Expr)> = vec![
        (Social::StartAt, changes.start_at.into()),
        (Social::EndAt, changes.end_at.into()),
        (Social::Fee, changes.fee.into()),
        (Social::SkillLevel, changes.skill_level.to_string().into()),
        (Social::Note, changes.note.into()),
        (Social::IsCancelled, changes.is_cancelled.into()),
        (Social::UpdatedAt, now.into()),
    ];

    if changes.rescheduled {
        values.push((Social::ReminderSent, false.into()));
        values.push((Social::QrCodeGenerated, false.into()));
    }

    let statement = Query::update()
        .table(Social::Table)
        .values(values)
        .and_where(Expr::col(Social::Id).eq(id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(conn).await?;

    Ok(())
}

/// Sets a one-shot flag. Returns false when another caller set it first.
pub(crate) async fn claim_flag(
    conn: &mut SqliteConnection,
    id: &str,
    flag: Social,
    now: i64,
) -> courtside_shared::Result<bool> {
    let statement = Query::update()
        .table(Social::Table)
        .values([(flag.clone(), true.into()), (Social::UpdatedAt, now.into())])
        .and_where(Expr::col(Social::Id).eq(id))
        .and_where(Expr::col(flag).eq(false))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let res = sqlx::query_with(&sql, values).execute(conn).await?;

    Ok(res.rows_affected() == 1)
}

/// Socials whose check-in window closed before `cutoff` and are still open.
pub(crate) async fn due_for_finalize<'e, E: sqlx::SqliteExecutor<'e>>(
    executor: E,
    cutoff: i64,
) -> courtside_shared::Result<Vec<String>> {
    let statement = Query::select()
        .column(Social::Id)
        .from(Social::Table)
        .and_where(Expr::col(Social::AttendanceFinalized).eq(false))
        .and_where(Expr::col(Social::EndAt).lte(cutoff))
        .order_by(Social::EndAt, Order::Asc)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let rows = sqlx::query_as_with::<_, (String,), _>(&sql, values)
        .fetch_all(executor)
        .await?;

    Ok(rows.into_iter().map(|(id,)| id).collect())
}

/// Live socials starting in `(now, now + lead]` with `flag` still unset.
pub(crate) async fn starting_within<'e, E: sqlx::SqliteExecutor<'e>>(
    executor: E,
    now: i64,
    lead: i64,
    flag: Social,
) -> courtside_shared::Result<Vec<SocialRow>> {
    let statement = select()
        .and_where(Expr::col(Social::IsCancelled).eq(false))
        .and_where(Expr::col(flag).eq(false))
        .and_where(Expr::col(Social::StartAt).gt(now))
        .and_where(Expr::col(Social::StartAt).lte(now + lead))
        .order_by(Social::StartAt, Order::Asc)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, SocialRow, _>(&sql, values)
        .fetch_all(executor)
        .await?)
}
