use courtside_db::table::Social as SocialTable;
use courtside_shared::social::TimeFilter;
use sea_query::{Expr, ExprTrait, Order, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;

use crate::store::{self, social::SocialRow};

use super::{Social, SocialDetail};

impl super::Query {
    pub async fn list_socials(
        &self,
        filter: TimeFilter,
        now: i64,
    ) -> courtside_shared::Result<Vec<Social>> {
        let mut statement = store::social::select();

        match filter {
            TimeFilter::Upcoming => {
                statement
                    .and_where(Expr::col(SocialTable::StartAt).gte(now))
                    .order_by(SocialTable::StartAt, Order::Asc);
            }
            TimeFilter::Past => {
                statement
                    .and_where(Expr::col(SocialTable::EndAt).lt(now))
                    .order_by(SocialTable::StartAt, Order::Desc);
            }
            TimeFilter::Available => {
                statement
                    .and_where(Expr::col(SocialTable::IsCancelled).eq(false))
                    .and_where(Expr::col(SocialTable::StartAt).gt(now))
                    .order_by(SocialTable::StartAt, Order::Asc);
            }
            TimeFilter::All => {
                statement.order_by(SocialTable::StartAt, Order::Desc);
            }
        }

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, SocialRow, _>(&sql, values)
            .fetch_all(&self.0)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn find_social(&self, id: &str) -> courtside_shared::Result<Option<SocialDetail>> {
        let Some(row) = store::social::find(&self.0, id).await? else {
            return Ok(None);
        };

        let waitlist = store::waitlist::list(&self.0, id)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(Some(SocialDetail {
            social: row.into(),
            waitlist,
        }))
    }
}
