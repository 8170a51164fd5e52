mod participation;
mod social;

use courtside_shared::social::{Gender, Role, SkillLevel, Status};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::store::{
    participation::ParticipationRow, player::PlayerRow, social::SocialRow, waitlist::WaitlistRow,
};

pub use participation::MyParticipation;

#[derive(Clone)]
pub struct Query(pub SqlitePool);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Social {
    pub id: String,
    pub host_id: String,
    pub venue_id: String,
    pub start_at: i64,
    pub end_at: i64,
    pub fee: i64,
    pub skill_level: SkillLevel,
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

impl Social {
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

    /// Slots configured for `gender` at creation.
    pub fn total(&self, gender: Gender) -> i64 {
        self.demand(gender) + self.current(gender)
    }
}

impl From<SocialRow> for Social {
    fn from(row: SocialRow) -> Self {
        Self {
            id: row.id,
            host_id: row.host_id,
            venue_id: row.venue_id,
            start_at: row.start_at,
            end_at: row.end_at,
            fee: row.fee,
            skill_level: row.skill_level.0,
            demand_female: row.demand_female,
            demand_male: row.demand_male,
            current_female: row.current_female,
            current_male: row.current_male,
            note: row.note,
            is_cancelled: row.is_cancelled,
            qr_code_generated: row.qr_code_generated,
            reminder_sent: row.reminder_sent,
            attendance_finalized: row.attendance_finalized,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistEntry {
    pub player_id: String,
    pub gender: Gender,
    pub joined_at: i64,
}

impl From<WaitlistRow> for WaitlistEntry {
    fn from(row: WaitlistRow) -> Self {
        Self {
            player_id: row.player_id,
            gender: row.gender.0,
            joined_at: row.joined_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialDetail {
    #[serde(flatten)]
    pub social: Social,
    pub waitlist: Vec<WaitlistEntry>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Participation {
    pub id: String,
    pub social_id: String,
    pub player_id: String,
    pub gender: Gender,
    pub status: Status,
    pub registered_at: i64,
    pub cancelled_at: Option<i64>,
    pub checked_in: bool,
    pub checked_in_at: Option<i64>,
    pub is_overridden: bool,
    pub overridden_at: Option<i64>,
    pub note: Option<String>,
    pub created_at: i64,
}

impl From<ParticipationRow> for Participation {
    fn from(row: ParticipationRow) -> Self {
        Self {
            id: row.id,
            social_id: row.social_id,
            player_id: row.player_id,
            gender: row.gender.0,
            status: row.status.0,
            registered_at: row.registered_at,
            cancelled_at: row.cancelled_at,
            checked_in: row.checked_in,
            checked_in_at: row.checked_in_at,
            is_overridden: row.is_overridden,
            overridden_at: row.overridden_at,
            note: row.note,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub gender: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub line_uid: Option<String>,
    pub role: Role,
    pub attended_count: i64,
    pub resolved_count: i64,
    pub attendance_rate: f64,
}

impl From<PlayerRow> for Player {
    fn from(row: PlayerRow) -> Self {
        Self {
            id: row.id,
            gender: row.gender,
            name: row.name,
            email: row.email,
            line_uid: row.line_uid,
            role: row.role.0,
            attended_count: row.attended_count,
            resolved_count: row.resolved_count,
            attendance_rate: row.attendance_rate,
        }
    }
}

impl Query {
    pub async fn find_player(&self, id: &str) -> courtside_shared::Result<Option<Player>> {
        Ok(crate::store::player::find(&self.0, id)
            .await?
            .map(Into::into))
    }
}
