mod player;
mod social;
mod social_participant;
mod social_waitlist;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "courtside",
    "m0001",
    vec_box![],
    vec_box![
        social::CreateTable,
        social::CreateIdx1,
        social::CreateIdx2,
        social_waitlist::CreateTable,
        social_waitlist::CreateUk1,
        social_waitlist::CreateIdx1,
        social_participant::CreateTable,
        social_participant::CreateUk1,
        social_participant::CreateIdx1,
        player::CreateTable
    ]
);
