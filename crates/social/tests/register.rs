use courtside_shared::{Metadata, social::Status};
use courtside_social::{Outcome, UpdateSocialInput};
use helpers::{HOUR, NOW};
use temp_dir::TempDir;

mod helpers;

#[tokio::test]
async fn test_register_admits_then_waitlists() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let host = helpers::host();
    let social_id = helpers::create_social(&state, &host, 2, 1, NOW + 48 * HOUR).await?;

    let first = state
        .command
        .register(&social_id, &helpers::female(), NOW)
        .await?;
    let second = state
        .command
        .register(&social_id, &helpers::female(), NOW + 1)
        .await?;
    let third = state
        .command
        .register(&social_id, &helpers::female(), NOW + 2)
        .await?;

    assert_eq!(first.outcome, Outcome::Admitted);
    assert_eq!(first.status, Status::Registered);
    assert_eq!(second.outcome, Outcome::Admitted);
    assert_eq!(third.outcome, Outcome::Waitlisted);
    assert_eq!(third.status, Status::Waitlisted);

    let detail = state.query.find_social(&social_id).await?.unwrap();
    assert_eq!(detail.social.demand_female, 0);
    assert_eq!(detail.social.current_female, 2);
    assert_eq!(detail.social.demand_male, 1);
    assert_eq!(detail.waitlist.len(), 1);
    assert_eq!(detail.waitlist[0].joined_at, NOW + 2);
    helpers::assert_conserved(&detail.social, 2, 1);

    Ok(())
}

#[tokio::test]
async fn test_quotas_are_per_gender() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let host = helpers::host();
    let social_id = helpers::create_social(&state, &host, 1, 1, NOW + 48 * HOUR).await?;

    state
        .command
        .register(&social_id, &helpers::female(), NOW)
        .await?;
    let waitlisted = state
        .command
        .register(&social_id, &helpers::female(), NOW)
        .await?;
    let male = state
        .command
        .register(&social_id, &helpers::male(), NOW)
        .await?;

    assert_eq!(waitlisted.outcome, Outcome::Waitlisted);
    assert_eq!(male.outcome, Outcome::Admitted);

    let social = helpers::load_social(&state, &social_id).await?;
    assert_eq!(social.current_male, 1);
    assert_eq!(social.demand_male, 0);

    Ok(())
}

#[tokio::test]
async fn test_concurrent_registrations_for_last_slot() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let host = helpers::host();
    let social_id = helpers::create_social(&state, &host, 1, 0, NOW + 48 * HOUR).await?;

    let a = helpers::female();
    let b = helpers::female();
    let (res_a, res_b) = futures::join!(
        state.command.register(&social_id, &a, NOW),
        state.command.register(&social_id, &b, NOW),
    );

    let mut outcomes = vec![res_a?.outcome, res_b?.outcome];
    outcomes.sort_by_key(|o| *o == Outcome::Waitlisted);
    assert_eq!(outcomes, vec![Outcome::Admitted, Outcome::Waitlisted]);

    let detail = state.query.find_social(&social_id).await?.unwrap();
    assert_eq!(detail.social.demand_female, 0);
    assert_eq!(detail.social.current_female, 1);
    assert_eq!(detail.waitlist.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_concurrent_registrations_conserve_quota() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let host = helpers::host();
    let social_id = helpers::create_social(&state, &host, 3, 2, NOW + 48 * HOUR).await?;

    let players: Vec<Metadata> = (0..12)
        .map(|i| {
            if i % 2 == 0 {
                helpers::female()
            } else {
                helpers::male()
            }
        })
        .collect();

    let results = futures::future::join_all(
        players
            .iter()
            .map(|player| state.command.register(&social_id, player, NOW)),
    )
    .await;

    let mut admitted = 0;
    let mut waitlisted = 0;
    for res in results {
        match res?.outcome {
            Outcome::Admitted => admitted += 1,
            Outcome::Waitlisted => waitlisted += 1,
        }
    }

    assert_eq!(admitted, 5);
    assert_eq!(waitlisted, 7);

    let detail = state.query.find_social(&social_id).await?.unwrap();
    helpers::assert_conserved(&detail.social, 3, 2);
    assert_eq!(detail.social.demand_female, 0);
    assert_eq!(detail.social.demand_male, 0);
    assert_eq!(detail.waitlist.len(), 7);

    Ok(())
}

#[tokio::test]
async fn test_register_twice_is_rejected() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let host = helpers::host();
    let social_id = helpers::create_social(&state, &host, 1, 0, NOW + 48 * HOUR).await?;

    let admitted = helpers::female();
    let waitlisted = helpers::female();
    state.command.register(&social_id, &admitted, NOW).await?;
    state.command.register(&social_id, &waitlisted, NOW).await?;

    let err = state
        .command
        .register(&social_id, &admitted, NOW)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "AlreadyRegistered");

    let err = state
        .command
        .register(&social_id, &waitlisted, NOW)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "AlreadyRegistered");

    let social = helpers::load_social(&state, &social_id).await?;
    helpers::assert_conserved(&social, 1, 0);
    assert_eq!(social.current_female, 1);

    Ok(())
}

#[tokio::test]
async fn test_register_again_after_cancelling() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let host = helpers::host();
    let social_id = helpers::create_social(&state, &host, 1, 0, NOW + 48 * HOUR).await?;

    let player = helpers::female();
    state.command.register(&social_id, &player, NOW).await?;
    state.command.cancel_own(&social_id, &player, NOW).await?;

    let again = state.command.register(&social_id, &player, NOW).await?;
    assert_eq!(again.outcome, Outcome::Admitted);

    let participants = state.query.list_social_participants(&social_id).await?;
    assert_eq!(participants.len(), 2);
    assert_eq!(
        participants
            .iter()
            .filter(|p| p.status == Status::Cancelled)
            .count(),
        1
    );

    Ok(())
}

#[tokio::test]
async fn test_register_rejects_ineligible_gender() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let host = helpers::host();
    let social_id = helpers::create_social(&state, &host, 1, 1, NOW + 48 * HOUR).await?;

    let unknown = Metadata::by_with_gender("01JABCDEFGHJKMNPQRSTVWXYZ0", "other");
    let err = state
        .command
        .register(&social_id, &unknown, NOW)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "IneligibleGender");

    let missing = Metadata::by("01JABCDEFGHJKMNPQRSTVWXYZ1");
    let err = state
        .command
        .register(&social_id, &missing, NOW)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "IneligibleGender");

    let localized = Metadata::by_with_gender("01JABCDEFGHJKMNPQRSTVWXYZ2", "女性");
    let registration = state.command.register(&social_id, &localized, NOW).await?;
    assert_eq!(registration.outcome, Outcome::Admitted);

    let social = helpers::load_social(&state, &social_id).await?;
    assert_eq!(social.current_female, 1);
    assert_eq!(social.current_male, 0);

    Ok(())
}

#[tokio::test]
async fn test_register_closed_socials() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let host = helpers::host();
    let start = NOW + 2 * HOUR;
    let social_id = helpers::create_social(&state, &host, 4, 4, start).await?;

    let err = state
        .command
        .register(&social_id, &helpers::female(), start)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "RegistrationClosed");

    state
        .command
        .update_social(
            &social_id,
            UpdateSocialInput {
                is_cancelled: Some(true),
                ..Default::default()
            },
            &host,
            NOW,
        )
        .await?;

    let err = state
        .command
        .register(&social_id, &helpers::female(), NOW)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "RegistrationClosed");

    Ok(())
}

#[tokio::test]
async fn test_register_identifiers() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;

    let err = state
        .command
        .register("not-a-social", &helpers::female(), NOW)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "InvalidIdentifier");

    let err = state
        .command
        .register(&ulid::Ulid::new().to_string(), &helpers::female(), NOW)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "NotFound");

    let err = state
        .command
        .register(&ulid::Ulid::new().to_string(), &Metadata::default(), NOW)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "NotAuthorized");

    Ok(())
}
