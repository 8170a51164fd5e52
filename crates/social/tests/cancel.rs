use courtside_shared::social::Status;
use helpers::{HOUR, NOW};
use temp_dir::TempDir;

mod helpers;

#[tokio::test]
async fn test_cancel_promotes_oldest_waitlisted() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let host = helpers::host();
    let social_id = helpers::create_social(&state, &host, 1, 0, NOW + 48 * HOUR).await?;

    let p = helpers::female();
    let q = helpers::female();
    helpers::sync_email(&state, &q, "q@courtside.localhost").await?;

    state.command.register(&social_id, &p, NOW).await?;
    let waiting = state.command.register(&social_id, &q, NOW + 1).await?;
    assert_eq!(waiting.status, Status::Waitlisted);

    let cancellation = state.command.cancel_own(&social_id, &p, NOW + 2).await?;
    assert_eq!(cancellation.previous_status, Status::Registered);

    let promotion = cancellation.promoted.expect("q should be promoted");
    assert_eq!(promotion.player_id, helpers::player_id(&q));
    assert_eq!(promotion.participation_id, waiting.participation_id);

    let participation = state
        .query
        .find_participation(&waiting.participation_id)
        .await?
        .unwrap();
    assert_eq!(participation.status, Status::Promoted);

    let detail = state.query.find_social(&social_id).await?.unwrap();
    assert_eq!(detail.social.demand_female, 0);
    assert_eq!(detail.social.current_female, 1);
    assert!(detail.waitlist.is_empty());

    assert_eq!(
        state.notifier.sent_to("q@courtside.localhost"),
        vec!["You're in!".to_owned()]
    );

    Ok(())
}

#[tokio::test]
async fn test_cancel_without_waitlist_frees_slot() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let host = helpers::host();
    let social_id = helpers::create_social(&state, &host, 2, 2, NOW + 48 * HOUR).await?;

    let player = helpers::male();
    let registration = state.command.register(&social_id, &player, NOW).await?;
    let cancellation = state
        .command
        .cancel(&social_id, &registration.participation_id, &player, NOW)
        .await?;

    assert!(cancellation.promoted.is_none());

    let social = helpers::load_social(&state, &social_id).await?;
    assert_eq!(social.demand_male, 2);
    assert_eq!(social.current_male, 0);

    let participation = state
        .query
        .find_participation(&registration.participation_id)
        .await?
        .unwrap();
    assert_eq!(participation.status, Status::Cancelled);
    assert_eq!(participation.cancelled_at, Some(NOW));

    Ok(())
}

#[tokio::test]
async fn test_cancel_waitlisted_leaves_quota_untouched() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let host = helpers::host();
    let social_id = helpers::create_social(&state, &host, 1, 0, NOW + 48 * HOUR).await?;

    state
        .command
        .register(&social_id, &helpers::female(), NOW)
        .await?;
    let waiting = helpers::female();
    state.command.register(&social_id, &waiting, NOW).await?;

    let cancellation = state.command.cancel_own(&social_id, &waiting, NOW).await?;
    assert_eq!(cancellation.previous_status, Status::Waitlisted);
    assert!(cancellation.promoted.is_none());

    let detail = state.query.find_social(&social_id).await?.unwrap();
    assert!(detail.waitlist.is_empty());
    assert_eq!(detail.social.current_female, 1);
    helpers::assert_conserved(&detail.social, 1, 0);

    Ok(())
}

#[tokio::test]
async fn test_cancel_respects_cutoff_for_players_only() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let host = helpers::host();
    let start = NOW + 48 * HOUR;
    let social_id = helpers::create_social(&state, &host, 2, 0, start).await?;

    let player = helpers::female();
    let registration = state.command.register(&social_id, &player, NOW).await?;

    let err = state
        .command
        .cancel_own(&social_id, &player, start - 6 * HOUR)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "OutsideCancellationWindow");

    // exactly at the cutoff is still allowed
    let other = helpers::female();
    state.command.register(&social_id, &other, NOW).await?;
    state
        .command
        .cancel_own(&social_id, &other, start - 12 * HOUR)
        .await?;

    let cancellation = state
        .command
        .cancel(
            &social_id,
            &registration.participation_id,
            &host,
            start - HOUR,
        )
        .await?;
    assert_eq!(cancellation.previous_status, Status::Registered);

    Ok(())
}

#[tokio::test]
async fn test_cancel_requires_owner_host_or_admin() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let host = helpers::host();
    let social_id = helpers::create_social(&state, &host, 2, 0, NOW + 48 * HOUR).await?;

    let first = state
        .command
        .register(&social_id, &helpers::female(), NOW)
        .await?;
    let second = state
        .command
        .register(&social_id, &helpers::female(), NOW)
        .await?;

    let err = state
        .command
        .cancel(
            &social_id,
            &first.participation_id,
            &helpers::female(),
            NOW,
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "NotAuthorized");

    state
        .command
        .cancel(&social_id, &second.participation_id, &helpers::admin(), NOW)
        .await?;

    let social = helpers::load_social(&state, &social_id).await?;
    assert_eq!(social.current_female, 1);

    Ok(())
}

#[tokio::test]
async fn test_cancel_twice_is_invalid() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let host = helpers::host();
    let social_id = helpers::create_social(&state, &host, 1, 0, NOW + 48 * HOUR).await?;

    let player = helpers::female();
    let registration = state.command.register(&social_id, &player, NOW).await?;
    state
        .command
        .cancel(&social_id, &registration.participation_id, &player, NOW)
        .await?;

    let err = state
        .command
        .cancel(&social_id, &registration.participation_id, &player, NOW)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "InvalidTransition");

    let err = state
        .command
        .cancel_own(&social_id, &player, NOW)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "NotRegistered");

    let social = helpers::load_social(&state, &social_id).await?;
    helpers::assert_conserved(&social, 1, 0);
    assert_eq!(social.demand_female, 1);

    Ok(())
}

#[tokio::test]
async fn test_cancel_unknown_participation() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let host = helpers::host();
    let social_id = helpers::create_social(&state, &host, 1, 0, NOW + 48 * HOUR).await?;
    let other_id = helpers::create_social(&state, &host, 1, 0, NOW + 48 * HOUR).await?;

    let player = helpers::female();
    let registration = state.command.register(&other_id, &player, NOW).await?;

    let err = state
        .command
        .cancel(&social_id, &registration.participation_id, &player, NOW)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "NotFound");

    let err = state
        .command
        .cancel(&social_id, "nope", &player, NOW)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "InvalidIdentifier");

    Ok(())
}

#[tokio::test]
async fn test_failed_notification_does_not_undo_cancel() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let host = helpers::host();
    let social_id = helpers::create_social(&state, &host, 1, 0, NOW + 48 * HOUR).await?;

    let p = helpers::female();
    let q = helpers::female();
    helpers::sync_email(&state, &q, "q@courtside.localhost").await?;
    state.command.register(&social_id, &p, NOW).await?;
    state.command.register(&social_id, &q, NOW).await?;

    state.notifier.fail(true);
    let cancellation = state.command.cancel_own(&social_id, &p, NOW).await?;
    assert!(cancellation.promoted.is_some());
    assert!(state.notifier.sent().is_empty());

    let social = helpers::load_social(&state, &social_id).await?;
    assert_eq!(social.current_female, 1);
    assert_eq!(social.demand_female, 0);

    Ok(())
}

#[tokio::test]
async fn test_promotion_notice_prefers_line_then_email() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let host = helpers::host();
    let social_id = helpers::create_social(&state, &host, 1, 0, NOW + 48 * HOUR).await?;

    let p = helpers::female();
    let q = helpers::female();
    let r = helpers::female();
    helpers::sync_contacts(&state, &q, Some("Uq"), "q@courtside.localhost").await?;
    helpers::sync_contacts(&state, &r, Some("Ur"), "r@courtside.localhost").await?;

    state.command.register(&social_id, &p, NOW).await?;
    state.command.register(&social_id, &q, NOW + 1).await?;
    state.command.register(&social_id, &r, NOW + 2).await?;

    state.command.cancel_own(&social_id, &p, NOW + 3).await?;
    assert_eq!(state.notifier.sent_to_line("Uq"), vec!["You're in!".to_owned()]);
    assert!(state.notifier.sent_to("q@courtside.localhost").is_empty());

    state.notifier.fail_line(true);
    state.command.cancel_own(&social_id, &q, NOW + 4).await?;
    assert!(state.notifier.sent_to_line("Ur").is_empty());
    assert_eq!(
        state.notifier.sent_to("r@courtside.localhost"),
        vec!["You're in!".to_owned()]
    );

    Ok(())
}
