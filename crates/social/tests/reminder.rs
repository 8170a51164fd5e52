use courtside_social::UpdateSocialInput;
use helpers::{HOUR, NOW};
use temp_dir::TempDir;

mod helpers;

#[tokio::test]
async fn test_reminders_reach_participants_and_host_once() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let host = helpers::host();
    helpers::sync_email(&state, &host, "host@courtside.localhost").await?;

    let start = NOW + 20 * HOUR;
    let social_id = helpers::create_social(&state, &host, 1, 0, start).await?;
    let far_id = helpers::create_social(&state, &host, 1, 0, NOW + 30 * HOUR).await?;

    let admitted = helpers::female();
    let waiting = helpers::female();
    helpers::sync_email(&state, &admitted, "admitted@courtside.localhost").await?;
    helpers::sync_email(&state, &waiting, "waiting@courtside.localhost").await?;
    state.command.register(&social_id, &admitted, NOW).await?;
    state.command.register(&social_id, &waiting, NOW).await?;

    let report = state.command.remind_upcoming(NOW).await?;
    assert_eq!(report.processed, vec![social_id.clone()]);
    assert!(report.failed.is_empty());

    assert_eq!(
        state.notifier.sent_to("admitted@courtside.localhost"),
        vec!["Your social starts soon".to_owned()]
    );
    assert!(
        state
            .notifier
            .sent_to("waiting@courtside.localhost")
            .is_empty()
    );
    assert_eq!(
        state.notifier.sent_to("host@courtside.localhost"),
        vec!["Your hosted social starts soon".to_owned()]
    );

    let report = state.command.remind_upcoming(NOW + HOUR).await?;
    assert!(report.processed.is_empty());

    let social = helpers::load_social(&state, &social_id).await?;
    assert!(social.reminder_sent);
    let far = helpers::load_social(&state, &far_id).await?;
    assert!(!far.reminder_sent);

    Ok(())
}

#[tokio::test]
async fn test_reminders_skip_cancelled_socials() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let host = helpers::host();
    let social_id = helpers::create_social(&state, &host, 1, 0, NOW + 20 * HOUR).await?;

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

    let report = state.command.remind_upcoming(NOW).await?;
    assert!(report.processed.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_checkin_codes_sent_to_host_before_start() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let host = helpers::host();
    helpers::sync_email(&state, &host, "host@courtside.localhost").await?;

    let start = NOW + 3 * HOUR;
    let social_id = helpers::create_social(&state, &host, 1, 0, start).await?;

    let report = state.command.generate_checkin_codes(NOW).await?;
    assert!(report.processed.is_empty());

    let report = state
        .command
        .generate_checkin_codes(start - 30 * 60)
        .await?;
    assert_eq!(report.processed, vec![social_id.clone()]);

    let sent = state.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].1, "Check-in code ready");
    assert!(
        sent[0]
            .2
            .contains(&format!("https://courtside.localhost/socials/{social_id}/checkin"))
    );

    let report = state
        .command
        .generate_checkin_codes(start - 10 * 60)
        .await?;
    assert!(report.processed.is_empty());

    let social = helpers::load_social(&state, &social_id).await?;
    assert!(social.qr_code_generated);

    Ok(())
}

#[tokio::test]
async fn test_checkin_qr_code_for_host_and_admin() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let host = helpers::host();
    let social_id = helpers::create_social(&state, &host, 1, 0, NOW + 48 * HOUR).await?;

    let code = state
        .command
        .checkin_qr_code(&social_id, &host, NOW)
        .await?;
    let url = format!("https://courtside.localhost/socials/{social_id}/checkin");
    assert_eq!(code.url, url);
    assert_eq!(code.qr_code, format!("qr:{url}"));

    let social = helpers::load_social(&state, &social_id).await?;
    assert!(social.qr_code_generated);

    let again = state
        .command
        .checkin_qr_code(&social_id, &helpers::admin(), NOW)
        .await?;
    assert_eq!(again.url, url);

    let err = state
        .command
        .checkin_qr_code(&social_id, &helpers::female(), NOW)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "NotAuthorized");

    Ok(())
}

#[tokio::test]
async fn test_rescheduling_rearms_sweeps() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let host = helpers::host();
    helpers::sync_email(&state, &host, "host@courtside.localhost").await?;

    let start = NOW + HOUR / 2;
    let social_id = helpers::create_social(&state, &host, 1, 0, start).await?;

    state.command.remind_upcoming(NOW).await?;
    state.command.generate_checkin_codes(NOW).await?;

    state
        .command
        .update_social(
            &social_id,
            UpdateSocialInput {
                fee: Some(100),
                ..Default::default()
            },
            &host,
            NOW,
        )
        .await?;

    let social = helpers::load_social(&state, &social_id).await?;
    assert!(social.reminder_sent);
    assert!(social.qr_code_generated);

    let new_start = NOW + 20 * HOUR;
    state
        .command
        .update_social(
            &social_id,
            UpdateSocialInput {
                start_at: Some(new_start),
                end_at: Some(new_start + 2 * HOUR),
                ..Default::default()
            },
            &host,
            NOW,
        )
        .await?;

    let social = helpers::load_social(&state, &social_id).await?;
    assert!(!social.reminder_sent);
    assert!(!social.qr_code_generated);

    let report = state.command.remind_upcoming(NOW).await?;
    assert_eq!(report.processed, vec![social_id.clone()]);
    assert_eq!(
        state.notifier.sent_to("host@courtside.localhost"),
        vec![
            "Your hosted social starts soon".to_owned(),
            "Check-in code ready".to_owned(),
            "Your hosted social starts soon".to_owned(),
        ]
    );

    let report = state.command.generate_checkin_codes(new_start - HOUR / 2).await?;
    assert_eq!(report.processed, vec![social_id]);

    Ok(())
}
