use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use courtside::{
    AppState,
    config::{
        Config, DatabaseConfig, EmailConfig, JwtConfig, LineConfig, ObservabilityConfig,
        SchedulerConfig, ServerConfig, SocialConfig,
    },
    middleware::{Claims, generate_token},
};
use courtside_db::{Migrate, Plan};
use courtside_shared::social::Role;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

pub const SECRET: &str = "test_secret_key_minimum_32_characters_long";

pub fn config(path: &Path) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
        },
        database: DatabaseConfig {
            url: format!("sqlite:{}", path.to_str().unwrap()),
            max_connections: 4,
        },
        jwt: JwtConfig {
            secret: SECRET.to_string(),
        },
        email: EmailConfig::default(),
        line: LineConfig::default(),
        observability: ObservabilityConfig::default(),
        social: SocialConfig::default(),
        scheduler: SchedulerConfig {
            enabled: false,
            ..Default::default()
        },
    }
}

pub async fn setup_test_app(path: PathBuf) -> anyhow::Result<Router> {
    let config = config(&path);

    let write_db = courtside::create_write_pool(&config.database.url).await?;
    let mut conn = write_db.acquire().await?;
    courtside_db::migrator()?
        .run(&mut conn, &Plan::apply_all())
        .await?;
    drop(conn);

    let read_db = courtside::create_read_pool(&config.database.url, 4).await?;

    let command = courtside_social::Command::new(
        courtside_shared::State {
            read_db: read_db.clone(),
            write_db,
        },
        Arc::new(courtside_notification::LogNotifier),
        Arc::new(courtside_notification::SvgQrCode),
    )
    .with_policy(config.social.policy());

    Ok(courtside::router(AppState {
        config,
        command,
        query: courtside_social::Query(read_db.clone()),
        pool: read_db,
    }))
}

pub fn token(sub: &str, role: Role, gender: Option<&str>) -> String {
    generate_token(
        &Claims {
            sub: sub.to_owned(),
            role,
            gender: gender.map(str::to_owned),
            exp: 4_102_444_800,
        },
        SECRET,
    )
    .unwrap()
}

#[allow(dead_code)]
pub fn now() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> anyhow::Result<(u16, Value)> {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        req = req.header("authorization", format!("Bearer {token}"));
    }

    let req = match body {
        Some(body) => req
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))?,
        None => req.body(Body::empty())?,
    };

    let response: Response<Body> = app.clone().oneshot(req).await?;
    let status = response.status().as_u16();
    let bytes = response.into_body().collect().await?.to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };

    Ok((status, json))
}
