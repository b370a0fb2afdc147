mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn list_without_user_id_is_400() -> Result<()> {
    let server = common::start_server().await?;
    let client = common::client()?;

    let res = client.get(format!("{}/api/connections", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body, json!({ "error": "userId required" }));
    Ok(())
}

#[tokio::test]
async fn delete_without_id_is_400() -> Result<()> {
    let server = common::start_server().await?;
    let client = common::client()?;

    let res = client.delete(format!("{}/api/connections", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body, json!({ "error": "Connection ID required" }));
    Ok(())
}

#[tokio::test]
async fn unknown_action_is_400() -> Result<()> {
    let server = common::start_server().await?;
    let client = common::client()?;

    let res = client
        .post(format!("{}/api/connections/{}", server.base_url, uuid_like()))
        .json(&json!({ "action": "pause" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body, json!({ "error": "Unknown action" }));
    Ok(())
}

#[tokio::test]
async fn analytics_rejects_unknown_range() -> Result<()> {
    let server = common::start_server().await?;
    let client = common::client()?;

    let res = client
        .get(format!(
            "{}/api/analytics/summary?userId={}&range=1y",
            server.base_url,
            uuid_like()
        ))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body, json!({ "error": "Invalid range" }));
    Ok(())
}

fn uuid_like() -> &'static str {
    "2f1c7a3e-5b8d-4e61-9a0f-3c2b1d4e5f60"
}
