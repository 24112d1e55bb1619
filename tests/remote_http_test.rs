use std::time::Duration;

use exam_dashboard::models::ExamEntry;
use exam_dashboard::remote::{RemoteConfig, RemoteStore, RestRemoteStore};
use mockito::{Matcher, Server};
use serde_json::json;

fn store(base_url: String) -> RestRemoteStore {
    RestRemoteStore::new(RemoteConfig {
        base_url,
        api_key: "anon-key".to_string(),
        timeout: Duration::from_secs(5),
    })
    .expect("Failed to build remote store")
}

#[tokio::test]
async fn test_fetch_routine_maps_snake_case_rows() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/rest/v1/routine")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("select".into(), "*".into()),
            Matcher::UrlEncoded("order".into(), "id.asc".into()),
        ]))
        .match_header("apikey", "anon-key")
        .match_header("authorization", "Bearer anon-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([{
                "id": "1", "date": "21 April, 2026", "day": "Tuesday",
                "subject": "Quran Mazid", "subject_code": "101",
                "time": "10:00 AM", "timestamp": 1776744000000i64
            }])
            .to_string(),
        )
        .create_async()
        .await;

    let routine = store(server.url()).fetch_routine().await.expect("fetch failed");

    mock.assert_async().await;
    assert_eq!(routine.len(), 1);
    assert_eq!(routine[0].subject_code, "101");
    assert_eq!(routine[0].timestamp, 1_776_744_000_000);
}

#[tokio::test]
async fn test_replace_all_issues_delete_then_insert() {
    let mut server = Server::new_async().await;
    let delete = server
        .mock("DELETE", "/rest/v1/routine")
        .match_query(Matcher::UrlEncoded("id".into(), "neq.temp_id_non_existent".into()))
        .with_status(204)
        .create_async()
        .await;
    let insert = server
        .mock("POST", "/rest/v1/routine")
        .match_body(Matcher::Regex(r#"^\[\{"id":"7",.*"subject_code":"136""#.to_string()))
        .with_status(201)
        .create_async()
        .await;

    let remote = store(server.url());
    let entry = ExamEntry {
        id: "7".to_string(),
        date: "5 May, 2026".to_string(),
        day: "Tuesday".to_string(),
        subject: "English 1st Paper".to_string(),
        subject_code: "136".to_string(),
        time: "10:00 AM".to_string(),
        timestamp: 1_777_953_600_000,
    };

    remote.delete_all_routine().await.expect("delete failed");
    remote.insert_routine(&[entry]).await.expect("insert failed");

    delete.assert_async().await;
    insert.assert_async().await;
}

#[tokio::test]
async fn test_upsert_config_merges_duplicates() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/rest/v1/configs")
        .match_header("prefer", "resolution=merge-duplicates")
        .match_body(Matcher::Json(json!({
            "key": "targetDate",
            "value": "2026-04-21T10:00:00+06:00"
        })))
        .with_status(201)
        .create_async()
        .await;

    store(server.url())
        .upsert_config("targetDate", json!("2026-04-21T10:00:00+06:00"))
        .await
        .expect("upsert failed");

    mock.assert_async().await;
}

#[tokio::test]
async fn test_error_status_becomes_remote_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/rest/v1/configs")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let err = store(server.url())
        .fetch_configs()
        .await
        .expect_err("expected failure");

    let message = err.to_string();
    assert!(message.contains("fetch configs"));
    assert!(message.contains("500"));
    assert!(message.contains("boom"));
}
