//! Task, Bridgehub and Filehub clients against a wiremock server

mod common;

use kinetic_sdk::{Bridgehub, ConnectionConfig, Filehub, Task};
use serde_json::json;
use wiremock::matchers::{body_json, header, header_regex, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn component(server: &MockServer, context: &str) -> ConnectionConfig {
    ConnectionConfig::new(format!("{}/{context}", server.uri()), "admin", "secret")
}

const TREE_XML: &str = r#"<tree schema_version="1.0"><sourceName>Kinetic Request CE</sourceName><name>Submitted</name></tree>"#;

#[tokio::test]
async fn test_tree_title_is_one_encoded_segment() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(
            "/kinetic-task/app/api/v2/trees/Kinetic%20Request%20CE%20::%20Services%20::%20Submitted",
        ))
        .and(query_param("include", "treeJson"))
        .and(header("authorization", common::AUTHORIZATION))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "title": "Kinetic Request CE :: Services :: Submitted"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let task = Task::new(&component(&mock_server, "kinetic-task")).unwrap();
    let response = task
        .trees()
        .find(
            "Kinetic Request CE :: Services :: Submitted",
            &[("include", "treeJson")],
        )
        .await
        .unwrap();

    assert_eq!(response.status_code(), 200);
    assert_eq!(
        response.parsed_body().unwrap()["title"],
        "Kinetic Request CE :: Services :: Submitted"
    );
}

#[tokio::test]
async fn test_tree_import_uploads_xml() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/kinetic-task/app/api/v2/trees"))
        .and(query_param("force", "true"))
        .and(header_regex("content-type", r"^multipart/form-data; boundary=.+$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Imported"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let task = Task::new(&component(&mock_server, "kinetic-task")).unwrap();
    let response = task.trees().import(TREE_XML, true).await.unwrap();
    assert_eq!(response.status_code(), 200);

    let requests = mock_server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body).to_string();
    assert!(body.contains("name=\"content\""));
    assert!(body.contains("filename=\"tree.xml\""));
    assert!(body.to_lowercase().contains("content-type: application/xml"));
    assert!(body.contains(TREE_XML));
}

#[tokio::test]
async fn test_tree_export_returns_raw_xml() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/kinetic-task/app/api/v2/trees/Playground%20::%20Demo%20::%20Tree/export"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(TREE_XML, "application/xml"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let task = Task::new(&component(&mock_server, "kinetic-task")).unwrap();
    let response = task
        .trees()
        .export_xml("Playground :: Demo :: Tree")
        .await
        .unwrap();

    assert_eq!(response.raw_body(), TREE_XML);
    assert!(response.parsed_body().is_none());
    assert!(response.failure().is_none());
}

#[tokio::test]
async fn test_engine_start_and_stop() {
    let mock_server = MockServer::start().await;

    for action in ["start", "stop"] {
        Mock::given(method("POST"))
            .and(path("/kinetic-task/app/api/v2/engine"))
            .and(body_json(json!({"action": action})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": action})))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let engine = Task::new(&component(&mock_server, "kinetic-task"))
        .unwrap()
        .engine();
    assert_eq!(engine.start().await.unwrap().parsed_body().unwrap()["message"], "start");
    assert_eq!(engine.stop().await.unwrap().parsed_body().unwrap()["message"], "stop");
}

#[tokio::test]
async fn test_task_runs_and_handlers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/kinetic-task/app/api/v2/runs/1234"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1234})))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/kinetic-task/app/api/v2/handlers/smtp_email_send_v1"))
        .and(body_json(json!({"status": "Inactive"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "Inactive"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let task = Task::new(&component(&mock_server, "kinetic-task")).unwrap();
    let run = task.runs().find("1234", &[]).await.unwrap();
    assert_eq!(run.parsed_body().unwrap()["id"], 1234);

    let handler = task
        .handlers()
        .update("smtp_email_send_v1", json!({"status": "Inactive"}))
        .await
        .unwrap();
    assert!(handler.is_success());
}

#[tokio::test]
async fn test_bridgehub_access_keys() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/kinetic-bridgehub/app/manage-api/v1/bridges/active-directory/accessKeys"))
        .and(body_json(json!({"description": "Space access"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessKey": {"id": "key-1", "secret": "s3cr3t"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/kinetic-bridgehub/app/manage-api/v1/bridges/active-directory"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let bridgehub = Bridgehub::new(&component(&mock_server, "kinetic-bridgehub")).unwrap();
    let key = bridgehub
        .access_keys("active-directory")
        .add(json!({"description": "Space access"}))
        .await
        .unwrap();
    assert_eq!(key.parsed_body().unwrap()["accessKey"]["id"], "key-1");

    let deleted = bridgehub.bridges().delete("active-directory").await.unwrap();
    assert_eq!(deleted.status_code(), 200);
}

#[tokio::test]
async fn test_filehub_filestores() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/kinetic-filehub/app/api/v1/filestores"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "filestores": [{"slug": "acme"}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/kinetic-filehub/app/api/v1/filestores/acme/accessKeys/key-1"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "not found"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let filehub = Filehub::new(&component(&mock_server, "kinetic-filehub")).unwrap();
    let stores = filehub.filestores().find_all(&[]).await.unwrap();
    assert_eq!(stores.parsed_body().unwrap()["filestores"][0]["slug"], "acme");

    let key = filehub.access_keys("acme").find("key-1", &[]).await.unwrap();
    assert_eq!(key.status_code(), 404);
    assert_eq!(key.parsed_body().unwrap()["error"], "not found");
}
