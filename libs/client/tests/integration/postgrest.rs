//! Table access tests.

use mockito::Matcher;
use serde::Deserialize;
use serde_json::json;

use crate::client_for;

#[derive(Debug, Deserialize)]
struct Todo {
    id: i64,
    title: String,
}

#[tokio::test]
async fn select_with_filters_builds_the_rest_query() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/rest/v1/todos")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("select".into(), "*".into()),
            Matcher::UrlEncoded("id".into(), "eq.1".into()),
        ]))
        .match_header("apikey", "k")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!([{ "id": 1, "title": "write tests" }]).to_string())
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server, "k");
    let todos: Vec<Todo> = client
        .table("todos")
        .select("*")
        .eq("id", 1)
        .execute()
        .await
        .expect("select");

    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].id, 1);
    assert_eq!(todos[0].title, "write tests");
    mock.assert_async().await;
}

#[tokio::test]
async fn insert_posts_rows_and_returns_the_representation() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/rest/v1/todos")
        .match_header("prefer", "return=representation")
        .match_body(Matcher::Json(json!({ "title": "ship it" })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(json!([{ "id": 7, "title": "ship it" }]).to_string())
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server, "k");
    let inserted = client
        .table("todos")
        .insert(json!({ "title": "ship it" }))
        .execute_json()
        .await
        .expect("insert");

    assert_eq!(inserted, json!([{ "id": 7, "title": "ship it" }]));
    mock.assert_async().await;
}

#[tokio::test]
async fn single_requests_an_object_response() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/rest/v1/todos")
        .match_query(Matcher::UrlEncoded("select".into(), "*".into()))
        .match_header("accept", "application/vnd.pgrst.object+json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "id": 1, "title": "only one" }).to_string())
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server, "k");
    let todo: Todo = client
        .table("todos")
        .select("*")
        .single()
        .execute()
        .await
        .expect("single select");

    assert_eq!(todo.title, "only one");
    mock.assert_async().await;
}

#[tokio::test]
async fn auth_overrides_the_bearer_credential_for_one_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/rest/v1/todos")
        .match_header("authorization", "Bearer user-jwt")
        .match_header("apikey", "k")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server, "k");
    let rows = client
        .table("todos")
        .select("*")
        .auth("user-jwt")
        .execute_json()
        .await
        .expect("select");

    assert_eq!(rows, json!([]));
    mock.assert_async().await;
}

#[tokio::test]
async fn update_patches_the_filtered_rows() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("PATCH", "/rest/v1/todos")
        .match_query(Matcher::UrlEncoded("id".into(), "eq.7".into()))
        .match_body(Matcher::Json(json!({ "title": "done" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!([{ "id": 7, "title": "done" }]).to_string())
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server, "k");
    let updated = client
        .table("todos")
        .update(json!({ "title": "done" }))
        .eq("id", 7)
        .execute_json()
        .await
        .expect("update");

    assert_eq!(updated[0]["title"], json!("done"));
    mock.assert_async().await;
}

#[tokio::test]
async fn delete_removes_the_filtered_rows() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("DELETE", "/rest/v1/todos")
        .match_query(Matcher::UrlEncoded("id".into(), "eq.7".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!([{ "id": 7, "title": "done" }]).to_string())
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server, "k");
    client
        .table("todos")
        .delete()
        .eq("id", 7)
        .execute_json()
        .await
        .expect("delete");

    mock.assert_async().await;
}
