use assist_api::{
    ApiConfig, ApiError, AssistClient, ClarificationNeed, Phrase, SearchRequest,
    WorklogCommandReply, WorklogCommandRequest, WorklogOutcome,
};
use mockito::{Matcher, Server};
use reqwest::StatusCode;
use serde_json::json;

fn client_for(server: &Server) -> AssistClient {
    AssistClient::new(ApiConfig::new(server.url())).expect("client should build")
}

fn worklog_request(duration: &str, date: &str) -> WorklogCommandRequest {
    WorklogCommandRequest {
        query: "QA-959 залогировать 2h".to_string(),
        dry_run: true,
        comment: "Auto log".to_string(),
        duration_text: duration.to_string(),
        date_text: date.to_string(),
    }
}

#[tokio::test]
async fn search_posts_request_and_decodes_response() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/search")
        .match_body(Matcher::PartialJson(json!({
            "query": "open bugs",
            "sprintId": 0,
            "projects": ["QA"],
            "dryRun": false,
            "analysis": true
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "jql": "project = QA AND type = Bug",
                "total": 2,
                "issues": [{"key": "QA-1", "title": "Crash", "url": "https://jira/browse/QA-1"}],
                "historyId": "1715000000000"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let request = SearchRequest {
        query: "open bugs".to_string(),
        projects: vec!["QA".to_string()],
        analysis: true,
        ..SearchRequest::default()
    };
    let response = client_for(&server).search(&request).await.expect("search succeeds");

    mock.assert_async().await;
    assert_eq!(response.jql, "project = QA AND type = Bug");
    assert_eq!(response.total, 2);
    assert_eq!(response.history_id.as_deref(), Some("1715000000000"));
}

#[tokio::test]
async fn search_error_surfaces_backend_message() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/search")
        .with_status(502)
        .with_body(json!({"error": "jira: timeout", "jql": "project = QA"}).to_string())
        .create_async()
        .await;

    let err = client_for(&server)
        .search(&SearchRequest::default())
        .await
        .expect_err("search should fail");

    assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));
    assert_eq!(err.to_string(), "jira: timeout");
}

#[tokio::test]
async fn worklog_422_with_question_is_a_clarification() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/worklog/command")
        .with_status(422)
        .with_body(
            json!({"question": "На какую дату?", "need": "date", "default": "вчера"}).to_string(),
        )
        .create_async()
        .await;

    let reply = client_for(&server)
        .worklog_command(&worklog_request("2h", ""))
        .await
        .expect("clarification is not an error");

    match reply {
        WorklogCommandReply::Clarification(request) => {
            assert_eq!(request.need(), ClarificationNeed::Date);
            assert_eq!(request.default.as_deref(), Some("вчера"));
        }
        other => panic!("expected clarification, got {other:?}"),
    }
}

#[tokio::test]
async fn worklog_422_without_question_is_an_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/worklog/command")
        .with_status(422)
        .with_body(json!({"error": "issue not found"}).to_string())
        .create_async()
        .await;

    let err = client_for(&server)
        .worklog_command(&worklog_request("", ""))
        .await
        .expect_err("plain 422 is terminal");

    assert_eq!(err.to_string(), "issue not found");
}

#[tokio::test]
async fn worklog_success_sends_all_fields() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/worklog/command")
        .match_body(Matcher::Json(json!({
            "query": "QA-959 залогировать 2h",
            "dryRun": true,
            "comment": "Auto log",
            "durationText": "2h",
            "dateText": "сегодня"
        })))
        .with_status(200)
        .with_body(
            json!({
                "issueKey": "QA-959",
                "date": "2024-05-06",
                "timeSpent": "2h",
                "started": "2024-05-06T09:00:00.000+0300",
                "timeZone": "Europe/Kyiv"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let reply = client_for(&server)
        .worklog_command(&worklog_request("2h", "сегодня"))
        .await
        .expect("worklog succeeds");

    mock.assert_async().await;
    match reply {
        WorklogCommandReply::Completed(WorklogOutcome::Single(entry)) => {
            assert_eq!(entry.issue_key, "QA-959");
            assert_eq!(entry.time_spent, "2h");
            assert!(entry.worklog_id.is_none());
        }
        other => panic!("expected single worklog, got {other:?}"),
    }
}

#[tokio::test]
async fn worklog_server_error_without_body_uses_status_text() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/worklog/command")
        .with_status(500)
        .with_body("panic: nil map")
        .create_async()
        .await;

    let err = client_for(&server)
        .worklog_command(&worklog_request("", ""))
        .await
        .expect_err("500 is terminal");

    assert_eq!(err.to_string(), "Internal Server Error");
}

#[tokio::test]
async fn legacy_phrase_list_is_upgraded() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/phrases")
        .with_status(200)
        .with_body(json!(["мои задачи", "баги QA"]).to_string())
        .create_async()
        .await;

    let phrases = client_for(&server).list_phrases().await.expect("phrases load");
    assert_eq!(
        phrases,
        vec![Phrase::new("мои задачи", ""), Phrase::new("баги QA", "")]
    );
}

#[tokio::test]
async fn save_phrases_wraps_list() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/phrases")
        .match_body(Matcher::Json(json!({
            "phrases": [{"text": "open bugs", "description": "QA"}]
        })))
        .with_status(200)
        .with_body(json!([{"text": "open bugs", "description": "QA"}]).to_string())
        .create_async()
        .await;

    let saved = client_for(&server)
        .save_phrases(&[Phrase::new("open bugs", "QA")])
        .await
        .expect("save succeeds");

    mock.assert_async().await;
    assert_eq!(saved, vec![Phrase::new("open bugs", "QA")]);
}

#[tokio::test]
async fn sprints_request_carries_limit() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/projects/CE/sprints")
        .match_query(Matcher::UrlEncoded("limit".into(), "5".into()))
        .with_status(200)
        .with_body(
            json!([{
                "id": 311,
                "name": "CE Sprint 14",
                "startDate": "2024-05-06T08:00:00Z",
                "endDate": "2024-05-20T08:00:00Z"
            }])
            .to_string(),
        )
        .create_async()
        .await;

    let sprints = client_for(&server).list_sprints("CE", 5).await.expect("sprints load");

    mock.assert_async().await;
    assert_eq!(sprints.len(), 1);
    assert_eq!(sprints[0].name, "CE Sprint 14");
}

#[tokio::test]
async fn myself_unauthorized_is_authentication_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/myself")
        .with_status(401)
        .with_body(json!({"error": "bad credentials"}).to_string())
        .create_async()
        .await;

    let err = client_for(&server).get_myself().await.expect_err("auth fails");
    assert!(matches!(err, ApiError::Authentication(ref message) if message == "bad credentials"));
}

#[tokio::test]
async fn history_search_and_action_round_trip() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/history/42/search")
        .match_body(Matcher::Json(json!({"query": "crash"})))
        .with_status(200)
        .with_body(
            json!({"entry": {"id": "42"}, "matches": [{"key": "QA-1", "title": "Crash", "url": "u"}]})
                .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("POST", "/api/history/42/action")
        .match_body(Matcher::Json(json!({"command": "summarize"})))
        .with_status(200)
        .with_body(json!({"result": "Two crashes in QA."}).to_string())
        .create_async()
        .await;

    let client = client_for(&server);
    let matches = client.search_history("42", "crash").await.expect("search succeeds");
    let answer = client.history_action("42", "summarize").await.expect("action succeeds");

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].key, "QA-1");
    assert_eq!(answer.as_deref(), Some("Two crashes in QA."));
}
