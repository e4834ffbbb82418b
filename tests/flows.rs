use std::collections::VecDeque;

use assist_api::{ApiConfig, AssistClient, Phrase, WorklogOutcome};
use jira_assist_lib::{
    render, Assistant, Config, FollowUp, KnownUser, PhraseBook, Prompter, Session, Submission,
    WorklogState,
};
use mockito::{Matcher, Server};
use serde_json::json;

struct ScriptedPrompter {
    answers: VecDeque<Option<String>>,
    questions: Vec<String>,
}

impl ScriptedPrompter {
    fn new(answers: &[Option<&str>]) -> Self {
        Self {
            answers: answers.iter().map(|answer| answer.map(str::to_string)).collect(),
            questions: Vec::new(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, question: &str, _default: Option<&str>) -> Option<String> {
        self.questions.push(question.to_string());
        self.answers.pop_front().flatten()
    }
}

fn assistant_for(server: &Server, config: Config) -> Assistant {
    let client = AssistClient::new(ApiConfig::new(server.url())).expect("client should build");
    Assistant::with_client(client, config)
}

fn session_with_query(query: &str) -> Session {
    let mut session = Session::default();
    session.set_query_text(query).expect("query is editable");
    session
}

fn single_entry_body() -> String {
    json!({
        "issueKey": "QA-959",
        "date": "2024-05-06",
        "timeSpent": "2h",
        "started": "2024-05-06T09:00:00.000+0300",
        "timeZone": "Europe/Kyiv"
    })
    .to_string()
}

#[tokio::test]
async fn worklog_preview_never_touches_search() {
    let mut server = Server::new_async().await;
    let worklog = server
        .mock("POST", "/api/worklog/command")
        .match_body(Matcher::Json(json!({
            "query": "QA-959 залогировать 2h",
            "dryRun": true,
            "comment": "Auto log",
            "durationText": "",
            "dateText": ""
        })))
        .with_status(200)
        .with_body(single_entry_body())
        .expect(1)
        .create_async()
        .await;
    let search = server
        .mock("POST", "/api/search")
        .expect(0)
        .create_async()
        .await;

    let assistant = assistant_for(&server, Config::default());
    let mut session = session_with_query("QA-959 залогировать 2h");
    session.set_jql("stale jql");
    let mut prompter = ScriptedPrompter::new(&[]);

    let submission = assistant
        .submit(&mut session, &mut prompter, true, false)
        .await
        .expect("submission succeeds");

    worklog.assert_async().await;
    search.assert_async().await;
    assert_eq!(submission.status_line(), "Preview ready");
    assert_eq!(session.jql(), "");
    let Submission::Worklog(run) = submission else {
        panic!("expected a worklog submission");
    };
    let outcome = run.outcome().expect("worklog completed");
    assert_eq!(outcome.issue_key(), "QA-959");
    assert!(render::worklog_report(outcome, true).contains("Time: 2h"));
    assert!(prompter.questions.is_empty());
}

#[tokio::test]
async fn unanswered_date_question_resubmits_with_today() {
    let mut server = Server::new_async().await;
    let question = server
        .mock("POST", "/api/worklog/command")
        .match_body(Matcher::PartialJson(json!({"dateText": ""})))
        .with_status(422)
        .with_body(json!({"question": "За какую дату?", "need": "date"}).to_string())
        .expect(1)
        .create_async()
        .await;
    let resubmit = server
        .mock("POST", "/api/worklog/command")
        .match_body(Matcher::PartialJson(json!({"dateText": "сегодня", "durationText": ""})))
        .with_status(200)
        .with_body(single_entry_body())
        .expect(1)
        .create_async()
        .await;

    let assistant = assistant_for(&server, Config::default());
    let mut session = session_with_query("QA-959 залогировать 2h");
    let mut prompter = ScriptedPrompter::new(&[None]);

    let submission = assistant
        .submit(&mut session, &mut prompter, false, false)
        .await
        .expect("submission succeeds");

    question.assert_async().await;
    resubmit.assert_async().await;
    assert_eq!(prompter.questions, vec!["За какую дату?".to_string()]);
    assert_eq!(submission.status_line(), "OK, worklog created");
}

#[tokio::test]
async fn declined_duration_question_aborts_after_one_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/worklog/command")
        .with_status(422)
        .with_body(json!({"question": "Сколько времени?", "need": "duration"}).to_string())
        .expect(1)
        .create_async()
        .await;

    let assistant = assistant_for(&server, Config::default());
    let mut session = session_with_query("QA-959 залогировать");
    let mut prompter = ScriptedPrompter::new(&[Some("   ")]);

    let submission = assistant
        .submit(&mut session, &mut prompter, false, false)
        .await
        .expect("submission succeeds");

    mock.assert_async().await;
    let Submission::Worklog(run) = submission else {
        panic!("expected a worklog submission");
    };
    assert_eq!(run.state, WorklogState::Aborted);
    assert_eq!(run.rounds, 1);
}

#[tokio::test]
async fn autofill_command_reports_plan() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/worklog/command")
        .match_body(Matcher::PartialJson(json!({
            "query": "QA-101 списывать время каждый рабочий день",
            "dryRun": false
        })))
        .with_status(200)
        .with_body(
            json!({
                "kind": "autofill",
                "autofill": {
                    "issueKey": "QA-101",
                    "from": "2024-05-01",
                    "to": "2024-05-03",
                    "timeZone": "Europe/Kyiv",
                    "created": 2,
                    "skipped": 1,
                    "days": [
                        {
                            "date": "2024-05-01", "weekday": "Wed", "timeSpent": "8h",
                            "started": "09:00", "action": "created", "worklogId": "501"
                        },
                        {
                            "date": "2024-05-02", "weekday": "Thu", "timeSpent": "8h",
                            "started": "09:00", "action": "created", "worklogId": "502"
                        },
                        {
                            "date": "2024-05-03", "weekday": "Fri", "timeSpent": "8h",
                            "started": "09:00", "action": "skipped", "reason": "already logged"
                        }
                    ]
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let assistant = assistant_for(&server, Config::default());
    let mut session = session_with_query("QA-101 списывать время каждый рабочий день");
    let mut prompter = ScriptedPrompter::new(&[]);

    let submission = assistant
        .submit(&mut session, &mut prompter, false, false)
        .await
        .expect("submission succeeds");

    assert_eq!(submission.status_line(), "OK, worklogs created");
    let Submission::Worklog(run) = submission else {
        panic!("expected a worklog submission");
    };
    let Some(WorklogOutcome::Autofill(plan)) = run.outcome() else {
        panic!("expected an autofill plan");
    };
    assert_eq!(plan.days.len(), 3);
    let report = render::worklog_report(run.outcome().expect("outcome"), false);
    assert!(report.contains("Mode: APPLY"));
    assert!(report.contains("2024-05-01 Wed — 8h @ 09:00 => created id=501"));
    assert_eq!(run.steps()[1].name, "Apply plan");
}

#[tokio::test]
async fn executed_search_updates_jql_and_history() {
    let mut server = Server::new_async().await;
    let projects = server
        .mock("GET", "/api/projects")
        .with_status(200)
        .with_body(
            json!([{"key": "QA", "name": "Quality"}, {"key": "CE", "name": "Core"}]).to_string(),
        )
        .expect(1)
        .create_async()
        .await;
    let search = server
        .mock("POST", "/api/search")
        .match_body(Matcher::Json(json!({
            "query": "open bugs",
            "jql": "",
            "sprintId": 0,
            "projects": ["QA", "CE"],
            "users": ["mw071175maj"],
            "dryRun": false,
            "analysis": true
        })))
        .with_status(200)
        .with_body(
            json!({
                "jql": "project in (QA, CE) AND type = Bug",
                "analysis": "Two crashes.",
                "total": 2,
                "historyId": "1715000000000"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let config = Config {
        users: vec![KnownUser {
            key: "mw071175maj".to_string(),
            name: "Oleksii".to_string(),
        }],
        ..Config::default()
    };
    let assistant = assistant_for(&server, config);
    let mut session = session_with_query("open bugs");
    let mut prompter = ScriptedPrompter::new(&[]);

    let submission = assistant
        .submit(&mut session, &mut prompter, false, true)
        .await
        .expect("search succeeds");

    projects.assert_async().await;
    search.assert_async().await;
    assert_eq!(submission.status_line(), "OK, executed");
    assert_eq!(session.jql(), "project in (QA, CE) AND type = Bug");
    assert_eq!(session.current_history_id(), Some("1715000000000"));

    let Submission::Search { response, .. } = submission else {
        panic!("expected a search submission");
    };
    let report = render::search_report(&response, false, assistant.config());
    assert!(report.starts_with(concat!(
        "JQL: project in (QA, CE) AND type = Bug\n\n",
        "Total: 2\n\n",
        "Analysis:\nTwo crashes.",
    )));
}

#[tokio::test]
async fn preview_search_keeps_history_untouched() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/search")
        .match_body(Matcher::PartialJson(json!({"dryRun": true, "projects": ["CE"]})))
        .with_status(200)
        .with_body(json!({"jql": "project = CE", "historyId": "1"}).to_string())
        .create_async()
        .await;

    let assistant = assistant_for(&server, Config::default());
    let mut session = session_with_query("задачи в CE");
    session.choose_project(Some("CE"));
    let mut prompter = ScriptedPrompter::new(&[]);

    let submission = assistant
        .submit(&mut session, &mut prompter, true, false)
        .await
        .expect("preview succeeds");

    assert_eq!(submission.status_line(), "Preview JQL ready");
    assert_eq!(session.jql(), "project = CE");
    assert_eq!(session.current_history_id(), None);
}

#[tokio::test]
async fn phrase_book_saves_and_reloads() {
    let mut server = Server::new_async().await;
    let list = server
        .mock("GET", "/api/phrases")
        .with_status(200)
        .with_body(json!(["open bugs"]).to_string())
        .expect(2)
        .create_async()
        .await;
    let save = server
        .mock("POST", "/api/phrases")
        .match_body(Matcher::Json(json!({
            "phrases": [
                {"text": "open bugs", "description": ""},
                {"text": "мои задачи", "description": "daily"}
            ]
        })))
        .with_status(200)
        .with_body(json!({"phrases": [{"text": "open bugs", "description": ""}]}).to_string())
        .expect(1)
        .create_async()
        .await;

    let assistant = assistant_for(&server, Config::default());
    let mut book = PhraseBook::load(assistant.client()).await;
    assert_eq!(book.len(), 1);
    assert!(book.apply_draft(" мои задачи ", "daily"));
    book.save(assistant.client()).await.expect("save succeeds");

    list.assert_async().await;
    save.assert_async().await;
    assert_eq!(book.len(), 1);
}

#[tokio::test]
async fn failed_phrase_load_blocks_saving() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/phrases")
        .with_status(503)
        .with_body(json!({"error": "store unavailable"}).to_string())
        .create_async()
        .await;
    let save = server
        .mock("POST", "/api/phrases")
        .expect(0)
        .create_async()
        .await;

    let assistant = assistant_for(&server, Config::default());
    let err = PhraseBook::try_load(assistant.client())
        .await
        .expect_err("load should fail");
    assert_eq!(err.to_string(), "store unavailable");
    assert!(PhraseBook::load(assistant.client()).await.is_empty());

    save.assert_async().await;
}

#[tokio::test]
async fn failed_reload_after_save_keeps_local_phrases() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/phrases")
        .with_status(200)
        .with_body(json!({"phrases": [{"text": "open bugs", "description": ""}]}).to_string())
        .create_async()
        .await;
    server
        .mock("GET", "/api/phrases")
        .with_status(503)
        .create_async()
        .await;

    let assistant = assistant_for(&server, Config::default());
    let mut book = PhraseBook::new(vec![Phrase::new("open bugs", "")]);

    assert!(book.save(assistant.client()).await.is_err());
    assert_eq!(book.len(), 1);
}

#[tokio::test]
async fn history_navigation_and_follow_up() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/history/42")
        .with_status(200)
        .with_body(
            json!({
                "id": "42",
                "query": "open bugs",
                "jql": "project = QA",
                "issues": [{"key": "QA-1", "title": "Crash", "url": "https://jira/browse/QA-1"}]
            })
            .to_string(),
        )
        .create_async()
        .await;
    let search = server
        .mock("POST", "/api/history/42/search")
        .match_body(Matcher::Json(json!({"query": "crash"})))
        .with_status(200)
        .with_body(json!({"matches": [{"key": "QA-1", "title": "Crash"}]}).to_string())
        .expect(1)
        .create_async()
        .await;
    let action = server
        .mock("POST", "/api/history/42/action")
        .match_body(Matcher::Json(json!({"command": "summarize"})))
        .with_status(500)
        .with_body(json!({"error": "llm unavailable"}).to_string())
        .expect(1)
        .create_async()
        .await;

    let assistant = assistant_for(&server, Config::default());
    let mut session = Session::default();

    assert_eq!(assistant.follow_up(&session, "summarize").await, FollowUp::NoHistory);

    let entry = assistant
        .open_history(&mut session, "42")
        .await
        .expect("entry loads");
    assert_eq!(session.current_history_id(), Some("42"));
    assert_eq!(render::history_detail(&entry), "open bugs\nJQL: project = QA\nЗадач: 1");

    assert_eq!(
        assistant.search_history(&session, "   ").await.expect("no request"),
        None
    );
    let matches = assistant
        .search_history(&session, " crash ")
        .await
        .expect("search succeeds")
        .expect("request was sent");
    assert_eq!(render::history_matches(&matches), "QA-1: Crash");

    assert_eq!(assistant.follow_up(&session, "  ").await, FollowUp::Skipped);
    let reply = assistant.follow_up(&session, " summarize ").await;
    assert_eq!(reply.message(), "Ошибка: llm unavailable");

    search.assert_async().await;
    action.assert_async().await;
}

#[tokio::test]
async fn project_choice_loads_limited_sprints() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/projects/CE/sprints")
        .match_query(Matcher::UrlEncoded("limit".into(), "5".into()))
        .with_status(200)
        .with_body(json!([{"id": 311, "name": "CE Sprint 14"}]).to_string())
        .create_async()
        .await;
    server
        .mock("GET", "/api/projects/QA/sprints")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let assistant = assistant_for(&server, Config::default());
    let mut session = Session::default();

    let sprints = assistant.choose_project(&mut session, Some("CE")).await;
    assert_eq!(sprints.len(), 1);
    session.select_sprint(sprints[0].id);

    let sprints = assistant.choose_project(&mut session, Some("QA")).await;
    assert!(sprints.is_empty());
    assert_eq!(session.sprint_id(), 0);
}
