//! Plain-text reports for searches, worklog results, step traces and history.

use assist_api::{
    AutofillPlan, HistoryEntry, HistoryMatch, HistorySummary, IssueLink, Project, SearchResponse,
    SingleWorklog, Sprint, Step, WorklogOutcome,
};
use chrono::{DateTime, Local};
use serde_json::Value;

use crate::config::Config;

const NO_QUERY: &str = "Без запроса";

pub fn search_report(response: &SearchResponse, show_raw: bool, config: &Config) -> String {
    let total_block = if response.total > 0 {
        format!("Total: {}\n\n", response.total)
    } else {
        String::new()
    };
    let links_block = issues_block(response.raw.as_ref(), response.issues.as_deref(), config);
    let raw_block = if show_raw {
        response
            .raw
            .as_ref()
            .and_then(pretty_raw)
            .map(|text| format!("Raw:\n{}", text))
            .unwrap_or_default()
    } else {
        String::new()
    };
    format!(
        "JQL: {}\n\n{}{}{}{}",
        response.jql,
        total_block,
        analysis_block(response.analysis.as_deref()),
        links_block,
        raw_block
    )
}

fn analysis_block(analysis: Option<&str>) -> String {
    match analysis.filter(|text| !text.is_empty()) {
        Some(text) => format!("Analysis:\n{}\n\n", text),
        None => String::new(),
    }
}

/// Decodes a raw payload that may be a JSON value or a string holding JSON.
fn decode_raw(raw: &Value) -> Option<Value> {
    match raw {
        Value::Null => None,
        Value::String(text) if text.trim().is_empty() => None,
        Value::String(text) => serde_json::from_str(text).ok(),
        other => Some(other.clone()),
    }
}

fn pretty_raw(raw: &Value) -> Option<String> {
    decode_raw(raw).and_then(|value| serde_json::to_string_pretty(&value).ok())
}

/// Issue list block. Prefers the backend's issue links and otherwise digs issues out of the raw search payload.
pub fn issues_block(raw: Option<&Value>, issues: Option<&[IssueLink]>, config: &Config) -> String {
    if let Some(issues) = issues.filter(|list| !list.is_empty()) {
        return issue_links(issues);
    }

    let Some(data) = raw.and_then(decode_raw) else {
        return String::new();
    };
    let Some(items) = data.get("issues").and_then(Value::as_array).filter(|list| !list.is_empty())
    else {
        return String::new();
    };

    let lines: Vec<String> = items
        .iter()
        .map(|issue| {
            let key = issue
                .get("key")
                .and_then(Value::as_str)
                .filter(|key| !key.is_empty())
                .or_else(|| issue.pointer("/fields/key").and_then(Value::as_str))
                .unwrap_or_default();
            let summary = issue
                .pointer("/fields/summary")
                .and_then(Value::as_str)
                .unwrap_or_default();
            format!("{}: {} - {}", key, summary, config.browse_url(key))
        })
        .collect();
    format!("Issues:\n{}\n\n", lines.join("\n"))
}

fn issue_links(issues: &[IssueLink]) -> String {
    if issues.is_empty() {
        return String::new();
    }
    let lines: Vec<String> = issues
        .iter()
        .map(|issue| format!("{}: {} - {}", issue.key, issue.title, issue.url))
        .collect();
    format!("Issues:\n{}\n\n", lines.join("\n"))
}

pub fn worklog_report(outcome: &WorklogOutcome, dry_run: bool) -> String {
    match outcome {
        WorklogOutcome::Autofill(plan) => autofill_report(plan, dry_run),
        WorklogOutcome::Single(entry) => single_report(entry),
    }
}

fn autofill_report(plan: &AutofillPlan, dry_run: bool) -> String {
    let mut lines = vec![
        format!("Worklog autofill for: {}", plan.issue_key),
        format!("Range: {} .. {} ({})", plan.from, plan.to, plan.time_zone),
        format!(
            "Mode: {}",
            if dry_run { "DRY RUN (preview)" } else { "APPLY" }
        ),
        format!("Created: {}", plan.created),
        format!("Skipped: {}", plan.skipped),
        String::new(),
        "Days:".to_string(),
    ];
    for day in &plan.days {
        let id_part = day
            .worklog_id
            .as_deref()
            .map(|id| format!(" id={}", id))
            .unwrap_or_default();
        let reason = day
            .reason
            .as_deref()
            .map(|reason| format!(" ({})", reason))
            .unwrap_or_default();
        lines.push(format!(
            "{} {} — {} @ {} => {}{}{}",
            day.date, day.weekday, day.time_spent, day.started, day.action, reason, id_part
        ));
    }
    lines.join("\n")
}

fn single_report(entry: &SingleWorklog) -> String {
    let mut text = format!(
        "Worklog: {}\nDate: {} ({})\nTime: {}\nStarted: {}\n",
        entry.issue_key, entry.date, entry.time_zone, entry.time_spent, entry.started
    );
    if let Some(id) = &entry.worklog_id {
        text.push_str(&format!("WorklogID: {}\n", id));
    }
    text
}

pub fn steps_report(steps: &[Step]) -> String {
    if steps.is_empty() {
        return "Шаги будут показаны здесь после выполнения запроса.".to_string();
    }
    steps
        .iter()
        .map(|step| {
            let mut card = format!(
                "[{}] {}",
                step.status.as_deref().unwrap_or("pending"),
                step.name
            );
            if let Some(description) = step.description.as_deref().filter(|d| !d.is_empty()) {
                card.push('\n');
                card.push_str(description);
            }
            let result = step.result.as_ref().map(step_result_text).unwrap_or_default();
            if !result.is_empty() {
                card.push('\n');
                card.push_str(&result);
            }
            card
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Pretty-prints a step result. Strings holding JSON are decoded first; other strings are shown verbatim.
pub fn step_result_text(result: &Value) -> String {
    match result {
        Value::Null => String::new(),
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(parsed) => serde_json::to_string_pretty(&parsed).unwrap_or_else(|_| text.clone()),
            Err(_) => text.clone(),
        },
        other => serde_json::to_string_pretty(other).unwrap_or_default(),
    }
}

/// Local time rendering of a backend timestamp; unparseable values are shown as received.
pub fn format_timestamp(value: Option<&str>) -> String {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return String::new();
    };
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|_| value.to_string())
}

fn query_or_placeholder(query: &str) -> &str {
    if query.is_empty() {
        NO_QUERY
    } else {
        query
    }
}

pub fn history_list(entries: &[HistorySummary]) -> String {
    if entries.is_empty() {
        return "История пустая".to_string();
    }
    entries
        .iter()
        .map(|entry| {
            format!(
                "{}  {}  {}",
                entry.id,
                query_or_placeholder(&entry.query),
                format_timestamp(entry.created_at.as_deref())
            )
            .trim_end()
            .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn history_detail(entry: &HistoryEntry) -> String {
    let mut lines = vec![
        query_or_placeholder(&entry.query).to_string(),
        format!("JQL: {}", entry.jql),
        format!("Задач: {}", entry.issues.len()),
    ];
    if !entry.steps.is_empty() {
        lines.push(format!("Шагов: {}", entry.steps.len()));
    }
    lines.join("\n")
}

/// The stored search shown as if it had just run.
pub fn history_output(entry: &HistoryEntry) -> String {
    format!(
        "JQL: {}\n\n{}{}",
        entry.jql,
        analysis_block(entry.analysis.as_deref()),
        issue_links(&entry.issues)
    )
}

pub fn history_status(entry: &HistoryEntry) -> String {
    let query = if entry.query.is_empty() {
        "без запроса"
    } else {
        entry.query.as_str()
    };
    format!("Загружена история — {}", query)
}

pub fn history_matches(matches: &[HistoryMatch]) -> String {
    if matches.is_empty() {
        return "Совпадений не найдено.".to_string();
    }
    matches
        .iter()
        .map(|item| format!("{}: {}", item.key, item.title))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn projects_list(projects: &[Project]) -> String {
    let mut lines = vec!["Все проекты".to_string()];
    lines.extend(
        projects
            .iter()
            .map(|project| format!("{} — {}", project.key, project.name)),
    );
    lines.join("\n")
}

pub fn sprints_list(sprints: &[Sprint], has_project: bool) -> String {
    let mut lines = vec!["0  Весь проект".to_string()];
    if sprints.is_empty() {
        lines.push(
            if has_project {
                "Спринтов не найдено"
            } else {
                "Выберите проект, чтобы увидеть спринты"
            }
            .to_string(),
        );
    } else {
        lines.extend(sprints.iter().map(|sprint| {
            format!(
                "{}  {} ({} - {})",
                sprint.id,
                sprint.name,
                sprint.start_day(),
                sprint.end_day()
            )
        }));
    }
    lines.join("\n")
}
