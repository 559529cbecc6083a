use super::args::{BatchArgs, Command, EvaluateArgs, LogsArgs};
use crate::cli::args::Cli;
use crate::exit_codes;
use anyhow::Context;
use scsc_core::model::{truncate_chars, EvaluationReport, LogRecord};
use scsc_core::storage::Store;
use std::time::Duration;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Evaluate(args) => cmd_evaluate(args).await,
        Command::Batch(args) => cmd_batch(args).await,
        Command::Logs(args) => cmd_logs(args),
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(exit_codes::OK)
        }
    }
}

async fn post_evaluate(
    client: &reqwest::Client,
    api_url: &str,
    text: &str,
) -> anyhow::Result<EvaluationReport> {
    let url = format!("{}/evaluate", api_url.trim_end_matches('/'));
    let resp = client
        .post(&url)
        .json(&serde_json::json!({ "text": text }))
        .send()
        .await?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("backend returned {}: {}", status, body);
    }
    Ok(resp.json().await?)
}

async fn cmd_evaluate(args: EvaluateArgs) -> anyhow::Result<i32> {
    let text = match (&args.text, &args.file) {
        (Some(t), _) => t.clone(),
        (None, Some(path)) => match std::fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("cannot read {}: {}", path.display(), e);
                return Ok(exit_codes::USER_ERROR);
            }
        },
        (None, None) => String::new(),
    };

    if text.trim().is_empty() {
        eprintln!("Enter text first.");
        return Ok(exit_codes::USER_ERROR);
    }

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(args.timeout_secs))
        .build()?;

    let report = match post_evaluate(&client, &args.api_url, &text).await {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Failed to call backend: {:#}", e);
            return Ok(exit_codes::BACKEND_ERROR);
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report(&report));
    }

    if !report.ok {
        eprintln!(
            "evaluation failed: {}",
            report.error.as_deref().unwrap_or("unknown error")
        );
        return Ok(exit_codes::BACKEND_ERROR);
    }
    Ok(exit_codes::OK)
}

fn format_risk(risk: f64) -> String {
    if risk.fract() == 0.0 {
        format!("{:.0}", risk)
    } else {
        format!("{:.2}", risk)
    }
}

pub fn render_report(report: &EvaluationReport) -> String {
    let r = &report.result;
    let mut out = String::new();
    out.push_str(&format!("Risk score: {}/100\n", format_risk(r.risk)));
    out.push_str(&format!("Explanation: {}\n", r.explanation));
    out.push_str("\nCategories\n");
    for h in &r.highlights {
        out.push_str(&format!("- {} : {:.2}\n", h.category, h.score));
    }
    out.push_str("\nSuggested rewrites\n");
    if r.rewrites.is_empty() {
        out.push_str("(none)\n");
    }
    for (i, rw) in r.rewrites.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, rw));
    }
    out
}

async fn cmd_batch(args: BatchArgs) -> anyhow::Result<i32> {
    let content = match std::fs::read_to_string(&args.file) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("cannot read {}: {}", args.file.display(), e);
            return Ok(exit_codes::USER_ERROR);
        }
    };
    let lines: Vec<&str> = content.lines().collect();
    eprintln!("Loaded {} lines.", lines.len());

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(args.timeout_secs))
        .build()?;

    let mut rows = Vec::new();
    for line in lines.iter().take(args.max_lines) {
        let risk = match post_evaluate(&client, &args.api_url, line).await {
            Ok(report) if report.ok => format_risk(report.result.risk),
            Ok(_) | Err(_) => "ERROR".to_string(),
        };
        rows.push((truncate_chars(line, 80).to_string(), risk));
    }

    print!("{}", render_batch_table(&rows));
    Ok(exit_codes::OK)
}

pub fn render_batch_table(rows: &[(String, String)]) -> String {
    let width = rows
        .iter()
        .map(|(t, _)| t.chars().count())
        .max()
        .unwrap_or(0)
        .max("text".len());

    let mut out = format!("{:<width$}  risk\n", "text", width = width);
    for (text, risk) in rows {
        out.push_str(&format!("{:<width$}  {}\n", text, risk, width = width));
    }
    out
}

fn cmd_logs(args: LogsArgs) -> anyhow::Result<i32> {
    let rows = match Store::open_read_only(&args.db)
        .and_then(|store| store.list_recent(args.limit))
        .with_context(|| format!("reading {}", args.db.display()))
    {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("Cannot read DB: {:#}", e);
            return Ok(exit_codes::BACKEND_ERROR);
        }
    };

    print!("{}", render_logs_table(&rows));
    Ok(exit_codes::OK)
}

pub fn render_logs_table(rows: &[LogRecord]) -> String {
    let mut out = String::from("id\ttext\trisk\tcategories\tcreated_at\n");
    for r in rows {
        let text = truncate_chars(&r.text, 120).replace(['\n', '\r', '\t'], " ");
        out.push_str(&format!(
            "{}\t{}\t{}\t{}\t{}\n",
            r.id,
            text,
            format_risk(r.risk),
            r.categories,
            r.created_at
        ));
    }
    out
}
