//! Command-line client for the CrazyPaste API.

use clap::builder::PossibleValuesParser;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use crazypaste_core::models::expiration::ExpirationSelector;
use crazypaste_core::models::language::label_for;
use crazypaste_core::{DEFAULT_CLI_SERVER_URL, DEFAULT_RECENT_LIMIT};
use serde_json::{json, Value};
use std::io::{self, Read};
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "cpaste", about = "CrazyPaste CLI", version)]
struct Cli {
    /// Server URL (can also be set via CP_SERVER env var)
    #[arg(short, long, env = "CP_SERVER")]
    server: Option<String>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    json: bool,

    /// Print timing for API requests
    #[arg(long, global = true)]
    timing: bool,

    /// Request timeout in seconds
    #[arg(short = 't', long, default_value = "30")]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Create a paste from a file or stdin
    New {
        #[arg(short, long)]
        file: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long)]
        language: Option<String>,
        /// Expiration selector
        #[arg(short, long, value_parser = PossibleValuesParser::new(ExpirationSelector::ALL.map(ExpirationSelector::as_str)))]
        expires: Option<String>,
        #[arg(short, long)]
        password: Option<String>,
        /// Delete the paste after its first read
        #[arg(short, long)]
        burn: bool,
    },
    /// Show a paste (counts as a read)
    Get {
        id: String,
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Print only the paste content (counts as a read)
    Raw {
        id: String,
        #[arg(short, long)]
        password: Option<String>,
    },
    /// List every live paste
    List,
    /// List the most recent pastes
    Recent {
        #[arg(short, long, default_value_t = DEFAULT_RECENT_LIMIT)]
        limit: usize,
        #[arg(long)]
        include_burn: bool,
        #[arg(long)]
        include_protected: bool,
    },
    /// Delete a paste
    Delete {
        id: String,
    },
    /// Check a password without reading the paste
    Verify {
        id: String,
        password: String,
    },
    /// Prepare a new paste from an existing one
    Fork {
        id: String,
        #[arg(short, long)]
        password: Option<String>,
        /// Create the forked paste instead of printing the draft
        #[arg(long)]
        submit: bool,
    },
    /// List known languages
    Languages,
}

fn log_timing(timing: bool, label: &str, duration: Duration) {
    if timing {
        eprintln!(
            "[timing] {}: {:.1} ms",
            label,
            duration.as_secs_f64() * 1000.0
        );
    }
}

fn log_timing_parts(timing: bool, label: &str, request: Duration, parse: Option<Duration>) {
    if !timing {
        return;
    }
    if let Some(parse) = parse {
        let total = request + parse;
        eprintln!(
            "[timing] {}: request {:.1} ms, parse {:.1} ms, total {:.1} ms",
            label,
            request.as_secs_f64() * 1000.0,
            parse.as_secs_f64() * 1000.0,
            total.as_secs_f64() * 1000.0
        );
    } else {
        log_timing(timing, label, request);
    }
}

fn error_message_for_response(status: reqwest::StatusCode, body: &str) -> String {
    if body.trim().is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string();
    }

    if let Ok(value) = serde_json::from_str::<Value>(body) {
        return value
            .get("error")
            .and_then(|v| v.as_str())
            .unwrap_or(body)
            .to_string();
    }

    body.to_string()
}

async fn ensure_success_or_exit(res: reqwest::Response, action: &str) -> reqwest::Response {
    let status = res.status();
    if status.is_success() {
        return res;
    }

    let body = match res.text().await {
        Ok(body) => body,
        Err(err) => format!("failed to read error response body: {}", err),
    };
    let message = error_message_for_response(status, &body);
    eprintln!("{} failed ({}): {}", action, status, message);
    std::process::exit(1);
}

fn exit_with(action: &str, message: String) -> ! {
    eprintln!("{} failed: {}", action, message);
    std::process::exit(1);
}

fn print_or_exit(action: &str, output: Result<String, String>) {
    match output {
        Ok(output) if output.is_empty() => {}
        Ok(output) => println!("{}", output),
        Err(message) => exit_with(action, message),
    }
}

fn pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|err| format!("response encoding error: {}", err))
}

fn paste_id_and_title(paste: &Value) -> Option<(&str, &str)> {
    let id = paste.get("id").and_then(Value::as_str)?;
    let title = paste.get("title").and_then(Value::as_str)?;
    Some((id, title))
}

fn summary_flags(paste: &Value) -> String {
    let mut flags = Vec::new();
    if paste.get("hasPassword").and_then(Value::as_bool) == Some(true) {
        flags.push("protected");
    }
    if paste.get("burnAfterReading").and_then(Value::as_bool) == Some(true) {
        flags.push("burn");
    }
    if paste.get("expires").is_some_and(|expires| !expires.is_null()) {
        flags.push("expiring");
    }
    flags.join(",")
}

fn format_summary_output(pastes: &[Value], json: bool) -> Result<String, String> {
    if json {
        return pretty(&pastes);
    }

    let mut rows = Vec::with_capacity(pastes.len());
    for (index, p) in pastes.iter().enumerate() {
        let Some((id, title)) = paste_id_and_title(p) else {
            return Err(format!(
                "response item {} missing 'id' or 'title' field",
                index
            ));
        };
        let language = p.get("language").and_then(Value::as_str).unwrap_or("");
        let language = label_for(language).unwrap_or(language);
        let row = format!("{:<10} {:<30} {:<12} {}", id, title, language, summary_flags(p));
        rows.push(row.trim_end().to_string());
    }

    Ok(rows.join("\n"))
}

fn format_get_output(paste: &Value, json: bool) -> Result<String, String> {
    if json {
        return pretty(paste);
    }

    paste
        .get("content")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| "response missing 'content' field".to_string())
}

fn format_created_output(paste: &Value, json: bool) -> Result<String, String> {
    if json {
        return pretty(paste);
    }
    let (id, title) = paste_id_and_title(paste)
        .ok_or_else(|| "response missing 'id' or 'title' field".to_string())?;
    Ok(format!("Created: {} ({})", title, id))
}

fn format_delete_output(id: &str, response: &Value, json: bool) -> Result<String, String> {
    if json {
        return pretty(response);
    }

    Ok(format!("Deleted paste: {}", id))
}

fn format_verify_output(response: &Value, json: bool) -> Result<String, String> {
    if json {
        return pretty(response);
    }
    match response.get("valid").and_then(Value::as_bool) {
        Some(true) => Ok("Password is valid".to_string()),
        Some(false) => Ok("Password is invalid".to_string()),
        None => Err("response missing 'valid' field".to_string()),
    }
}

fn format_languages_output(languages: &[Value], json: bool) -> Result<String, String> {
    if json {
        return pretty(&languages);
    }
    let rows: Vec<String> = languages
        .iter()
        .filter_map(|language| {
            let value = language.get("value").and_then(Value::as_str)?;
            let label = language.get("label").and_then(Value::as_str)?;
            Some(format!("{:<12} {}", value, label))
        })
        .collect();
    Ok(rows.join("\n"))
}

fn create_body(
    content: String,
    title: Option<String>,
    language: Option<String>,
    expires: Option<String>,
    password: Option<String>,
    burn: bool,
) -> Value {
    let mut body = json!({ "content": content, "burnAfterReading": burn });
    if let Some(title) = title {
        body["title"] = title.into();
    }
    if let Some(language) = language {
        body["language"] = language.into();
    }
    if let Some(expires) = expires {
        body["expiration"] = expires.into();
    }
    if let Some(password) = password {
        body["password"] = password.into();
    }
    body
}

/// Creation body for a fork draft. Password, expiry, and burn are not carried over.
fn fork_submission_body(draft: &Value) -> Result<Value, String> {
    let field = |name: &str| {
        draft
            .get(name)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| format!("draft missing '{}' field", name))
    };
    Ok(create_body(
        field("content")?,
        Some(field("title")?),
        Some(field("language")?),
        None,
        None,
        false,
    ))
}

fn api_url(server: &str, segments: &[&str]) -> Result<reqwest::Url, String> {
    let mut url = reqwest::Url::parse(server)
        .map_err(|err| format!("Invalid server URL '{}': {}", server, err))?;
    let mut path = url
        .path_segments_mut()
        .map_err(|_| "Server URL cannot be used as an API base".to_string())?;
    path.pop_if_empty();
    for segment in segments {
        path.push(segment);
    }
    drop(path);
    Ok(url)
}

fn api_url_or_exit(server: &str, action: &str, segments: &[&str]) -> reqwest::Url {
    api_url(server, segments).unwrap_or_else(|message| exit_with(action, message))
}

fn normalize_server(server: String) -> String {
    if let Ok(mut url) = reqwest::Url::parse(&server) {
        let should_normalize_localhost =
            url.scheme().eq_ignore_ascii_case("http") && url.host_str() == Some("localhost");
        if should_normalize_localhost && url.set_host(Some("127.0.0.1")).is_err() {
            return server;
        }
        let mut normalized = url.to_string();
        while normalized.ends_with('/') {
            normalized.pop();
        }
        return normalized;
    }
    server
}

fn resolve_server(server: Option<String>) -> String {
    server
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_CLI_SERVER_URL.to_string())
}

fn with_password(request: reqwest::RequestBuilder, password: Option<&str>) -> reqwest::RequestBuilder {
    match password {
        Some(password) => request.query(&[("password", password)]),
        None => request,
    }
}

/// Send `request`, exit on a non-2xx status, and decode the JSON body.
async fn send_json<T>(
    request: reqwest::RequestBuilder,
    action: &str,
    timing: bool,
) -> Result<T, reqwest::Error>
where
    T: serde::de::DeserializeOwned,
{
    let request_start = Instant::now();
    let res = request.send().await?;
    let request_elapsed = request_start.elapsed();
    let res = ensure_success_or_exit(res, action).await;

    let parse_start = Instant::now();
    let value = res.json().await?;
    log_timing_parts(
        timing,
        &action.to_ascii_lowercase(),
        request_elapsed,
        Some(parse_start.elapsed()),
    );
    Ok(value)
}

fn read_content(file: Option<String>) -> io::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Cli {
        server,
        json,
        timing,
        timeout,
        command,
    } = Cli::parse();

    if let Commands::Completions { shell } = &command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout))
        .build()?;
    let server = normalize_server(resolve_server(server));

    match command {
        Commands::Completions { .. } => {}
        Commands::New {
            file,
            title,
            language,
            expires,
            password,
            burn,
        } => {
            let endpoint = api_url_or_exit(&server, "New", &["api", "paste"]);
            let content = read_content(file)?;
            let body = create_body(content, title, language, expires, password, burn);
            let paste: Value = send_json(client.post(endpoint).json(&body), "New", timing).await?;
            print_or_exit("New", format_created_output(&paste, json));
        }
        Commands::Get { id, password } => {
            let endpoint = api_url_or_exit(&server, "Get", &["api", "paste", id.as_str()]);
            let request = with_password(client.get(endpoint), password.as_deref());
            let paste: Value = send_json(request, "Get", timing).await?;
            print_or_exit("Get", format_get_output(&paste, json));
        }
        Commands::Raw { id, password } => {
            let endpoint = api_url_or_exit(&server, "Raw", &["api", "paste", id.as_str(), "raw"]);
            let request_start = Instant::now();
            let res = with_password(client.get(endpoint), password.as_deref())
                .send()
                .await?;
            let res = ensure_success_or_exit(res, "Raw").await;
            let content = res.text().await?;
            log_timing(timing, "raw", request_start.elapsed());
            print!("{}", content);
        }
        Commands::List => {
            let endpoint = api_url_or_exit(&server, "List", &["api", "pastes"]);
            let pastes: Vec<Value> = send_json(client.get(endpoint), "List", timing).await?;
            print_or_exit("List", format_summary_output(&pastes, json));
        }
        Commands::Recent {
            limit,
            include_burn,
            include_protected,
        } => {
            let endpoint = api_url_or_exit(&server, "Recent", &["api", "pastes", "recent"]);
            let request = client.get(endpoint).query(&[
                ("limit", limit.to_string()),
                ("exclude_burn", (!include_burn).to_string()),
                ("exclude_protected", (!include_protected).to_string()),
            ]);
            let pastes: Vec<Value> = send_json(request, "Recent", timing).await?;
            print_or_exit("Recent", format_summary_output(&pastes, json));
        }
        Commands::Delete { id } => {
            let endpoint = api_url_or_exit(&server, "Delete", &["api", "paste", id.as_str()]);
            let response: Value = send_json(client.delete(endpoint), "Delete", timing).await?;
            print_or_exit("Delete", format_delete_output(&id, &response, json));
        }
        Commands::Verify { id, password } => {
            let endpoint =
                api_url_or_exit(&server, "Verify", &["api", "paste", id.as_str(), "verify"]);
            let request = client
                .post(endpoint)
                .json(&json!({ "password": password }));
            let response: Value = send_json(request, "Verify", timing).await?;
            print_or_exit("Verify", format_verify_output(&response, json));
        }
        Commands::Fork {
            id,
            password,
            submit,
        } => {
            let endpoint =
                api_url_or_exit(&server, "Fork", &["api", "paste", id.as_str(), "fork"]);
            let request = with_password(client.get(endpoint), password.as_deref());
            let draft: Value = send_json(request, "Fork", timing).await?;
            if !submit {
                print_or_exit("Fork", format_get_output(&draft, true));
                return Ok(());
            }

            let body = fork_submission_body(&draft).unwrap_or_else(|msg| exit_with("Fork", msg));
            let endpoint = api_url_or_exit(&server, "Fork", &["api", "paste"]);
            let paste: Value = send_json(client.post(endpoint).json(&body), "Fork", timing).await?;
            print_or_exit("Fork", format_created_output(&paste, json));
        }
        Commands::Languages => {
            let endpoint = api_url_or_exit(&server, "Languages", &["api", "languages"]);
            let languages: Vec<Value> =
                send_json(client.get(endpoint), "Languages", timing).await?;
            print_or_exit("Languages", format_languages_output(&languages, json));
        }
    }

    Ok(())
}
