use once_cell::sync::Lazy;
use reqwest::multipart::Form;
use reqwest::Client;
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

const MOD_TOKEN: &str = "test-mod-token";

#[derive(Debug, Deserialize)]
struct CalendarRange {
    from_month: u8,
    from_day: u8,
    to_month: u8,
    to_day: u8,
    color: String,
    label: String,
    details: String,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!(
        "event_calendar_http_{}_{}.json",
        std::process::id(),
        nanos
    ));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/calendar")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server(extra_env: &[(&str, &str)]) -> TestServer {
    let port = pick_free_port();
    let data_path = unique_data_path();
    let mut command = Command::new(env!("CARGO_BIN_EXE_event_calendar"));
    command
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", data_path)
        .env("MOD_TOKEN", MOD_TOKEN)
        .env("RATE_LIMIT_MAX", "100")
        .env("RUST_LOG", "info")
        .env_remove("CAPTCHA_SECRET");
    for (key, value) in extra_env {
        command.env(key, value);
    }
    let child = command
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server(&[]).await);
    *guard = Some(Arc::clone(&server));
    server
}

fn entry_form(description: &str) -> Form {
    Form::new()
        .text("type", "personal")
        .text("date", "2026-06-14")
        .text("description", description.to_string())
}

fn assert_covers_year(ranges: &[CalendarRange]) {
    assert_eq!((ranges[0].from_month, ranges[0].from_day), (1, 1));
    let last = ranges.last().unwrap();
    assert_eq!((last.to_month, last.to_day), (12, 31));
    for pair in ranges.windows(2) {
        let (prev_m, prev_d) = (pair[0].to_month, pair[0].to_day);
        let (next_m, next_d) = (pair[1].from_month, pair[1].from_day);
        let adjacent = (next_m == prev_m && next_d == prev_d + 1)
            || (next_m == prev_m + 1 && next_d == 1);
        assert!(adjacent, "ranges not adjacent: {pair:?}");
    }
}

#[tokio::test]
async fn http_calendar_starts_empty() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let ranges: Vec<CalendarRange> = client
        .get(format!("{}/api/calendar", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // No approved entries on the shared server, so one empty range.
    assert_eq!(ranges.len(), 1);
    assert_covers_year(&ranges);
    assert_eq!(ranges[0].color, "#ff007a");
    assert!(!ranges[0].label.is_empty());
    assert!(!ranges[0].details.is_empty());
}

#[tokio::test]
async fn http_submit_moderate_calendar_export_flow() {
    let _guard = TEST_LOCK.lock().await;
    let server = spawn_server(&[]).await;
    let client = Client::new();

    let response = client
        .post(format!("{}/submit", server.base_url))
        .multipart(entry_form("Street festival on the market square"))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    assert_eq!(response.url().path(), "/success");

    // Pending entries do not feed the calendar yet.
    let ranges: Vec<CalendarRange> = client
        .get(format!("{}/api/calendar", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(ranges.len(), 1);

    let list = client
        .get(format!(
            "{}/mod/show/pending/sortby/date?token={MOD_TOKEN}",
            server.base_url
        ))
        .send()
        .await
        .unwrap();
    assert!(list.status().is_success());
    let body = list.text().await.unwrap();
    assert!(body.contains("Street festival on the market square"));

    // Fresh server, so the submission has id 0.
    let edit = client
        .post(format!("{}/mod/edit/status", server.base_url))
        .form(&[
            ("id", "0"),
            ("status", "approved"),
            ("state", "pending"),
            ("order", "date"),
            ("token", MOD_TOKEN),
        ])
        .send()
        .await
        .unwrap();
    assert!(edit.status().is_success());

    let ranges: Vec<CalendarRange> = client
        .get(format!("{}/api/calendar", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(ranges.len(), 3);
    assert_covers_year(&ranges);
    assert_eq!((ranges[1].from_month, ranges[1].from_day), (6, 14));
    assert_eq!((ranges[1].to_month, ranges[1].to_day), (6, 14));
    assert_eq!(ranges[1].color, "#ff9e3d", "one approved entry is the warning bucket");

    let edit = client
        .post(format!("{}/mod/edit/status", server.base_url))
        .form(&[
            ("id", "0"),
            ("status", "chosen"),
            ("state", "approved"),
            ("order", "date"),
            ("token", MOD_TOKEN),
        ])
        .send()
        .await
        .unwrap();
    assert!(edit.status().is_success());

    let ranges: Vec<CalendarRange> = client
        .get(format!("{}/api/calendar", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(ranges[1].color, "#47cfad", "chosen overrides the count bucket");

    let export = client
        .get(format!(
            "{}/mod/export?token={MOD_TOKEN}",
            server.base_url
        ))
        .send()
        .await
        .unwrap();
    assert!(export.status().is_success());
    let content_type = export
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    assert!(content_type.starts_with("text/csv"));
    let csv = export.text().await.unwrap();
    assert!(csv.starts_with("Date,Kind,Description,Name"));
    assert!(csv.contains("Street festival on the market square"));
}

#[tokio::test]
async fn http_mod_routes_require_token() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    for url in [
        format!("{}/mod/show/pending/sortby/date", server.base_url),
        format!("{}/mod/show/pending/sortby/date?token=wrong", server.base_url),
        format!("{}/mod/export", server.base_url),
    ] {
        let response = client.get(url).send().await.unwrap();
        assert_eq!(response.status(), 401);
    }
}

#[tokio::test]
async fn http_invalid_submissions_are_rejected() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let missing_description = Form::new()
        .text("type", "personal")
        .text("date", "2026-06-14");
    let response = client
        .post(format!("{}/submit", server.base_url))
        .multipart(missing_description)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);

    let historic_without_source = Form::new()
        .text("type", "historic")
        .text("date", "1969-07-20")
        .text("description", "First crewed Moon landing");
    let response = client
        .post(format!("{}/submit", server.base_url))
        .multipart(historic_without_source)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);

    let bad_date = Form::new()
        .text("type", "personal")
        .text("date", "14.06.2026")
        .text("description", "A perfectly fine description");
    let response = client
        .post(format!("{}/submit", server.base_url))
        .multipart(bad_date)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);
}

#[tokio::test]
async fn http_submissions_are_rate_limited_per_ip() {
    let _guard = TEST_LOCK.lock().await;
    let server = spawn_server(&[("RATE_LIMIT_MAX", "2")]).await;
    let client = Client::new();

    for n in 0..2 {
        let response = client
            .post(format!("{}/submit", server.base_url))
            .multipart(entry_form(&format!("Allowed submission number {n}")))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success(), "submission {n} should pass");
    }

    let response = client
        .post(format!("{}/submit", server.base_url))
        .multipart(entry_form("One submission too many"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 429);
}
