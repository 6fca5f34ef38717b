//! Origin fetches are reported through the `log` facade.

use log::{Level, LevelFilter, Log, Metadata, Record};
use mockito::{Matcher, Server};
use nba_api::{ApiConfig, NbaApi};
use serde_json::json;
use std::sync::{Mutex, Once};

const BOOTSTRAP: &str = "/prod/v1/today.json";

static EVENTS: Mutex<Vec<(Level, String)>> = Mutex::new(Vec::new());
static INIT: Once = Once::new();

struct Capture;

impl Log for Capture {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if record.target().starts_with("nba_api") {
            EVENTS.lock().unwrap().push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static CAPTURE: Capture = Capture;

fn capture_logs() {
    INIT.call_once(|| {
        log::set_logger(&CAPTURE).expect("logger already set");
        log::set_max_level(LevelFilter::Debug);
    });
}

/// Events mentioning `url`, so tests on other mock servers do not interfere.
fn events_for(url: &str) -> Vec<(Level, String)> {
    EVENTS.lock().unwrap().iter().filter(|(_, msg)| msg.contains(url)).cloned().collect()
}

#[tokio::test]
async fn origin_fetches_log_at_info_and_revalidations_at_debug() {
    capture_logs();
    let mut server = Server::new_async().await;
    let body = json!({"links": {"anchorDate": "20170115"}}).to_string();
    server
        .mock("GET", BOOTSTRAP)
        .match_header("if-none-match", Matcher::Missing)
        .with_header("etag", "\"boot-v1\"")
        .with_body(body)
        .expect(1)
        .create_async()
        .await;
    server
        .mock("GET", BOOTSTRAP)
        .match_header("if-none-match", "\"boot-v1\"")
        .with_status(304)
        .expect(1)
        .create_async()
        .await;

    let api = NbaApi::with_config(ApiConfig {
        server: server.url(),
        bootstrap_path: BOOTSTRAP.into(),
        ..ApiConfig::default()
    });
    for _ in 0..2 {
        assert_eq!(api.anchor_date().await.expect("anchor date"), "20170115");
    }

    let url = format!("{}{BOOTSTRAP}", server.url());
    let events = events_for(&url);
    let origin: Vec<_> = events.iter().filter(|(level, _)| *level == Level::Info).collect();
    assert_eq!(origin.len(), 1, "{events:?}");
    assert!(origin[0].1.contains("200"), "{events:?}");
    assert!(
        events.iter().any(|(level, msg)| *level == Level::Debug && msg.contains("revalidated")),
        "{events:?}"
    );
}
