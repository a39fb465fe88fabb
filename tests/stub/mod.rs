#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Read as _;
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Duration;

use serde_json::{Value, json};

pub const API_KEY: &str = "test-key";
pub const TOKEN: &str = "test-token";

/// Serves a fixed set of pages by path; everything else is a 404.
pub struct PageServer {
    pub base_url: String,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl PageServer {
    pub fn spawn(pages: Vec<(&'static str, String)>) -> Self {
        let pages: HashMap<&'static str, String> = pages.into_iter().collect();
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start page server");
        let base_url = format!("http://{}", server.server_addr());
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }
                let request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };

                let path = request.url().split('?').next().unwrap_or_default().to_owned();
                let response = match pages.get(path.as_str()) {
                    Some(html) => tiny_http::Response::from_string(html.clone())
                        .with_header(
                            tiny_http::Header::from_bytes(
                                &b"Content-Type"[..],
                                &b"text/html; charset=utf-8"[..],
                            )
                            .expect("build header"),
                        )
                        .with_status_code(200),
                    None => tiny_http::Response::from_string("not found").with_status_code(404),
                };
                let _ = request.respond(response);
            }
        });

        Self {
            base_url,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }
}

impl Drop for PageServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

pub fn course_block(id: u64, technology: &str, name: &str) -> String {
    format!(
        r#"<div class="course-block-wrapper" data-id="{id}">
  <div class="course-block">
    <a class="course-block__link course-block__link--highlighted" href="/courses/course-{id}">
      <div class="course-block__technology course-block__technology--{technology}"></div>
      <h4 class="course-block__title">{name}</h4>
      <p class="course-block__description">
        Learn {name}.
      </p>
      <span class="course-block__length">4 hours</span>
    </a>
  </div>
</div>"#
    )
}

/// Listing with courses 10 (python) and 20 (r) and one `Programming` topic.
pub fn listing_page() -> String {
    format!(
        r#"<!doctype html>
<html><body>
<div class="topics">
  <a class="topic-block" href="/courses/topic/programming">
    <h3 class="topic-block__title">Programming</h3>
  </a>
</div>
<section class="courses__explore">
{}
{}
</section>
</body></html>"#,
        course_block(10, "python", "Intro to Python"),
        course_block(20, "r", "Intro to R"),
    )
}

pub fn topic_page() -> String {
    format!(
        r#"<!doctype html>
<html><body>
<section class="courses__explore">
{}
{}
</section>
</body></html>"#,
        course_block(10, "python", "Intro to Python"),
        course_block(20, "r", "Intro to R"),
    )
}

pub fn catalog_server() -> PageServer {
    PageServer::spawn(vec![
        ("/courses/all", listing_page()),
        ("/courses/topic/programming", topic_page()),
    ])
}

#[derive(Debug, Default)]
pub struct TrelloState {
    pub boards: Vec<Value>,
    pub lists: Vec<(String, Value)>,
    pub cards: Vec<Value>,
    pub created: usize,
    next_id: usize,
}

impl TrelloState {
    pub fn with_board(name: &str, list_names: &[&str]) -> Self {
        let mut state = Self::default();
        state.boards.push(json!({ "id": "board-1", "name": "Personal" }));
        state.boards.push(json!({ "id": "board-2", "name": name }));
        for (i, list_name) in list_names.iter().enumerate() {
            state.lists.push((
                "board-2".to_owned(),
                json!({ "id": format!("list-{i}"), "name": list_name }),
            ));
        }
        state
    }

    pub fn card_names(&self) -> Vec<String> {
        self.cards
            .iter()
            .filter_map(|card| card["name"].as_str().map(str::to_owned))
            .collect()
    }
}

/// Minimal stateful Trello REST v1 stand-in.
pub struct TrelloStub {
    pub base_url: String,
    pub state: Arc<Mutex<TrelloState>>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl TrelloStub {
    pub fn spawn(state: TrelloState) -> Self {
        let state = Arc::new(Mutex::new(state));
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start trello stub");
        let base_url = format!("http://{}", server.server_addr());
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let thread_state = Arc::clone(&state);
        let handle = thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }
                let mut request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };

                let url = url::Url::parse(&format!("http://stub{}", request.url()))
                    .expect("parse request url");
                let query: HashMap<String, String> = url.query_pairs().into_owned().collect();
                if query.get("key").map(String::as_str) != Some(API_KEY)
                    || query.get("token").map(String::as_str) != Some(TOKEN)
                {
                    let _ = request.respond(
                        tiny_http::Response::from_string("invalid key").with_status_code(401),
                    );
                    continue;
                }

                let mut body = String::new();
                let _ = request.as_reader().read_to_string(&mut body);
                let method = request.method().clone();
                let segments: Vec<&str> = url.path().trim_matches('/').split('/').collect();

                let mut state = thread_state.lock().expect("lock trello state");
                let (status, payload) = route(&mut state, &method, &segments, &body);
                drop(state);

                let _ = request.respond(
                    tiny_http::Response::from_string(payload.to_string())
                        .with_header(
                            tiny_http::Header::from_bytes(
                                &b"Content-Type"[..],
                                &b"application/json"[..],
                            )
                            .expect("build header"),
                        )
                        .with_status_code(status),
                );
            }
        });

        Self {
            base_url,
            state,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }
}

fn route(
    state: &mut TrelloState,
    method: &tiny_http::Method,
    segments: &[&str],
    body: &str,
) -> (u16, Value) {
    use tiny_http::Method;

    match (method, segments) {
        (Method::Get, ["1", "members", "me", "boards"]) => (200, Value::from(state.boards.clone())),
        (Method::Get, ["1", "boards", board_id, "lists"]) => {
            let lists: Vec<Value> = state
                .lists
                .iter()
                .filter(|(owner, _)| owner == board_id)
                .map(|(_, list)| list.clone())
                .collect();
            (200, Value::from(lists))
        }
        (Method::Get, ["1", "boards", board_id, "cards", "all"]) => {
            let list_ids: Vec<Value> = state
                .lists
                .iter()
                .filter(|(owner, _)| owner == board_id)
                .map(|(_, list)| list["id"].clone())
                .collect();
            let cards: Vec<Value> = state
                .cards
                .iter()
                .filter(|card| list_ids.contains(&card["idList"]))
                .cloned()
                .collect();
            (200, Value::from(cards))
        }
        (Method::Post, ["1", "cards"]) => {
            let Ok(input) = serde_json::from_str::<Value>(body) else {
                return (400, json!({ "message": "invalid json" }));
            };
            state.next_id += 1;
            state.created += 1;
            let card = json!({
                "id": format!("card-{}", state.next_id),
                "name": input["name"],
                "idList": input["idList"],
                "desc": input["desc"],
            });
            state.cards.push(card.clone());
            (200, card)
        }
        (Method::Delete, ["1", "cards", card_id]) => {
            let before = state.cards.len();
            state.cards.retain(|card| card["id"] != *card_id);
            if state.cards.len() == before {
                (404, json!({ "message": "card not found" }))
            } else {
                (200, json!({}))
            }
        }
        _ => (404, json!({ "message": "not found" })),
    }
}

impl Drop for TrelloStub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

pub fn write_credentials(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("trello.yaml");
    std::fs::write(
        &path,
        format!("api_key: {API_KEY}\napi_secret: test-secret\ntoken: {TOKEN}\n"),
    )
    .expect("write credentials");
    path
}

pub fn write_taxonomy(dir: &std::path::Path, yaml: &str) -> std::path::PathBuf {
    let path = dir.join("taxonomy.yaml");
    std::fs::write(&path, yaml).expect("write taxonomy");
    path
}
