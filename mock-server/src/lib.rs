use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::net::TcpListener;
use tracing::{debug, info};

const PER_PAGE: usize = 6;

/// Token the upstream service issues to every registered user.
pub const TOKEN: &str = "QpwL5tke4Pnpja7X4";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resource {
    pub id: u64,
    pub name: String,
    pub year: u32,
    pub color: String,
    pub pantone_value: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Support {
    pub url: String,
    pub text: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Single<T> {
    pub data: T,
    pub support: Support,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Page<T> {
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
    pub data: Vec<T>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Deserialize)]
pub struct Credentials {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct Registered {
    pub id: u64,
    pub token: String,
}

#[derive(Serialize, Deserialize)]
pub struct LoggedIn {
    pub token: String,
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub page: Option<usize>,
    pub delay: Option<u64>,
}

/// Read-only seed data plus the id counter for created users.
pub struct Store {
    users: Vec<User>,
    resources: Vec<Resource>,
    next_id: AtomicU64,
}

impl Store {
    pub fn seeded() -> Self {
        let users = [
            ("george.bluth", "George", "Bluth"),
            ("janet.weaver", "Janet", "Weaver"),
            ("emma.wong", "Emma", "Wong"),
            ("eve.holt", "Eve", "Holt"),
            ("charles.morris", "Charles", "Morris"),
            ("tracey.ramos", "Tracey", "Ramos"),
            ("michael.lawson", "Michael", "Lawson"),
            ("lindsay.ferguson", "Lindsay", "Ferguson"),
            ("tobias.funke", "Tobias", "Funke"),
            ("byron.fields", "Byron", "Fields"),
            ("george.edwards", "George", "Edwards"),
            ("rachel.howell", "Rachel", "Howell"),
        ]
        .into_iter()
        .zip(1u64..)
        .map(|((handle, first, last), id)| User {
            id,
            email: format!("{handle}@reqres.in"),
            first_name: first.to_string(),
            last_name: last.to_string(),
            avatar: format!("https://reqres.in/img/faces/{id}-image.jpg"),
        })
        .collect::<Vec<_>>();

        let resources = [
            ("cerulean", "#98B2D1", "15-4020"),
            ("fuchsia rose", "#C74375", "17-2031"),
            ("true red", "#BF1932", "19-1664"),
            ("aqua sky", "#7BC4C4", "14-4811"),
            ("tigerlily", "#E2583E", "17-1456"),
            ("blue turquoise", "#53B0AE", "15-5217"),
            ("sand dollar", "#DECDBE", "13-1106"),
            ("chili pepper", "#9B1B30", "19-1557"),
            ("blue iris", "#5A5B9F", "18-3943"),
            ("mimosa", "#F0C05A", "14-0848"),
            ("turquoise", "#45B5AA", "15-5519"),
            ("honeysuckle", "#D94F70", "18-2120"),
        ]
        .into_iter()
        .zip(1u64..)
        .map(|((name, color, pantone), id)| Resource {
            id,
            name: name.to_string(),
            year: 1999 + id as u32,
            color: color.to_string(),
            pantone_value: pantone.to_string(),
        })
        .collect::<Vec<_>>();

        let next_id = AtomicU64::new(users.len() as u64 + 1);
        Self {
            users,
            resources,
            next_id,
        }
    }

    fn user(&self, id: &str) -> Option<&User> {
        let id: u64 = id.parse().ok()?;
        self.users.iter().find(|u| u.id == id)
    }

    fn user_by_email(&self, email: &str) -> Option<&User> {
        self.users.iter().find(|u| u.email == email)
    }

    fn resource(&self, id: &str) -> Option<&Resource> {
        let id: u64 = id.parse().ok()?;
        self.resources.iter().find(|r| r.id == id)
    }
}

pub type Db = Arc<Store>;

type Failure = (StatusCode, Json<ErrorBody>);

pub fn app() -> Router {
    let db: Db = Arc::new(Store::seeded());
    Router::new()
        .route("/api/users", get(list_users).post(create_user))
        .route(
            "/api/users/{id}",
            get(get_user)
                .patch(update_user)
                .put(update_user)
                .delete(delete_user),
        )
        .route("/api/unknown", get(list_resources))
        .route("/api/unknown/{id}", get(get_resource))
        .route("/api/register", post(register))
        .route("/api/login", post(login))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock reqres listening");
    }
    axum::serve(listener, app()).await
}

fn support() -> Support {
    Support {
        url: "https://reqres.in/#support-heading".to_string(),
        text: "To keep ReqRes free, contributions towards server costs are appreciated!"
            .to_string(),
    }
}

fn failure(status: StatusCode, message: &str) -> Failure {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
}

fn paginate<T: Clone>(items: &[T], page: Option<usize>) -> Page<T> {
    let page = page.unwrap_or(1).max(1);
    Page {
        page,
        per_page: PER_PAGE,
        total: items.len(),
        total_pages: items.len().div_ceil(PER_PAGE),
        data: items
            .iter()
            .skip(page.saturating_sub(1).saturating_mul(PER_PAGE))
            .take(PER_PAGE)
            .cloned()
            .collect(),
    }
}

fn now() -> Value {
    Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
}

async fn list_users(State(db): State<Db>, Query(query): Query<ListQuery>) -> Json<Page<User>> {
    if let Some(delay) = query.delay {
        debug!(delay, "delaying user list");
        tokio::time::sleep(Duration::from_secs(delay)).await;
    }
    Json(paginate(&db.users, query.page))
}

async fn get_user(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Single<User>>, Failure> {
    db.user(&id)
        .cloned()
        .map(|data| {
            Json(Single {
                data,
                support: support(),
            })
        })
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "Not found"))
}

async fn list_resources(
    State(db): State<Db>,
    Query(query): Query<ListQuery>,
) -> Json<Page<Resource>> {
    Json(paginate(&db.resources, query.page))
}

async fn get_resource(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Single<Resource>>, Failure> {
    db.resource(&id)
        .cloned()
        .map(|data| {
            Json(Single {
                data,
                support: support(),
            })
        })
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "Not found"))
}

async fn create_user(
    State(db): State<Db>,
    Json(mut input): Json<Map<String, Value>>,
) -> (StatusCode, Json<Map<String, Value>>) {
    let id = db.next_id.fetch_add(1, Ordering::Relaxed);
    info!(id, "created user");
    input.insert("id".to_string(), Value::String(id.to_string()));
    input.insert("createdAt".to_string(), now());
    (StatusCode::CREATED, Json(input))
}

/// Serves both PATCH and PUT. Nothing is stored; the body is echoed back.
async fn update_user(
    Path(id): Path<String>,
    Json(mut input): Json<Map<String, Value>>,
) -> Json<Map<String, Value>> {
    debug!(%id, "updated user");
    input.insert("updatedAt".to_string(), now());
    Json(input)
}

async fn delete_user(Path(id): Path<String>) -> StatusCode {
    info!(%id, "deleted user");
    StatusCode::NO_CONTENT
}

fn require_credentials(input: &Credentials) -> Result<&str, Failure> {
    let email = input
        .email
        .as_deref()
        .filter(|e| !e.is_empty())
        .ok_or_else(|| failure(StatusCode::BAD_REQUEST, "Missing email or username"))?;
    if input.password.as_deref().map_or(true, str::is_empty) {
        return Err(failure(StatusCode::BAD_REQUEST, "Missing password"));
    }
    Ok(email)
}

async fn register(
    State(db): State<Db>,
    Json(input): Json<Credentials>,
) -> Result<Json<Registered>, Failure> {
    let email = require_credentials(&input)?;
    let user = db.user_by_email(email).ok_or_else(|| {
        failure(
            StatusCode::BAD_REQUEST,
            "Note: Only defined users succeed registration",
        )
    })?;
    Ok(Json(Registered {
        id: user.id,
        token: TOKEN.to_string(),
    }))
}

async fn login(
    State(db): State<Db>,
    Json(input): Json<Credentials>,
) -> Result<Json<LoggedIn>, Failure> {
    let email = require_credentials(&input)?;
    db.user_by_email(email)
        .ok_or_else(|| failure(StatusCode::BAD_REQUEST, "user not found"))?;
    Ok(Json(LoggedIn {
        token: TOKEN.to_string(),
    }))
}
