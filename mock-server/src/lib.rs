use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const SCHEMA_JSON: &str = "application/schema+json";
pub const HAL_JSON: &str = "application/hal+json";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Person {
    pub id: Uuid,
    pub name: String,
    pub father: Option<String>,
}

#[derive(Deserialize)]
pub struct PersonInput {
    pub name: String,
    #[serde(default)]
    pub father: Option<String>,
}

#[derive(Deserialize)]
pub struct PersonPatch {
    pub name: Option<String>,
    pub father: Option<String>,
}

pub type Db = Arc<RwLock<HashMap<Uuid, Person>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/", get(index))
        .route("/people", get(list_people).post(create_person))
        .route(
            "/people/{id}",
            get(get_person)
                .put(replace_person)
                .patch(update_person)
                .delete(delete_person),
        )
        .route("/profile", get(profile_index))
        .route("/profile/people", get(people_profile))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// JSON Schema for the people collection. `father` is an association and is
/// advertised with `format: uri`.
pub fn people_schema() -> Value {
    json!({
        "title": "Person",
        "type": "object",
        "$schema": "http://json-schema.org/draft-04/schema#",
        "properties": {
            "name": {
                "title": "Name",
                "description": "A person's name",
                "type": "string",
                "readOnly": false
            },
            "father": {
                "title": "Father",
                "type": "string",
                "format": "uri",
                "readOnly": false
            }
        },
        "definitions": {}
    })
}

/// `http://<Host>` from the request, so links point back at this server.
fn base_url(headers: &HeaderMap) -> String {
    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");
    format!("http://{host}")
}

fn person_json(base: &str, person: &Person) -> Value {
    let href = format!("{base}/people/{}", person.id);
    let mut links = json!({
        "self": {"href": href},
        "person": {"href": href},
    });
    if let Some(father) = &person.father {
        links["father"] = json!({"href": father});
    }
    json!({"name": person.name, "_links": links})
}

fn hal(status: StatusCode, body: Value) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, HeaderValue::from_static(HAL_JSON))],
        Json(body),
    )
        .into_response()
}

async fn index(headers: HeaderMap) -> Response {
    let base = base_url(&headers);
    hal(
        StatusCode::OK,
        json!({"_links": {
            "people": {"href": format!("{base}/people{{?page,size,sort}}"), "templated": true},
            "profile": {"href": format!("{base}/profile")},
        }}),
    )
}

async fn list_people(State(db): State<Db>, headers: HeaderMap) -> Response {
    let base = base_url(&headers);
    let mut people: Vec<Person> = db.read().await.values().cloned().collect();
    people.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

    let embedded: Vec<Value> = people.iter().map(|p| person_json(&base, p)).collect();
    let link = format!(r#"<{base}/people>; rel="people",<{base}/profile/people>; rel="profile""#);
    let mut response = hal(
        StatusCode::OK,
        json!({
            "_embedded": {"people": embedded},
            "_links": {
                "self": {"href": format!("{base}/people")},
                "profile": {"href": format!("{base}/profile/people")},
            }
        }),
    );
    if let Ok(value) = HeaderValue::from_str(&link) {
        response.headers_mut().insert(header::LINK, value);
    }
    response
}

async fn create_person(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<PersonInput>,
) -> Response {
    let base = base_url(&headers);
    let person = Person {
        id: Uuid::new_v4(),
        name: input.name,
        father: input.father,
    };
    tracing::debug!(id = %person.id, name = %person.name, "created person");
    db.write().await.insert(person.id, person.clone());

    let mut response = hal(StatusCode::CREATED, person_json(&base, &person));
    if let Ok(value) = HeaderValue::from_str(&format!("{base}/people/{}", person.id)) {
        response.headers_mut().insert(header::LOCATION, value);
    }
    response
}

async fn get_person(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Response, StatusCode> {
    let people = db.read().await;
    let person = people.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(hal(StatusCode::OK, person_json(&base_url(&headers), person)))
}

async fn replace_person(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(input): Json<PersonInput>,
) -> Result<Response, StatusCode> {
    let mut people = db.write().await;
    let person = people.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    person.name = input.name;
    person.father = input.father;
    Ok(hal(StatusCode::OK, person_json(&base_url(&headers), person)))
}

async fn update_person(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(input): Json<PersonPatch>,
) -> Result<Response, StatusCode> {
    let mut people = db.write().await;
    let person = people.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(name) = input.name {
        person.name = name;
    }
    if let Some(father) = input.father {
        person.father = Some(father);
    }
    Ok(hal(StatusCode::OK, person_json(&base_url(&headers), person)))
}

async fn delete_person(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    let mut people = db.write().await;
    people.remove(&id).map(|_| StatusCode::NO_CONTENT).ok_or(StatusCode::NOT_FOUND)
}

async fn profile_index(headers: HeaderMap) -> Response {
    let base = base_url(&headers);
    hal(
        StatusCode::OK,
        json!({"_links": {
            "self": {"href": format!("{base}/profile")},
            "people": {"href": format!("{base}/profile/people")},
        }}),
    )
}

/// JSON Schema when asked for `application/schema+json`, a small ALPS
/// document otherwise.
async fn people_profile(headers: HeaderMap) -> Response {
    let wants_schema = headers
        .get(header::ACCEPT)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|accept| accept.contains(SCHEMA_JSON));

    if wants_schema {
        return (
            StatusCode::OK,
            [(header::CONTENT_TYPE, HeaderValue::from_static(SCHEMA_JSON))],
            Json(people_schema()),
        )
            .into_response();
    }

    Json(json!({
        "alps": {
            "version": "1.0",
            "descriptor": [{
                "id": "person-representation",
                "descriptor": [
                    {"name": "name", "type": "SEMANTIC"},
                    {"name": "father", "type": "SAFE", "rt": "#person-representation"}
                ]
            }]
        }
    }))
    .into_response()
}
