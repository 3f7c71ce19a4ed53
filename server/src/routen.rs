//! Routen und Handler fuer die Benutzer-Endpunkte
//!
//! Die Routing-Schicht ist bewusst duenn: sie uebersetzt zwischen HTTP
//! (Sitzungs-Cookie, Formulare, Redirects) und dem Auth-Kern. Das Rendern
//! von Seiten uebernimmt ein vorgelagerter Client; die Handler liefern JSON.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, State},
    http::{header, request::Parts, HeaderMap, HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Json, Redirect, Response},
    routing::get,
    Form, Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::trace::TraceLayer;

use buchregal_auth::{
    AngemeldeterBenutzer, AuthError, GastRichtlinie, IdentitaetsManager, KontoVerwaltung,
    SitzungsStore,
};
use buchregal_core::SitzungsId;
use buchregal_db::SqliteDb;

use crate::config::ServerConfig;

/// Axum-State mit den Auth-Diensten
#[derive(Clone)]
pub struct AppState {
    pub identitaet: Arc<IdentitaetsManager<SqliteDb>>,
    pub konten: Arc<KontoVerwaltung<SqliteDb>>,
    pub cookie_name: String,
}

impl AppState {
    /// Konstruiert alle Auth-Dienste mit ihren Abhaengigkeiten
    pub fn neu(db: SqliteDb, config: &ServerConfig) -> Self {
        let repo = Arc::new(db);
        let sitzungen = SitzungsStore::neu_mit_cleanup(SitzungsStore::mit_ttl_sekunden(
            config.session.ttl_stunden * 3600,
        ));
        let gast = GastRichtlinie::neu(config.server.gast_login);

        Self {
            identitaet: Arc::new(IdentitaetsManager::neu(Arc::clone(&repo), gast, sitzungen)),
            konten: Arc::new(KontoVerwaltung::neu(repo)),
            cookie_name: config.session.cookie_name.clone(),
        }
    }
}

/// Erstellt den vollstaendigen Router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/favicon.ico", get(favicon))
        .route("/katalog", get(katalog))
        .route("/benutzer/login", get(login_seite).post(login))
        .route("/benutzer/logout", get(logout))
        .route("/benutzer/signup", get(signup_seite).post(signup))
        .fallback(nicht_gefunden)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Sitzungs-Cookie
// ---------------------------------------------------------------------------

/// Extrahiert die SitzungsId aus dem Cookie-Header
fn sitzungs_id_aus_headers(headers: &HeaderMap, cookie_name: &str) -> Option<SitzungsId> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|paar| {
        let (name, wert) = paar.trim().split_once('=')?;
        (name == cookie_name).then(|| SitzungsId::from(wert))
    })
}

/// Verwendet die Sitzung aus dem Cookie weiter oder legt eine frische an
async fn bestehende_oder_neue_sitzung(state: &AppState, headers: &HeaderMap) -> SitzungsId {
    if let Some(id) = sitzungs_id_aus_headers(headers, &state.cookie_name) {
        if state.identitaet.sitzungen().laden(&id).await.is_some() {
            return id;
        }
    }
    state.identitaet.sitzungen().erstellen().await.id
}

/// Haengt das Sitzungs-Cookie an eine Antwort
fn antwort_mit_cookie(
    antwort: impl IntoResponse,
    cookie_name: &str,
    id: &SitzungsId,
) -> Response {
    let mut response = antwort.into_response();
    let cookie = format!(
        "{cookie_name}={}; Path=/; HttpOnly; SameSite=Lax",
        id.als_str()
    );
    if let Ok(wert) = HeaderValue::from_str(&cookie) {
        response.headers_mut().insert(header::SET_COOKIE, wert);
    }
    response
}

// ---------------------------------------------------------------------------
// Extractor fuer den angemeldeten Benutzer
// ---------------------------------------------------------------------------

/// Request-Extractor: rekonstruiert die Benutzersicht aus der Sitzung
///
/// Anonyme Requests werden zur Anmeldeseite umgeleitet. Ueber
/// `Option<Angemeldet>` koennen Handler stattdessen selbst verzweigen.
pub struct Angemeldet(pub AngemeldeterBenutzer);

#[async_trait]
impl FromRequestParts<AppState> for Angemeldet {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(id) = sitzungs_id_aus_headers(&parts.headers, &state.cookie_name) else {
            return Err(Redirect::to("/benutzer/login").into_response());
        };

        match state.identitaet.aktueller_benutzer(&id).await {
            Ok(Some(benutzer)) => Ok(Self(benutzer)),
            Ok(None) => Err(Redirect::to("/benutzer/login").into_response()),
            Err(e) => Err(interner_fehler(e)),
        }
    }
}

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

/// GET / – leitet je nach Anmeldestatus weiter
async fn index(benutzer: Option<Angemeldet>) -> Redirect {
    if benutzer.is_some() {
        Redirect::to("/katalog")
    } else {
        Redirect::to("/benutzer/login")
    }
}

/// GET /favicon.ico – 204 statt 404-Rauschen im Log
async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// GET /katalog – geschuetzter Einstieg in den Katalog
async fn katalog(Angemeldet(benutzer): Angemeldet) -> Json<serde_json::Value> {
    Json(json!({ "titel": "Katalog", "benutzer": benutzer }))
}

/// GET /benutzer/login – Anmeldeseite mit abgeholter Einmal-Nachricht
async fn login_seite(
    State(state): State<AppState>,
    benutzer: Option<Angemeldet>,
    headers: HeaderMap,
) -> Response {
    // Angemeldete Benutzer sehen die Anmeldeseite nicht
    if benutzer.is_some() {
        return Redirect::to("/katalog").into_response();
    }

    let nachricht = match sitzungs_id_aus_headers(&headers, &state.cookie_name) {
        Some(id) => state.identitaet.nachricht_abholen(&id).await,
        None => None,
    };
    Json(json!({ "titel": "Anmelden", "nachricht": nachricht })).into_response()
}

#[derive(Debug, Deserialize)]
pub struct LoginFormular {
    pub username: String,
    pub password: String,
}

/// POST /benutzer/login – Anmeldeversuch
async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(formular): Form<LoginFormular>,
) -> Response {
    let sitzung = bestehende_oder_neue_sitzung(&state, &headers).await;

    match state
        .identitaet
        .anmelden(&sitzung, &formular.username, &formular.password)
        .await
    {
        Ok(_) => antwort_mit_cookie(Redirect::to("/katalog"), &state.cookie_name, &sitzung),
        Err(e) if e.ist_benutzerfehler() => {
            state.identitaet.nachricht_setzen(&sitzung, e.to_string()).await;
            antwort_mit_cookie(
                Redirect::to("/benutzer/login"),
                &state.cookie_name,
                &sitzung,
            )
        }
        Err(e) => interner_fehler(e),
    }
}

/// GET /benutzer/logout – Abmeldung, Token wird vor der Antwort entfernt
async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Redirect {
    if let Some(id) = sitzungs_id_aus_headers(&headers, &state.cookie_name) {
        state.identitaet.abmelden(&id).await;
    }
    Redirect::to("/benutzer/login")
}

/// GET /benutzer/signup – Registrierungsseite
async fn signup_seite(benutzer: Option<Angemeldet>) -> Response {
    if benutzer.is_some() {
        return Redirect::to("/katalog").into_response();
    }
    Json(json!({ "titel": "Registrieren" })).into_response()
}

#[derive(Debug, Deserialize)]
pub struct SignupFormular {
    pub username: String,
    pub password: String,
    pub password_confirmed: String,
}

/// POST /benutzer/signup – Registrierung
async fn signup(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(formular): Form<SignupFormular>,
) -> Response {
    match state
        .konten
        .registrieren(
            &formular.username,
            &formular.password,
            &formular.password_confirmed,
        )
        .await
    {
        Ok(_) => {
            let sitzung = bestehende_oder_neue_sitzung(&state, &headers).await;
            state
                .identitaet
                .nachricht_setzen(&sitzung, "Bitte melde dich mit deinem neuen Konto an.")
                .await;
            antwort_mit_cookie(
                Redirect::to("/benutzer/login"),
                &state.cookie_name,
                &sitzung,
            )
        }
        Err(e) if e.ist_benutzerfehler() => {
            Json(json!({ "titel": "Registrieren", "nachricht": e.to_string() })).into_response()
        }
        Err(e) => interner_fehler(e),
    }
}

/// Fallback – 404 als JSON
async fn nicht_gefunden(uri: Uri) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": { "code": 404, "message": format!("Nicht gefunden: {uri}") }
        })),
    )
        .into_response()
}

/// Infrastrukturfehler: protokollieren und Request mit 500 beenden
fn interner_fehler(fehler: AuthError) -> Response {
    tracing::error!(fehler = %fehler, "Interner Fehler im Auth-Kern");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": { "code": 500, "message": "Interner Serverfehler" }
        })),
    )
        .into_response()
}
