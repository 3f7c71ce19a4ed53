//! Integration-Tests fuer den HTTP-Anmeldefluss (In-Memory SQLite)

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use buchregal_db::SqliteDb;
use buchregal_server::{
    config::ServerConfig,
    routen::{router, AppState},
};

async fn app() -> Router {
    let db = SqliteDb::in_memory()
        .await
        .expect("In-Memory DB konnte nicht erstellt werden");
    router(AppState::neu(db, &ServerConfig::default()))
}

fn formular(pfad: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(pfad)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn seite(pfad: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(pfad);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// Liest "sitzung=<wert>" aus dem Set-Cookie-Header
fn cookie_aus(response: &axum::response::Response) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("Set-Cookie-Header erwartet")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

fn ziel(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("Location-Header erwartet")
        .to_str()
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn index_leitet_anonyme_zur_anmeldung() {
    let app = app().await;

    let response = app.oneshot(seite("/", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(ziel(&response), "/benutzer/login");
}

#[tokio::test]
async fn katalog_ist_geschuetzt() {
    let app = app().await;

    let response = app.oneshot(seite("/katalog", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(ziel(&response), "/benutzer/login");
}

#[tokio::test]
async fn favicon_gibt_204() {
    let app = app().await;
    let response = app.oneshot(seite("/favicon.ico", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn unbekannte_route_gibt_404_json() {
    let app = app().await;
    let response = app.oneshot(seite("/gibt/es/nicht", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], 404);
}

#[tokio::test]
async fn voller_zyklus_signup_login_katalog_logout() {
    let app = app().await;

    // Registrierung: Redirect zur Anmeldeseite, Cookie wird gesetzt
    let response = app
        .clone()
        .oneshot(formular(
            "/benutzer/signup",
            "username=alice&password=pw123&password_confirmed=pw123",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(ziel(&response), "/benutzer/login");
    let cookie = cookie_aus(&response);

    // Anmeldeseite zeigt die Einmal-Nachricht genau einmal
    let response = app
        .clone()
        .oneshot(seite("/benutzer/login", Some(&cookie)))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["nachricht"], "Bitte melde dich mit deinem neuen Konto an.");

    let response = app
        .clone()
        .oneshot(seite("/benutzer/login", Some(&cookie)))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert!(body["nachricht"].is_null(), "Lesen muss die Nachricht leeren");

    // Anmeldung
    let response = app
        .clone()
        .oneshot(formular(
            "/benutzer/login",
            "username=alice&password=pw123",
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(ziel(&response), "/katalog");
    let cookie = cookie_aus(&response);

    // Katalog liefert die rekonstruierte Benutzersicht
    let response = app
        .clone()
        .oneshot(seite("/katalog", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["benutzer"]["username"], "alice");
    assert_eq!(body["benutzer"]["rolle"], "editor");

    // Startseite leitet Angemeldete in den Katalog
    let response = app.clone().oneshot(seite("/", Some(&cookie))).await.unwrap();
    assert_eq!(ziel(&response), "/katalog");

    // Abmeldung
    let response = app
        .clone()
        .oneshot(seite("/benutzer/logout", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(ziel(&response), "/benutzer/login");

    // Das alte Cookie gilt nicht mehr
    let response = app.oneshot(seite("/katalog", Some(&cookie))).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(ziel(&response), "/benutzer/login");
}

#[tokio::test]
async fn signup_mit_abweichender_bestaetigung() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(formular(
            "/benutzer/signup",
            "username=bob&password=p1&password_confirmed=p2",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["nachricht"], "Die Passwoerter stimmen nicht ueberein");

    // Es wurde kein Konto angelegt: Anmeldung schlaegt fehl
    let response = app
        .oneshot(formular("/benutzer/login", "username=bob&password=p1", None))
        .await
        .unwrap();
    assert_eq!(ziel(&response), "/benutzer/login");
}

#[tokio::test]
async fn signup_mit_vergebenem_namen() {
    let app = app().await;

    app.clone()
        .oneshot(formular(
            "/benutzer/signup",
            "username=carla&password=pw&password_confirmed=pw",
            None,
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(formular(
            "/benutzer/signup",
            "username=carla&password=anders&password_confirmed=anders",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(
        body["nachricht"],
        "Benutzername bereits vergeben: carla"
    );
}

#[tokio::test]
async fn gast_bootstrap_ueber_http() {
    let app = app().await;

    // Erster Gast-Login legt das Konto an und meldet an
    let response = app
        .clone()
        .oneshot(formular(
            "/benutzer/login",
            "username=guest&password=letmein",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(ziel(&response), "/katalog");

    // Zweiter Gast-Login funktioniert genauso (kein Duplikat)
    let response = app
        .oneshot(formular(
            "/benutzer/login",
            "username=guest&password=letmein",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(ziel(&response), "/katalog");
}

#[tokio::test]
async fn ablehnung_ist_fuer_beide_faelle_identisch() {
    let app = app().await;

    app.clone()
        .oneshot(formular(
            "/benutzer/signup",
            "username=dora&password=pw&password_confirmed=pw",
            None,
        ))
        .await
        .unwrap();

    // Unbekannter Benutzername
    let response = app
        .clone()
        .oneshot(formular(
            "/benutzer/login",
            "username=niemand&password=egal",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(ziel(&response), "/benutzer/login");
    let cookie = cookie_aus(&response);
    let body = json_body(
        app.clone()
            .oneshot(seite("/benutzer/login", Some(&cookie)))
            .await
            .unwrap(),
    )
    .await;
    let nachricht_unbekannt = body["nachricht"].clone();

    // Falsches Passwort eines existierenden Benutzers
    let response = app
        .clone()
        .oneshot(formular(
            "/benutzer/login",
            "username=dora&password=falsch",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(ziel(&response), "/benutzer/login");
    let cookie = cookie_aus(&response);
    let body = json_body(
        app.oneshot(seite("/benutzer/login", Some(&cookie)))
            .await
            .unwrap(),
    )
    .await;
    let nachricht_falsch = body["nachricht"].clone();

    assert_eq!(
        nachricht_unbekannt, nachricht_falsch,
        "Ablehnungsgruende duerfen nicht unterscheidbar sein"
    );
    assert_eq!(nachricht_unbekannt, "Benutzername oder Passwort falsch");
}
