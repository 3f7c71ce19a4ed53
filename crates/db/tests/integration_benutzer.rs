//! Integration-Tests fuer BenutzerRepository (In-Memory SQLite)

use buchregal_core::BenutzerId;
use buchregal_db::{models::NeuerBenutzer, BenutzerRepository, SqliteDb};

async fn db() -> SqliteDb {
    SqliteDb::in_memory()
        .await
        .expect("In-Memory DB konnte nicht erstellt werden")
}

fn neuer(username: &str) -> NeuerBenutzer<'_> {
    NeuerBenutzer {
        username,
        salt: "00112233445566778899aabbccddeeff",
        password_hash: "feedbeef",
    }
}

#[tokio::test]
async fn benutzer_erstellen_und_laden() {
    let db = db().await;

    let user = db
        .erstellen(neuer("alice"))
        .await
        .expect("Benutzer erstellen fehlgeschlagen");

    assert_eq!(user.username, "alice");
    assert_eq!(user.salt, "00112233445566778899aabbccddeeff");

    let geladen = db
        .laden(user.id)
        .await
        .expect("laden fehlgeschlagen")
        .expect("Benutzer sollte gefunden werden");

    assert_eq!(geladen.id, user.id);
    assert_eq!(geladen.username, "alice");
    assert_eq!(geladen.password_hash, "feedbeef");
}

#[tokio::test]
async fn benutzer_nach_name_laden() {
    let db = db().await;

    db.erstellen(neuer("bob")).await.unwrap();

    let gefunden = db
        .laden_nach_name("bob")
        .await
        .unwrap()
        .expect("Benutzer 'bob' sollte gefunden werden");

    assert_eq!(gefunden.username, "bob");

    let nicht_gefunden = db.laden_nach_name("unbekannt").await.unwrap();
    assert!(nicht_gefunden.is_none());
}

#[tokio::test]
async fn unbekannte_id_gibt_none() {
    let db = db().await;
    let nichts = db.laden(BenutzerId::new()).await.unwrap();
    assert!(nichts.is_none());
}

#[tokio::test]
async fn benutzername_unique() {
    let db = db().await;

    db.erstellen(neuer("charlie")).await.unwrap();

    let err = db.erstellen(neuer("charlie")).await;

    assert!(err.is_err());
    assert!(err.unwrap_err().ist_eindeutigkeit());
}

#[tokio::test]
async fn gleichzeitiges_erstellen_genau_ein_gewinner() {
    let db = db().await;

    // Zwei nebenlaeufige Inserts mit demselben Namen: der UNIQUE-Constraint
    // muss genau einen durchlassen, ohne Fenster zwischen Pruefung und Insert.
    let (a, b) = tokio::join!(db.erstellen(neuer("dora")), db.erstellen(neuer("dora")));

    let erfolge = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(erfolge, 1, "genau ein Insert darf gewinnen");

    let verlierer = if a.is_err() { a } else { b };
    assert!(verlierer.unwrap_err().ist_eindeutigkeit());

    let alle = db.auflisten().await.unwrap();
    assert_eq!(alle.iter().filter(|u| u.username == "dora").count(), 1);
}

#[tokio::test]
async fn benutzer_loeschen() {
    let db = db().await;

    let user = db.erstellen(neuer("eve")).await.unwrap();

    let geloescht = db.loeschen(user.id).await.unwrap();
    assert!(geloescht);

    let geladen = db.laden(user.id).await.unwrap();
    assert!(geladen.is_none());

    // Zweites Loeschen trifft nichts mehr
    let nochmal = db.loeschen(user.id).await.unwrap();
    assert!(!nochmal);
}

#[tokio::test]
async fn benutzer_auflisten_sortiert() {
    let db = db().await;

    for name in &["zoe", "anna", "mia"] {
        db.erstellen(neuer(name)).await.unwrap();
    }

    let alle = db.auflisten().await.unwrap();
    let namen: Vec<&str> = alle.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(namen, vec!["anna", "mia", "zoe"]);
}
