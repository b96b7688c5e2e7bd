use std::fs;

use anyhow::Result;
use tempfile::TempDir;

use super::FileSessionStore;
use crate::domain::models::SessionStore;
use crate::domain::models::User;
use crate::domain::models::UserRole;

fn patient() -> User {
    return User {
        role: UserRole::Patient,
        email: "patient1@email.com".to_string(),
        zip_code: Some("10001".to_string()),
        hospital_name: None,
    };
}

#[tokio::test]
async fn it_loads_nothing_without_a_file() -> Result<()> {
    let dir = TempDir::new()?;
    let store = FileSessionStore::new(dir.path().join("session.yaml"));

    assert_eq!(store.load().await?, None);
    return Ok(());
}

#[tokio::test]
async fn it_saves_and_loads_user() -> Result<()> {
    let dir = TempDir::new()?;
    let store = FileSessionStore::new(dir.path().join("nested/session.yaml"));

    store.save(&patient()).await?;
    assert_eq!(store.load().await?, Some(patient()));

    let payload = fs::read_to_string(dir.path().join("nested/session.yaml"))?;
    assert!(payload.contains("role: patient"));
    assert!(payload.contains("email: patient1@email.com"));
    assert!(!payload.contains("hospital_name"));

    return Ok(());
}

#[tokio::test]
async fn it_clears_user() -> Result<()> {
    let dir = TempDir::new()?;
    let store = FileSessionStore::new(dir.path().join("session.yaml"));

    store.save(&patient()).await?;
    store.clear().await?;

    assert_eq!(store.load().await?, None);
    assert!(!dir.path().join("session.yaml").exists());

    store.clear().await?;
    return Ok(());
}

#[tokio::test]
async fn it_ignores_unreadable_file() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("session.yaml");
    fs::write(&path, "isLoggedIn: true\nuserType: patient\n")?;

    let store = FileSessionStore::new(path);
    assert_eq!(store.load().await?, None);

    return Ok(());
}
