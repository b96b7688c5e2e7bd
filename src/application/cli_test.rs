use anyhow::Result;

use super::build;
use super::check_chat_access;
use super::login;
use super::login_request;
use crate::domain::models::User;
use crate::domain::models::UserRole;
use crate::domain::services::AuthSession;
use crate::infrastructure::session_stores::MemorySessionStore;

fn user(role: UserRole) -> User {
    return User {
        role,
        email: "someone@med.com".to_string(),
        zip_code: None,
        hospital_name: None,
    };
}

#[test]
fn it_builds_the_root_command() {
    let cmd = build();
    assert_eq!(cmd.get_name(), "mediconnect");

    let subcommands = cmd
        .get_subcommands()
        .map(|e| return e.get_name().to_string())
        .collect::<Vec<String>>();
    for name in [
        "chat",
        "completions",
        "config",
        "debug",
        "login",
        "logout",
        "whoami",
    ] {
        assert!(subcommands.contains(&name.to_string()), "missing {name}");
    }
}

#[test]
fn it_accepts_global_args_after_subcommands() -> Result<()> {
    let matches = build().try_get_matches_from(vec![
        "mediconnect",
        "chat",
        "--model",
        "gemini-1.5-flash",
        "--history-limit",
        "10",
    ])?;

    let (_, chat_matches) = matches.subcommand().unwrap();
    assert_eq!(
        chat_matches.get_one::<String>("model").unwrap(),
        "gemini-1.5-flash"
    );
    assert_eq!(chat_matches.get_one::<String>("history-limit").unwrap(), "10");

    return Ok(());
}

#[test]
fn it_rejects_non_numeric_timeouts() {
    let res = build().try_get_matches_from(vec![
        "mediconnect",
        "chat",
        "--completion-timeout",
        "soon",
    ]);
    assert!(res.is_err());
}

#[test]
fn it_rejects_unknown_backends() {
    let res = build().try_get_matches_from(vec!["mediconnect", "-b", "ollama"]);
    assert!(res.is_err());
}

#[test]
fn it_requires_login_email() {
    let res = build().try_get_matches_from(vec![
        "mediconnect",
        "login",
        "--password",
        "password123",
    ]);
    assert!(res.is_err());
}

#[test]
fn it_builds_login_requests() -> Result<()> {
    let matches = build().try_get_matches_from(vec![
        "mediconnect",
        "login",
        "-e",
        "pharmacy1@med.com",
        "-p",
        "pharmacy2024",
        "-r",
        "pharmacy",
        "--hospital",
        "City General",
    ])?;

    let (_, login_matches) = matches.subcommand().unwrap();
    let req = login_request(login_matches)?;
    assert_eq!(req.email, "pharmacy1@med.com");
    assert_eq!(req.password, "pharmacy2024");
    assert_eq!(req.role, UserRole::Pharmacy);
    assert_eq!(req.hospital_name, Some("City General".to_string()));
    assert_eq!(req.zip_code, None);

    return Ok(());
}

#[test]
fn it_defaults_login_role_to_patient() -> Result<()> {
    let matches = build().try_get_matches_from(vec![
        "mediconnect",
        "login",
        "-e",
        "patient1@email.com",
        "-p",
        "password123",
    ])?;

    let (_, login_matches) = matches.subcommand().unwrap();
    assert_eq!(login_request(login_matches)?.role, UserRole::Patient);

    return Ok(());
}

#[test]
fn it_only_lets_patients_chat() {
    assert!(check_chat_access(Some(&user(UserRole::Patient))).is_ok());
    assert!(check_chat_access(Some(&user(UserRole::Hospital))).is_err());
    assert!(check_chat_access(Some(&user(UserRole::Pharmacy))).is_err());
    assert!(check_chat_access(Some(&user(UserRole::Admin))).is_err());

    let res = check_chat_access(None);
    assert!(res.unwrap_err().to_string().contains("sign in"));
}

#[tokio::test]
async fn it_signs_in_demo_patients() -> Result<()> {
    let mut session = AuthSession::init(MemorySessionStore::default()).await?;
    let matches = build().try_get_matches_from(vec![
        "mediconnect",
        "login",
        "-e",
        "Patient1@Email.com",
        "-p",
        "password123",
    ])?;
    let (_, login_matches) = matches.subcommand().unwrap();

    let res = login(&mut session, login_request(login_matches)?).await?;
    assert_eq!(
        res,
        "Welcome to MediConnect! Signed in as patient1@email.com (patient)"
    );
    assert!(session.is_logged_in());

    return Ok(());
}

#[tokio::test]
async fn it_reports_bad_credentials() -> Result<()> {
    let mut session = AuthSession::init(MemorySessionStore::default()).await?;
    let matches = build().try_get_matches_from(vec![
        "mediconnect",
        "login",
        "-e",
        "patient1@email.com",
        "-p",
        "wrong",
    ])?;
    let (_, login_matches) = matches.subcommand().unwrap();

    let res = login(&mut session, login_request(login_matches)?).await?;
    assert!(res.contains("Invalid email or password. Please try again."));
    assert!(!session.is_logged_in());

    return Ok(());
}
