#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::ArgMatches;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use yansi::Paint;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::BackendName;
use crate::domain::models::SessionStore;
use crate::domain::models::User;
use crate::domain::models::UserRole;
use crate::domain::services::actions::help_text;
use crate::domain::services::AuthSession;
use crate::domain::services::LoginError;
use crate::domain::services::LoginRequest;
use crate::infrastructure::session_stores::FileSessionStore;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
    std::process::exit(0);
}

fn parse_positive_integer(val: &str) -> Result<String, String> {
    if val.parse::<u64>().is_err() {
        return Err("Value must be a positive number".to_string());
    }

    return Ok(val.to_string());
}

fn format_user(user: &User) -> String {
    let mut res = format!("Signed in as {} ({})", user.email, user.role);
    if let Some(hospital_name) = &user.hospital_name {
        res = format!("{res}, Hospital: {hospital_name}");
    }
    if let Some(zip_code) = &user.zip_code {
        res = format!("{res}, ZIP: {zip_code}");
    }

    return res;
}

/// The assistant lives in the patient portal. Everyone else is turned away.
pub fn check_chat_access(user: Option<&User>) -> Result<()> {
    match user {
        None => {
            bail!("You need to sign in before chatting with the Health Assistant.\nRun `mediconnect login --email <EMAIL> --password <PASSWORD>` to continue.");
        }
        Some(user) if user.role != UserRole::Patient => {
            bail!(
                "The Health Assistant is only available in the patient portal. You're signed in as {} ({}).",
                user.email,
                user.role
            );
        }
        Some(_) => {
            return Ok(());
        }
    }
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if let Some(parent) = config_file_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut file = fs::File::create(&config_file_path).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

fn login_request(matches: &ArgMatches) -> Result<LoginRequest> {
    let role_str = matches
        .get_one::<String>("role")
        .map(|e| return e.to_string())
        .unwrap_or_else(|| return UserRole::Patient.to_string());
    let role = match UserRole::parse(&role_str) {
        Some(role) => role,
        None => bail!("Unknown role {role_str}"),
    };

    let value = |name: &str| {
        return matches
            .get_one::<String>(name)
            .map(|e| return e.to_string());
    };

    return Ok(LoginRequest {
        email: value("email").unwrap_or_default(),
        password: value("password").unwrap_or_default(),
        role,
        zip_code: value("zip-code"),
        hospital_name: value("hospital"),
    });
}

/// Signs in and returns the user message to print. Wrong credentials are
/// reported, not raised.
pub async fn login<S: SessionStore>(
    session: &mut AuthSession<S>,
    req: LoginRequest,
) -> Result<String> {
    match session.login(req).await {
        Ok(user) => {
            return Ok(format!("Welcome to MediConnect! {}", format_user(user)));
        }
        Err(err) => {
            if let Some(login_err) = err.downcast_ref::<LoginError>() {
                return Ok(Paint::red(login_err.to_string()).to_string());
            }

            return Err(err);
        }
    }
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_debug() -> Command {
    let mut cmd = Command::new("debug");
    cmd = cmd.about("Debug helpers for MediConnect")
        .hide(true)
        .subcommand(
            Command::new("log-path").about("Output path to debug log file generated when running MediConnect with environment variable RUST_LOG=mediconnect")
        )
        .subcommand(
            Command::new("enum-config").about("List all config keys as strings.")
        );

    return cmd;
}

fn subcommand_login() -> Command {
    return Command::new("login")
        .about("Signs in to the MediConnect portal with a demo account.")
        .arg(
            Arg::new("email")
                .short('e')
                .long("email")
                .help("Account email address.")
                .num_args(1)
                .required(true),
        )
        .arg(
            Arg::new("password")
                .short('p')
                .long("password")
                .env("MEDICONNECT_PASSWORD")
                .hide_env_values(true)
                .help("Account password.")
                .num_args(1)
                .required(true),
        )
        .arg(
            Arg::new("role")
                .short('r')
                .long("role")
                .help("Portal to sign in to.")
                .num_args(1)
                .default_value("patient")
                .value_parser(PossibleValuesParser::new(UserRole::VARIANTS)),
        )
        .arg(
            Arg::new("zip-code")
                .long("zip-code")
                .help("ZIP code, used to find nearby providers.")
                .num_args(1),
        )
        .arg(
            Arg::new("hospital")
                .long("hospital")
                .help("Hospital you're associated with. Required for pharmacy accounts.")
                .num_args(1),
        );
}

fn arg_backend() -> Arg {
    return Arg::new(ConfigKey::Backend.to_string())
        .short('b')
        .long(ConfigKey::Backend.to_string())
        .env("MEDICONNECT_BACKEND")
        .num_args(1)
        .help(format!(
            "The backend hosting the assistant model. [default: {}]",
            Config::default(ConfigKey::Backend)
        ))
        .value_parser(PossibleValuesParser::new(BackendName::VARIANTS))
        .global(true);
}

fn arg_integer(key: ConfigKey, env: &'static str, help: &str) -> Arg {
    return Arg::new(key.to_string())
        .long(key.to_string())
        .env(env)
        .num_args(1)
        .help(format!("{help} [default: {}]", Config::default(key)))
        .value_parser(parse_positive_integer)
        .global(true);
}

pub fn build() -> Command {
    let commands_text = help_text()
        .split('\n')
        .map(|line| {
            if line.starts_with('-') {
                return format!("  {line}");
            }
            if line.starts_with("COMMANDS:")
                || line.starts_with("HOTKEYS:")
                || line.starts_with("ATTACHMENTS:")
            {
                return Paint::new(format!("CHAT {line}"))
                    .underline()
                    .bold()
                    .to_string();
            }
            return line.to_string();
        })
        .collect::<Vec<String>>()
        .join("\n");

    let about = format!(
        "{}\n\nVersion: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
    );

    return Command::new("mediconnect")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(commands_text)
        .arg_required_else_help(false)
        .subcommand(Command::new("chat").about("Start a chat with the Health Assistant. Requires a signed-in patient."))
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_debug())
        .subcommand(subcommand_login())
        .subcommand(Command::new("logout").about("Signs out of the MediConnect portal."))
        .subcommand(Command::new("whoami").about("Shows the signed-in account."))
        .arg(arg_backend())
        .arg(arg_integer(
            ConfigKey::BackendHealthCheckTimeout,
            "MEDICONNECT_BACKEND_HEALTH_CHECK_TIMEOUT",
            "Time to wait in milliseconds before timing out when doing a healthcheck for a backend.",
        ))
        .arg(arg_integer(
            ConfigKey::CompletionTimeout,
            "MEDICONNECT_COMPLETION_TIMEOUT",
            "Time to wait in milliseconds for the assistant to answer before giving up.",
        ))
        .arg(arg_integer(
            ConfigKey::HistoryLimit,
            "MEDICONNECT_HISTORY_LIMIT",
            "Number of trailing transcript turns sent with each question. 0 sends the whole conversation.",
        ))
        .arg(arg_integer(
            ConfigKey::MaxOutputTokens,
            "MEDICONNECT_MAX_OUTPUT_TOKENS",
            "Upper bound on the length of each answer, in tokens.",
        ))
        .arg(
            Arg::new(ConfigKey::Model.to_string())
                .short('m')
                .long(ConfigKey::Model.to_string())
                .env("MEDICONNECT_MODEL")
                .num_args(1)
                .help(format!("The Gemini model answering questions. [default: {}]", Config::default(ConfigKey::Model)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("MEDICONNECT_CONFIG_FILE")
                .num_args(1)
                .help(format!("Path to configuration file [default: {}]", Config::default(ConfigKey::ConfigFile)))
                .global(true)
        )
        .arg(
            Arg::new(ConfigKey::GeminiURL.to_string())
                .long(ConfigKey::GeminiURL.to_string())
                .env("MEDICONNECT_GEMINI_URL")
                .num_args(1)
                .help(format!("Gemini API URL. Can be swapped to a compatible proxy. [default: {}]", Config::default(ConfigKey::GeminiURL)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::GeminiApiKey.to_string())
                .long(ConfigKey::GeminiApiKey.to_string())
                .env("MEDICONNECT_GEMINI_API_KEY")
                .hide_env_values(true)
                .num_args(1)
                .help("Google Gemini API key. Prefer the MEDICONNECT_GEMINI_API_KEY environment variable.")
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::SessionFile.to_string())
                .long(ConfigKey::SessionFile.to_string())
                .env("MEDICONNECT_SESSION_FILE")
                .num_args(1)
                .help(format!("Where the signed-in account is remembered between runs. [default: {}]", Config::default(ConfigKey::SessionFile)))
                .global(true),
        );
}

/// Runs the requested subcommand. Returns the signed-in session when the
/// chat should start.
pub async fn parse() -> Result<Option<AuthSession<FileSessionStore>>> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("debug", debug_matches)) => {
            match debug_matches.subcommand() {
                Some(("log-path", _)) => {
                    let log_path = Config::log_dir().join("debug.log");
                    println!("{}", log_path.to_string_lossy());
                }
                Some(("enum-config", _)) => {
                    let res = ConfigKey::VARIANTS.join("\n");
                    println!("{}", res);
                }
                _ => {
                    subcommand_debug().print_long_help()?;
                }
            }

            return Ok(None);
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
            return Ok(None);
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(None);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(None);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(None);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(None);
            }
        },
        Some(("login", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            let mut session = AuthSession::init(FileSessionStore::default()).await?;
            let res = login(&mut session, login_request(subcmd_matches)?).await?;
            println!("{res}");
            return Ok(None);
        }
        Some(("logout", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            let mut session = AuthSession::init(FileSessionStore::default()).await?;
            session.logout().await?;
            println!("Signed out of MediConnect.");
            return Ok(None);
        }
        Some(("whoami", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            let session = AuthSession::init(FileSessionStore::default()).await?;
            match session.user() {
                Some(user) => println!("{}", format_user(user)),
                None => println!("Not signed in."),
            }
            return Ok(None);
        }
        Some(("chat", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
        }
        _ => {
            Config::load(build(), vec![&matches]).await?;
        }
    }

    let session = AuthSession::init(FileSessionStore::default()).await?;
    if let Err(err) = check_chat_access(session.user()) {
        eprintln!("{}", Paint::yellow(err.to_string()));
        return Ok(None);
    }

    return Ok(Some(session));
}
