use anyhow::Result;
use apilink::{
    api::Json,
    commands::{self, Call, build_form, parse_json_object, parse_key_value},
    config::{Config, NotifyMode, Overrides},
    runtime::RealRuntime,
};
use clap::Parser;
use std::path::PathBuf;

/// apilink - call a JSON API with stored credentials
///
/// The access token saved with `apilink token set` is sent as a bearer token
/// with every request. Failed calls print a notification and exit non-zero.
///
/// Examples:
///   apilink get /users -q page=2
///   apilink post /login --data '{"user": "ada", "pass": "secret"}'
#[derive(Parser, Debug)]
#[command(author, version = env!("APILINK_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// API base address (defaults to http://localhost:8000/api)
    #[arg(long = "api-url", env = "APILINK_API_URL", value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Storage file for the access token and language
    #[arg(long, env = "APILINK_STORAGE", value_name = "PATH", global = true)]
    pub storage: Option<PathBuf>,

    /// Message catalog file (JSON)
    #[arg(long, env = "APILINK_CATALOG", value_name = "PATH", global = true)]
    pub catalog: Option<PathBuf>,

    /// Where failure notifications go
    #[arg(long, value_enum, default_value_t = NotifyArg::Console, global = true)]
    pub notify: NotifyArg,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum NotifyArg {
    Console,
    Log,
    Off,
}

impl From<NotifyArg> for NotifyMode {
    fn from(arg: NotifyArg) -> Self {
        match arg {
            NotifyArg::Console => NotifyMode::Console,
            NotifyArg::Log => NotifyMode::Log,
            NotifyArg::Off => NotifyMode::Off,
        }
    }
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Send a GET request
    Get(GetArgs),

    /// Send a POST request with an optional JSON body
    Post(BodyArgs),

    /// Send a PUT request with an optional JSON body
    Put(BodyArgs),

    /// Send a DELETE request
    Delete(PathArgs),

    /// Upload a multipart form
    Upload(UploadArgs),

    /// Manage the stored access token
    #[command(subcommand)]
    Token(TokenCommand),

    /// Show or change the interface language
    #[command(subcommand)]
    Lang(LangCommand),
}

#[derive(clap::Args, Debug)]
pub struct PathArgs {
    /// Path relative to the API base address
    #[arg(value_name = "PATH")]
    pub path: String,
}

#[derive(clap::Args, Debug)]
pub struct GetArgs {
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Query parameter, repeatable
    #[arg(short = 'q', long = "query", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub query: Vec<(String, String)>,
}

#[derive(clap::Args, Debug)]
pub struct BodyArgs {
    #[arg(value_name = "PATH")]
    pub path: String,

    /// JSON object sent as the request body
    #[arg(short = 'd', long = "data", value_name = "JSON", value_parser = parse_json_object)]
    pub data: Option<Json>,
}

#[derive(clap::Args, Debug)]
pub struct UploadArgs {
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Text field, repeatable
    #[arg(long = "field", value_name = "NAME=VALUE", value_parser = parse_key_value)]
    pub fields: Vec<(String, String)>,

    /// File part, repeatable
    #[arg(long = "file", value_name = "NAME=FILE", value_parser = parse_key_value)]
    pub files: Vec<(String, String)>,
}

#[derive(clap::Subcommand, Debug)]
enum TokenCommand {
    /// Save the access token
    Set {
        #[arg(value_name = "TOKEN")]
        token: String,
    },
    /// Show the stored token (masked)
    Show,
    /// Remove the stored token
    Clear,
}

#[derive(clap::Subcommand, Debug)]
enum LangCommand {
    /// Show the current language
    Show,
    /// Switch to another language
    Set {
        #[arg(value_name = "LANG")]
        lang: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = RealRuntime;

    let config = Config::new(
        runtime,
        Overrides {
            api_url: cli.api_url,
            storage: cli.storage,
            catalog: cli.catalog,
            notify: cli.notify.into(),
        },
    )?;

    match cli.command {
        Commands::Get(args) => {
            let call = Call::Get {
                path: args.path,
                query: args.query,
            };
            commands::call(&config.api, call).await?
        }
        Commands::Post(args) => {
            let call = Call::Post {
                path: args.path,
                body: args.data,
            };
            commands::call(&config.api, call).await?
        }
        Commands::Put(args) => {
            let call = Call::Put {
                path: args.path,
                body: args.data,
            };
            commands::call(&config.api, call).await?
        }
        Commands::Delete(args) => {
            commands::call(&config.api, Call::Delete { path: args.path }).await?
        }
        Commands::Upload(args) => {
            let files = args
                .files
                .into_iter()
                .map(|(name, path)| (name, PathBuf::from(path)))
                .collect();
            let form = build_form(&runtime, args.fields, files)?;
            commands::call(&config.api, Call::Upload { path: args.path, form }).await?
        }
        Commands::Token(TokenCommand::Set { token }) => commands::token::set(&config.token, &token)?,
        Commands::Token(TokenCommand::Show) => commands::token::show(&config.token)?,
        Commands::Token(TokenCommand::Clear) => commands::token::clear(&config.token)?,
        Commands::Lang(LangCommand::Show) => commands::lang::show(&config.language)?,
        Commands::Lang(LangCommand::Set { lang }) => {
            commands::lang::set(&config.language, &lang)?
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_get_parsing() {
        let cli = Cli::try_parse_from([
            "apilink", "get", "/users", "-q", "page=2", "--query", "q=red shoes",
        ])
        .unwrap();
        match cli.command {
            Commands::Get(args) => {
                assert_eq!(args.path, "/users");
                assert_eq!(
                    args.query,
                    vec![
                        ("page".to_string(), "2".to_string()),
                        ("q".to_string(), "red shoes".to_string()),
                    ]
                );
            }
            _ => panic!("Expected Get command"),
        }
        assert_eq!(cli.notify, NotifyArg::Console);
    }

    #[test]
    fn test_cli_post_parsing() {
        let cli = Cli::try_parse_from([
            "apilink", "post", "/login", "--data", r#"{"user": "ada"}"#,
        ])
        .unwrap();
        match cli.command {
            Commands::Post(args) => {
                assert_eq!(args.path, "/login");
                assert_eq!(args.data.unwrap()["user"], "ada");
            }
            _ => panic!("Expected Post command"),
        }
    }

    #[test]
    fn test_cli_post_rejects_non_object_body() {
        assert!(Cli::try_parse_from(["apilink", "post", "/login", "--data", "[1]"]).is_err());
    }

    #[test]
    fn test_cli_global_options() {
        let cli = Cli::try_parse_from([
            "apilink",
            "--api-url",
            "https://api.example.com",
            "delete",
            "/users/1",
            "--notify",
            "off",
            "--storage",
            "/tmp/s.json",
        ])
        .unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("https://api.example.com"));
        assert_eq!(cli.storage, Some(PathBuf::from("/tmp/s.json")));
        assert_eq!(NotifyMode::from(cli.notify), NotifyMode::Off);
    }

    #[test]
    fn test_cli_upload_parsing() {
        let cli = Cli::try_parse_from([
            "apilink", "upload", "/media", "--field", "title=me", "--file", "avatar=./me.png",
        ])
        .unwrap();
        match cli.command {
            Commands::Upload(args) => {
                assert_eq!(args.fields, vec![("title".to_string(), "me".to_string())]);
                assert_eq!(args.files, vec![("avatar".to_string(), "./me.png".to_string())]);
            }
            _ => panic!("Expected Upload command"),
        }
    }

    #[test]
    fn test_cli_token_and_lang_parsing() {
        let cli = Cli::try_parse_from(["apilink", "token", "set", "abc"]).unwrap();
        assert!(matches!(cli.command, Commands::Token(TokenCommand::Set { ref token }) if token == "abc"));

        let cli = Cli::try_parse_from(["apilink", "lang", "set", "ar"]).unwrap();
        assert!(matches!(cli.command, Commands::Lang(LangCommand::Set { ref lang }) if lang == "ar"));
    }

    #[test]
    fn test_cli_no_subcommand_fails() {
        assert!(Cli::try_parse_from(["apilink", "/users"]).is_err());
    }
}
