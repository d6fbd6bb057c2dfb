//! Roost - A terminal client for the Delcom social platform
#![allow(clippy::uninlined_format_args)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use roost::app::{App, Command, Event, ProfileForm};
use roost::connectivity::AlwaysOnline;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (RUST_LOG=debug for verbose output)
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match parse_args()? {
        Cli::Login { email, password } => login_cli(&email, &password).await,
        Cli::Register {
            name,
            email,
            password,
        } => register_cli(name, email, password).await,
        Cli::Profile => profile_cli().await,
        Cli::UpdateProfile { name, email, phone } => {
            update_profile_cli(name, email, phone).await
        }
        Cli::Photo { path } => photo_cli(path).await,
        Cli::Posts { all } => posts_cli(all).await,
        Cli::Post { id } => post_cli(id).await,
        Cli::Add { cover, description } => add_cli(cover, description).await,
        Cli::Edit {
            id,
            description,
            cover,
        } => edit_cli(id, description, cover).await,
        Cli::Delete { id } => delete_cli(id).await,
        Cli::Help => {
            print_help();
            Ok(())
        }
        Cli::Version => {
            print_version();
            Ok(())
        }
    }
}

/// CLI commands
enum Cli {
    Login {
        email: String,
        password: String,
    },
    Register {
        name: String,
        email: String,
        password: String,
    },
    Profile,
    UpdateProfile {
        name: Option<String>,
        email: Option<String>,
        phone: Option<String>,
    },
    Photo {
        path: PathBuf,
    },
    Posts {
        all: bool,
    },
    Post {
        id: i64,
    },
    Add {
        cover: PathBuf,
        description: String,
    },
    Edit {
        id: i64,
        description: Option<String>,
        cover: Option<PathBuf>,
    },
    Delete {
        id: i64,
    },
    Help,
    Version,
}

fn parse_args() -> Result<Cli> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() == 1 {
        return Ok(Cli::Help);
    }

    match args[1].as_str() {
        "-h" | "--help" | "help" => Ok(Cli::Help),
        "-v" | "--version" | "version" => Ok(Cli::Version),

        "login" => {
            let email = required(&args, 2, "Missing email\nUsage: roost login <email> <password>")?;
            let password =
                required(&args, 3, "Missing password\nUsage: roost login <email> <password>")?;
            Ok(Cli::Login { email, password })
        }

        "register" => {
            let usage = "Usage: roost register <name> <email> <password>";
            let name = required(&args, 2, usage)?;
            let email = required(&args, 3, usage)?;
            let password = required(&args, 4, usage)?;
            Ok(Cli::Register {
                name,
                email,
                password,
            })
        }

        "profile" => {
            if args.get(2).map(String::as_str) == Some("update") {
                let (mut name, mut email, mut phone) = (None, None, None);
                let mut i = 3;
                while i < args.len() {
                    match args[i].as_str() {
                        "--name" | "-n" => {
                            name = args.get(i + 1).cloned();
                            i += 2;
                        }
                        "--email" | "-e" => {
                            email = args.get(i + 1).cloned();
                            i += 2;
                        }
                        "--phone" | "-p" => {
                            phone = args.get(i + 1).cloned();
                            i += 2;
                        }
                        other => {
                            return Err(anyhow::anyhow!(
                                "Unknown option: {other}\nUsage: roost profile update [--name <name>] [--email <email>] [--phone <phone>]"
                            ));
                        }
                    }
                }
                Ok(Cli::UpdateProfile { name, email, phone })
            } else {
                Ok(Cli::Profile)
            }
        }

        "photo" => {
            let path = required(&args, 2, "Missing file\nUsage: roost photo <file>")?;
            Ok(Cli::Photo { path: path.into() })
        }

        "posts" => {
            let all = args.iter().any(|a| a == "--all" || a == "-a");
            Ok(Cli::Posts { all })
        }

        "post" => {
            let id = parse_id(&args, 2, "Usage: roost post <id>")?;
            Ok(Cli::Post { id })
        }

        "add" => {
            let usage = "Usage: roost add <cover-image> <description>";
            let cover = required(&args, 2, usage)?;
            let description = required(&args, 3, usage)?;
            Ok(Cli::Add {
                cover: cover.into(),
                description,
            })
        }

        "edit" => {
            let id = parse_id(&args, 2, "Usage: roost edit <id> [--description <text>] [--cover <file>]")?;
            let (mut description, mut cover) = (None, None);
            let mut i = 3;
            while i < args.len() {
                match args[i].as_str() {
                    "--description" | "-d" => {
                        description = args.get(i + 1).cloned();
                        i += 2;
                    }
                    "--cover" | "-c" => {
                        cover = args.get(i + 1).cloned().map(PathBuf::from);
                        i += 2;
                    }
                    other => {
                        return Err(anyhow::anyhow!(
                            "Unknown option: {other}\nUsage: roost edit <id> [--description <text>] [--cover <file>]"
                        ));
                    }
                }
            }
            Ok(Cli::Edit {
                id,
                description,
                cover,
            })
        }

        "delete" => {
            let id = parse_id(&args, 2, "Usage: roost delete <id>")?;
            Ok(Cli::Delete { id })
        }

        other => Err(anyhow::anyhow!(
            "Unknown command: {other}\nRun 'roost --help' for usage"
        )),
    }
}

fn required(args: &[String], index: usize, usage: &str) -> Result<String> {
    args.get(index)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("{usage}"))
}

fn parse_id(args: &[String], index: usize, usage: &str) -> Result<i64> {
    required(args, index, usage)?
        .parse()
        .map_err(|_| anyhow::anyhow!("Post id must be a number\n{usage}"))
}

fn print_help() {
    let config_path = roost::Config::default_path()
        .map_or_else(|_| "Unknown".to_string(), |p| p.display().to_string());

    println!(
        r"{}
🪺 Roost - A terminal client for the Delcom social platform

USAGE:
    roost [COMMAND]

COMMANDS:
    login <email> <password>           Log in and print the session token
    register <name> <email> <password> Create an account

    profile                            Show your profile
    profile update [OPTIONS]           Update your profile
      Options:
        -n, --name <name>              New display name
        -e, --email <email>            New email
        -p, --phone <phone>            Phone (stored on this device only)
    photo <file>                       Upload a new profile photo

    posts [--all]                      List your posts (--all: everyone's)
    post <id>                          Show one post with comments
    add <cover-image> <description>    Create a post
    edit <id> [OPTIONS]                Edit a post
      Options:
        -d, --description <text>       New description
        -c, --cover <file>             New cover image
    delete <id>                        Delete a post

OPTIONS:
    -h, --help                         Show this help message
    -v, --version                      Show version information

SESSION:
    The bearer token lives in process memory only. 'roost login' prints an
    export line; set ROOST_TOKEN in your shell to reuse the session:

        export ROOST_TOKEN=<token>

CONFIG:
    {}

HOMEPAGE:
    {}
",
        roost::LOGO,
        config_path,
        roost::REPO_URL
    );
}

fn print_version() {
    println!("roost {}", roost::VERSION);
}

/// Build the app from config, store, and the ROOST_TOKEN environment variable
fn build_app(feed_override: Option<bool>) -> Result<App> {
    let config = roost::Config::load()?;
    let mut client = roost::Client::from_config(&config);

    if let Ok(token) = std::env::var("ROOST_TOKEN")
        && !token.is_empty()
    {
        client.set_token(token);
    }

    let store = roost::Store::open()?;
    let feed_mine = feed_override.unwrap_or(config.feed_mine);

    Ok(App::new(client, store, Arc::new(AlwaysOnline), feed_mine))
}

/// Print progress for events worth narrating
fn report(event: &Event) {
    match event {
        Event::Status(message) => println!("✓ {message}"),
        Event::Registered { message } | Event::PostDeleted { message } => {
            println!("✓ {message}");
        }
        Event::PostAdded { post_id } => println!("✓ Post #{post_id} created"),
        Event::EditPartApplied { part } => println!("✓ {part:?} updated"),
        _ => {}
    }
}

/// Dispatch one command, shut the worker down, and drain every event
async fn run(mut app: App, command: Command) -> App {
    app.dispatch(command).await;
    app.dispatch(Command::Shutdown).await;

    while let Some(event) = app.next_event().await {
        report(&event);
        app.apply(event);
    }

    app
}

/// Turn a recorded error into a process failure
fn finish(app: &App) -> Result<()> {
    match &app.state.error {
        Some(message) => Err(anyhow::anyhow!("{message}")),
        None => Ok(()),
    }
}

/// Pump events until the profile is loaded (or the operation failed)
async fn wait_for_profile(app: &mut App) {
    while app.state.user.is_none() && app.state.error.is_none() {
        let Some(event) = app.next_event().await else {
            break;
        };
        report(&event);
        app.apply(event);
    }
}

async fn login_cli(email: &str, password: &str) -> Result<()> {
    let app = build_app(None)?;
    let app = run(
        app,
        Command::Login {
            email: email.to_string(),
            password: password.to_string(),
        },
    )
    .await;

    if let (Some(user), Some(token)) = (&app.state.session_user, &app.state.token) {
        println!("✓ Logged in as {} <{}>", user.name, user.email);
        println!("\nTo reuse this session in subsequent commands:");
        println!("  export ROOST_TOKEN={token}");
    }

    finish(&app)
}

async fn register_cli(name: String, email: String, password: String) -> Result<()> {
    let app = build_app(None)?;
    let app = run(
        app,
        Command::Register {
            name,
            email,
            password,
        },
    )
    .await;

    if app.state.error.is_none() {
        println!("\nLog in with: roost login <email> <password>");
    }

    finish(&app)
}

fn print_profile(user: &roost::ProfileUser) {
    println!("\n🪺 Profile");
    println!("{}", "─".repeat(40));
    println!("Name:     {}", user.name);
    println!("Email:    {}", user.email);
    println!("Phone:    {}", user.phone.as_deref().unwrap_or("-"));
    println!("Photo:    {}", user.photo.as_deref().unwrap_or("-"));
    println!(
        "Verified: {}",
        user.verified_at
            .map_or_else(|| "no".to_string(), |t| t.format("%Y-%m-%d").to_string())
    );
    println!("Joined:   {}", user.created_at.format("%Y-%m-%d"));
}

async fn profile_cli() -> Result<()> {
    let app = build_app(None)?;
    let app = run(app, Command::LoadProfile).await;

    if let Some(user) = &app.state.user {
        print_profile(user);
    }

    finish(&app)
}

async fn update_profile_cli(
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
) -> Result<()> {
    let mut app = build_app(None)?;

    // Load first: the save plan compares against the displayed profile
    app.dispatch(Command::LoadProfile).await;
    wait_for_profile(&mut app).await;

    let Some(user) = app.state.user.clone() else {
        return finish(&app);
    };

    let mut form = ProfileForm::from_user(&user);
    if let Some(name) = name {
        form.name = name;
    }
    if let Some(email) = email {
        form.email = email;
    }
    if let Some(phone) = phone {
        form.phone = phone;
    }

    let app = run(app, Command::SaveProfile { form }).await;

    if let Some(user) = &app.state.user {
        print_profile(user);
    }

    finish(&app)
}

async fn photo_cli(path: PathBuf) -> Result<()> {
    let app = build_app(None)?;
    let app = run(app, Command::UpdatePhoto { path }).await;
    finish(&app)
}

async fn posts_cli(all: bool) -> Result<()> {
    let app = build_app(all.then_some(false))?;
    let app = run(app, Command::LoadPosts).await;

    if app.state.error.is_none() {
        if app.state.posts.is_empty() {
            println!("No posts yet.");
        } else {
            println!("\n🪺 Posts");
            println!("{}", "─".repeat(60));

            for post in &app.state.posts {
                println!("\n#{} {} · {}", post.id, post.author.name, post.relative_time());
                println!("{}", post.preview(100));
                println!("♥ {}  💬 {}", post.likes.len(), post.comments.len());
            }
        }
    }

    finish(&app)
}

async fn post_cli(id: i64) -> Result<()> {
    let app = build_app(None)?;
    let app = run(app, Command::LoadPost { id }).await;

    if let Some(post) = &app.state.detail {
        println!("\n#{} {} · {}", post.id, post.author.name, post.created_at.format("%Y-%m-%d %H:%M"));
        println!("{}", "─".repeat(60));
        println!("{}", post.description);
        println!("\nCover: {}", post.cover);
        println!("♥ {}  💬 {}", post.likes.len(), post.comments.len());

        for comment in &post.comments {
            println!("\n  · {}", comment.comment);
        }
        if let Some(mine) = &post.my_comment {
            println!("\nYour comment: {}", mine.comment);
        }
    }

    finish(&app)
}

async fn add_cli(cover: PathBuf, description: String) -> Result<()> {
    let app = build_app(None)?;
    let app = run(app, Command::AddPost { cover, description }).await;
    finish(&app)
}

async fn edit_cli(id: i64, description: Option<String>, cover: Option<PathBuf>) -> Result<()> {
    let mut app = build_app(None)?;

    // Fetch the post first so an unchanged description is not re-sent
    app.dispatch(Command::LoadPost { id }).await;
    while app.state.detail.is_none() && app.state.error.is_none() {
        let Some(event) = app.next_event().await else {
            break;
        };
        report(&event);
        app.apply(event);
    }

    let Some(current) = app.state.detail.clone() else {
        return finish(&app);
    };

    let description = description.filter(|d| *d != current.description);

    let app = run(
        app,
        Command::EditPost {
            id,
            description,
            cover,
        },
    )
    .await;

    finish(&app)
}

async fn delete_cli(id: i64) -> Result<()> {
    let app = build_app(None)?;
    let app = run(app, Command::DeletePost { id }).await;
    finish(&app)
}
