use std::fs;
use std::io;
use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use board_client::{
    AuthResponse, BoardClient, BoardClientError, Bug, BugUpdate, ListPostsQuery, NewBug, Post,
    PostUpdate,
};
use clap::{Parser, Subcommand};

const TOKEN_FILE: &str = ".board_token";
const DEFAULT_SERVER: &str = "http://127.0.0.1:5000";
const SERVER_ENV: &str = "BOARD_SERVER";

#[derive(Debug, Parser)]
#[command(name = "board-cli", version, about = "CLI клиент для posts-api и bugs-api")]
struct Cli {
    /// Адрес сервера. По умолчанию `BOARD_SERVER` или http://127.0.0.1:5000.
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Регистрация пользователя.
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Вход пользователя.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Удаляет сохранённый токен.
    Logout,
    /// Операции с постами.
    #[command(subcommand)]
    Posts(PostsCommand),
    /// Операции с баг-трекером.
    #[command(subcommand)]
    Bugs(BugsCommand),
}

#[derive(Debug, Subcommand)]
enum PostsCommand {
    /// Список постов.
    List {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Получение поста по id.
    Get {
        #[arg(long)]
        id: String,
    },
    /// Создание поста (требует токен).
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        category: Option<String>,
    },
    /// Частичное обновление поста (требует токен владельца).
    Update {
        #[arg(long)]
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Удаление поста (требует токен владельца).
    Delete {
        #[arg(long)]
        id: String,
    },
}

#[derive(Debug, Subcommand)]
enum BugsCommand {
    /// Список багов.
    List,
    /// Получение бага по id.
    Get {
        #[arg(long)]
        id: String,
    },
    /// Заведение бага.
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// open, in-progress или resolved.
        #[arg(long)]
        status: Option<String>,
    },
    /// Частичное обновление бага.
    Update {
        #[arg(long)]
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Удаление бага.
    Delete {
        #[arg(long)]
        id: String,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Ошибка: {err}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let server = resolve_server(cli.server, std::env::var(SERVER_ENV).ok());
    let mut client = BoardClient::new(server).map_err(map_client_error)?;

    if let Some(token) = load_token().context("не удалось прочитать .board_token")? {
        client.set_token(token);
    }

    match cli.command {
        Command::Register {
            username,
            email,
            password,
        } => {
            let auth = client
                .register(&username, &email, &password)
                .await
                .map_err(map_client_error)?;
            persist_token(&client).context("не удалось сохранить токен")?;
            print_auth("Регистрация успешна", &auth);
        }
        Command::Login { username, password } => {
            let auth = client
                .login(&username, &password)
                .await
                .map_err(map_client_error)?;
            persist_token(&client).context("не удалось сохранить токен")?;
            print_auth("Вход выполнен", &auth);
        }
        Command::Logout => {
            remove_token().context("не удалось удалить токен")?;
            println!("Токен удалён");
        }
        Command::Posts(command) => run_posts(&client, command).await?,
        Command::Bugs(command) => run_bugs(&client, command).await?,
    }

    Ok(())
}

async fn run_posts(client: &BoardClient, command: PostsCommand) -> Result<()> {
    match command {
        PostsCommand::List {
            category,
            page,
            limit,
        } => {
            let query = ListPostsQuery {
                category,
                page,
                limit,
            };
            let posts = client.list_posts(&query).await.map_err(map_client_error)?;
            println!("Постов: {}", posts.len());
            for post in &posts {
                println!("- [{}] {} (author={})", post.id, post.title, post.author);
            }
        }
        PostsCommand::Get { id } => {
            let post = client.get_post(&id).await.map_err(map_client_error)?;
            print_post("Пост", &post);
        }
        PostsCommand::Create {
            title,
            content,
            category,
        } => {
            let post = client
                .create_post(&title, &content, category.as_deref())
                .await
                .map_err(map_client_error)?;
            print_post("Пост создан", &post);
        }
        PostsCommand::Update {
            id,
            title,
            content,
            category,
        } => {
            let update = PostUpdate {
                title,
                content,
                category,
            };
            let post = client
                .update_post(&id, &update)
                .await
                .map_err(map_client_error)?;
            print_post("Пост обновлён", &post);
        }
        PostsCommand::Delete { id } => {
            client.delete_post(&id).await.map_err(map_client_error)?;
            println!("Пост удалён: id={id}");
        }
    }
    Ok(())
}

async fn run_bugs(client: &BoardClient, command: BugsCommand) -> Result<()> {
    match command {
        BugsCommand::List => {
            let bugs = client.list_bugs().await.map_err(map_client_error)?;
            println!("Багов: {}", bugs.len());
            for bug in &bugs {
                println!("- [{}] {} ({})", bug.id, bug.title, bug.status);
            }
        }
        BugsCommand::Get { id } => {
            let bug = client.get_bug(&id).await.map_err(map_client_error)?;
            print_bug("Баг", &bug);
        }
        BugsCommand::Create {
            title,
            description,
            status,
        } => {
            let bug = client
                .create_bug(&NewBug {
                    title,
                    description,
                    status,
                })
                .await
                .map_err(map_client_error)?;
            print_bug("Баг заведён", &bug);
        }
        BugsCommand::Update {
            id,
            title,
            description,
            status,
        } => {
            let update = BugUpdate {
                title,
                description,
                status,
            };
            let bug = client
                .update_bug(&id, &update)
                .await
                .map_err(map_client_error)?;
            print_bug("Баг обновлён", &bug);
        }
        BugsCommand::Delete { id } => {
            client.delete_bug(&id).await.map_err(map_client_error)?;
            println!("Баг удалён: id={id}");
        }
    }
    Ok(())
}

fn resolve_server(flag: Option<String>, env: Option<String>) -> String {
    let raw = flag
        .or(env)
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SERVER.to_string());
    normalize_server(raw.trim().to_string())
}

fn normalize_server(server: String) -> String {
    if server.starts_with("http://") || server.starts_with("https://") {
        return server;
    }

    format!("http://{server}")
}

fn parse_token_content(raw: &str) -> Option<String> {
    let token = raw.trim().to_string();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

fn load_token() -> io::Result<Option<String>> {
    if !Path::new(TOKEN_FILE).exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(TOKEN_FILE)?;
    Ok(parse_token_content(&raw))
}

fn persist_token(client: &BoardClient) -> io::Result<()> {
    if let Some(token) = client.get_token() {
        fs::write(TOKEN_FILE, token)?;
    }
    Ok(())
}

fn remove_token() -> io::Result<()> {
    match fs::remove_file(TOKEN_FILE) {
        Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
        _ => Ok(()),
    }
}

fn map_client_error(err: BoardClientError) -> anyhow::Error {
    let message = match err {
        BoardClientError::Unauthorized(message) => format!(
            "требуется авторизация ({message}): выполните `board-cli login ...` или `board-cli register ...`"
        ),
        BoardClientError::Forbidden(_) => "ресурс принадлежит другому пользователю".to_string(),
        BoardClientError::NotFound(_) => "ресурс не найден".to_string(),
        BoardClientError::Conflict(message) => format!("конфликт: {message}"),
        BoardClientError::InvalidRequest(message) => format!("некорректный запрос: {message}"),
        BoardClientError::Server { status, message } => {
            format!("ошибка сервера {status}: {message}")
        }
        BoardClientError::Http(err) => format!("ошибка HTTP: {err}"),
    };
    anyhow::anyhow!(message)
}

fn print_auth(title: &str, auth: &AuthResponse) {
    println!("{title}");
    println!("token: {}", auth.access_token);
    println!("user:");
    println!("  id: {}", auth.user.id);
    println!("  username: {}", auth.user.username);
    println!("  email: {}", auth.user.email);
    println!("  created_at: {}", auth.user.created_at);
}

fn print_post(title: &str, post: &Post) {
    println!("{title}");
    println!("id: {}", post.id);
    println!("title: {}", post.title);
    println!("slug: {}", post.slug);
    println!("content: {}", post.content);
    println!("author: {}", post.author);
    if let Some(category) = &post.category {
        println!("category: {category}");
    }
    println!("created_at: {}", post.created_at);
    println!("updated_at: {}", post.updated_at);
}

fn print_bug(title: &str, bug: &Bug) {
    println!("{title}");
    println!("id: {}", bug.id);
    println!("title: {}", bug.title);
    println!("status: {}", bug.status);
    println!("description: {}", bug.description);
    println!("created_at: {}", bug.created_at);
    println!("updated_at: {}", bug.updated_at);
}
