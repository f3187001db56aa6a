extern crate clap;
extern crate colored;
extern crate log;
extern crate reqwest;
extern crate serde;
extern crate tokio;

use colored::*;
use futures::StreamExt;
use serde_json::{json, Value};

#[allow(unused_imports)]
use log::{debug, error, info, warn};

mod banner;
use crate::banner::print_banner;

mod models;
use crate::models::queue::{CurrentSong, ErrorBody, EventFramer, QueueItem, QueueSnapshot};

use clap::{Args, Parser, Subcommand};

const ADMIN_HEADER: &str = "X-Admin-Secret";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show who is singing, who is next, and how long the queue is
    Status,
    /// List the whole queue
    Queue,
    /// Put a song request at the end of the queue
    Add(SongArgs),
    /// Move the head of the queue up to the mic
    Advance,
    /// Announce a song that is not in the queue
    Current(SongArgs),
    /// Clear the current song
    Clear,
    /// Drop a request from the queue
    Remove(RemoveArgs),
    /// Move a request to a new position
    Move(MoveArgs),
    /// Follow the live feed, printing every change
    Watch,
    /// Search the songbook
    Songbook(SongbookArgs),
}

#[derive(Debug, Args)]
struct SongArgs {
    #[clap(help = "Song title", required = true)]
    title: String,
    #[clap(help = "Performing artist", required = true)]
    artist: String,
    #[clap(long, help = "Songbook id of the song")]
    song_ref: Option<String>,
}

#[derive(Debug, Args)]
struct RemoveArgs {
    #[clap(help = "Queue item id", required = true)]
    id: u64,
}

#[derive(Debug, Args)]
struct MoveArgs {
    #[clap(help = "Queue item id", required = true)]
    id: u64,
    #[clap(help = "New 1-based position", required = true)]
    position: i64,
}

#[derive(Debug, Args)]
struct SongbookArgs {
    #[clap(help = "Case-insensitive text to look for")]
    filter: Option<String>,
}

/// Where the service lives and how to prove we are the admin.
struct Api {
    client: reqwest::Client,
    host: String,
    secret: Option<String>,
}

impl Api {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.host.trim_end_matches('/'), path)
    }

    fn admin(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.secret {
            Some(secret) => builder.header(ADMIN_HEADER, secret),
            None => {
                warn!("[!] KARAQUEUE_ADMIN_SECRET is not set, the server will refuse this");
                builder
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize the logger
    env_logger::init();

    let host = match std::env::var("KARAQUEUE_HOST") {
        Ok(hostname) => hostname,
        Err(_) => {
            eprintln!("Error: KARAQUEUE_HOST environment variable is not set.");
            std::process::exit(1);
        }
    };
    info!("[-] karaqueue API base URL: {}", host);

    let api = Api {
        client: reqwest::Client::new(),
        host,
        secret: std::env::var("KARAQUEUE_ADMIN_SECRET").ok(),
    };

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Status => status(&api).await,
        Commands::Queue => list_queue(&api).await,
        Commands::Add(args) => add(&api, args).await,
        Commands::Advance => advance(&api).await,
        Commands::Current(args) => set_current(&api, args).await,
        Commands::Clear => clear_current(&api).await,
        Commands::Remove(args) => remove(&api, args.id).await,
        Commands::Move(args) => move_item(&api, args).await,
        Commands::Watch => watch(&api).await,
        Commands::Songbook(args) => songbook(&api, args.filter).await,
    };

    if let Err(err) = outcome {
        eprintln!("{} {}", "[!] Error:".red().bold(), err);
        std::process::exit(1);
    }

    Ok(())
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Turns a non-2xx response into the server's own error message.
async fn checked(response: reqwest::Response) -> CliResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    debug!("[?] raw error body: {}", body);
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|e| e.error)
        .unwrap_or(body);

    Err(format!("HTTP {}: {}", status, message).into())
}

async fn get_queue(api: &Api) -> CliResult<QueueSnapshot> {
    let response = api.client.get(api.url("/queue")).send().await?;
    let snapshot = checked(response).await?.json::<QueueSnapshot>().await?;
    Ok(snapshot)
}

fn song_body(args: &SongArgs) -> Value {
    json!({
        "songRef": args.song_ref,
        "title": args.title,
        "artist": args.artist,
    })
}

fn print_snapshot(snapshot: &QueueSnapshot) {
    println!("{}", "now singing:".green().bold());
    match &snapshot.current {
        Some(current) => println!("    {}", current.to_string().yellow().bold()),
        None => println!("    {}", "nobody".red()),
    }

    println!("{}", "up next:".magenta().bold());
    match &snapshot.next {
        Some(next) => println!("    {}", next.to_string().magenta()),
        None => println!("    {}", "queue is empty".red()),
    }
}

async fn status(api: &Api) -> CliResult<()> {
    print_banner();
    let snapshot = get_queue(api).await?;

    println!(
        "{}{}",
        "queue length: ".cyan(),
        snapshot.queue.len().to_string().cyan().bold()
    );
    print_snapshot(&snapshot);
    Ok(())
}

async fn list_queue(api: &Api) -> CliResult<()> {
    let snapshot = get_queue(api).await?;

    println!(
        "{}{}",
        "queue length: ".green(),
        snapshot.queue.len().to_string().green().bold()
    );

    for (index, item) in snapshot.queue.iter().enumerate() {
        let color = if index % 2 == 0 { "cyan" } else { "magenta" };
        println!(
            "  {:>3}. {} {}",
            item.position,
            item.to_string().color(color),
            format!("(id {})", item.id).dimmed()
        );
    }
    Ok(())
}

async fn add(api: &Api, args: SongArgs) -> CliResult<()> {
    let request = api.client.post(api.url("/queue/add")).json(&song_body(&args));
    let response = checked(api.admin(request).send().await?).await?;
    let item = response.json::<QueueItem>().await?;

    println!(
        "{} {} {}",
        "[+] queued:".green(),
        item.to_string().green().bold(),
        format!("at position {} (id {})", item.position, item.id).dimmed()
    );
    Ok(())
}

async fn advance(api: &Api) -> CliResult<()> {
    let request = api.client.post(api.url("/queue/advance"));
    let response = checked(api.admin(request).send().await?).await?;
    let current = response.json::<CurrentSong>().await?;

    println!("{}", "now singing:".cyan().bold());
    println!("    {}", current.to_string().green().bold());
    Ok(())
}

async fn set_current(api: &Api, args: SongArgs) -> CliResult<()> {
    let request = api
        .client
        .post(api.url("/queue/current"))
        .json(&song_body(&args));
    let response = checked(api.admin(request).send().await?).await?;
    let current = response.json::<CurrentSong>().await?;

    println!("{} {}", "[+] current set:".green(), current.to_string().bold());
    Ok(())
}

async fn clear_current(api: &Api) -> CliResult<()> {
    let request = api
        .client
        .post(api.url("/queue/current/clear"))
        .header(reqwest::header::CONTENT_LENGTH, "0");
    checked(api.admin(request).send().await?).await?;

    println!("{}", "[+] current song cleared".green());
    Ok(())
}

async fn remove(api: &Api, id: u64) -> CliResult<()> {
    let request = api.client.delete(api.url(&format!("/queue/{}", id)));
    checked(api.admin(request).send().await?).await?;

    println!("{} {}", "[+] removed item".green(), id.to_string().bold());
    Ok(())
}

async fn move_item(api: &Api, args: MoveArgs) -> CliResult<()> {
    let body = json!({ "items": [{ "id": args.id, "position": args.position }] });
    let request = api.client.post(api.url("/queue/reorder")).json(&body);
    checked(api.admin(request).send().await?).await?;

    println!(
        "{} {} {} {}",
        "[+] moved item".green(),
        args.id.to_string().bold(),
        "to position".green(),
        args.position.to_string().bold()
    );
    list_queue(api).await
}

async fn watch(api: &Api) -> CliResult<()> {
    print_banner();
    let response = api.client.get(api.url("/queue/stream")).send().await?;
    let mut body = Box::pin(checked(response).await?.bytes_stream());
    let mut framer = EventFramer::new();

    while let Some(chunk) = body.next().await {
        for data in framer.push(&chunk?) {
            match serde_json::from_str::<QueueSnapshot>(&data) {
                Ok(snapshot) => {
                    println!("{}", "-".repeat(40).dimmed());
                    print_snapshot(&snapshot);
                    println!(
                        "{}{}",
                        "queued: ".cyan(),
                        snapshot.queue.len().to_string().cyan().bold()
                    );
                }
                Err(e) => warn!("[!] skipping unreadable event: {}", e),
            }
        }
    }

    println!("{}", "[!] feed closed by server".red());
    Ok(())
}

async fn songbook(api: &Api, filter: Option<String>) -> CliResult<()> {
    let response = api.client.get(api.url("/songbook")).send().await?;
    let entries = checked(response).await?.json::<Vec<Value>>().await?;
    let needle = filter.map(|f| f.to_lowercase());

    let matches: Vec<&Value> = entries
        .iter()
        .filter(|entry| match &needle {
            Some(needle) => entry.to_string().to_lowercase().contains(needle),
            None => true,
        })
        .collect();

    println!(
        "{}{} of {}",
        "songbook matches: ".green(),
        matches.len().to_string().green().bold(),
        entries.len()
    );
    for entry in matches {
        let title = entry.get("title").and_then(Value::as_str).unwrap_or("?");
        let artist = entry.get("artist").and_then(Value::as_str).unwrap_or("?");
        let id = entry.get("id").map(Value::to_string).unwrap_or_default();
        println!("  {} - {} {}", title.cyan(), artist, id.dimmed());
    }
    Ok(())
}
