use std::sync::Arc;

use anyhow::Result;
use futures::channel::mpsc::UnboundedSender;
use tokio::io::AsyncBufReadExt;

use movie_feed::api::TmdbClient;
use movie_feed::config::AppConfig;
use movie_feed::feed::controller::{FeedController, FeedHandle};
use movie_feed::feed::projection::FeedSnapshot;
use movie_feed::feed::resolver::RouteParams;
use movie_feed::feed::visibility::forward_visibility;
use movie_feed::internal::favorites::Favorites;
use movie_feed::internal::models::{FetchPhase, Movie};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first to get logging settings
    let config = AppConfig::load();

    // Build EnvFilter
    // If RUST_LOG is set, it takes precedence.
    // Otherwise, build from config.
    let env_filter = match std::env::var("RUST_LOG") {
        Ok(_) => tracing_subscriber::EnvFilter::from_default_env(),
        Err(_) => {
            let mut filter_str = config.logging.level.to_string();
            for (module, level) in &config.logging.module_levels {
                filter_str.push_str(&format!(",{}={}", module, level));
            }
            tracing_subscriber::EnvFilter::new(filter_str)
        }
    };

    // With a configured log directory, write to a daily rotating file and
    // keep stdout clean for the feed itself. The guard must stay alive for
    // the whole run so buffered log lines get flushed.
    let _guard = match &config.logging.log_directory {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "movie-feed.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(non_blocking)
                .with_ansi(false)
                .compact()
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(env_filter).init();
            None
        }
    };

    let client = Arc::new(TmdbClient::new(&config.api)?);
    let handle = FeedController::spawn(Arc::clone(&client));
    let mut snapshots = handle.observe();

    // The demo's stand-in for the end-of-list sentinel: `m` pushes a
    // visibility edge through the same bridge a scroll sensor would use.
    let (visibility_tx, visibility_rx) = futures::channel::mpsc::unbounded();
    tokio::spawn(forward_visibility(visibility_rx, handle.clone()));

    let mut favorites = Favorites::load_or_create().unwrap_or_else(|e| {
        tracing::warn!("Could not load favorites: {:#}", e);
        Favorites::new()
    });

    print_help();

    // Land on the popular list
    handle.navigate(RouteParams::category("popular"));

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    let mut latest: Vec<Movie> = Vec::new();

    loop {
        tokio::select! {
            snapshot = snapshots.recv() => match snapshot {
                Some(snapshot) => {
                    render(&snapshot);
                    latest = snapshot.movies;
                }
                None => break,
            },
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let keep_going = dispatch(
                    line.trim(),
                    &handle,
                    &visibility_tx,
                    &client,
                    &mut favorites,
                    &latest,
                )
                .await;
                if !keep_going {
                    break;
                }
            }
        }
    }

    handle.dispose();
    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  c <category>   browse a curated list (popular, top_rated, upcoming, now_playing)");
    println!("  g <genre-id>   browse a genre (run `genres` for the ids)");
    println!("  m              scroll to the end of the list (loads the next page)");
    println!("  genres         list movie genres");
    println!("  s <query>      search movie titles");
    println!("  d <n>          show details and cast for item n");
    println!("  r <n>          show recommendations for item n");
    println!("  f <n>          toggle item n in favorites");
    println!("  f              list favorites");
    println!("  q              quit");
}

fn render(snapshot: &FeedSnapshot) {
    match snapshot.phase {
        FetchPhase::Fetching => {
            println!("... fetching ({} items so far)", snapshot.movies.len());
        }
        FetchPhase::Idle => {
            for (i, movie) in snapshot.movies.iter().enumerate() {
                println!("{}", format_movie(i + 1, movie));
            }
            println!("-- {} items --", snapshot.movies.len());
        }
        FetchPhase::Failed => {
            match &snapshot.error {
                Some(error) => println!("feed failed: {:#}", error),
                None => println!("feed failed"),
            }
            println!("-- navigate (c/g) to recover --");
        }
    }
}

fn format_movie(position: usize, movie: &Movie) -> String {
    let title = movie.title.as_deref().unwrap_or("(untitled)");
    let year = movie
        .release_date
        .as_deref()
        .map(|d| d.chars().take(4).collect::<String>())
        .unwrap_or_else(|| "----".to_string());
    let rating = movie
        .vote_average
        .map(|v| format!("{:.1}", v))
        .unwrap_or_else(|| "-".to_string());
    format!("{:3}. {} ({}) [{}]", position, title, year, rating)
}

/// Handle one input line. Returns false when the user asked to quit.
async fn dispatch(
    line: &str,
    handle: &FeedHandle,
    visibility_tx: &UnboundedSender<bool>,
    client: &TmdbClient,
    favorites: &mut Favorites,
    latest: &[Movie],
) -> bool {
    let (command, arg) = match line.split_once(' ') {
        Some((command, arg)) => (command, arg.trim()),
        None => (line, ""),
    };

    match command {
        "q" => return false,
        "" | "m" => {
            // Sentinel scrolled into view, then out again
            let _ = visibility_tx.unbounded_send(true);
            let _ = visibility_tx.unbounded_send(false);
        }
        "c" => match arg.is_empty() {
            true => println!("usage: c <category>"),
            false => handle.navigate(RouteParams::category(arg)),
        },
        "g" => match arg.is_empty() {
            true => println!("usage: g <genre-id>"),
            false => handle.navigate(RouteParams::genre(arg)),
        },
        "genres" => match client.genres().await {
            Ok(genres) => {
                for genre in genres {
                    println!("{:5}  {}", genre.id, genre.name);
                }
            }
            Err(e) => eprintln!("error: {:#}", e),
        },
        "s" => match client.search_movies(arg, 1).await {
            Ok(page) => {
                for (i, movie) in page.results.iter().enumerate() {
                    println!("{}", format_movie(i + 1, movie));
                }
            }
            Err(e) => eprintln!("error: {:#}", e),
        },
        "d" => match pick(latest, arg) {
            Some(movie) => show_details(client, movie.id).await,
            None => println!("no such item"),
        },
        "r" => match pick(latest, arg) {
            Some(movie) => match client.movie_recommendations(movie.id).await {
                Ok(page) => {
                    for (i, movie) in page.results.iter().take(10).enumerate() {
                        println!("{}", format_movie(i + 1, movie));
                    }
                }
                Err(e) => eprintln!("error: {:#}", e),
            },
            None => println!("no such item"),
        },
        "f" if arg.is_empty() => {
            for favorite in &favorites.movies {
                match favorite.comment.is_empty() {
                    false => println!("{:8}  {}  // {}", favorite.id, favorite.title, favorite.comment),
                    true => println!("{:8}  {}", favorite.id, favorite.title),
                }
            }
        }
        "f" => match pick(latest, arg) {
            Some(movie) => {
                favorites.toggle(movie);
                let added = favorites.contains(movie.id);
                match favorites.save() {
                    Ok(()) => match added {
                        true => println!("added to favorites"),
                        false => println!("removed from favorites"),
                    },
                    Err(e) => eprintln!("error: {:#}", e),
                }
            }
            None => println!("no such item"),
        },
        _ => print_help(),
    }

    true
}

fn pick<'a>(latest: &'a [Movie], arg: &str) -> Option<&'a Movie> {
    let position: usize = arg.parse().ok()?;
    match position {
        0 => None,
        _ => latest.get(position - 1),
    }
}

async fn show_details(client: &TmdbClient, id: u64) {
    match client.movie_details(id).await {
        Ok(details) => {
            let title = details.title.as_deref().unwrap_or("(untitled)");
            println!("{}", title);
            if let Some(tagline) = details.tagline.as_deref()
                && !tagline.is_empty()
            {
                println!("  \"{}\"", tagline);
            }
            if let Some(runtime) = details.runtime {
                println!("  {} min", runtime);
            }
            let genres: Vec<&str> = details.genres.iter().map(|g| g.name.as_str()).collect();
            if !genres.is_empty() {
                println!("  {}", genres.join(", "));
            }
            if let Some(overview) = details.overview.as_deref() {
                println!("  {}", overview);
            }
        }
        Err(e) => eprintln!("error: {:#}", e),
    }

    match client.movie_credits(id).await {
        Ok(credits) => {
            for member in credits.cast.iter().take(5) {
                let name = member.name.as_deref().unwrap_or("(unknown)");
                match member.character.as_deref() {
                    Some(character) => println!("  {} as {}", name, character),
                    None => println!("  {}", name),
                }
            }
        }
        Err(e) => eprintln!("error: {:#}", e),
    }
}
