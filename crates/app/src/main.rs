use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mood_discovery_core::{
    Catalog, DiscoveryConfig, DiscoveryStore, GenreSelection, MoodDiscoveryError, MoodPoint,
    MoodSettingsUpdate, Result, StoreHandle, TimeOfDay, Track, TrackProfile,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let store = open_store(&cli)?;
    let handle = store.handle();

    match cli.command {
        Commands::Mood {
            energy,
            mood,
            click,
            time_of_day,
        } => run_mood(&handle, energy, mood, click, time_of_day, cli.json),
        Commands::Genres => run_genres(&handle, cli.json),
        Commands::Related { genre } => run_related(&handle, &genre, cli.json),
        Commands::Profile { id } => run_profile(&handle, &id, cli.json),
        Commands::Play { ids } => run_play(&handle, &ids, cli.json),
    }
}

fn open_store(cli: &Cli) -> Result<DiscoveryStore> {
    let config = match &cli.config {
        Some(path) => DiscoveryConfig::load(path)?,
        None => DiscoveryConfig::default(),
    };
    let catalog = match &cli.catalog {
        Some(path) => Catalog::load(path)?,
        None => Catalog::sample()?,
    };
    tracing::info!(tracks = catalog.len(), "catalog ready");
    Ok(DiscoveryStore::new(catalog, config))
}

fn run_mood(
    handle: &StoreHandle,
    energy: Option<f64>,
    mood: Option<f64>,
    click: Option<Vec<f64>>,
    time_of_day: Option<TimeOfDay>,
    json: bool,
) -> Result<()> {
    let mut update = MoodSettingsUpdate {
        energy,
        mood,
        time_of_day,
    };
    if let Some(click) = click {
        let point = click_point(&click)?;
        update = MoodSettingsUpdate {
            time_of_day,
            ..point.into()
        };
    }

    let settings = handle.update_mood_settings(update)?;
    tracing::info!(?settings, "mood map moved");

    let limit = handle.config().limits.mood_results;
    let matches: Vec<&Track> = handle.mood_matches()?.into_iter().take(limit).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
        return Ok(());
    }

    println!(
        "Tracks for your mood (energy {:.2}, mood {:.2}, {}):",
        settings.energy, settings.mood, settings.time_of_day
    );
    if matches.is_empty() {
        println!("  nothing close enough, try another spot on the map");
    }
    for track in matches {
        print_track_line(track);
    }
    Ok(())
}

fn click_point(click: &[f64]) -> Result<MoodPoint> {
    match *click {
        [x, y, width, height] => MoodPoint::from_surface(x, y, width, height),
        _ => Err(MoodDiscoveryError::InvalidInput(
            "--click expects X,Y,WIDTH,HEIGHT",
        )),
    }
}

fn run_genres(handle: &StoreHandle, json: bool) -> Result<()> {
    let genres = handle
        .catalog()
        .user_genres(handle.config().limits.user_genres);

    if json {
        println!("{}", serde_json::to_string_pretty(&genres)?);
    } else {
        println!("Your favorite genres: {}", genres.join(", "));
    }
    Ok(())
}

fn run_related(handle: &StoreHandle, genre: &str, json: bool) -> Result<()> {
    let mut selection = GenreSelection::new();
    selection.toggle(genre);

    let catalog = handle.catalog();
    let related = selection.related(catalog.genre_map());
    let tracks = catalog.tracks_in_genre(genre, handle.config().limits.genre_tracks);

    if json {
        let body = serde_json::json!({
            "genre": genre,
            "related": related,
            "tracks": tracks,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    if related.is_empty() {
        println!("No related genres known for {genre}.");
    } else {
        println!("If you like {genre}, try these: {}", related.join(", "));
    }
    for track in tracks {
        print_track_line(track);
    }
    Ok(())
}

fn run_profile(handle: &StoreHandle, id: &str, json: bool) -> Result<()> {
    let track = find_track(handle, id)?;
    handle.open_deep_dive(track)?;
    let profile = TrackProfile::build(handle.classifier(), track);

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
        return Ok(());
    }

    println!("{} by {}", profile.title, profile.artist);
    println!("{} • {}", profile.album, profile.duration);
    println!();
    println!("Sound characteristics");
    for reading in &profile.features {
        println!("  {reading}");
    }
    println!("  energy: {}%", profile.energy_percent);
    println!("  mood: {}%", profile.mood_percent);
    println!();
    println!("{}", profile.description);
    let tags: Vec<&str> = profile.tags.iter().map(|tag| tag.as_str()).collect();
    println!("Perfect for: {}", tags.join(", "));
    println!();
    println!("When to listen");
    for slot in &profile.listening {
        let mark = if slot.suitable { "yes" } else { "no" };
        println!("  {:<10} {mark}", slot.time_of_day);
    }
    Ok(())
}

/// Presses the play button of each listed card in turn.
fn run_play(handle: &StoreHandle, ids: &[String], json: bool) -> Result<()> {
    for id in ids {
        let track = find_track(handle, id)?;
        let playing = handle.toggle_track(track)?;
        tracing::info!(id = %track.id, playing, "toggled playback");
    }

    let now = handle.now_playing()?;
    if json {
        let body = now.map(|now| {
            serde_json::json!({
                "track": now.track,
                "is_playing": now.is_playing,
            })
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    match now {
        Some(now) => {
            let state = if now.is_playing { "playing" } else { "paused" };
            println!("{state}: {} by {}", now.track.title, now.track.artist);
        }
        None => println!("nothing selected"),
    }
    Ok(())
}

fn find_track<'a>(handle: &'a StoreHandle, id: &str) -> Result<&'a Track> {
    handle
        .catalog()
        .track(id)
        .ok_or_else(|| MoodDiscoveryError::msg(format!("no track with id `{id}`")))
}

fn print_track_line(track: &Track) {
    println!(
        "  [{}] {} by {} (energy {:.2}, mood {:.2})",
        track.id, track.title, track.artist, track.energy, track.mood
    );
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Mood based music discovery", long_about = None)]
struct Cli {
    /// Catalog JSON file. Defaults to the bundled sample catalog.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
    /// Configuration JSON file with thresholds and list limits.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Emit JSON instead of text.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Move the mood-map cursor and list the tracks close to it.
    Mood {
        /// Target energy in [0, 1].
        #[arg(short, long)]
        energy: Option<f64>,
        /// Target mood in [0, 1].
        #[arg(short, long)]
        mood: Option<f64>,
        /// Click position on a surface as X,Y,WIDTH,HEIGHT. Overrides
        /// --energy and --mood.
        #[arg(long, value_delimiter = ',', num_args = 4)]
        click: Option<Vec<f64>>,
        /// Listening period: morning, afternoon, evening or night.
        #[arg(short, long)]
        time_of_day: Option<TimeOfDay>,
    },
    /// List the genres found in the catalog.
    Genres,
    /// Show genres related to GENRE and a few catalog tracks in it.
    Related {
        genre: String,
    },
    /// Print the deep-dive profile of a track.
    Profile {
        id: String,
    },
    /// Press the play button on one or more track cards, in order.
    Play {
        #[arg(required = true)]
        ids: Vec<String>,
    },
}
