use clap::{Parser, Subcommand};
use metallum::{
    config::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT},
    data::{AlbumCriteria, TrackCriteria},
    AlbumId, AlbumSearch, AlbumType, BandId, BandSearch, BandStatus, Config, Metallum, TrackId,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    version,
    after_long_help = color_print::cstr!("
<bold><underline>Examples:</underline></bold>

  <bold>metallum band-search</bold> Metallica
  <bold>metallum band</bold> 125 <bold>--type</bold> Full-length
  <bold>metallum album</bold> 547
  <bold>metallum lyrics</bold> 5018A

Set <bold>RUST_LOG</bold>=metallum=debug to trace requests and parsing.
"),
)]
struct Args {
    /// Root of the site, every page path is joined onto it
    #[arg(long, env = "METALLUM_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,
    #[arg(long, env = "METALLUM_USER_AGENT", default_value = DEFAULT_USER_AGENT, hide_default_value = true)]
    user_agent: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search for bands by name
    BandSearch {
        name: String,
        /// Match the name as a substring
        #[arg(long)]
        loose: bool,
        #[arg(long)]
        genre: Option<String>,
        #[arg(long("country"), value_name("code"))]
        countries: Vec<String>,
        #[arg(long, value_parser = searchable_status)]
        status: Vec<BandStatus>,
        #[arg(long, default_value_t = 0)]
        page_start: u64,
    },
    /// Search for releases by title
    AlbumSearch {
        title: String,
        #[arg(long)]
        band: Option<String>,
        #[arg(long)]
        loose: bool,
        #[arg(long)]
        year_from: Option<i16>,
        #[arg(long)]
        year_to: Option<i16>,
        #[arg(long("type"), value_name("type"), value_parser = searchable_album_type)]
        types: Vec<AlbumType>,
        #[arg(long, default_value_t = 0)]
        page_start: u64,
    },
    /// Show a band and its discography
    Band {
        id: u64,
        /// Only list releases of this type
        #[arg(long("type"), value_name("type"), value_parser = searchable_album_type)]
        ty: Option<AlbumType>,
    },
    /// Show a release and its track list
    Album {
        id: u64,
        #[arg(long)]
        disc: Option<u32>,
    },
    /// List bands recommended as similar to a band
    Similar { id: u64 },
    /// Print the lyrics of a track
    Lyrics { id: String },
}

/// Only the names offered by the advanced search form.
fn searchable_album_type(s: &str) -> Result<AlbumType, String> {
    let ty: AlbumType = s.parse().map_err(|error: strum::ParseError| error.to_string())?;
    match ty.search_id() {
        Some(_) => Ok(ty),
        None => Err(format!("unknown release type {s:?}")),
    }
}

fn searchable_status(s: &str) -> Result<BandStatus, String> {
    let status: BandStatus = s.parse().map_err(|error: strum::ParseError| error.to_string())?;
    match status.search_id() {
        Some(_) => Ok(status),
        None => Err(format!("unknown band status {s:?}")),
    }
}

#[culpa::try_fn]
fn main() -> eyre::Result<()> {
    let args = Args::parse();

    color_eyre::install()?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_error::ErrorLayer::default())
        .init();

    let config = Config::default()
        .with_base_url(&args.base_url)?
        .with_user_agent(args.user_agent);
    let metallum = Metallum::new(config)?;

    match args.command {
        Command::BandSearch {
            name,
            loose,
            genre,
            countries,
            status,
            page_start,
        } => {
            let search = BandSearch {
                strict: !loose,
                genre,
                countries,
                status,
                page_start,
                ..BandSearch::new(name)
            };
            let results = metallum.band_search(&search)?;
            println!("{} of {} bands", results.results.len(), results.total);
            for result in results {
                println!(
                    "{:>10}  {} ({}) {}",
                    result.band.id,
                    result.band.name,
                    result.country,
                    result.genres.join(", ")
                );
            }
        }
        Command::AlbumSearch {
            title,
            band,
            loose,
            year_from,
            year_to,
            types,
            page_start,
        } => {
            let search = AlbumSearch {
                strict: !loose,
                band,
                year_from,
                year_to,
                types,
                page_start,
                ..AlbumSearch::new(title)
            };
            let results = metallum.album_search(&search)?;
            println!("{} of {} releases", results.results.len(), results.total);
            for result in results {
                let date = result.date.map(|date| date.to_string()).unwrap_or_default();
                println!(
                    "{:>10}  {} - {} [{}] {date}",
                    result.album.id, result.band_name, result.album.title, result.ty
                );
            }
        }
        Command::Band { id, ty } => {
            let band = metallum.band(BandId(id))?;
            println!("{} ({})", band.name, band.id);
            println!("  {}, {}", band.country, band.location);
            println!("  {} since {}", band.status, band.formed_in);
            println!("  {}", band.genres.join(", "));
            println!("  themes: {}", band.themes.join(", "));
            println!("  label: {}", band.label);
            let albums = band.albums(&metallum)?.search(&AlbumCriteria {
                ty,
                ..Default::default()
            });
            for album in &albums {
                let year = album.year.map(|year| year.to_string()).unwrap_or_default();
                println!("{:>10}  {year:4}  {} [{}]", album.id, album.title, album.ty);
            }
        }
        Command::Album { id, disc } => {
            let album = metallum.album(AlbumId(id))?;
            let bands: Vec<&str> = album.bands.iter().map(|band| band.name.as_str()).collect();
            println!("{} - {} ({})", bands.join(" / "), album.title, album.id);
            println!("  {} {}", album.ty, album.date.map(|date| date.to_string()).unwrap_or_default());
            println!("  {}, {}", album.label, album.format);
            let tracks = album.tracks.search(&TrackCriteria {
                disc_number: disc,
                ..Default::default()
            });
            for track in &tracks {
                println!(
                    "  {}.{:<3} {:<8} {} ({}:{:02})",
                    track.disc_number,
                    track.number,
                    track.id,
                    track.title,
                    track.duration.as_secs() / 60,
                    track.duration.as_secs() % 60
                );
            }
        }
        Command::Similar { id } => {
            for artist in metallum.similar_artists(BandId(id))? {
                println!(
                    "{:>5}  {} ({}) {}",
                    artist.score,
                    artist.band.name,
                    artist.country,
                    artist.genres.join(", ")
                );
            }
        }
        Command::Lyrics { id } => match metallum.lyrics(&TrackId(id))? {
            Some(lyrics) => println!("{lyrics}"),
            None => eprintln!("no lyrics available"),
        },
    }
}
