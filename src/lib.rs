//! Scraper for the Encyclopaedia Metallum (<https://www.metal-archives.com/>).
//!
//! ```no_run
//! # fn main() -> eyre::Result<()> {
//! use metallum::{data::AlbumCriteria, AlbumType, BandSearch, Config, Metallum};
//!
//! let metallum = Metallum::new(Config::default())?;
//! let bands = metallum.band_search(&BandSearch::new("Metallica"))?;
//! let band = bands.results[0].get(&metallum)?;
//! let full_lengths = band.albums(&metallum)?.search(&AlbumCriteria {
//!     ty: Some(AlbumType::FullLength),
//!     ..Default::default()
//! });
//! for album in &full_lengths {
//!     println!("{} ({:?})", album.title, album.year);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod data;
mod error;
pub mod scrape;
pub mod web;

pub use crate::{
    config::Config,
    data::{AlbumId, AlbumType, BandId, BandStatus, TrackId},
    error::{Error, Page},
    scrape::{
        search::{AlbumSearch, BandSearch, Search},
        Metallum,
    },
};
