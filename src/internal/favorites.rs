use anyhow::{Context, Result};
use jiff::Zoned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::info;

use super::models::Movie;

/// One saved movie plus the user's note about it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteMovie {
    pub id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    #[serde(default)]
    pub comment: String,
    pub added_at: Zoned,
}

/// The "my movies" list. On disk it is a plain JSON array of entries in a
/// `my-movies.json` file under the platform config directory, newest first.
#[derive(Debug, Clone, Default)]
pub struct Favorites {
    pub movies: Vec<FavoriteMovie>,
    file_path: Option<PathBuf>,
}

impl Favorites {
    pub fn new() -> Self {
        Self {
            movies: Vec::new(),
            file_path: None,
        }
    }

    pub fn load_or_create() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("movie-feed");

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).with_context(|| {
                format!("Failed to create config directory {}", config_dir.display())
            })?;
        }

        Self::load_from(config_dir.join("my-movies.json"))
    }

    /// Load the list from an explicit path, creating an empty one bound to
    /// that path when the file does not exist yet.
    pub fn load_from(file_path: PathBuf) -> Result<Self> {
        match file_path.exists() {
            true => {
                let content =
                    fs::read_to_string(&file_path).context("Failed to read favorites file")?;
                let movies: Vec<FavoriteMovie> =
                    serde_json::from_str(&content).context("Failed to parse favorites file")?;
                info!(favorites_file = %file_path.display(), count = movies.len(), "Loaded favorites");
                Ok(Self {
                    movies,
                    file_path: Some(file_path),
                })
            }
            false => Ok(Self {
                movies: Vec::new(),
                file_path: Some(file_path),
            }),
        }
    }

    pub fn save(&self) -> Result<()> {
        match &self.file_path {
            Some(path) => {
                let content = serde_json::to_string_pretty(&self.movies)
                    .context("Failed to serialize favorites")?;
                fs::write(path, content).context("Failed to write favorites file")?;
                info!(favorites_file = %path.display(), "Saved favorites");
            }
            None => {
                info!("Favorites.save() called but no file_path is set; skipping write");
            }
        }
        Ok(())
    }

    pub fn add(&mut self, movie: &Movie, comment: impl Into<String>) {
        if !self.contains(movie.id) {
            let favorite = FavoriteMovie {
                id: movie.id,
                title: movie.title.clone().unwrap_or_default(),
                poster_path: movie.poster_path.clone(),
                comment: comment.into(),
                added_at: Zoned::now(),
            };
            // Newest first
            self.movies.insert(0, favorite);
        }
    }

    pub fn remove(&mut self, id: u64) {
        self.movies.retain(|m| m.id != id);
    }

    pub fn contains(&self, id: u64) -> bool {
        self.movies.iter().any(|m| m.id == id)
    }

    pub fn toggle(&mut self, movie: &Movie) {
        match self.contains(movie.id) {
            true => self.remove(movie.id),
            false => self.add(movie, ""),
        }
    }

    pub fn set_comment(&mut self, id: u64, comment: impl Into<String>) {
        if let Some(favorite) = self.movies.iter_mut().find(|m| m.id == id) {
            favorite.comment = comment.into();
        }
    }
}
