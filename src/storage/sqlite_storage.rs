//! SQLite catalog adapter.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use super::MovieStorage;
use crate::error::CatalogError;
use crate::movie::Movie;

pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    pub fn open(path: &Path) -> Result<Self, CatalogError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|err| {
                    CatalogError::Storage(format!(
                        "cannot create catalog directory {}: {}",
                        parent.display(),
                        err
                    ))
                })?;
            }
        }
        let conn = Connection::open(path)?;
        let storage = Self { conn };
        storage.initialize_schema()?;
        Ok(storage)
    }

    /// In-memory database, used by tests.
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, CatalogError> {
        let conn = Connection::open_in_memory()?;
        let storage = Self { conn };
        storage.initialize_schema()?;
        Ok(storage)
    }

    fn initialize_schema(&self) -> Result<(), CatalogError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS movies (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                rating REAL NOT NULL,
                year INTEGER NOT NULL,
                poster TEXT
            )",
            [],
        )?;
        Ok(())
    }

    /// Row id of the record at the insertion-order `index`.
    fn row_id_at(&self, index: usize) -> Result<i64, CatalogError> {
        let row_id: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM movies ORDER BY id LIMIT 1 OFFSET ?1",
                params![index as i64],
                |row| row.get(0),
            )
            .optional()?;
        row_id.ok_or_else(|| {
            CatalogError::Storage(format!("record index {} out of range", index))
        })
    }
}

impl MovieStorage for SqliteStorage {
    fn list(&self) -> Result<Vec<Movie>, CatalogError> {
        let mut stmt = self
            .conn
            .prepare("SELECT title, rating, year, poster FROM movies ORDER BY id")?;
        let movie_iter = stmt.query_map([], |row| {
            Ok(Movie {
                title: row.get(0)?,
                rating: row.get(1)?,
                year: row.get(2)?,
                poster: row.get(3)?,
            })
        })?;

        let mut movies = Vec::new();
        for movie in movie_iter {
            movies.push(movie?);
        }
        Ok(movies)
    }

    fn add(&mut self, movie: &Movie) -> Result<(), CatalogError> {
        self.conn.execute(
            "INSERT INTO movies (title, rating, year, poster) VALUES (?1, ?2, ?3, ?4)",
            params![movie.title, movie.rating, movie.year, movie.poster],
        )?;
        Ok(())
    }

    fn delete(&mut self, index: usize) -> Result<(), CatalogError> {
        let row_id = self.row_id_at(index)?;
        self.conn
            .execute("DELETE FROM movies WHERE id = ?1", params![row_id])?;
        Ok(())
    }

    fn update(&mut self, index: usize, rating: f64) -> Result<(), CatalogError> {
        let row_id = self.row_id_at(index)?;
        self.conn.execute(
            "UPDATE movies SET rating = ?1 WHERE id = ?2",
            params![rating, row_id],
        )?;
        Ok(())
    }
}
