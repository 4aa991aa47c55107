//! JSON-file catalog adapter.
//!
//! The whole file is read once at construction and rewritten on every
//! mutation. A crash mid-write can corrupt the file; that is an accepted
//! limitation of the format, not something this adapter recovers from.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use super::MovieStorage;
use crate::error::CatalogError;
use crate::movie::Movie;

pub struct JsonStorage {
    path: PathBuf,
    movies: Vec<Movie>,
}

impl JsonStorage {
    /// Loads the catalog file. A missing or unparsable file is a storage
    /// error; the shell must not run over an undefined collection.
    pub fn open(path: &Path) -> Result<Self, CatalogError> {
        let text = fs::read_to_string(path).map_err(|err| {
            CatalogError::Storage(format!("cannot read catalog {}: {}", path.display(), err))
        })?;
        let movies: Vec<Movie> = serde_json::from_str(&text).map_err(|err| {
            CatalogError::Storage(format!("cannot parse catalog {}: {}", path.display(), err))
        })?;
        debug!(
            "Loaded {} movies from {}",
            movies.len(),
            path.display()
        );
        Ok(Self {
            path: path.to_path_buf(),
            movies,
        })
    }

    fn persist(&self) -> Result<(), CatalogError> {
        let text = serde_json::to_string(&self.movies).map_err(|err| {
            CatalogError::Storage(format!("cannot serialize catalog: {}", err))
        })?;
        fs::write(&self.path, text).map_err(|err| {
            CatalogError::Storage(format!(
                "cannot write catalog {}: {}",
                self.path.display(),
                err
            ))
        })
    }

    fn check_index(&self, index: usize) -> Result<(), CatalogError> {
        if index >= self.movies.len() {
            return Err(CatalogError::Storage(format!(
                "record index {} out of range ({} movies)",
                index,
                self.movies.len()
            )));
        }
        Ok(())
    }
}

impl MovieStorage for JsonStorage {
    fn list(&self) -> Result<Vec<Movie>, CatalogError> {
        Ok(self.movies.clone())
    }

    fn add(&mut self, movie: &Movie) -> Result<(), CatalogError> {
        self.movies.push(movie.clone());
        self.persist()
    }

    fn delete(&mut self, index: usize) -> Result<(), CatalogError> {
        self.check_index(index)?;
        self.movies.remove(index);
        self.persist()
    }

    fn update(&mut self, index: usize, rating: f64) -> Result<(), CatalogError> {
        self.check_index(index)?;
        self.movies[index].rating = rating;
        self.persist()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::JsonStorage;
    use crate::movie::Movie;
    use crate::storage::MovieStorage;

    fn unique_temp_catalog_path(name: &str) -> PathBuf {
        let nonce = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be valid")
            .as_nanos();
        std::env::temp_dir().join(format!("cinedex_{name}_{nonce}.json"))
    }

    fn write_sample_catalog(path: &PathBuf) {
        fs::write(
            path,
            r#"[{"Title": "Inception", "Rating": 8.8, "Year": 2010, "Poster": "http://img/i.jpg"},
               {"Title": "Up", "Rating": 8.3, "Year": 2009}]"#,
        )
        .expect("should write catalog fixture");
    }

    #[test]
    fn test_open_reads_legacy_records() {
        let path = unique_temp_catalog_path("open");
        write_sample_catalog(&path);

        let storage = JsonStorage::open(&path).expect("catalog should load");
        let movies = storage.list().expect("list never fails in memory");
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].title, "Inception");
        assert_eq!(movies[0].poster.as_deref(), Some("http://img/i.jpg"));
        assert_eq!(movies[1].poster, None);

        fs::remove_file(path).expect("fixture should be removable");
    }

    #[test]
    fn test_missing_file_is_a_storage_error() {
        let path = unique_temp_catalog_path("missing");
        assert!(JsonStorage::open(&path).is_err());
    }

    #[test]
    fn test_unparsable_file_is_a_storage_error() {
        let path = unique_temp_catalog_path("garbled");
        fs::write(&path, "not json at all").expect("should write fixture");
        assert!(JsonStorage::open(&path).is_err());
        fs::remove_file(path).expect("fixture should be removable");
    }

    #[test]
    fn test_mutations_round_trip_through_the_file() {
        let path = unique_temp_catalog_path("mutate");
        write_sample_catalog(&path);

        let mut storage = JsonStorage::open(&path).expect("catalog should load");
        storage
            .add(&Movie::new("Cars", 7.1, 2006))
            .expect("add should persist");
        storage.update(1, 9.0).expect("update should persist");
        storage.delete(0).expect("delete should persist");

        let reloaded = JsonStorage::open(&path).expect("catalog should reload");
        let movies = reloaded.list().expect("list never fails in memory");
        let titles: Vec<&str> = movies.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, ["Up", "Cars"]);
        assert_eq!(movies[0].rating, 9.0);

        fs::remove_file(path).expect("fixture should be removable");
    }

    #[test]
    fn test_out_of_range_index_does_not_touch_the_file() {
        let path = unique_temp_catalog_path("bounds");
        write_sample_catalog(&path);

        let mut storage = JsonStorage::open(&path).expect("catalog should load");
        assert!(storage.delete(5).is_err());
        assert!(storage.update(5, 1.0).is_err());
        assert_eq!(storage.list().expect("list never fails").len(), 2);

        fs::remove_file(path).expect("fixture should be removable");
    }
}
