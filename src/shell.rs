//! Interactive console shell: menu loop, validated prompts, dispatch.
//!
//! The shell is generic over its input and output streams so tests can
//! drive it with in-memory buffers. End-of-input anywhere behaves like
//! the exit command.

use std::io::{self, BufRead, Write};

use rand::{rngs::StdRng, RngExt, SeedableRng};

use crate::config::{HistogramConfig, WebsiteConfig};
use crate::error::CatalogError;
use crate::histogram;
use crate::metadata::MetadataFetcher;
use crate::movie::{self, Movie};
use crate::query::{self, FilterCriteria, SearchOutcome};
use crate::stats;
use crate::storage::MovieStorage;
use crate::theme::{self, Style};
use crate::website;

const MENU_TEXT: &str = "Menu:
0. Exit
1. List movies
2. Add movie
3. Delete movie
4. Update movie
5. Stats
6. Random movie
7. Search movie
8. Movies sorted by rating
9. Movies sorted by year
10. Create rating histogram
11. Filter movies
12. Generate website
";

pub struct Shell<R, W> {
    input: R,
    output: W,
    storage: Box<dyn MovieStorage>,
    fetcher: Option<MetadataFetcher>,
    website_config: WebsiteConfig,
    histogram_config: HistogramConfig,
    // Seed for the per-pick StdRng, advanced after each use.
    rng_seed: [u8; 32],
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(
        input: R,
        output: W,
        storage: Box<dyn MovieStorage>,
        fetcher: Option<MetadataFetcher>,
        website_config: WebsiteConfig,
        histogram_config: HistogramConfig,
    ) -> Self {
        let mut seed = [0u8; 32];
        getrandom::fill(&mut seed).expect("Failed to generate random seed");
        Self {
            input,
            output,
            storage,
            fetcher,
            website_config,
            histogram_config,
            rng_seed: seed,
        }
    }

    /// Runs the menu loop until exit, storage failure, an empty catalog,
    /// or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        match self.run_loop() {
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => Ok(()),
            other => other,
        }
    }

    fn run_loop(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n********** My Movies Catalog **********")?;
        loop {
            let movies = match self.storage.list() {
                Ok(movies) => movies,
                Err(err) => {
                    log::error!("cannot read the catalog: {}", err);
                    self.print_error(&err.to_string())?;
                    return Ok(());
                }
            };
            if movies.is_empty() {
                self.print_error("The catalog is empty. Seed the catalog file and restart.")?;
                return Ok(());
            }

            let choice = self.prompt_menu_choice()?;
            match choice {
                0 => {
                    writeln!(self.output, "Bye!")?;
                    return Ok(());
                }
                1 => self.list_movies(&movies)?,
                2 => self.add_movie(&movies)?,
                3 => self.delete_movie(&movies)?,
                4 => self.update_movie(&movies)?,
                5 => self.show_stats(&movies)?,
                6 => self.random_movie(&movies)?,
                7 => self.search_movies(&movies)?,
                8 => self.sorted_by_rating(&movies)?,
                9 => self.sorted_by_year(&movies)?,
                10 => self.export_histogram(&movies)?,
                11 => self.filter_movies(&movies)?,
                12 => self.export_website(&movies)?,
                _ => unreachable!("menu choice validated by the prompt"),
            }
            self.wait_for_enter()?;
        }
    }

    // ---- prompts ----

    fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        let read = self.input.read_line(&mut line)?;
        if read == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "end of input"));
        }
        Ok(line.trim_end_matches(['\n', '\r']).to_string())
    }

    fn prompt(&mut self, text: &str) -> io::Result<String> {
        write!(self.output, "{}", theme::paint(Style::Prompt, text))?;
        self.output.flush()?;
        let line = self.read_line();
        write!(self.output, "{}", theme::RESET)?;
        line
    }

    fn print_error(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{}", theme::paint(Style::Error, message))
    }

    fn prompt_menu_choice(&mut self) -> io::Result<u32> {
        writeln!(self.output, "{}", theme::paint(Style::Menu, MENU_TEXT))?;
        loop {
            let line = self.prompt("Enter choice (0-12): ")?;
            match line.trim().parse::<u32>() {
                Ok(choice) if choice <= 12 => return Ok(choice),
                _ => {
                    self.print_error("Invalid choice")?;
                    writeln!(self.output, "{}", theme::paint(Style::Menu, MENU_TEXT))?;
                }
            }
        }
    }

    fn prompt_nonblank(&mut self, text: &str) -> io::Result<String> {
        loop {
            let line = self.prompt(text)?;
            match movie::validate_title(&line) {
                Ok(title) => return Ok(title),
                Err(err) => self.print_error(&err.to_string())?,
            }
        }
    }

    /// Re-prompts until the rating is a number inside [0, 10].
    fn prompt_rating(&mut self) -> io::Result<f64> {
        loop {
            let line = self.prompt("Enter the movie rating (0-10): ")?;
            match line.trim().parse::<f64>() {
                Ok(rating) => match movie::validate_rating(rating) {
                    Ok(rating) => return Ok(rating),
                    Err(err) => self.print_error(&err.to_string())?,
                },
                Err(_) => {
                    self.print_error("The field must not be blank. Only numbers are allowed")?
                }
            }
        }
    }

    /// Re-prompts until the year is an integer inside [1900, current].
    fn prompt_year(&mut self) -> io::Result<i32> {
        loop {
            let line = self.prompt("Enter the year: ")?;
            match line.trim().parse::<i32>() {
                Ok(year) => match movie::validate_year(year) {
                    Ok(year) => return Ok(year),
                    Err(err) => self.print_error(&err.to_string())?,
                },
                Err(_) => {
                    self.print_error("The field must not be blank. Only integers are allowed")?
                }
            }
        }
    }

    /// Blank disables the bound; anything else must be a rating in range.
    fn prompt_optional_rating(&mut self, text: &str) -> io::Result<Option<f64>> {
        loop {
            let line = self.prompt(text)?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            match trimmed.parse::<f64>() {
                Ok(rating) if (movie::MIN_RATING..=movie::MAX_RATING).contains(&rating) => {
                    return Ok(Some(rating))
                }
                Ok(_) => self.print_error("Wrong format of the rating. Only 0-10 are allowed.")?,
                Err(_) => self.print_error("Only numbers are allowed.")?,
            }
        }
    }

    /// Blank disables the bound; digit input must be a 4-digit year.
    fn prompt_optional_year(&mut self, text: &str) -> io::Result<Option<i32>> {
        loop {
            let line = self.prompt(text)?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            if trimmed.chars().all(|ch| ch.is_ascii_digit()) && trimmed.len() != 4 {
                self.print_error("Wrong format of the year.")?;
                continue;
            }
            match trimmed.parse::<i32>() {
                Ok(year) => return Ok(Some(year)),
                Err(_) => self.print_error("Only integers are allowed.")?,
            }
        }
    }

    fn wait_for_enter(&mut self) -> io::Result<()> {
        self.prompt("Press enter to continue")?;
        Ok(())
    }

    // ---- commands ----

    fn list_movies(&mut self, movies: &[Movie]) -> io::Result<()> {
        writeln!(self.output, "{} movies in total\n", movies.len())?;
        for movie in movies {
            writeln!(
                self.output,
                "Name: {}, Rating: {}, Year: {}",
                movie.title, movie.rating, movie.year
            )?;
            if let Some(poster) = &movie.poster {
                writeln!(self.output, "Poster Link: {}", poster)?;
            }
        }
        Ok(())
    }

    fn add_movie(&mut self, movies: &[Movie]) -> io::Result<()> {
        let title_input = self.prompt_nonblank("Enter the movie you would like to add: ")?;
        if query::find_title(movies, &title_input).is_some() {
            return self.print_error(&CatalogError::Duplicate(title_input).to_string());
        }

        let new_movie = match self.fetcher.as_ref().map(|f| f.fetch(&title_input)) {
            Some(Ok(fetched)) => {
                // The service may canonicalize the title; re-check it.
                if query::find_title(movies, &fetched.title).is_some() {
                    return self.print_error(&CatalogError::Duplicate(fetched.title).to_string());
                }
                Movie::with_poster(fetched.title, fetched.rating, fetched.year, fetched.poster)
            }
            Some(Err(err)) => return self.print_error(&err.to_string()),
            None => {
                let rating = self.prompt_rating()?;
                let year = self.prompt_year()?;
                Movie::new(title_input, rating, year)
            }
        };

        match self.storage.add(&new_movie) {
            Ok(()) => writeln!(
                self.output,
                "The movie {} is successfully added.",
                new_movie.title
            ),
            Err(err) => self.print_error(&err.to_string()),
        }
    }

    fn delete_movie(&mut self, movies: &[Movie]) -> io::Result<()> {
        let title_input = self.prompt_nonblank("Enter the movie you would like to delete: ")?;
        let Some(index) = query::find_title(movies, &title_input) else {
            return self.print_error("There is no such movie in the catalog :(");
        };
        match self.storage.delete(index) {
            Ok(()) => writeln!(
                self.output,
                "The movie {} is successfully deleted.",
                title_input
            ),
            Err(err) => self.print_error(&err.to_string()),
        }
    }

    fn update_movie(&mut self, movies: &[Movie]) -> io::Result<()> {
        let title_input =
            self.prompt_nonblank("Enter the movie which rating you would like to change: ")?;
        let Some(index) = query::find_title(movies, &title_input) else {
            return self.print_error("There is no such movie in the catalog :(");
        };
        let rating = self.prompt_rating()?;
        match self.storage.update(index, rating) {
            Ok(()) => writeln!(
                self.output,
                "The movie {} is successfully updated.",
                title_input
            ),
            Err(err) => self.print_error(&err.to_string()),
        }
    }

    fn show_stats(&mut self, movies: &[Movie]) -> io::Result<()> {
        let Some(stats) = stats::compute(movies) else {
            return Ok(());
        };
        writeln!(self.output, "Average rating: {}", stats.average)?;
        writeln!(self.output, "Median rating: {}", stats.median)?;
        if let [only] = stats.best.as_slice() {
            writeln!(
                self.output,
                "The movie with the highest rating: {}: {}",
                only.title, only.rating
            )?;
        } else {
            writeln!(self.output, "Movies with the best rating:")?;
            for movie in &stats.best {
                writeln!(self.output, "{}: {}", movie.title, movie.rating)?;
            }
        }
        if let [only] = stats.worst.as_slice() {
            writeln!(
                self.output,
                "The movie with the lowest rating: {}: {}",
                only.title, only.rating
            )?;
        } else {
            writeln!(self.output, "Movies with the lowest rating:")?;
            for movie in &stats.worst {
                writeln!(self.output, "{}: {}", movie.title, movie.rating)?;
            }
        }
        Ok(())
    }

    fn random_movie(&mut self, movies: &[Movie]) -> io::Result<()> {
        let mut rng = StdRng::from_seed(self.rng_seed);
        let index = rng.random_range(0..movies.len());

        let mut next_seed = [0u8; 32];
        for (i, val) in next_seed.iter_mut().enumerate() {
            *val = self.rng_seed[i].wrapping_add(1);
        }
        self.rng_seed = next_seed;

        let pick = &movies[index];
        writeln!(
            self.output,
            "Your movie for tonight: {}, it's rated {}",
            pick.title, pick.rating
        )
    }

    fn search_movies(&mut self, movies: &[Movie]) -> io::Result<()> {
        let user_query = self.prompt_nonblank("Enter your search query: ")?;
        match query::search(movies, &user_query) {
            SearchOutcome::Exact { title, rating } => {
                writeln!(self.output, "{}: {}", title, rating)
            }
            SearchOutcome::Suggestions(titles) => {
                self.print_error(&format!(
                    "The movie \"{}\" does not exist. Did you mean:",
                    user_query
                ))?;
                for title in titles {
                    writeln!(self.output, "{}", title)?;
                }
                Ok(())
            }
            SearchOutcome::NotFound => self.print_error(&format!(
                "The movie \"{}\" does not exist.",
                user_query
            )),
        }
    }

    fn sorted_by_rating(&mut self, movies: &[Movie]) -> io::Result<()> {
        for movie in query::sorted_by_rating_desc(movies) {
            writeln!(self.output, "{}: {}", movie.title, movie.rating)?;
        }
        Ok(())
    }

    fn sorted_by_year(&mut self, movies: &[Movie]) -> io::Result<()> {
        let newest_first = loop {
            let line = self
                .prompt("To see the latest movies first, type \"1\". To see them last, type \"0\": ")?;
            match line.trim() {
                "1" => break true,
                "0" => break false,
                _ => self.print_error(
                    "Wrong format of the operation. Only \"1\" or \"0\" are allowed.",
                )?,
            }
        };
        for movie in query::sorted_by_year(movies, newest_first) {
            writeln!(
                self.output,
                "{}: rating: {}, year: {}",
                movie.title, movie.rating, movie.year
            )?;
        }
        Ok(())
    }

    fn export_histogram(&mut self, movies: &[Movie]) -> io::Result<()> {
        let file_name = self.prompt("Enter the file name to save the histogram: ")?;
        let trimmed = file_name.trim();
        if trimmed.is_empty() {
            return self.print_error("Invalid file name.");
        }
        let path = std::path::PathBuf::from(format!("{}.png", trimmed));
        match histogram::export(&path, movies, self.histogram_config) {
            Ok(()) => writeln!(self.output, "Histogram saved to {}.", path.display()),
            Err(err) => self.print_error(&err.to_string()),
        }
    }

    fn filter_movies(&mut self, movies: &[Movie]) -> io::Result<()> {
        let criteria = FilterCriteria {
            min_rating: self
                .prompt_optional_rating("Enter minimum rating (leave blank for no minimum rating): ")?,
            start_year: self
                .prompt_optional_year("Enter start year (leave blank for no start year): ")?,
            end_year: self.prompt_optional_year("Enter end year (leave blank for no end year): ")?,
        };
        writeln!(self.output, "Filtered movies: ")?;
        let filtered: Vec<&Movie> = query::filter_movies(movies, criteria).collect();
        for movie in filtered {
            writeln!(
                self.output,
                "{} ({}): {}",
                movie.title, movie.year, movie.rating
            )?;
        }
        Ok(())
    }

    fn export_website(&mut self, movies: &[Movie]) -> io::Result<()> {
        let output_path = self.website_config.output_path.clone();
        match website::export(&output_path, &self.website_config.page_title, movies) {
            Ok(()) => writeln!(self.output, "Website was generated successfully."),
            Err(err) => self.print_error(&err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::io::Cursor;
    use std::rc::Rc;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::Shell;
    use crate::config::{HistogramConfig, WebsiteConfig};
    use crate::error::CatalogError;
    use crate::movie::Movie;
    use crate::storage::MovieStorage;

    /// In-memory store sharing its records with the test through an Rc
    /// so they stay inspectable after the shell takes ownership.
    struct MemoryStorage {
        movies: Rc<RefCell<Vec<Movie>>>,
    }

    impl MovieStorage for MemoryStorage {
        fn list(&self) -> Result<Vec<Movie>, CatalogError> {
            Ok(self.movies.borrow().clone())
        }

        fn add(&mut self, movie: &Movie) -> Result<(), CatalogError> {
            self.movies.borrow_mut().push(movie.clone());
            Ok(())
        }

        fn delete(&mut self, index: usize) -> Result<(), CatalogError> {
            self.movies.borrow_mut().remove(index);
            Ok(())
        }

        fn update(&mut self, index: usize, rating: f64) -> Result<(), CatalogError> {
            self.movies.borrow_mut()[index].rating = rating;
            Ok(())
        }
    }

    fn sample_catalog() -> Vec<Movie> {
        vec![
            Movie::new("Inception", 8.8, 2010),
            Movie::new("Up", 8.3, 2009),
            Movie::new("Cars", 7.1, 2006),
        ]
    }

    fn run_script_with_config(
        script: &str,
        movies: Vec<Movie>,
        website_config: WebsiteConfig,
    ) -> (String, Rc<RefCell<Vec<Movie>>>) {
        let shared = Rc::new(RefCell::new(movies));
        let storage = MemoryStorage {
            movies: Rc::clone(&shared),
        };
        let input = Cursor::new(script.as_bytes().to_vec());
        let mut output: Vec<u8> = Vec::new();
        let mut shell = Shell::new(
            input,
            &mut output,
            Box::new(storage),
            None,
            website_config,
            HistogramConfig::default(),
        );
        shell.run().expect("shell should exit cleanly");
        drop(shell);
        (
            String::from_utf8(output).expect("output should be utf-8"),
            shared,
        )
    }

    fn run_script(script: &str, movies: Vec<Movie>) -> (String, Rc<RefCell<Vec<Movie>>>) {
        run_script_with_config(script, movies, WebsiteConfig::default())
    }

    #[test]
    fn test_command_zero_exits() {
        let (output, _) = run_script("0\n", sample_catalog());
        assert!(output.contains("Bye!"));
    }

    #[test]
    fn test_end_of_input_exits_cleanly() {
        let (output, _) = run_script("", sample_catalog());
        assert!(output.contains("My Movies Catalog"));
    }

    #[test]
    fn test_empty_catalog_terminates_immediately() {
        let (output, _) = run_script("1\n0\n", Vec::new());
        assert!(output.contains("The catalog is empty"));
        assert!(!output.contains("Bye!"));
    }

    #[test]
    fn test_invalid_menu_choice_reprompts() {
        let (output, _) = run_script("99\n0\n", sample_catalog());
        assert!(output.contains("Invalid choice"));
        assert!(output.contains("Bye!"));
    }

    #[test]
    fn test_list_shows_count_and_records() {
        let (output, _) = run_script("1\n\n0\n", sample_catalog());
        assert!(output.contains("3 movies in total"));
        assert!(output.contains("Name: Inception, Rating: 8.8, Year: 2010"));
    }

    #[test]
    fn test_duplicate_add_leaves_catalog_unchanged() {
        let (output, movies) = run_script("2\ninception\n\n0\n", sample_catalog());
        assert!(output.contains("the movie \"inception\" is already in the catalog"));
        assert_eq!(movies.borrow().len(), 3);
    }

    #[test]
    fn test_manual_add_appends_a_validated_record() {
        let (output, movies) = run_script("2\nDune\n8.1\n2021\n\n0\n", sample_catalog());
        assert!(output.contains("The movie Dune is successfully added."));
        let stored = movies.borrow();
        assert_eq!(stored.len(), 4);
        assert_eq!(stored[3].title, "Dune");
        assert_eq!(stored[3].rating, 8.1);
        assert_eq!(stored[3].year, 2021);
    }

    #[test]
    fn test_invalid_rating_input_is_reprompted() {
        let (output, movies) = run_script("4\ncars\nabc\n11\n9.0\n\n0\n", sample_catalog());
        assert!(output.contains("Only numbers are allowed"));
        assert!(output.contains("rating 11 is invalid"));
        assert_eq!(movies.borrow()[2].rating, 9.0);
    }

    #[test]
    fn test_delete_is_case_insensitive() {
        let (output, movies) = run_script("3\nUP\n\n0\n", sample_catalog());
        assert!(output.contains("The movie UP is successfully deleted."));
        let titles: Vec<String> = movies.borrow().iter().map(|m| m.title.clone()).collect();
        assert_eq!(titles, ["Inception", "Cars"]);
    }

    #[test]
    fn test_delete_of_missing_title_reports_and_keeps_records() {
        let (output, movies) = run_script("3\nGhost\n\n0\n", sample_catalog());
        assert!(output.contains("There is no such movie in the catalog :("));
        assert_eq!(movies.borrow().len(), 3);
    }

    #[test]
    fn test_stats_reports_the_aggregate() {
        let (output, _) = run_script("5\n\n0\n", sample_catalog());
        assert!(output.contains("Average rating: 8.1"));
        assert!(output.contains("Median rating: 8.3"));
        assert!(output.contains("The movie with the highest rating: Inception: 8.8"));
        assert!(output.contains("The movie with the lowest rating: Cars: 7.1"));
    }

    #[test]
    fn test_random_pick_names_a_cataloged_movie() {
        let (output, _) = run_script("6\n\n0\n", sample_catalog());
        assert!(output.contains("Your movie for tonight: "));
        assert!(
            output.contains("Inception") || output.contains("Up") || output.contains("Cars")
        );
    }

    #[test]
    fn test_search_typo_suggests_the_close_title() {
        let (output, _) = run_script("7\nIncepton\n\n0\n", sample_catalog());
        assert!(output.contains("The movie \"Incepton\" does not exist. Did you mean:"));
        assert!(output.contains("Inception"));
    }

    #[test]
    fn test_search_exact_title_prints_the_rating() {
        let (output, _) = run_script("7\ncars\n\n0\n", sample_catalog());
        assert!(output.contains("Cars: 7.1"));
        assert!(!output.contains("does not exist"));
    }

    #[test]
    fn test_sort_by_year_validates_the_direction_input() {
        let (output, _) = run_script("9\n5\n1\n\n0\n", sample_catalog());
        assert!(output.contains("Only \"1\" or \"0\" are allowed."));
        let inception = output.find("Inception: rating").expect("Inception is listed");
        let cars = output.find("Cars: rating").expect("Cars is listed");
        assert!(inception < cars, "newest first puts 2010 before 2006");
    }

    #[test]
    fn test_filter_applies_the_example_window() {
        let (output, _) = run_script("11\n8.0\n2008\n2011\n\n0\n", sample_catalog());
        assert!(output.contains("Inception (2010): 8.8"));
        assert!(output.contains("Up (2009): 8.3"));
        assert!(!output.contains("Cars (2006)"));
    }

    #[test]
    fn test_filter_rejects_a_two_digit_year_then_accepts_blank() {
        let (output, _) = run_script("11\n\n99\n\n\n\n\n0\n", sample_catalog());
        assert!(output.contains("Wrong format of the year."));
        assert!(output.contains("Cars (2006): 7.1"));
    }

    #[test]
    fn test_website_export_writes_the_configured_page() {
        let nonce = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be valid")
            .as_nanos();
        let output_path = std::env::temp_dir().join(format!("cinedex_site_{nonce}.html"));
        let website_config = WebsiteConfig {
            output_path: output_path.clone(),
            page_title: "Shell Test Catalog".to_string(),
        };

        let (output, _) = run_script_with_config("12\n\n0\n", sample_catalog(), website_config);
        assert!(output.contains("Website was generated successfully."));

        let page = std::fs::read_to_string(&output_path).expect("page should be written");
        assert!(page.contains("Shell Test Catalog"));
        assert!(page.contains("Inception"));

        std::fs::remove_file(output_path).expect("fixture should be removable");
    }
}
