//! Static website export for the catalog.
//!
//! The page template ships inside the binary; rendering is plain
//! placeholder substitution plus HTML escaping of record fields.

use std::fs;
use std::path::Path;

use log::info;

use crate::error::CatalogError;
use crate::movie::Movie;

const PAGE_TEMPLATE: &str = include_str!("../templates/index_template.html");
const TITLE_PLACEHOLDER: &str = "__TEMPLATE_TITLE__";
const GRID_PLACEHOLDER: &str = "__TEMPLATE_MOVIE_GRID__";

/// Renders the full page for the given catalog.
pub fn render_page(page_title: &str, movies: &[Movie]) -> String {
    PAGE_TEMPLATE
        .replace(TITLE_PLACEHOLDER, &escape_html(page_title))
        .replace(GRID_PLACEHOLDER, &movie_grid(movies))
}

/// Renders the page and writes it to `path`.
pub fn export(path: &Path, page_title: &str, movies: &[Movie]) -> Result<(), CatalogError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|err| {
                CatalogError::Storage(format!(
                    "cannot create website directory {}: {}",
                    parent.display(),
                    err
                ))
            })?;
        }
    }
    let page = render_page(page_title, movies);
    fs::write(path, page).map_err(|err| {
        CatalogError::Storage(format!("cannot write website {}: {}", path.display(), err))
    })?;
    info!("Website written to {}", path.display());
    Ok(())
}

fn movie_grid(movies: &[Movie]) -> String {
    let mut grid = String::new();
    for movie in movies {
        grid.push_str("        <li class=\"movie\">\n");
        match &movie.poster {
            Some(poster) => grid.push_str(&format!(
                "            <img class=\"movie-poster\" src=\"{}\" alt=\"{}\"/>\n",
                escape_html(poster),
                escape_html(&movie.title)
            )),
            None => grid.push_str("            <div class=\"movie-poster-missing\">no poster</div>\n"),
        }
        grid.push_str(&format!(
            "            <div class=\"movie-title\">{}</div>\n",
            escape_html(&movie.title)
        ));
        grid.push_str(&format!(
            "            <div class=\"movie-year\">{}</div>\n",
            movie.year
        ));
        grid.push_str(&format!(
            "            <div class=\"movie-rating\">Rating: {:.1}</div>\n",
            movie.rating
        ));
        grid.push_str("        </li>\n");
    }
    grid
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
