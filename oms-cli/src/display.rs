//! Terminal rendering of movie lists

use serde::Deserialize;
use serde_json::Value;

/// Movie as returned by the server
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MovieRow {
    pub title: String,
    #[serde(default)]
    pub cast: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Movies carried in a reply payload, single object or array
pub fn movies_from(payload: &Value) -> Vec<MovieRow> {
    match payload {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| serde_json::from_value(item.clone()).ok())
            .collect(),
        Value::Object(_) => serde_json::from_value(payload.clone())
            .map(|movie| vec![movie])
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// Left-aligned table with a header row and a rule under it
pub fn movie_table(movies: &[MovieRow]) -> String {
    const HEADERS: [&str; 3] = ["Title", "Cast", "Category"];

    let rows: Vec<[&str; 3]> = movies
        .iter()
        .map(|m| {
            [
                m.title.as_str(),
                m.cast.as_deref().unwrap_or("-"),
                m.category.as_deref().unwrap_or("-"),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render = |cells: [&str; 3]| {
        let line = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join("  ");
        line.trim_end().to_string()
    };

    let mut out = vec![render(HEADERS)];
    out.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    out.extend(rows.into_iter().map(render));
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_movies_from_payload() {
        let list = json!([
            { "movie_id": 1, "title": "Heat", "cast": "Al Pacino", "category": null },
            { "movie_id": 2, "title": "Alien" },
        ]);
        let movies = movies_from(&list);
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].cast.as_deref(), Some("Al Pacino"));
        assert_eq!(movies[1].category, None);

        let single = json!({ "movie_id": 3, "title": "Jaws" });
        assert_eq!(movies_from(&single)[0].title, "Jaws");

        assert!(movies_from(&json!("Heat")).is_empty());
    }

    #[test]
    fn test_movie_table_alignment() {
        let movies = vec![
            MovieRow {
                title: "Inception".to_string(),
                cast: Some("Leonardo Dicaprio".to_string()),
                category: Some("Sci-Fi".to_string()),
            },
            MovieRow {
                title: "Up".to_string(),
                cast: None,
                category: None,
            },
        ];

        let table = movie_table(&movies);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "Title      Cast               Category");
        assert_eq!(lines[1], "---------  -----------------  --------");
        assert_eq!(lines[2], "Inception  Leonardo Dicaprio  Sci-Fi");
        assert_eq!(lines[3], "Up         -                  -");
    }
}
