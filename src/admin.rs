//! Plain-text list views for the operator console.
//!
//! Each `*_table` function turns a listing query's rows into a [`Table`]
//! with the columns the catalog's admin lists show.

use std::fmt;

use shelf_db::models::{AuthorListing, BookListing, Carousel, PollListing, PublisherListing, TagListing};

/// A left-aligned text table.
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                let n = cell.chars().count();
                match widths.get_mut(i) {
                    Some(w) => *w = (*w).max(n),
                    None => widths.push(n),
                }
            }
        }
        widths
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, cells: &[String], widths: &[usize]) -> fmt::Result {
    let last = cells.len().saturating_sub(1);
    for (i, cell) in cells.iter().enumerate() {
        if i == last {
            write!(f, "{cell}")?;
        } else {
            let pad = widths[i] - cell.chars().count();
            write!(f, "{cell}{}  ", " ".repeat(pad))?;
        }
    }
    writeln!(f)
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.widths();
        write_row(f, &self.headers, &widths)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        write_row(f, &rule, &widths)?;
        for row in &self.rows {
            write_row(f, row, &widths)?;
        }
        Ok(())
    }
}

fn or_dash(value: Option<String>) -> String {
    value.unwrap_or_else(|| "-".to_string())
}

/// Books: name, publication date, author, publisher, poll count.
pub fn books_table(rows: &[BookListing]) -> Table {
    let mut table = Table::new(["ID", "NAME", "PUBLISHED", "AUTHOR", "PUBLISHER", "POLL", "SLUG"]);
    for row in rows {
        table.push(vec![
            row.book.id.to_string(),
            row.book.name.clone(),
            or_dash(row.book.pub_date.map(|d| d.to_string())),
            row.author_name.clone(),
            or_dash(row.publisher_name.clone()),
            row.poll_count().to_string(),
            row.book.slug.clone(),
        ]);
    }
    table
}

pub fn authors_table(rows: &[AuthorListing]) -> Table {
    let mut table = Table::new(["ID", "NAME", "BOOKS", "SLUG"]);
    for row in rows {
        table.push(vec![
            row.author.id.to_string(),
            row.author.name.clone(),
            row.book_count.to_string(),
            row.author.slug.clone(),
        ]);
    }
    table
}

pub fn publishers_table(rows: &[PublisherListing]) -> Table {
    let mut table = Table::new(["ID", "NAME", "ESTABLISHED", "BOOKS", "SLUG"]);
    for row in rows {
        table.push(vec![
            row.publisher.id.to_string(),
            row.publisher.name.clone(),
            or_dash(row.publisher.establish_date.map(|d| d.to_string())),
            row.book_count.to_string(),
            row.publisher.slug.clone(),
        ]);
    }
    table
}

pub fn tags_table(rows: &[TagListing]) -> Table {
    let mut table = Table::new(["ID", "NAME", "BOOKS", "SLUG"]);
    for row in rows {
        table.push(vec![
            row.tag.id.to_string(),
            row.tag.name.clone(),
            row.book_count.to_string(),
            row.tag.slug.clone(),
        ]);
    }
    table
}

pub fn polls_table(rows: &[PollListing]) -> Table {
    let mut table = Table::new(["BOOK", "UP", "DOWN"]);
    for row in rows {
        table.push(vec![
            row.book_name.clone(),
            row.poll.up.to_string(),
            row.poll.down.to_string(),
        ]);
    }
    table
}

pub fn carousels_table(rows: &[Carousel]) -> Table {
    let mut table = Table::new(["ID", "NAME", "IMAGE", "TITLE"]);
    for slide in rows {
        table.push(vec![
            slide.id.to_string(),
            slide.name.clone(),
            slide.img.to_string(),
            slide.title.clone(),
        ]);
    }
    table
}
