//! Carousel slide CRUD operations.

use rusqlite::Connection;
use shelf_core::{CarouselId, Error, Result};

use super::{optional, write_error};
use crate::models::Carousel;

const COLS: &str = "id, img, name, title, intro, link";

/// Insert or update a carousel slide, keyed on its ID.
pub fn save_carousel(conn: &Connection, slide: &Carousel) -> Result<()> {
    conn.execute(
        "INSERT INTO carousels (id, img, name, title, intro, link)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(id) DO UPDATE SET
             img = excluded.img,
             name = excluded.name,
             title = excluded.title,
             intro = excluded.intro,
             link = excluded.link",
        rusqlite::params![
            slide.id.to_string(),
            slide.img.as_str(),
            &slide.name,
            &slide.title,
            &slide.intro,
            &slide.link,
        ],
    )
    .map_err(|e| write_error("carousel", &slide.name, e))?;
    Ok(())
}

/// Get a carousel slide by primary key.
pub fn get_carousel(conn: &Connection, id: CarouselId) -> Result<Option<Carousel>> {
    let q = format!("SELECT {COLS} FROM carousels WHERE id = ?1");
    optional(conn.query_row(&q, [id.to_string()], Carousel::from_row))
}

/// List carousel slides ordered by name.
pub fn list_carousels(conn: &Connection) -> Result<Vec<Carousel>> {
    let q = format!("SELECT {COLS} FROM carousels ORDER BY name ASC, id ASC");
    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], Carousel::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Delete a carousel slide by ID.
pub fn delete_carousel(conn: &Connection, id: CarouselId) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM carousels WHERE id = ?1", [id.to_string()])
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::init_memory_pool;
    use shelf_core::ImageRef;

    #[test]
    fn save_update_list_delete() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let mut slide = Carousel::new(ImageRef::new("carousel/2024/05/27/a.jpg"));
        slide.name = "spring".into();
        save_carousel(&conn, &slide).unwrap();

        slide.title = "Spring reading".into();
        save_carousel(&conn, &slide).unwrap();
        assert_eq!(get_carousel(&conn, slide.id).unwrap(), Some(slide.clone()));

        let mut other = Carousel::new(ImageRef::new("carousel/2024/05/27/b.jpg"));
        other.name = "autumn".into();
        save_carousel(&conn, &other).unwrap();
        let names: Vec<_> = list_carousels(&conn).unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, ["autumn", "spring"]);

        assert!(delete_carousel(&conn, slide.id).unwrap());
        assert!(get_carousel(&conn, slide.id).unwrap().is_none());
    }
}
