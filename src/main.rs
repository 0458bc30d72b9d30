mod cli;

use shelf::admin;
use shelf::catalog::{Catalog, Vote};
use shelf::config::{find_config, load_config_or_default};
use shelf::media::LocalImageStore;
use shelf_core::config::Config;
use shelf_core::{Error, ImageCategory, ImageRef};
use shelf_db::models::{Author, Book, Carousel, Publisher, Tag};
use shelf_db::pool::init_pool;
use shelf_db::queries::{authors, books, carousels, polls, publishers, tags};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{
    AuthorCommand, BookCommand, CarouselCommand, Cli, Commands, PollCommand, PublisherCommand,
    TagCommand, VoteArg,
};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "shelf=trace,shelf_db=debug".to_string()
        } else {
            "shelf=info,shelf_db=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Init => init(&load_config_or_default(config_path)),
        Commands::Validate {
            config: validate_path,
        } => {
            let path = validate_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("shelf {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Author(cmd) => author(&open(config_path)?, cmd),
        Commands::Publisher(cmd) => publisher(&open(config_path)?, cmd),
        Commands::Tag(cmd) => tag(&open(config_path)?, cmd),
        Commands::Book(cmd) => book(&open(config_path)?, cmd),
        Commands::Carousel(cmd) => carousel(&open(config_path)?, cmd),
        Commands::Poll(cmd) => poll(&open(config_path)?, cmd),
    }
}

/// Everything a catalog command needs.
struct Shelf {
    catalog: Catalog,
    store: Arc<LocalImageStore>,
}

fn open(config_path: Option<&Path>) -> Result<Shelf> {
    let config = load_config_or_default(config_path);
    open_with(&config)
}

fn open_with(config: &Config) -> Result<Shelf> {
    if let Some(parent) = config.database.path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating database directory {}", parent.display()))?;
    }
    std::fs::create_dir_all(&config.media.root)
        .with_context(|| format!("creating media root {}", config.media.root.display()))?;

    let pool = init_pool(&config.database)?;

    let store = Arc::new(LocalImageStore::new(config.media.root.clone()));
    let catalog = Catalog::new(pool, store.clone(), config.images);
    Ok(Shelf { catalog, store })
}

fn init(config: &Config) -> Result<()> {
    let shelf = open_with(config)?;
    println!("Database: {}", config.database.path.display());
    println!("Media root: {}", config.media.root.display());

    if shelf.store.ensure_placeholder()? {
        println!("Wrote placeholder cover {}", ImageRef::default_cover());
    } else {
        println!("Placeholder cover already present");
    }
    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match find_config(path) {
        Some(p) => {
            println!("Validating config: {}", p.display());
            let config = Config::load(&p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file found, using defaults");
            Config::default()
        }
    };

    println!("  Database: {}", config.database.path.display());
    println!("  Media root: {}", config.media.root.display());
    println!(
        "  Cover size: {}x{}",
        config.images.cover.width, config.images.cover.height
    );
    println!(
        "  Carousel size: {}x{}",
        config.images.carousel.width, config.images.carousel.height
    );

    let warnings = config.validate();
    for warning in &warnings {
        println!("⚠ {}", warning);
    }
    Ok(())
}

fn print_list<T: Serialize>(rows: &[T], json: bool, table: admin::Table) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(rows)?);
    } else {
        print!("{}", table);
    }
    Ok(())
}

fn upload(store: &LocalImageStore, category: ImageCategory, file: &Path) -> Result<ImageRef> {
    let data = std::fs::read(file).with_context(|| format!("reading {}", file.display()))?;
    let name = file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("image");
    Ok(store.store_upload(category, name, &data)?)
}

fn author(shelf: &Shelf, cmd: AuthorCommand) -> Result<()> {
    let catalog = &shelf.catalog;
    match cmd {
        AuthorCommand::Add { name, about } => {
            let mut author = Author::new(name);
            author.about = about;
            catalog.save_author(&mut author)?;
            println!("Added {} {} ({})", author, author.id, author.slug);
        }
        AuthorCommand::Rename { id, name } => {
            let conn = catalog.conn()?;
            let mut author = authors::get_author(&conn, id)?
                .ok_or_else(|| Error::not_found("author", id))?;
            author.name = name;
            catalog.save_author(&mut author)?;
            println!("Renamed to {} ({})", author, author.slug);
        }
        AuthorCommand::List { json } => {
            let conn = catalog.conn()?;
            let rows = authors::list_authors(&conn)?;
            print_list(&rows, json, admin::authors_table(&rows))?;
        }
        AuthorCommand::Delete { id } => {
            catalog.delete_author(id)?;
            println!("Deleted author {}", id);
        }
    }
    Ok(())
}

fn publisher(shelf: &Shelf, cmd: PublisherCommand) -> Result<()> {
    let catalog = &shelf.catalog;
    match cmd {
        PublisherCommand::Add {
            name,
            established,
            about,
        } => {
            let mut publisher = Publisher::new(name);
            publisher.establish_date = established;
            publisher.about = about;
            catalog.save_publisher(&mut publisher)?;
            println!("Added {} {} ({})", publisher, publisher.id, publisher.slug);
        }
        PublisherCommand::List {
            established_in,
            json,
        } => {
            let conn = catalog.conn()?;
            let rows = publishers::list_publishers(&conn, established_in)?;
            print_list(&rows, json, admin::publishers_table(&rows))?;
        }
        PublisherCommand::Delete { id } => {
            catalog.delete_publisher(id)?;
            println!("Deleted publisher {}", id);
        }
    }
    Ok(())
}

fn tag(shelf: &Shelf, cmd: TagCommand) -> Result<()> {
    let catalog = &shelf.catalog;
    match cmd {
        TagCommand::Add { name } => {
            let mut tag = Tag::new(name);
            catalog.save_tag(&mut tag)?;
            println!("Added {} {} ({})", tag, tag.id, tag.slug);
        }
        TagCommand::List { json } => {
            let conn = catalog.conn()?;
            let rows = tags::list_tags(&conn)?;
            print_list(&rows, json, admin::tags_table(&rows))?;
        }
        TagCommand::Delete { id } => {
            catalog.delete_tag(id)?;
            println!("Deleted tag {}", id);
        }
    }
    Ok(())
}

fn book(shelf: &Shelf, cmd: BookCommand) -> Result<()> {
    let catalog = &shelf.catalog;
    match cmd {
        BookCommand::Add {
            name,
            author,
            publisher,
            pub_date,
            intro,
            cover,
        } => {
            let mut book = Book::new(name, author);
            book.publisher_id = publisher;
            if pub_date.is_some() {
                book.pub_date = pub_date;
            }
            book.intro = intro;
            if let Some(file) = cover {
                book.cover = upload(&shelf.store, ImageCategory::Cover, &file)?;
            }
            catalog.save_book(&mut book)?;
            println!("Added {} {} ({})", book, book.id, book.slug);
        }
        BookCommand::SetCover { id, file } => {
            let conn = catalog.conn()?;
            let mut book = books::get_book(&conn, id)?
                .ok_or_else(|| Error::not_found("book", id))?;
            book.cover = upload(&shelf.store, ImageCategory::Cover, &file)?;
            catalog.save_book(&mut book)?;
            println!("Cover of {} is now {}", book, book.cover);
        }
        BookCommand::Tags { id, tags } => {
            catalog.set_book_tags(id, &tags)?;
            println!("Book {} now has {} tag(s)", id, tags.len());
        }
        BookCommand::List {
            author,
            publisher,
            tag,
            search,
            year,
            month,
            json,
        } => {
            let filter = books::BookFilter {
                author,
                publisher,
                tag,
                search,
                year,
                month,
            };
            let conn = catalog.conn()?;
            let rows = books::list_books(&conn, &filter)?;
            print_list(&rows, json, admin::books_table(&rows))?;
        }
        BookCommand::Delete { id } => {
            catalog.delete_book(id)?;
            println!("Deleted book {}", id);
        }
        BookCommand::Vote { id, direction } => {
            let vote = match direction {
                VoteArg::Up => Vote::Up,
                VoteArg::Down => Vote::Down,
            };
            let poll = catalog.vote(id, vote)?;
            println!("up: {}, down: {}, count: {}", poll.up, poll.down, poll.score());
        }
    }
    Ok(())
}

fn carousel(shelf: &Shelf, cmd: CarouselCommand) -> Result<()> {
    let catalog = &shelf.catalog;
    match cmd {
        CarouselCommand::Add {
            file,
            name,
            title,
            intro,
            link,
        } => {
            let img = upload(&shelf.store, ImageCategory::Carousel, &file)?;
            let mut slide = Carousel::new(img);
            slide.name = name;
            slide.title = title;
            slide.intro = intro;
            slide.link = link;
            catalog.save_carousel(&mut slide)?;
            println!("Added {} {}", slide, slide.id);
        }
        CarouselCommand::List { json } => {
            let conn = catalog.conn()?;
            let rows = carousels::list_carousels(&conn)?;
            print_list(&rows, json, admin::carousels_table(&rows))?;
        }
        CarouselCommand::Delete { id } => {
            catalog.delete_carousel(id)?;
            println!("Deleted carousel {}", id);
        }
    }
    Ok(())
}

fn poll(shelf: &Shelf, cmd: PollCommand) -> Result<()> {
    match cmd {
        PollCommand::List { json } => {
            let conn = shelf.catalog.conn()?;
            let rows = polls::list_polls(&conn)?;
            print_list(&rows, json, admin::polls_table(&rows))?;
        }
    }
    Ok(())
}
