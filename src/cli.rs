use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use shelf_core::{AuthorId, BookId, CarouselId, PublisherId, TagId};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "shelf")]
#[command(author, version, about = "Book catalog with managed cover images")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the database, the media root and the placeholder cover
    Init,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,

    /// Manage authors
    #[command(subcommand)]
    Author(AuthorCommand),

    /// Manage publishers
    #[command(subcommand)]
    Publisher(PublisherCommand),

    /// Manage tags
    #[command(subcommand)]
    Tag(TagCommand),

    /// Manage books
    #[command(subcommand)]
    Book(BookCommand),

    /// Manage homepage carousel slides
    #[command(subcommand)]
    Carousel(CarouselCommand),

    /// Show book polls
    #[command(subcommand)]
    Poll(PollCommand),
}

#[derive(Subcommand)]
pub enum AuthorCommand {
    /// Add an author
    Add {
        name: String,

        /// Short biography
        #[arg(long, default_value = "")]
        about: String,
    },

    /// Rename an author (the slug follows)
    Rename { id: AuthorId, name: String },

    /// List authors with their book counts
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete an author and all of their books
    Delete { id: AuthorId },
}

#[derive(Subcommand)]
pub enum PublisherCommand {
    /// Add a publisher
    Add {
        name: String,

        /// Establishment date (YYYY-MM-DD)
        #[arg(long)]
        established: Option<NaiveDate>,

        #[arg(long, default_value = "")]
        about: String,
    },

    /// List publishers with their book counts
    List {
        /// Only publishers established in this year
        #[arg(long)]
        established_in: Option<i32>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a publisher and all of its books
    Delete { id: PublisherId },
}

#[derive(Subcommand)]
pub enum TagCommand {
    /// Add a tag
    Add { name: String },

    /// List tags with their book counts
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a tag
    Delete { id: TagId },
}

#[derive(Subcommand)]
pub enum BookCommand {
    /// Add a book
    Add {
        name: String,

        /// Author ID
        #[arg(long)]
        author: AuthorId,

        /// Publisher ID
        #[arg(long)]
        publisher: Option<PublisherId>,

        /// Publication date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        pub_date: Option<NaiveDate>,

        #[arg(long, default_value = "")]
        intro: String,

        /// Cover image file to upload
        #[arg(long)]
        cover: Option<PathBuf>,
    },

    /// Upload a new cover, replacing the current one
    SetCover { id: BookId, file: PathBuf },

    /// Replace the tags of a book
    Tags {
        id: BookId,

        /// Tag IDs (none clears all tags)
        tags: Vec<TagId>,
    },

    /// List books
    List {
        #[arg(long)]
        author: Option<AuthorId>,

        #[arg(long)]
        publisher: Option<PublisherId>,

        #[arg(long)]
        tag: Option<TagId>,

        /// Case-insensitive substring of the book name
        #[arg(long)]
        search: Option<String>,

        /// Publication year
        #[arg(long)]
        year: Option<i32>,

        /// Publication month (1-12); needs --year
        #[arg(long, requires = "year", value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a book and its cover file
    Delete { id: BookId },

    /// Vote on a book
    Vote {
        id: BookId,

        #[arg(value_enum)]
        direction: VoteArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum VoteArg {
    Up,
    Down,
}

#[derive(Subcommand)]
pub enum CarouselCommand {
    /// Add a slide from an image file
    Add {
        file: PathBuf,

        #[arg(long, default_value = "")]
        name: String,

        #[arg(long, default_value = "")]
        title: String,

        #[arg(long, default_value = "")]
        intro: String,

        /// Target URL (http or https)
        #[arg(long, default_value = "")]
        link: String,
    },

    /// List slides
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a slide and its image file
    Delete { id: CarouselId },
}

#[derive(Subcommand)]
pub enum PollCommand {
    /// List polls
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
