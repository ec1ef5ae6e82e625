pub mod banner;
pub mod cursor;
pub mod event;
pub mod gallery;
pub mod post;
pub mod record;
pub mod verse;

pub use banner::Banner;
pub use cursor::CyclicCursor;
pub use event::Event;
pub use gallery::GalleryImage;
pub use post::FacebookPost;
pub use record::{ContentKind, ContentRecord, DailyPick};
pub use verse::{Verse, VerseOfTheDay};
