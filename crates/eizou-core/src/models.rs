mod anime;
mod catalog;

pub use anime::{Anime, Episode, Season, Server};
pub use catalog::Catalog;
