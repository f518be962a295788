pub mod collection;
pub mod movie;
pub mod quality_profile;
pub mod add_movie;

pub use collection::Collection;
pub use movie::{CollectionMovie, LibraryMovie};
pub use quality_profile::QualityProfile;
pub use add_movie::{AddMovieRequest, AddOptions};
