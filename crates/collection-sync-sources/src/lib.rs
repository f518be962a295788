pub mod traits;
pub mod radarr;
pub mod error;

pub use traits::LibraryApi;
pub use radarr::RadarrClient;
pub use error::SourceError;
