pub mod download;
pub mod error;
pub mod flight;
pub mod tts;

pub use download::{Downloader, file_name_from_url, wordbook_destination};
pub use error::NetError;
pub use flight::{FlightGuard, SingleFlight};
pub use tts::{Pronouncer, Pronunciation, ProviderMetadata, YoudaoPronouncer, audio_file_stem};
