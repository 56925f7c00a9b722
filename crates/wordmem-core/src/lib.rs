pub mod error;
pub mod library;
pub mod pager;
pub mod view;
pub mod wordbook;

pub use error::CoreError;
pub use pager::WordBrowser;
pub use wordbook::WordbookLoader;
