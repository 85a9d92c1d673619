pub mod fuzzy;
pub mod history;
pub mod options;
pub mod preference;
pub mod recommendation;
pub mod search;

pub use history::PreferenceHistory;
pub use options::OptionCatalog;
pub use recommendation::Recommender;
