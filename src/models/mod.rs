mod options;
mod preference;
mod recipe;

pub use options::{OptionGroup, OptionKind, ScoredOption};
pub use preference::{Preference, PreferenceRecord};
pub use recipe::{CandidateRef, Filters, Ingredient, Recipe};
