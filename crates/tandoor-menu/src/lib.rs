//! Menu catalog and lexical normalization for the Tandoor platform.
//!
//! The catalog is restaurant-specific configuration loaded once at startup
//! and immutable thereafter: canonical item names mapped to prices, alias
//! phrasings mapped to canonical names, and the keyword rule deciding which
//! items require a spice level. The normalizer turns free speech text into
//! a canonical name or no-match, as a pure function of the input and the
//! static catalog.

pub mod catalog;
pub mod error;
pub mod normalize;

pub use catalog::MenuCatalog;
pub use error::MenuError;
