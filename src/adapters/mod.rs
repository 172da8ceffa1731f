// Adapters layer: concrete implementations of the domain ports.

pub mod gazetteer;
pub mod keywords;
pub mod storage;

pub use gazetteer::GazetteerExtractor;
pub use keywords::KeywordMatcher;
pub use storage::LocalStorage;
