mod case;
mod classification;
mod page;
mod taxonomy;

pub use case::*;
pub use classification::*;
pub use page::*;
pub use taxonomy::*;
