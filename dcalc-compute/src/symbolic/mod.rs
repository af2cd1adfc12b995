pub mod derivative;
pub mod error;
pub mod simplify;

pub use derivative::derivative;
pub use simplify::simplify;
