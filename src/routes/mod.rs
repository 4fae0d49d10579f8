pub mod analysis;

pub mod essays;

pub mod reviews;

pub use analysis::configure_analysis_routes;
pub use essays::configure_essays_routes;
pub use reviews::configure_reviews_routes;
