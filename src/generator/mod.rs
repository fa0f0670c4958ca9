pub mod clash;
pub mod links;

pub use clash::generate_clash_entry;
pub use links::generate_uri;
