pub mod multimap;
pub mod schema;
pub mod seal;
pub mod util;
