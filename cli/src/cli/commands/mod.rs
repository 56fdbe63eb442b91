mod compose;
mod links;
mod load_people;

pub use compose::{run_compose, ComposeArgs};
pub use links::run_links;
pub use load_people::run_load_people;
