pub mod locations;
pub mod menu;
pub mod profile;
pub mod util;

pub use locations::*;
pub use menu::*;
pub use profile::*;
pub use util::*;
