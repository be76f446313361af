mod crafting;
mod grid;
mod interaction;
mod inventory;
mod terrain;

pub use crafting::*;
pub use grid::*;
pub use interaction::*;
pub use inventory::*;
pub use terrain::*;
