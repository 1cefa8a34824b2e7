pub mod volcano_crossing;

pub use volcano_crossing::{Action, Cell, Pos, VolcanoConfig, VolcanoCrossing};
