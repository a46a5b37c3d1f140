/// UI layer: widgets only, no data semantics.
pub mod charts;
pub mod panels;
