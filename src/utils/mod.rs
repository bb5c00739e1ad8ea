// Utilities Module
//
// Helpers shared by the schema and tree layers.

pub mod paths;
pub mod suggest;
