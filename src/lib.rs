pub mod charts;
pub mod export;
pub mod fetch;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod settings;
