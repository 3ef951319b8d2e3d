pub mod classify;
pub mod output;
pub mod parser;
pub mod rules;
pub mod table;
