pub mod catalog;
pub mod classifier;
pub mod filters;
pub mod indexer;
pub mod providers;
pub mod recommendations;
pub mod rules;
pub mod similarity;
pub mod text;
pub mod voice_actions;
