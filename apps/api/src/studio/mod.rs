// Content studio: ideation, post drafting, draft analysis and topic variations.
// Every pipeline retrieves ranked reference posts from the corpus and calls the
// text generator through the TextGenerator trait only.

pub mod aligner;
pub mod drafting;
pub mod handlers;
pub mod ideation;
pub mod models;
pub mod prompts;
pub mod variations;
