pub mod run;
pub mod tag;
