pub mod backup;
pub mod run;
pub mod tools;
