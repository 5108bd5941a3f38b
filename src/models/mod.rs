pub mod account;
pub mod diagnostics;
pub mod dpr;
pub mod feedback;
pub mod project;
pub mod view;
