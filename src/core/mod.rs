pub mod agenda;
pub mod event;
pub mod project;
pub mod task;
pub mod temporal;
pub mod text;
