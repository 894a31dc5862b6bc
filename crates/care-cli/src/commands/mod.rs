pub mod add;
pub mod delete;
pub mod edit;
pub mod exception;
pub mod list;
pub mod reschedule;
pub mod series;
pub mod show;
pub mod status;
