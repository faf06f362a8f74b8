pub mod dashboard;
pub mod request;
