pub mod form;
pub mod health;
pub mod tags;
pub mod types;
pub mod values;
