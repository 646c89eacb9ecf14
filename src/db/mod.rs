pub mod tags;
pub mod teams;
pub mod todos;
pub mod users;
