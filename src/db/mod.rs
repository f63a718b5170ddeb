//! Persistence module split across logical submodules.

mod connection;
mod repository;
mod students;

pub use connection::{bootstrap, now_timestamp, open_connection};
pub use repository::StudentRepository;
pub use students::{
    delete_student, fetch_last_student, fetch_students, insert_student, update_student,
};
