pub use self::coordinator::coordinator;
pub use self::student::student;
pub use self::tutor::tutor;

mod coordinator;
mod student;
mod tutor;
