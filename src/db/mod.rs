pub mod mongo;

pub use mongo::connect;
