pub mod command;
pub mod job;
pub mod jobs;
pub mod schedule;
pub mod scheduler;

pub use command::Command;
pub use job::Job;
pub use schedule::Schedule;
pub use scheduler::Scheduler;
