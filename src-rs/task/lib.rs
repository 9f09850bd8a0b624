pub mod seeder;
pub mod store;
pub mod types;

pub use seeder::{TaskSeeder, MIN_QUEUE_LEN};
pub use store::TaskStore;
pub use types::{TaskStatus, TaskUpdate, VideoTask, MAX_PROGRESS};
