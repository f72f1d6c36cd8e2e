mod task;

pub use task::{TIMER_CHOICES, Task, TimerChoice};
