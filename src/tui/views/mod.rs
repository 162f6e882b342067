pub mod clock;
pub mod timer;

pub use timer::draw_timer;
