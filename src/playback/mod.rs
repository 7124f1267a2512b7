pub mod blink;
pub mod button;
pub mod controller;
pub mod trigger;
